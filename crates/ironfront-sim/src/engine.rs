//! Match engine: the core of the game.
//!
//! `MatchEngine` owns the hecs ECS world, the capture points, the ticket
//! ledger and the projectile pool, runs all systems in a fixed order, and
//! produces `MatchSnapshot`s. Completely headless, enabling deterministic
//! testing.

use glam::DVec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use ironfront_core::components::{DisplayName, PlayerControlled, Tank};
use ironfront_core::config::MatchRules;
use ironfront_core::enums::{MatchOutcome, ScenarioId, Team};
use ironfront_core::events::{AudioCue, MatchEvent};
use ironfront_core::state::MatchSnapshot;
use ironfront_core::types::SimTime;

use crate::capture::{CapturePoint, PointId};
use crate::error::SimError;
use crate::projectile::ProjectilePool;
use crate::scenario::{self, ScenarioPlan};
use crate::services::{DirectNavigation, Navigation, SpatialQuery, WorldColliders};
use crate::systems;
use crate::systems::damage::DeathReport;
use crate::tickets::{Killer, RosterEntry, TicketLedger};
use crate::world_setup::{self, TankSpawn};

/// Configuration for starting a new match.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same match.
    pub seed: u64,
    pub rules: MatchRules,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            rules: MatchRules::default(),
        }
    }
}

/// The match engine. Owns the ECS world and all match state.
pub struct MatchEngine {
    world: World,
    time: SimTime,
    rng: ChaCha8Rng,
    rules: MatchRules,
    attacker: Team,
    points: Vec<CapturePoint>,
    ledger: TicketLedger,
    started: bool,
    pool: ProjectilePool,
    nav: Box<dyn Navigation>,
    spatial: Box<dyn SpatialQuery>,
    deaths: Vec<DeathReport>,
    events: Vec<MatchEvent>,
    audio: Vec<AudioCue>,
}

impl MatchEngine {
    /// Create an empty match with the built-in navigation and collider services.
    pub fn new(config: SimConfig) -> Self {
        Self::with_services(config, Box::new(DirectNavigation::new()), Box::new(WorldColliders))
    }

    /// Create an empty match with host-provided services.
    pub fn with_services(config: SimConfig, nav: Box<dyn Navigation>, spatial: Box<dyn SpatialQuery>) -> Self {
        let ledger = TicketLedger::new(&config.rules, []);
        Self {
            world: World::new(),
            time: SimTime::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            pool: ProjectilePool::new(config.rules.projectile_pool_capacity),
            rules: config.rules,
            attacker: Team::Friendly,
            points: Vec::new(),
            ledger,
            started: false,
            nav,
            spatial,
            deaths: Vec::new(),
            events: Vec::new(),
            audio: Vec::new(),
        }
    }

    /// Create a match laid out from a built-in scenario.
    pub fn from_scenario(config: SimConfig, scenario: ScenarioId, with_player: bool) -> Result<Self, SimError> {
        let mut engine = Self::new(config);
        engine.load_plan(&scenario::build_plan(scenario, with_player))?;
        Ok(engine)
    }

    /// Place everything in `plan`. Must happen before the first tick.
    pub fn load_plan(&mut self, plan: &ScenarioPlan) -> Result<(), SimError> {
        self.attacker = plan.attacker;
        for obstacle in &plan.obstacles {
            self.spawn_obstacle(obstacle.position, obstacle.half_extents);
        }
        for point in &plan.points {
            let owner = point.owner.resolve(plan.attacker);
            self.add_point(point.name.clone(), point.position, owner);
        }
        for tank in &plan.tanks {
            self.spawn_tank(tank)?;
        }
        Ok(())
    }

    /// Spawn a tank. Tanks only count toward the ticket pools if spawned
    /// before the match starts.
    pub fn spawn_tank(&mut self, spawn: &TankSpawn) -> Result<Entity, SimError> {
        if self.started {
            return Err(SimError::InvalidSpawn(format!(
                "{} spawned after the match started",
                spawn.name
            )));
        }
        world_setup::spawn_tank(&mut self.world, self.nav.as_mut(), &mut self.rng, &self.rules, spawn)
    }

    pub fn spawn_obstacle(&mut self, position: DVec3, half_extents: DVec3) -> Entity {
        world_setup::spawn_obstacle(&mut self.world, position, half_extents)
    }

    /// Add a capture point using the match's capture rules.
    pub fn add_point(&mut self, name: impl Into<String>, position: DVec3, owner: Team) -> PointId {
        let id = PointId(self.points.len() as u32);
        self.points
            .push(CapturePoint::new(id, name, position, &self.rules.capture, owner));
        id
    }

    /// Count the rosters and open the ticket pools. Called by the first tick
    /// if not called explicitly.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        let roster: Vec<RosterEntry> = self
            .world
            .query::<(&Tank, &Team, Option<&PlayerControlled>)>()
            .iter()
            .map(|(_, (tank, team, player))| RosterEntry {
                team: *team,
                ticket_cost: tank.ticket_cost,
                player: player.is_some(),
            })
            .collect();
        self.ledger = TicketLedger::new(&self.rules, roster);
        self.started = true;
        info!(
            friendly = self.ledger.tickets(Team::Friendly),
            enemy = self.ledger.tickets(Team::Enemy),
            points = self.points.len(),
            "match started"
        );
    }

    /// Advance the match by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> MatchSnapshot {
        self.start();

        if !self.ledger.outcome().is_terminal() {
            self.run_systems();
            self.time.advance();
        }

        self.events.extend(self.ledger.take_events());
        let events = std::mem::take(&mut self.events);
        let audio = std::mem::take(&mut self.audio);
        systems::snapshot::build_snapshot(&self.world, &self.time, &self.ledger, &self.points, events, audio)
    }

    /// Tick until the match ends or `max_ticks` have run. Returns the last snapshot.
    pub fn run_to_end(&mut self, max_ticks: u64) -> MatchSnapshot {
        let mut snapshot = self.tick();
        for _ in 1..max_ticks {
            if snapshot.outcome.is_terminal() {
                break;
            }
            snapshot = self.tick();
        }
        snapshot
    }

    /// Damage a tank directly, attributing the hit to `attacker` if given.
    /// A lethal hit is processed immediately. Returns true if it was lethal.
    pub fn apply_damage(&mut self, target: Entity, amount: f64, attacker: Option<Entity>) -> Result<bool, SimError> {
        self.start();

        let killer = match attacker {
            Some(a) => Some(self.killer_of(a)?),
            None => None,
        };
        let Some(report) = systems::damage::apply(&mut self.world, target, amount, killer)? else {
            return Ok(false);
        };

        self.deaths.push(report);
        systems::cleanup::run(
            &mut self.world,
            &mut self.deaths,
            &mut self.ledger,
            &mut self.points,
            self.nav.as_mut(),
            &mut self.audio,
        );
        self.events.extend(self.ledger.take_events());
        Ok(true)
    }

    pub fn point(&self, id: PointId) -> Result<&CapturePoint, SimError> {
        self.points.get(id.0 as usize).ok_or(SimError::UnknownPoint(id))
    }

    pub fn points(&self) -> &[CapturePoint] {
        &self.points
    }

    pub fn ledger(&self) -> &TicketLedger {
        &self.ledger
    }

    /// The side that attacks in the loaded scenario.
    pub fn attacker(&self) -> Team {
        self.attacker
    }

    pub fn outcome(&self) -> MatchOutcome {
        self.ledger.outcome()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn pool(&self) -> &ProjectilePool {
        &self.pool
    }

    pub fn navigation(&self) -> &dyn Navigation {
        self.nav.as_ref()
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Tear the match down: presence sets and drain cycles are cleared
    /// before the points are dropped, then every entity is removed.
    pub fn teardown(&mut self) {
        for point in &mut self.points {
            point.clear();
        }
        self.points.clear();
        self.pool.clear();
        self.deaths.clear();
        let tanks: Vec<Entity> = self.world.query::<&Tank>().iter().map(|(e, _)| e).collect();
        for tank in tanks {
            self.nav.forget(tank);
        }
        self.world.clear();
    }

    fn killer_of(&self, attacker: Entity) -> Result<Killer, SimError> {
        if !self.world.contains(attacker) {
            return Err(SimError::UnknownEntity(attacker));
        }
        let name = self
            .world
            .get::<&DisplayName>(attacker)
            .map(|n| n.0.clone())
            .map_err(|_| SimError::MissingComponent {
                entity: attacker,
                component: "DisplayName",
            })?;
        let team = self
            .world
            .get::<&Team>(attacker)
            .map(|t| *t)
            .map_err(|_| SimError::MissingComponent {
                entity: attacker,
                component: "Team",
            })?;
        Ok(Killer { name, team })
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        let dt = self.time.dt();
        let now = self.time.elapsed_secs;

        // 1. Perception re-scan (if due)
        systems::perception::run(&mut self.world, &self.points, &self.rules.ai, dt);
        // 2. Combat state machine, aiming, firing
        systems::combat::run(
            &mut self.world,
            &self.points,
            self.nav.as_mut(),
            self.spatial.as_ref(),
            &mut self.pool,
            &mut self.rng,
            &self.rules,
            now,
            dt,
            &mut self.audio,
        );
        // 3. Locomotion
        self.nav.step(&mut self.world, dt);
        world_setup::sync_attachments(&mut self.world);
        // 4. Projectile flight and damage
        systems::projectiles::run(
            &mut self.world,
            self.spatial.as_ref(),
            &mut self.pool,
            self.rules.gravity,
            dt,
            &mut self.deaths,
        );
        // 5. Deaths
        systems::cleanup::run(
            &mut self.world,
            &mut self.deaths,
            &mut self.ledger,
            &mut self.points,
            self.nav.as_mut(),
            &mut self.audio,
        );
        self.events.extend(self.ledger.take_events());
        // 6. Presence
        systems::capture::update_presence(&self.world, self.spatial.as_ref(), &mut self.points);
        // 7. Contest values for every point
        systems::capture::run(&mut self.points, dt, &mut self.events, &mut self.audio);
        // 8. Ticket drain
        systems::capture::run_drains(
            &mut self.points,
            &mut self.ledger,
            self.rules.capture.drain_amount,
            dt,
        );
    }
}
