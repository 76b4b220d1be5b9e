//! Combat system: runs the state machine for every AI tank, drives
//! navigation, turret and gun servos, and fires when the shot is clean.
//!
//! Collect-then-apply: agent state is read into frames first, decisions are
//! made against the world as it stood, then written back.

use glam::DVec3;
use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, warn};

use ironfront_ai::aiming::{aim_pitch, aim_yaw, move_towards, move_towards_angle, GunMount};
use ironfront_ai::ballistics::{predict_lead, solve_launch, target_velocity, LaunchSolution};
use ironfront_ai::fsm::{self, CombatContext, CombatDecision, MoveDirective, PointTarget, Strafe};
use ironfront_ai::perception::{evaluate_sight, sight_ray, RayHit};
use ironfront_ai::weapon::{scatter, spread_half_angle, within_firing_arc};
use ironfront_core::components::{DisplayName, Gun, Health, Hull, Turret, Weapon};
use ironfront_core::config::MatchRules;
use ironfront_core::constants::{HULL_CENTER_HEIGHT, LOS_MUZZLE_OFFSET, LOS_TARGET_HEIGHT};
use ironfront_core::enums::{AiState, Team};
use ironfront_core::events::AudioCue;
use ironfront_core::types::{direction_from_angles, flatten, Position, Velocity};

use crate::agent::{AiBrain, TargetRef};
use crate::capture::CapturePoint;
use crate::projectile::{ProjectilePool, Shot};
use crate::services::{Navigation, SpatialQuery};
use crate::systems::perception::resolve_targets;
use crate::world_setup::own_colliders;

/// Snapshot of one AI tank at the start of the combat pass.
struct AgentFrame {
    entity: Entity,
    team: Team,
    position: DVec3,
    hull: Hull,
    turret: Turret,
    gun: Gun,
    weapon: Weapon,
    brain: AiBrain,
}

impl AgentFrame {
    fn pivot(&self) -> DVec3 {
        self.position + DVec3::Z * self.turret.height
    }

    fn barrel_dir(&self, turret: &Turret, gun: &Gun) -> DVec3 {
        direction_from_angles(self.hull.heading + turret.yaw, gun.pitch)
    }
}

/// Run the combat pass for every living AI tank.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    points: &[CapturePoint],
    nav: &mut dyn Navigation,
    spatial: &dyn SpatialQuery,
    pool: &mut ProjectilePool,
    rng: &mut ChaCha8Rng,
    rules: &MatchRules,
    now: f64,
    dt: f64,
    audio: &mut Vec<AudioCue>,
) {
    let frames: Vec<AgentFrame> = world
        .query::<(&AiBrain, &Team, &Position, &Hull, &Turret, &Gun, &Weapon, &Health)>()
        .iter()
        .filter(|(_, (_, _, _, _, _, _, _, health))| !health.destroyed)
        .map(|(entity, (brain, team, pos, hull, turret, gun, weapon, _))| AgentFrame {
            entity,
            team: *team,
            position: pos.0,
            hull: *hull,
            turret: *turret,
            gun: *gun,
            weapon: *weapon,
            brain: brain.clone(),
        })
        .collect();

    for frame in frames {
        let entity = frame.entity;
        let (hostile, point) = resolve_targets(world, points, &frame.brain, frame.team);
        let point_target = point
            .and_then(|id| points.get(id.0 as usize))
            .map(|p| PointTarget {
                position: p.position,
                radius: p.radius,
                occupied: p.is_present(entity),
            });

        let ctx = CombatContext {
            position: frame.position,
            weapon_range: frame.weapon.range,
            chase_range_factor: rules.ai.chase_range_factor,
            point: point_target,
            hostile: hostile.map(|(_, pos)| pos),
            strafe: rules.ai.strafe.then_some(Strafe {
                radius: rules.ai.strafe_radius,
                angular_speed: rules.ai.strafe_angular_speed,
            }),
            elapsed_secs: now,
            phase_offset: frame.brain.phase_offset,
            nav_available: nav.is_available(entity),
            has_path: nav.has_path(entity),
        };
        let decision = fsm::evaluate(&ctx);

        if !ctx.nav_available && frame.brain.state != AiState::Idle {
            warn!(?entity, "AI tank has no navigation agent; idling");
        }

        apply_movement(nav, rng, rules, &frame, &decision);

        let target = match decision.state {
            AiState::Capturing => point.map(TargetRef::Point),
            AiState::Fighting => hostile.map(|(h, _)| TargetRef::Agent(h)),
            AiState::Moving => match (decision.movement, point_target) {
                (Some(MoveDirective::MoveTo(dest)), Some(p)) if dest == p.position => point.map(TargetRef::Point),
                _ => hostile.map(|(h, _)| TargetRef::Agent(h)),
            },
            AiState::Idle | AiState::Patrolling => None,
        };

        let mut turret = frame.turret;
        let mut gun = frame.gun;
        let mut cooldown = frame.brain.cooldown;

        match hostile {
            Some((hostile_entity, hostile_pos)) => {
                let solution = track(world, nav, rules, &frame, hostile_entity, hostile_pos, &mut turret, &mut gun, dt);
                if decision.engage && cooldown.ready(now) {
                    if let Some(solution) = solution {
                        let fired = try_fire(
                            world, nav, spatial, pool, rng, rules, &frame, &turret, &gun, hostile_entity,
                            hostile_pos, &solution,
                        );
                        if fired {
                            cooldown.trigger(now, frame.weapon.fire_interval);
                            audio.push(AudioCue::Fire { team: frame.team });
                        }
                    }
                }
            }
            None => {
                // Nothing to track: bring the turret and gun home.
                turret.yaw = move_towards_angle(turret.yaw, 0.0, turret.max_deg_per_sec.to_radians() * dt);
                gun.pitch = move_towards(gun.pitch, 0.0, gun.max_deg_per_sec.to_radians() * dt);
            }
        }

        if let Ok((brain, t, g)) = world.query_one_mut::<(&mut AiBrain, &mut Turret, &mut Gun)>(entity) {
            brain.state = decision.state;
            brain.target = target;
            brain.cooldown = cooldown;
            *t = turret;
            *g = gun;
        }
    }
}

fn apply_movement(
    nav: &mut dyn Navigation,
    rng: &mut ChaCha8Rng,
    rules: &MatchRules,
    frame: &AgentFrame,
    decision: &CombatDecision,
) {
    match decision.movement {
        Some(MoveDirective::MoveTo(dest)) => nav.set_destination(frame.entity, dest),
        Some(MoveDirective::Hold) => nav.stop(frame.entity),
        Some(MoveDirective::Patrol) => {
            let dest = fsm::patrol_destination(frame.position, rules.ai.patrol_radius, rng);
            nav.set_destination(frame.entity, dest);
        }
        None => {}
    }
}

/// Slew the turret and gun toward the launch solution for the hostile.
#[allow(clippy::too_many_arguments)]
fn track(
    world: &World,
    nav: &dyn Navigation,
    rules: &MatchRules,
    frame: &AgentFrame,
    hostile: Entity,
    hostile_pos: DVec3,
    turret: &mut Turret,
    gun: &mut Gun,
    dt: f64,
) -> Option<LaunchSolution> {
    let pivot = frame.pivot();
    let muzzle = pivot + frame.barrel_dir(turret, gun) * gun.barrel_length;
    let body_velocity = world.get::<&Velocity>(hostile).ok().map(|v| v.0);
    let velocity = target_velocity(nav.velocity(hostile), body_velocity);

    let aim_at = hostile_pos + DVec3::Z * HULL_CENTER_HEIGHT;
    let lead = predict_lead(muzzle, aim_at, velocity, frame.weapon.projectile_speed);
    let solution = solve_launch(
        muzzle,
        lead,
        frame.weapon.projectile_speed,
        rules.gravity,
        frame.weapon.use_gravity,
    );

    turret.yaw = aim_yaw(pivot, frame.hull.heading, turret.yaw, lead, turret.max_deg_per_sec, dt);
    if let Some(solution) = &solution {
        let mount = GunMount::new(pivot, frame.hull.heading + turret.yaw, gun.convention);
        gun.pitch = aim_pitch(
            &mount,
            gun.pitch,
            pivot + solution.velocity,
            gun.min_pitch,
            gun.max_pitch,
            gun.max_deg_per_sec,
            dt,
        );
    }
    solution
}

/// Fire if line of sight holds and the barrel is inside the firing arc.
/// Returns true if a projectile left the barrel.
#[allow(clippy::too_many_arguments)]
fn try_fire(
    world: &World,
    nav: &dyn Navigation,
    spatial: &dyn SpatialQuery,
    pool: &mut ProjectilePool,
    rng: &mut ChaCha8Rng,
    rules: &MatchRules,
    frame: &AgentFrame,
    turret: &Turret,
    gun: &Gun,
    hostile: Entity,
    hostile_pos: DVec3,
    solution: &LaunchSolution,
) -> bool {
    let barrel_dir = frame.barrel_dir(turret, gun);
    let muzzle = frame.pivot() + barrel_dir * gun.barrel_length;

    let arc = if rules.ai.strafe {
        rules.ai.strafe_firing_arc_deg
    } else {
        rules.ai.firing_arc_deg
    };
    if !within_firing_arc(barrel_dir, solution.velocity, arc) {
        return false;
    }
    if !has_line_of_sight(world, spatial, frame, muzzle, barrel_dir, hostile, hostile_pos) {
        return false;
    }

    if pool.is_exhausted() {
        debug!(shooter = ?frame.entity, "projectile pool exhausted; shot dropped");
        return false;
    }

    let speed = nav
        .velocity(frame.entity)
        .map(|v| flatten(v).length())
        .unwrap_or(0.0);
    let normalized = if frame.hull.move_speed > 0.0 {
        speed / frame.hull.move_speed
    } else {
        0.0
    };
    let half_angle = spread_half_angle(
        frame.weapon.spread_deg,
        rules.ai.spread_stationary_factor,
        rules.ai.spread_moving_factor,
        normalized,
    );
    let velocity = scatter(solution.velocity, barrel_dir, half_angle, rng);

    let shooter_name = world
        .get::<&DisplayName>(frame.entity)
        .map(|n| n.0.clone())
        .unwrap_or_default();
    let shot = Shot {
        position: muzzle,
        velocity,
        team: frame.team,
        shooter: frame.entity,
        shooter_name,
        damage: frame.weapon.damage,
        lifetime: rules.projectile_lifetime_secs,
        use_gravity: frame.weapon.use_gravity,
        ignore: own_colliders(world, frame.entity),
    };
    pool.acquire(shot).is_some()
}

fn has_line_of_sight(
    world: &World,
    spatial: &dyn SpatialQuery,
    frame: &AgentFrame,
    muzzle: DVec3,
    barrel_dir: DVec3,
    hostile: Entity,
    hostile_pos: DVec3,
) -> bool {
    let Some(ray) = sight_ray(
        muzzle,
        barrel_dir,
        LOS_MUZZLE_OFFSET,
        hostile_pos,
        LOS_TARGET_HEIGHT,
        frame.weapon.range,
    ) else {
        return true;
    };

    let mut hits: Vec<RayHit<Entity>> = spatial
        .raycast_all(world, ray.origin, ray.direction, ray.length)
        .into_iter()
        .map(|hit| RayHit {
            distance: hit.distance,
            is_trigger: hit.is_trigger,
            root: Some(hit.root),
            team: world.get::<&Team>(hit.root).ok().map(|t| *t),
        })
        .collect();
    evaluate_sight(&mut hits, frame.entity, frame.team, hostile)
}
