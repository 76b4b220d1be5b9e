//! Entity spawn factories for setting up the match world.
//!
//! Tanks get their stats from the class profile, a hull collider on the
//! tank entity and a turret collider on a child entity.

use glam::DVec3;
use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use ironfront_ai::profiles::get_profile;
use ironfront_core::components::*;
use ironfront_core::config::MatchRules;
use ironfront_core::constants::*;
use ironfront_core::enums::*;
use ironfront_core::types::{Position, Velocity};

use crate::agent::AiBrain;
use crate::error::SimError;
use crate::services::{Attachments, ColliderOf, Navigation};

/// Everything needed to place one tank.
#[derive(Debug, Clone)]
pub struct TankSpawn {
    pub name: String,
    pub team: Team,
    pub class: Option<TankClass>,
    pub position: DVec3,
    /// Initial hull heading (radians, 0 = North).
    pub heading: f64,
    /// Driven by a human instead of the combat AI.
    pub player: bool,
}

impl TankSpawn {
    pub fn ai(name: impl Into<String>, team: Team, class: TankClass, position: DVec3) -> Self {
        Self {
            name: name.into(),
            team,
            class: Some(class),
            position,
            heading: facing_for(team),
            player: false,
        }
    }

    pub fn player(name: impl Into<String>, team: Team, class: TankClass, position: DVec3) -> Self {
        Self {
            player: true,
            ..Self::ai(name, team, class, position)
        }
    }
}

/// Friendly spawns face North, Enemy spawns face South.
fn facing_for(team: Team) -> f64 {
    match team {
        Team::Enemy => std::f64::consts::PI,
        _ => 0.0,
    }
}

/// Spawn a tank. AI tanks get a brain and are registered with navigation.
pub fn spawn_tank(
    world: &mut World,
    nav: &mut dyn Navigation,
    rng: &mut ChaCha8Rng,
    rules: &MatchRules,
    spawn: &TankSpawn,
) -> Result<Entity, SimError> {
    if spawn.name.trim().is_empty() {
        return Err(SimError::InvalidSpawn("tank name is empty".into()));
    }
    if !spawn.position.is_finite() || !spawn.heading.is_finite() {
        return Err(SimError::InvalidSpawn(format!(
            "{} has a non-finite position or heading",
            spawn.name
        )));
    }

    let profile = get_profile(spawn.class);
    let tank = world.spawn((
        Tank {
            class: spawn.class,
            ticket_cost: rules.ticket_costs.cost_of(spawn.class),
        },
        spawn.team,
        DisplayName(spawn.name.clone()),
        Position(spawn.position),
        Velocity::default(),
        Health::new(profile.max_health),
        Hull {
            heading: spawn.heading,
            move_speed: profile.move_speed,
        },
        Turret {
            yaw: 0.0,
            max_deg_per_sec: profile.turret_deg_per_sec,
            height: profile.turret_height,
        },
        Gun {
            pitch: 0.0,
            min_pitch: profile.min_pitch_deg.to_radians(),
            max_pitch: profile.max_pitch_deg.to_radians(),
            max_deg_per_sec: profile.gun_deg_per_sec,
            convention: PitchConvention::default(),
            barrel_length: profile.barrel_length,
        },
        profile.weapon,
        Collider {
            shape: ColliderShape::Sphere { radius: HULL_RADIUS },
            layer: Layer::Hull,
            is_trigger: false,
            center_offset: HULL_CENTER_HEIGHT,
        },
    ));

    let offset = DVec3::Z * profile.turret_height;
    let turret = world.spawn((
        Position(spawn.position + offset),
        Collider {
            shape: ColliderShape::Sphere { radius: TURRET_RADIUS },
            layer: Layer::Hull,
            is_trigger: false,
            center_offset: 0.0,
        },
        ColliderOf { root: tank, offset },
    ));

    let _ = world.insert_one(tank, Attachments(vec![turret]));
    if spawn.player {
        let _ = world.insert_one(tank, PlayerControlled);
    } else {
        let phase_offset = rng.gen_range(0.0..std::f64::consts::TAU);
        let _ = world.insert_one(tank, AiBrain::new(phase_offset));
        nav.register(tank, NAV_STOPPING_DISTANCE);
    }

    Ok(tank)
}

/// Spawn an axis-aligned block resting on the ground at `position`.
pub fn spawn_obstacle(world: &mut World, position: DVec3, half_extents: DVec3) -> Entity {
    world.spawn((
        Obstacle,
        Position(position),
        Collider {
            shape: ColliderShape::Box { half_extents },
            layer: Layer::Obstacle,
            is_trigger: false,
            center_offset: half_extents.z,
        },
    ))
}

/// A tank's own colliders: the root and its attachments.
pub fn own_colliders(world: &World, root: Entity) -> Vec<Entity> {
    let mut colliders = vec![root];
    if let Ok(attachments) = world.get::<&Attachments>(root) {
        colliders.extend(attachments.0.iter().copied());
    }
    colliders
}

/// Move attached colliders with their roots.
pub fn sync_attachments(world: &mut World) {
    let updates: Vec<(Entity, DVec3)> = world
        .query::<&ColliderOf>()
        .iter()
        .filter_map(|(e, of)| {
            let root = world.get::<&Position>(of.root).ok()?;
            Some((e, root.0 + of.offset))
        })
        .collect();

    for (entity, position) in updates {
        if let Ok(mut pos) = world.get::<&mut Position>(entity) {
            pos.0 = position;
        }
    }
}

/// Remove a tank and everything attached to it.
pub fn despawn_tank(world: &mut World, root: Entity) {
    for entity in own_colliders(world, root).into_iter().rev() {
        let _ = world.despawn(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::DirectNavigation;
    use rand::SeedableRng;

    fn setup() -> (World, DirectNavigation, ChaCha8Rng, MatchRules) {
        (World::new(), DirectNavigation::new(), ChaCha8Rng::seed_from_u64(1), MatchRules::default())
    }

    #[test]
    fn test_ai_tank_gets_profile_and_brain() {
        let (mut world, mut nav, mut rng, rules) = setup();
        let spawn = TankSpawn::ai("Enemy Heavy 1", Team::Enemy, TankClass::Heavy, DVec3::new(0.0, 100.0, 0.0));
        let tank = spawn_tank(&mut world, &mut nav, &mut rng, &rules, &spawn).unwrap();

        assert_eq!(world.get::<&Tank>(tank).unwrap().ticket_cost, 300);
        assert_eq!(world.get::<&Health>(tank).unwrap().max, HEAVY_MAX_HEALTH);
        assert_eq!(*world.get::<&Team>(tank).unwrap(), Team::Enemy);
        assert!(world.get::<&AiBrain>(tank).is_ok());
        assert!(world.get::<&PlayerControlled>(tank).is_err());
        assert!(nav.is_available(tank));
        assert_eq!(own_colliders(&world, tank).len(), 2);
    }

    #[test]
    fn test_player_tank_is_not_navigated() {
        let (mut world, mut nav, mut rng, rules) = setup();
        let spawn = TankSpawn::player("PlayerTank", Team::Friendly, TankClass::Medium, DVec3::ZERO);
        let tank = spawn_tank(&mut world, &mut nav, &mut rng, &rules, &spawn).unwrap();
        assert!(world.get::<&PlayerControlled>(tank).is_ok());
        assert!(world.get::<&AiBrain>(tank).is_err());
        assert!(!nav.is_available(tank));
    }

    #[test]
    fn test_invalid_spawn_rejected() {
        let (mut world, mut nav, mut rng, rules) = setup();
        let unnamed = TankSpawn::ai("  ", Team::Enemy, TankClass::Light, DVec3::ZERO);
        assert!(matches!(
            spawn_tank(&mut world, &mut nav, &mut rng, &rules, &unnamed),
            Err(SimError::InvalidSpawn(_))
        ));
        let lost = TankSpawn::ai("Lost", Team::Enemy, TankClass::Light, DVec3::new(f64::NAN, 0.0, 0.0));
        assert!(spawn_tank(&mut world, &mut nav, &mut rng, &rules, &lost).is_err());
        assert_eq!(world.len(), 0);
    }

    #[test]
    fn test_attachments_follow_and_despawn_with_root() {
        let (mut world, mut nav, mut rng, rules) = setup();
        let spawn = TankSpawn::ai("Friendly Light 1", Team::Friendly, TankClass::Light, DVec3::ZERO);
        let tank = spawn_tank(&mut world, &mut nav, &mut rng, &rules, &spawn).unwrap();
        let turret = own_colliders(&world, tank)[1];

        world.get::<&mut Position>(tank).unwrap().0 = DVec3::new(10.0, 0.0, 0.0);
        sync_attachments(&mut world);
        let turret_pos = world.get::<&Position>(turret).unwrap().0;
        assert!((turret_pos.x - 10.0).abs() < 1e-12);
        assert!(turret_pos.z > 0.0);

        despawn_tank(&mut world, tank);
        assert!(!world.contains(tank));
        assert!(!world.contains(turret));
    }
}
