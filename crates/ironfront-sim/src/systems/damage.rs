//! Damage application with a once-only death guard.

use hecs::{Entity, World};

use ironfront_core::components::Health;
use ironfront_core::enums::Team;

use crate::error::SimError;
use crate::tickets::Killer;

/// A tank that took lethal damage this tick, pending cleanup.
#[derive(Debug, Clone)]
pub struct DeathReport {
    pub victim: Entity,
    pub killer: Option<Killer>,
}

/// Subtract `amount` from `target`'s health. Returns a death report the
/// first time health reaches zero; already-destroyed and neutral targets
/// are left untouched.
pub fn apply(
    world: &mut World,
    target: Entity,
    amount: f64,
    killer: Option<Killer>,
) -> Result<Option<DeathReport>, SimError> {
    if !world.contains(target) {
        return Err(SimError::UnknownEntity(target));
    }
    let team = world
        .get::<&Team>(target)
        .map(|t| *t)
        .map_err(|_| SimError::MissingComponent {
            entity: target,
            component: "Team",
        })?;
    let mut health = world
        .get::<&mut Health>(target)
        .map_err(|_| SimError::MissingComponent {
            entity: target,
            component: "Health",
        })?;

    if team == Team::Neutral || health.destroyed || amount <= 0.0 {
        return Ok(None);
    }

    health.current = (health.current - amount).max(0.0);
    if health.current > 0.0 {
        return Ok(None);
    }
    health.destroyed = true;
    Ok(Some(DeathReport {
        victim: target,
        killer,
    }))
}
