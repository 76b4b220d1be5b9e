//! Projectile flight: integrate, sweep, resolve the first thing hit.

use glam::DVec3;
use hecs::World;
use tracing::warn;

use ironfront_core::enums::Team;

use crate::projectile::ProjectilePool;
use crate::services::SpatialQuery;
use crate::systems::damage::{self, DeathReport};
use crate::tickets::Killer;

/// Advance every outstanding projectile by `dt`.
///
/// Shells skip their ignore list and triggers. The first other collider
/// consumes the shell; it only deals damage if the hit hierarchy belongs to
/// a team hostile to the shooter. Shells that reach the ground or outlive
/// their lifetime are returned to the pool.
pub fn run(
    world: &mut World,
    spatial: &dyn SpatialQuery,
    pool: &mut ProjectilePool,
    gravity: f64,
    dt: f64,
    deaths: &mut Vec<DeathReport>,
) {
    for handle in pool.active_handles() {
        let Some(shell) = pool.get_mut(handle) else {
            continue;
        };

        shell.remaining_lifetime -= dt;
        if shell.remaining_lifetime <= 0.0 {
            pool.release(handle);
            continue;
        }

        let start = shell.position;
        let acceleration = if shell.use_gravity {
            DVec3::NEG_Z * gravity
        } else {
            DVec3::ZERO
        };
        let end_velocity = shell.velocity + acceleration * dt;
        let mut end = start + (shell.velocity + end_velocity) * 0.5 * dt;

        let mut grounded = false;
        if end.z <= 0.0 && start.z > 0.0 {
            let t = start.z / (start.z - end.z);
            end = start.lerp(end, t);
            grounded = true;
        }

        let segment = end - start;
        let length = segment.length();
        let mut hits = spatial.raycast_all(world, start, segment, length);
        hits.retain(|h| !h.is_trigger && !shell.ignore.contains(&h.collider));
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));

        if let Some(hit) = hits.first() {
            let victim_team = world.get::<&Team>(hit.root).ok().map(|t| *t);
            if victim_team.is_some_and(|t| shell.team.is_hostile_to(t)) {
                let killer = Killer {
                    name: shell.shooter_name.clone(),
                    team: shell.team,
                };
                match damage::apply(world, hit.root, shell.damage, Some(killer)) {
                    Ok(Some(report)) => deaths.push(report),
                    Ok(None) => {}
                    Err(err) => warn!(%err, "projectile hit could not be applied"),
                }
            }
            pool.release(handle);
            continue;
        }

        if grounded {
            pool.release(handle);
            continue;
        }

        shell.position = end;
        shell.velocity = end_velocity;
    }
}
