//! Perception system: periodic re-scan for hostiles and capture points.

use hecs::{Entity, World};

use ironfront_ai::perception::{nearest_hostile, nearest_uncontrolled_point, Contact, PointCandidate};
use ironfront_core::components::{Health, Tank};
use ironfront_core::config::AiRules;
use ironfront_core::enums::Team;
use ironfront_core::types::Position;

use crate::agent::{AiBrain, TargetRef};
use crate::capture::{CapturePoint, PointId};

/// Count down scan timers and re-scan the agents that are due.
/// Cached hostiles that have died are dropped every tick.
pub fn run(world: &mut World, points: &[CapturePoint], rules: &AiRules, dt: f64) {
    let contacts: Vec<Contact<Entity>> = world
        .query::<(&Tank, &Team, &Position, &Health)>()
        .iter()
        .filter(|(_, (_, _, _, health))| !health.destroyed)
        .map(|(id, (_, team, pos, _))| Contact {
            id,
            team: *team,
            position: pos.0,
        })
        .collect();

    let candidates: Vec<PointCandidate<PointId>> = points
        .iter()
        .map(|p| PointCandidate {
            id: p.id,
            owner: p.owner(),
            position: p.position,
            radius: p.radius,
        })
        .collect();

    let mut scans: Vec<(Entity, Team, Position)> = Vec::new();
    for (entity, (brain, team, pos)) in world.query_mut::<(&mut AiBrain, &Team, &Position)>() {
        if let Some(hostile) = brain.hostile {
            let alive = contacts.iter().any(|c| c.id == hostile);
            if !alive {
                brain.hostile = None;
            }
        }

        brain.scan_timer -= dt;
        if brain.scan_timer <= 0.0 {
            brain.scan_timer += rules.scan_interval_secs;
            if brain.scan_timer <= 0.0 {
                brain.scan_timer = rules.scan_interval_secs;
            }
            scans.push((entity, *team, *pos));
        }
    }

    for (entity, team, pos) in scans {
        let hostile = nearest_hostile(entity, team, pos.0, contacts.iter().copied()).map(|c| c.id);
        let point = nearest_uncontrolled_point(team, pos.0, rules.point_search_radius, candidates.iter().copied())
            .map(|p| p.id);

        if let Ok(mut brain) = world.get::<&mut AiBrain>(entity) {
            brain.hostile = hostile;
            brain.point = point;
        }
    }
}

/// Resolve the scan results to positions, dropping anything no longer valid.
pub fn resolve_targets(
    world: &World,
    points: &[CapturePoint],
    brain: &AiBrain,
    team: Team,
) -> (Option<(Entity, glam::DVec3)>, Option<PointId>) {
    let hostile = brain
        .hostile
        .and_then(|h| TargetRef::Agent(h).position(world, points).map(|p| (h, p)));
    let point = brain
        .point
        .filter(|id| points.get(id.0 as usize).is_some_and(|p| p.owner() != team));
    (hostile, point)
}
