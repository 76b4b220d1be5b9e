//! Capture system: presence tracking, contest steps and ticket drain.

use hecs::{Entity, World};
use tracing::info;

use ironfront_core::components::{Health, Tank};
use ironfront_core::enums::{Layer, Team};
use ironfront_core::events::{AudioCue, MatchEvent};

use crate::capture::CapturePoint;
use crate::services::SpatialQuery;
use crate::tickets::TicketLedger;

/// Diff each point's hull overlaps against its presence sets and raise
/// enter/exit for the difference.
pub fn update_presence(world: &World, spatial: &dyn SpatialQuery, points: &mut [CapturePoint]) {
    for point in points.iter_mut() {
        let mut inside: Vec<(Entity, Team)> = spatial
            .overlap_sphere(world, point.position, point.radius, &[Layer::Hull])
            .into_iter()
            .filter_map(|hit| {
                let root = hit.root;
                world.get::<&Tank>(root).ok()?;
                let alive = world.get::<&Health>(root).map(|h| !h.destroyed).unwrap_or(false);
                let team = *world.get::<&Team>(root).ok()?;
                (alive && team != Team::Neutral).then_some((root, team))
            })
            .collect();
        inside.sort_by_key(|(e, _)| e.to_bits());
        inside.dedup_by_key(|(e, _)| *e);

        let left: Vec<Entity> = point
            .occupants()
            .filter(|e| !inside.iter().any(|(i, _)| i == e))
            .collect();
        for agent in left {
            point.exit(agent);
        }
        for (agent, team) in inside {
            point.enter(agent, team);
        }
    }
}

/// Step every point's contest value. Ownership changes become match events
/// and audio cues.
pub fn run(points: &mut [CapturePoint], dt: f64, events: &mut Vec<MatchEvent>, audio: &mut Vec<AudioCue>) {
    for point in points.iter_mut() {
        let change = point.step(dt);
        let id = point.id.0;
        if let Some(team) = change.lost {
            info!(point = %point.name, ?team, "point lost");
            events.push(MatchEvent::PointLost { point: id, team });
            audio.push(AudioCue::PointLost { point: id, team });
        }
        if let Some(team) = change.captured {
            info!(point = %point.name, ?team, "point captured");
            events.push(MatchEvent::PointCaptured { point: id, team });
            audio.push(AudioCue::PointCaptured { point: id, team });
        }
    }
}

/// Advance drain timers once every contest step for the tick is done.
pub fn run_drains(points: &mut [CapturePoint], ledger: &mut TicketLedger, amount: u32, dt: f64) {
    for point in points.iter_mut() {
        if let Some(team) = point.step_drain(dt) {
            ledger.drain(team, amount);
        }
    }
}
