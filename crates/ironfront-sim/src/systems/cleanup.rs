//! Cleanup system: processes deaths queued this tick.

use hecs::World;
use tracing::info;

use ironfront_core::components::{DisplayName, Tank};
use ironfront_core::enums::Team;
use ironfront_core::events::AudioCue;

use crate::capture::CapturePoint;
use crate::services::Navigation;
use crate::systems::damage::DeathReport;
use crate::tickets::TicketLedger;
use crate::world_setup::despawn_tank;

/// Report each death to the ledger, pull the victim out of every capture
/// point, drop its navigation state and remove it from the world.
/// Victims already gone are skipped.
pub fn run(
    world: &mut World,
    deaths: &mut Vec<DeathReport>,
    ledger: &mut TicketLedger,
    points: &mut [CapturePoint],
    nav: &mut dyn Navigation,
    audio: &mut Vec<AudioCue>,
) {
    for report in deaths.drain(..) {
        let victim = report.victim;
        if !world.contains(victim) {
            continue;
        }

        let team = world.get::<&Team>(victim).map(|t| *t).unwrap_or_default();
        let cost = world.get::<&Tank>(victim).map(|t| t.ticket_cost).unwrap_or(0);
        let name = world
            .get::<&DisplayName>(victim)
            .map(|n| n.0.clone())
            .unwrap_or_else(|_| format!("{victim:?}"));

        info!(
            victim = %name,
            killer = report.killer.as_ref().map(|k| k.name.as_str()).unwrap_or("-"),
            ?team,
            "tank destroyed"
        );
        ledger.on_tank_destroyed(team, cost, report.killer.as_ref(), &name);

        for point in points.iter_mut() {
            point.exit(victim);
        }
        nav.forget(victim);
        audio.push(AudioCue::Explosion { team });
        despawn_tank(world, victim);
    }
}
