//! Snapshot system: queries the world and builds a complete MatchSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use ironfront_core::components::*;
use ironfront_core::enums::Team;
use ironfront_core::events::{AudioCue, MatchEvent};
use ironfront_core::state::*;
use ironfront_core::types::{Position, SimTime};

use crate::agent::{AiBrain, TargetRef};
use crate::capture::CapturePoint;
use crate::tickets::TicketLedger;

/// Build a complete MatchSnapshot from the current match state.
pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    ledger: &TicketLedger,
    points: &[CapturePoint],
    events: Vec<MatchEvent>,
    audio: Vec<AudioCue>,
) -> MatchSnapshot {
    MatchSnapshot {
        time: *time,
        outcome: ledger.outcome(),
        tickets: ledger.view(),
        tanks: build_tanks(world),
        points: points.iter().map(CapturePoint::view).collect(),
        kill_log: ledger.kill_log().cloned().collect(),
        events,
        audio,
        result: ledger.result(),
    }
}

/// Build TankView list from every living tank.
fn build_tanks(world: &World) -> Vec<TankView> {
    world
        .query::<(
            &Tank,
            &Team,
            &DisplayName,
            &Position,
            &Hull,
            &Turret,
            &Gun,
            &Health,
            Option<&AiBrain>,
        )>()
        .iter()
        .filter(|(_, (_, _, _, _, _, _, _, health, _))| !health.destroyed)
        .map(|(_, (tank, team, name, pos, hull, turret, gun, health, brain))| TankView {
            name: name.0.clone(),
            team: *team,
            class: tank.class,
            position: *pos,
            heading: hull.heading,
            turret_yaw: turret.yaw,
            gun_pitch: gun.pitch,
            health: health.current,
            max_health: health.max,
            ai_state: brain.map(|b| b.state),
            target: brain.and_then(|b| b.target).and_then(|t| target_view(world, t)),
        })
        .collect()
}

/// Resolve a brain's target for display. Dead or despawned tanks show as no target.
fn target_view(world: &World, target: TargetRef) -> Option<TargetView> {
    match target {
        TargetRef::Agent(e) => {
            let alive = world.get::<&Health>(e).map(|h| !h.destroyed).unwrap_or(false);
            if !alive {
                return None;
            }
            let name = world.get::<&DisplayName>(e).ok()?.0.clone();
            Some(TargetView::Tank { name })
        }
        TargetRef::Point(id) => Some(TargetView::Point { id: id.0 }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;
    use ironfront_core::config::MatchRules;

    use crate::capture::PointId;

    fn tank(world: &mut World, name: &str, team: Team) -> hecs::Entity {
        world.spawn((
            Tank { class: None, ticket_cost: 150 },
            team,
            DisplayName(name.into()),
            Position(DVec3::ZERO),
            Hull { heading: 0.0, move_speed: 5.0 },
            Turret { yaw: 0.0, max_deg_per_sec: 30.0, height: 2.0 },
            Gun {
                pitch: 0.0,
                min_pitch: -0.1,
                max_pitch: 0.3,
                max_deg_per_sec: 20.0,
                convention: Default::default(),
                barrel_length: 3.0,
            },
            Health::new(100.0),
        ))
    }

    fn snapshot(world: &World) -> MatchSnapshot {
        let ledger = TicketLedger::new(&MatchRules::default(), []);
        build_snapshot(world, &SimTime::default(), &ledger, &[], Vec::new(), Vec::new())
    }

    fn view<'a>(snap: &'a MatchSnapshot, name: &str) -> &'a TankView {
        snap.tanks.iter().find(|t| t.name == name).unwrap()
    }

    #[test]
    fn test_snapshot_reports_ai_targets() {
        let mut world = World::new();
        let hunter = tank(&mut world, "Hunter", Team::Enemy);
        let prey = tank(&mut world, "Prey", Team::Friendly);
        let holder = tank(&mut world, "Holder", Team::Enemy);

        let mut brain = AiBrain::new(0.0);
        brain.target = Some(TargetRef::Agent(prey));
        world.insert_one(hunter, brain).unwrap();
        let mut brain = AiBrain::new(0.0);
        brain.target = Some(TargetRef::Point(PointId(2)));
        world.insert_one(holder, brain).unwrap();

        let snap = snapshot(&world);
        assert_eq!(
            view(&snap, "Hunter").target,
            Some(TargetView::Tank { name: "Prey".into() })
        );
        assert_eq!(view(&snap, "Holder").target, Some(TargetView::Point { id: 2 }));
        assert_eq!(view(&snap, "Prey").target, None);
        assert_eq!(view(&snap, "Prey").ai_state, None);

        world.get::<&mut Health>(prey).unwrap().destroyed = true;
        let snap = snapshot(&world);
        assert_eq!(view(&snap, "Hunter").target, None);
    }
}
