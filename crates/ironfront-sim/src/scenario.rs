//! Scenario definitions: hardcoded arena layouts.
//!
//! Each scenario places both rosters, the capture points with their
//! initial owners, and blocking scenery.

use glam::DVec3;

use ironfront_core::enums::{InitialOwner, ScenarioId, TankClass, Team};

use crate::world_setup::TankSpawn;

/// A capture point to place at match start.
#[derive(Debug, Clone)]
pub struct PointSpawn {
    pub name: String,
    pub position: DVec3,
    pub owner: InitialOwner,
}

/// A block of scenery.
#[derive(Debug, Clone, Copy)]
pub struct ObstacleSpawn {
    pub position: DVec3,
    pub half_extents: DVec3,
}

#[derive(Debug, Clone)]
pub struct ScenarioPlan {
    /// Team that starts without the points in an assault.
    pub attacker: Team,
    pub tanks: Vec<TankSpawn>,
    pub points: Vec<PointSpawn>,
    pub obstacles: Vec<ObstacleSpawn>,
}

/// Build the layout for a scenario. With `with_player`, one friendly
/// tank is handed to a human.
pub fn build_plan(scenario: ScenarioId, with_player: bool) -> ScenarioPlan {
    let mut plan = match scenario {
        ScenarioId::Skirmish => build_skirmish(),
        ScenarioId::Assault => build_assault(),
    };
    if with_player {
        if let Some(tank) = plan.tanks.iter_mut().find(|t| t.team == Team::Friendly) {
            tank.name = "PlayerTank".into();
            tank.player = true;
        }
    }
    plan
}

/// Skirmish: "Open Ground"
/// Three a side, three neutral points across the middle.
fn build_skirmish() -> ScenarioPlan {
    let classes = [TankClass::Medium, TankClass::Light, TankClass::Heavy];
    let mut tanks = Vec::new();
    tanks.extend(line_up(Team::Friendly, &classes, -120.0));
    tanks.extend(line_up(Team::Enemy, &classes, 120.0));

    ScenarioPlan {
        attacker: Team::Friendly,
        tanks,
        points: vec![
            point("Alpha", -60.0, 0.0, InitialOwner::Neutral),
            point("Bravo", 0.0, 0.0, InitialOwner::Neutral),
            point("Charlie", 60.0, 0.0, InitialOwner::Neutral),
        ],
        obstacles: vec![
            block(-30.0, -40.0, DVec3::new(4.0, 2.0, 3.0)),
            block(30.0, 40.0, DVec3::new(4.0, 2.0, 3.0)),
            block(0.0, 60.0, DVec3::new(8.0, 1.5, 2.5)),
        ],
    }
}

/// Assault: "Hold the Ridge"
/// Five attackers against four defenders sitting on three pre-owned points.
fn build_assault() -> ScenarioPlan {
    let attackers = [
        TankClass::Medium,
        TankClass::Light,
        TankClass::Light,
        TankClass::Heavy,
        TankClass::Medium,
    ];
    let mut tanks = line_up(Team::Friendly, &attackers, -150.0);
    tanks.extend([
        TankSpawn::ai("Enemy Heavy 1", Team::Enemy, TankClass::Heavy, DVec3::new(0.0, 60.0, 0.0)),
        TankSpawn::ai("Enemy Medium 1", Team::Enemy, TankClass::Medium, DVec3::new(-70.0, 100.0, 0.0)),
        TankSpawn::ai("Enemy Medium 2", Team::Enemy, TankClass::Medium, DVec3::new(70.0, 100.0, 0.0)),
        TankSpawn::ai("Enemy Light 1", Team::Enemy, TankClass::Light, DVec3::new(0.0, 110.0, 0.0)),
    ]);

    ScenarioPlan {
        attacker: Team::Friendly,
        tanks,
        points: vec![
            point("Alpha", -70.0, 90.0, InitialOwner::Defender),
            point("Bravo", 0.0, 50.0, InitialOwner::Defender),
            point("Charlie", 70.0, 90.0, InitialOwner::Defender),
        ],
        obstacles: vec![
            block(-35.0, 20.0, DVec3::new(6.0, 2.0, 3.0)),
            block(35.0, 20.0, DVec3::new(6.0, 2.0, 3.0)),
            block(0.0, -40.0, DVec3::new(3.0, 3.0, 2.0)),
        ],
    }
}

/// Spread a roster along a horizontal line at `y`, 20 m apart.
fn line_up(team: Team, classes: &[TankClass], y: f64) -> Vec<TankSpawn> {
    let width = (classes.len().saturating_sub(1)) as f64 * 20.0;
    let mut counts = [0u32; 3];
    classes
        .iter()
        .enumerate()
        .map(|(i, &class)| {
            let slot = class as usize;
            counts[slot] += 1;
            let name = format!("{team:?} {class:?} {}", counts[slot]);
            let x = -width / 2.0 + i as f64 * 20.0;
            TankSpawn::ai(name, team, class, DVec3::new(x, y, 0.0))
        })
        .collect()
}

fn point(name: &str, x: f64, y: f64, owner: InitialOwner) -> PointSpawn {
    PointSpawn {
        name: name.into(),
        position: DVec3::new(x, y, 0.0),
        owner,
    }
}

fn block(x: f64, y: f64, half_extents: DVec3) -> ObstacleSpawn {
    ObstacleSpawn {
        position: DVec3::new(x, y, 0.0),
        half_extents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skirmish_layout() {
        let plan = build_plan(ScenarioId::Skirmish, false);
        assert_eq!(plan.tanks.iter().filter(|t| t.team == Team::Friendly).count(), 3);
        assert_eq!(plan.tanks.iter().filter(|t| t.team == Team::Enemy).count(), 3);
        assert!(plan.points.iter().all(|p| p.owner == InitialOwner::Neutral));
        assert!(plan.tanks.iter().all(|t| !t.player));
        assert_eq!(plan.tanks[0].name, "Friendly Medium 1");
    }

    #[test]
    fn test_player_takes_one_friendly_tank() {
        let plan = build_plan(ScenarioId::Assault, true);
        let players: Vec<_> = plan.tanks.iter().filter(|t| t.player).collect();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "PlayerTank");
        assert_eq!(players[0].team, Team::Friendly);
    }

    #[test]
    fn test_assault_points_start_with_defender() {
        let plan = build_plan(ScenarioId::Assault, false);
        assert_eq!(plan.attacker, Team::Friendly);
        for p in &plan.points {
            assert_eq!(p.owner.resolve(plan.attacker), Team::Enemy);
        }
    }

    #[test]
    fn test_names_are_unique() {
        for id in [ScenarioId::Skirmish, ScenarioId::Assault] {
            let plan = build_plan(id, false);
            let mut names: Vec<_> = plan.tanks.iter().map(|t| t.name.clone()).collect();
            names.sort();
            names.dedup();
            assert_eq!(names.len(), plan.tanks.len());
        }
    }
}
