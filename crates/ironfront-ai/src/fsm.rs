//! Combat state machine.
//!
//! Pure evaluation of one agent's state for the current tick from the latest
//! perception results. Movement is returned as a directive for the navigation
//! service; the machine itself never waits on it.

use std::f64::consts::TAU;

use glam::DVec3;
use rand::Rng;

use ironfront_core::enums::AiState;
use ironfront_core::types::flatten;

/// Capture point chosen by perception, as far as the FSM cares.
#[derive(Debug, Clone, Copy)]
pub struct PointTarget {
    pub position: DVec3,
    pub radius: f64,
    /// The agent is already counted in the point's presence set.
    pub occupied: bool,
}

/// Orbit parameters for strafing while engaged.
#[derive(Debug, Clone, Copy)]
pub struct Strafe {
    pub radius: f64,
    /// Orbit rate (rad/s).
    pub angular_speed: f64,
}

/// Input to the combat FSM for a single agent.
pub struct CombatContext {
    pub position: DVec3,
    pub weapon_range: f64,
    /// Hostiles beyond `weapon_range * chase_range_factor` lose to a capture point.
    pub chase_range_factor: f64,
    pub point: Option<PointTarget>,
    /// Position of the nearest hostile.
    pub hostile: Option<DVec3>,
    pub strafe: Option<Strafe>,
    pub elapsed_secs: f64,
    /// Per-agent orbit phase so squadmates do not stack.
    pub phase_offset: f64,
    pub nav_available: bool,
    pub has_path: bool,
}

/// What the agent asks of the navigation service this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveDirective {
    MoveTo(DVec3),
    /// Stop where you are.
    Hold,
    /// Pick a random nearby point and go there.
    Patrol,
}

/// Output from the combat FSM.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatDecision {
    pub state: AiState,
    pub movement: Option<MoveDirective>,
    /// Aim at the hostile and fire if the weapon allows.
    pub engage: bool,
}

/// Evaluate the FSM for one agent.
pub fn evaluate(ctx: &CombatContext) -> CombatDecision {
    if !ctx.nav_available {
        return CombatDecision {
            state: AiState::Idle,
            movement: None,
            engage: false,
        };
    }

    let hostile_range = ctx.hostile.map(|h| flatten(h - ctx.position).length());
    let in_range = hostile_range.is_some_and(|r| r <= ctx.weapon_range);

    if let Some(point) = ctx.point {
        let point_range = flatten(point.position - ctx.position).length();
        let prefer_point = match hostile_range {
            None => true,
            Some(r) => point_range < r || r > ctx.weapon_range * ctx.chase_range_factor,
        };
        if prefer_point {
            if point.occupied || point_range <= point.radius {
                // On the point: sit on it and shoot back
                return CombatDecision {
                    state: AiState::Capturing,
                    movement: Some(MoveDirective::Hold),
                    engage: in_range,
                };
            }
            return CombatDecision {
                state: AiState::Moving,
                movement: Some(MoveDirective::MoveTo(point.position)),
                engage: false,
            };
        }
    }

    if let Some(hostile) = ctx.hostile {
        if in_range {
            let movement = match ctx.strafe {
                Some(strafe) => {
                    let phase = ctx.elapsed_secs * strafe.angular_speed + ctx.phase_offset;
                    MoveDirective::MoveTo(orbit_point(hostile, ctx.position, strafe.radius, phase))
                }
                None => MoveDirective::Hold,
            };
            return CombatDecision {
                state: AiState::Fighting,
                movement: Some(movement),
                engage: true,
            };
        }
        return CombatDecision {
            state: AiState::Moving,
            movement: Some(MoveDirective::MoveTo(hostile)),
            engage: false,
        };
    }

    CombatDecision {
        state: AiState::Patrolling,
        movement: (!ctx.has_path).then_some(MoveDirective::Patrol),
        engage: false,
    }
}

/// Point on a circle of `radius` around `target`, `phase` radians along.
///
/// The circle's frame is the horizontal direction from the target to the
/// agent and its perpendicular.
pub fn orbit_point(target: DVec3, agent: DVec3, radius: f64, phase: f64) -> DVec3 {
    let flat = flatten(agent - target).try_normalize().unwrap_or(DVec3::Y);
    let perp = DVec3::Z.cross(flat);
    target + radius * (perp * phase.cos() + flat * phase.sin())
}

/// Uniform random point in a horizontal disc of `radius` around `center`.
pub fn patrol_destination<R: Rng>(center: DVec3, radius: f64, rng: &mut R) -> DVec3 {
    let angle = rng.gen_range(0.0..TAU);
    let distance = radius * rng.gen_range(0.0..=1.0_f64).sqrt();
    center + DVec3::new(angle.sin(), angle.cos(), 0.0) * distance
}
