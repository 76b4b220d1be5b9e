//! Per-agent AI state and target references.

use glam::DVec3;
use hecs::{Entity, World};

use ironfront_ai::weapon::Cooldown;
use ironfront_core::components::Health;
use ironfront_core::enums::AiState;
use ironfront_core::types::Position;

use crate::capture::{CapturePoint, PointId};

/// What an agent is moving toward or shooting at. Never owns the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetRef {
    Agent(Entity),
    Point(PointId),
}

impl TargetRef {
    pub fn position(&self, world: &World, points: &[CapturePoint]) -> Option<DVec3> {
        if !self.is_alive(world, points) {
            return None;
        }
        match *self {
            TargetRef::Agent(e) => world.get::<&Position>(e).ok().map(|p| p.0),
            TargetRef::Point(id) => points.get(id.0 as usize).map(|p| p.position),
        }
    }

    pub fn is_alive(&self, world: &World, points: &[CapturePoint]) -> bool {
        match *self {
            TargetRef::Agent(e) => world.get::<&Health>(e).map(|h| !h.destroyed).unwrap_or(false),
            TargetRef::Point(id) => points.get(id.0 as usize).is_some(),
        }
    }
}

/// AI brain attached to every computer-driven tank.
#[derive(Debug, Clone)]
pub struct AiBrain {
    pub state: AiState,
    /// Current movement or fire target.
    pub target: Option<TargetRef>,
    /// Nearest hostile from the last scan.
    pub hostile: Option<Entity>,
    /// Nearest uncontrolled point from the last scan.
    pub point: Option<PointId>,
    /// Seconds until the next perception scan.
    pub scan_timer: f64,
    pub cooldown: Cooldown,
    /// Strafe orbit phase offset (radians).
    pub phase_offset: f64,
}

impl AiBrain {
    pub fn new(phase_offset: f64) -> Self {
        Self {
            state: AiState::Idle,
            target: None,
            hostile: None,
            point: None,
            scan_timer: 0.0,
            cooldown: Cooldown::default(),
            phase_offset,
        }
    }
}
