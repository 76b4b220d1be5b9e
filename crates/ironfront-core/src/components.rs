//! ECS components for hecs entities.
//!
//! Components are plain data structs with no behavior.
//! Game logic lives in systems and in the ai crate, not components.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// A tank taking part in the match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tank {
    /// Weight class, if the tank was spawned from a class template.
    pub class: Option<TankClass>,
    /// Tickets the owning team loses when this tank is destroyed.
    pub ticket_cost: u32,
}

/// Name shown in the kill log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayName(pub String);

/// Hit points. `destroyed` guards against double death processing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    pub current: f64,
    pub max: f64,
    pub destroyed: bool,
}

impl Health {
    pub fn new(max: f64) -> Self {
        Self {
            current: max,
            max,
            destroyed: false,
        }
    }
}

/// Hull orientation and locomotion limits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hull {
    /// World heading of the hull (radians, 0 = North, clockwise).
    pub heading: f64,
    /// Top speed when driving (m/s).
    pub move_speed: f64,
}

/// Turret yaw servo. Yaw is relative to the hull heading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Turret {
    pub yaw: f64,
    pub max_deg_per_sec: f64,
    /// Height of the turret ring above the hull origin (m).
    pub height: f64,
}

/// Gun elevation servo mounted on the turret.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Gun {
    /// Elevation above the turret plane (radians, positive = up).
    pub pitch: f64,
    pub min_pitch: f64,
    pub max_pitch: f64,
    pub max_deg_per_sec: f64,
    pub convention: PitchConvention,
    /// Distance from the turret ring to the muzzle along the barrel (m).
    pub barrel_length: f64,
}

/// Weapon stats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Weapon {
    /// Seconds between shots.
    pub fire_interval: f64,
    pub damage: f64,
    pub projectile_speed: f64,
    /// Base spread half-angle (degrees).
    pub spread_deg: f64,
    /// Effective engagement range (m).
    pub range: f64,
    /// Whether projectiles fall under gravity.
    pub use_gravity: bool,
}

/// Collision volume shape, centered on the entity position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    Sphere { radius: f64 },
    /// Axis-aligned box.
    Box { half_extents: DVec3 },
}

/// Collision volume attached to an entity with a `Position`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub shape: ColliderShape,
    pub layer: Layer,
    /// Triggers report overlaps but never block rays.
    pub is_trigger: bool,
    /// Vertical offset of the shape's center above the entity position (m).
    pub center_offset: f64,
}

/// Marks a tank driven by a human instead of the combat AI.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlayerControlled;

/// Marks static scenery.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle;
