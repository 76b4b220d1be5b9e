//! Arena geometry and the match clock.
//!
//! Right-handed frame: x = East, y = North, z = Up. Headings are radians
//! measured clockwise from North.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// World-space position (meters). For tanks, the hull's ground-contact point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub DVec3);

/// Body velocity (m/s), written by the navigation service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub DVec3);

/// Fixed-step match clock.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    pub tick: u64,
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(DVec3::new(x, y, z))
    }

    pub fn range_to(&self, other: &Position) -> f64 {
        self.0.distance(other.0)
    }

    /// Distance across the ground plane.
    pub fn horizontal_range_to(&self, other: &Position) -> f64 {
        flatten(other.0 - self.0).length()
    }

    /// Compass bearing to `other`, in [0, 2π).
    pub fn bearing_to(&self, other: &Position) -> f64 {
        let d = other.0 - self.0;
        d.x.atan2(d.y).rem_euclid(std::f64::consts::TAU)
    }
}

impl SimTime {
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    pub fn advance(&mut self) {
        self.elapsed_secs += self.dt();
        self.tick += 1;
    }
}

/// Drop the vertical component.
pub fn flatten(v: DVec3) -> DVec3 {
    DVec3::new(v.x, v.y, 0.0)
}

/// Unit vector for a heading (0 = North, clockwise) and an elevation above the horizon.
pub fn direction_from_angles(heading: f64, elevation: f64) -> DVec3 {
    let (sh, ch) = heading.sin_cos();
    let (se, ce) = elevation.sin_cos();
    DVec3::new(sh * ce, ch * ce, se)
}

/// Heading (0 = North, clockwise) of a horizontal direction.
pub fn heading_of(v: DVec3) -> f64 {
    v.x.atan2(v.y)
}
