//! Weapon spread, firing arc and cooldown.

use std::f64::consts::PI;

use glam::{DQuat, DVec3};
use rand::Rng;

/// Spread half-angle in radians for a shooter moving at `normalized_speed`
/// (0 = stationary, 1 = top speed).
pub fn spread_half_angle(base_deg: f64, stationary_factor: f64, moving_factor: f64, normalized_speed: f64) -> f64 {
    let t = normalized_speed.clamp(0.0, 1.0);
    let factor = stationary_factor + (moving_factor - stationary_factor) * t;
    base_deg.to_radians() * factor
}

/// Right and up axes of a muzzle pointing along `forward`.
///
/// A vertical barrel falls back to East as its right axis.
pub fn muzzle_axes(forward: DVec3) -> Option<(DVec3, DVec3)> {
    let forward = forward.try_normalize()?;
    let right = forward.cross(DVec3::Z).try_normalize().unwrap_or(DVec3::X);
    let up = right.cross(forward);
    Some((right, up))
}

/// Rotate `velocity` by two independent uniform angles in
/// `[-half_angle, half_angle]`, about the muzzle's up axis then its right axis.
pub fn scatter<R: Rng>(velocity: DVec3, muzzle_forward: DVec3, half_angle: f64, rng: &mut R) -> DVec3 {
    if half_angle <= 0.0 {
        return velocity;
    }
    let Some((right, up)) = muzzle_axes(muzzle_forward) else {
        return velocity;
    };
    let yaw = rng.gen_range(-half_angle..=half_angle);
    let pitch = rng.gen_range(-half_angle..=half_angle);
    let rotation = DQuat::from_axis_angle(right, pitch) * DQuat::from_axis_angle(up, yaw);
    rotation * velocity
}

/// Angle between where the barrel points and where it should point.
/// Degenerate inputs count as fully off target.
pub fn aim_error(barrel_dir: DVec3, aim_dir: DVec3) -> f64 {
    if barrel_dir.length_squared() < 1e-12 || aim_dir.length_squared() < 1e-12 {
        return PI;
    }
    barrel_dir.angle_between(aim_dir)
}

pub fn within_firing_arc(barrel_dir: DVec3, aim_dir: DVec3, arc_deg: f64) -> bool {
    aim_error(barrel_dir, aim_dir) <= arc_deg.to_radians()
}

/// Per-agent fire cooldown.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cooldown {
    /// Earliest match time the next shot may leave the barrel (s).
    pub next_fire_time: f64,
}

impl Cooldown {
    pub fn ready(&self, now: f64) -> bool {
        now >= self.next_fire_time
    }

    /// Record a shot fired at `now`.
    pub fn trigger(&mut self, now: f64, fire_interval: f64) {
        self.next_fire_time = now + fire_interval;
    }
}
