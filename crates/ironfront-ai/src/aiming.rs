//! Turret and gun servo motion.
//!
//! Both servos are rate-limited pursuit: each tick the angle moves toward the
//! desired value by at most `max_deg_per_sec * dt`. No overshoot, but the
//! turret lags a target with fast relative motion. The functions are pure;
//! the only state is the angle passed in.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::DVec3;

use ironfront_core::enums::PitchConvention;
use ironfront_core::types::{flatten, heading_of};

/// Below this horizontal distance the yaw direction is undefined (m).
const MIN_AIM_DISTANCE: f64 = 1e-6;

/// Wrap an angle to (-PI, PI].
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Step `current` toward `target` by at most `max_delta`.
pub fn move_towards(current: f64, target: f64, max_delta: f64) -> f64 {
    let delta = target - current;
    if delta.abs() <= max_delta {
        target
    } else {
        current + max_delta.copysign(delta)
    }
}

/// Step an angle toward `target` by at most `max_delta` along the shortest arc.
pub fn move_towards_angle(current: f64, target: f64, max_delta: f64) -> f64 {
    let delta = wrap_angle(target - current);
    if delta.abs() <= max_delta {
        wrap_angle(current + delta)
    } else {
        wrap_angle(current + max_delta.copysign(delta))
    }
}

/// Advance a turret's hull-relative yaw toward `target`.
///
/// `pivot` is the turret ring in world space. Returns `current_yaw` unchanged
/// when the target is directly above or below the pivot.
pub fn aim_yaw(
    pivot: DVec3,
    hull_heading: f64,
    current_yaw: f64,
    target: DVec3,
    max_deg_per_sec: f64,
    dt: f64,
) -> f64 {
    let flat = flatten(target - pivot);
    if flat.length() < MIN_AIM_DISTANCE {
        return current_yaw;
    }
    let desired = wrap_angle(heading_of(flat) - hull_heading);
    move_towards_angle(current_yaw, desired, max_deg_per_sec.to_radians() * dt)
}

/// Local frame of a gun for elevation measurement.
#[derive(Debug, Clone, Copy)]
pub struct GunMount {
    pub pivot: DVec3,
    /// World heading of the gun model's local forward axis.
    pub frame_yaw: f64,
    pub convention: PitchConvention,
}

impl GunMount {
    /// Mount whose barrel points along `barrel_heading`, whatever axis the
    /// model uses for the barrel.
    pub fn new(pivot: DVec3, barrel_heading: f64, convention: PitchConvention) -> Self {
        let frame_yaw = match convention {
            PitchConvention::ForwardAxis => barrel_heading,
            PitchConvention::LateralAxis => barrel_heading - FRAC_PI_2,
        };
        Self {
            pivot,
            frame_yaw,
            convention,
        }
    }

    /// Express a world point in the mount's (right, forward, up) frame.
    pub fn to_local(&self, point: DVec3) -> DVec3 {
        let offset = point - self.pivot;
        let (s, c) = self.frame_yaw.sin_cos();
        let forward = DVec3::new(s, c, 0.0);
        let right = DVec3::new(c, -s, 0.0);
        DVec3::new(offset.dot(right), offset.dot(forward), offset.z)
    }

    /// Elevation of `point` above the barrel plane, or None if undefined.
    pub fn elevation_to(&self, point: DVec3) -> Option<f64> {
        let local = self.to_local(point);
        let along = match self.convention {
            PitchConvention::ForwardAxis => local.y,
            PitchConvention::LateralAxis => local.x,
        };
        if along.abs() < MIN_AIM_DISTANCE && local.z.abs() < MIN_AIM_DISTANCE {
            return None;
        }
        Some(local.z.atan2(along))
    }
}

/// Advance gun elevation toward `aim_point`, clamped to [min_pitch, max_pitch] (radians).
pub fn aim_pitch(
    mount: &GunMount,
    current_pitch: f64,
    aim_point: DVec3,
    min_pitch: f64,
    max_pitch: f64,
    max_deg_per_sec: f64,
    dt: f64,
) -> f64 {
    let desired = match mount.elevation_to(aim_point) {
        Some(e) => e.clamp(min_pitch, max_pitch),
        None => return current_pitch,
    };
    move_towards(current_pitch, desired, max_deg_per_sec.to_radians() * dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f64 = 1.0 / 30.0;

    #[test]
    fn test_wrap_angle_range() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-12);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-12);
        assert!((wrap_angle(-TAU + 0.25) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_yaw_is_rate_limited() {
        // Target due east; turret facing north on a north-facing hull.
        let yaw = aim_yaw(DVec3::ZERO, 0.0, 0.0, DVec3::new(50.0, 0.0, 0.0), 60.0, DT);
        let max_step = 60f64.to_radians() * DT;
        assert!((yaw - max_step).abs() < 1e-12, "Should move exactly one step: {yaw}");
    }

    #[test]
    fn test_yaw_converges_without_overshoot() {
        let target = DVec3::new(50.0, 0.0, 0.0);
        let mut yaw = 0.0;
        for _ in 0..200 {
            let next = aim_yaw(DVec3::ZERO, 0.0, yaw, target, 90.0, DT);
            assert!(next <= FRAC_PI_2 + 1e-12, "Overshot target: {next}");
            yaw = next;
        }
        assert!((yaw - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_yaw_is_relative_to_hull() {
        // Hull faces east, target due east: desired local yaw is zero.
        let yaw = aim_yaw(DVec3::ZERO, FRAC_PI_2, 0.0, DVec3::new(30.0, 0.0, 0.0), 90.0, DT);
        assert!(yaw.abs() < 1e-12);
    }

    #[test]
    fn test_yaw_takes_short_way_across_wrap() {
        // Current yaw just left of south, target just right of south.
        let current = PI - 0.05;
        let target_heading: f64 = -PI + 0.05;
        let target = DVec3::new(target_heading.sin(), target_heading.cos(), 0.0) * 40.0;
        let yaw = aim_yaw(DVec3::ZERO, 0.0, current, target, 90.0, DT);
        // Short arc goes through +PI, so the wrapped value flips sign rather than sweeping back.
        assert!(
            wrap_angle(yaw - current) > 0.0,
            "Should rotate clockwise through south, got {yaw}"
        );
    }

    #[test]
    fn test_yaw_unchanged_for_target_overhead() {
        let yaw = aim_yaw(DVec3::ZERO, 0.0, 0.3, DVec3::new(0.0, 0.0, 10.0), 90.0, DT);
        assert_eq!(yaw, 0.3);
    }

    #[test]
    fn test_pitch_clamped_to_limits() {
        let mount = GunMount::new(DVec3::ZERO, 0.0, PitchConvention::ForwardAxis);
        let steep = DVec3::new(0.0, 10.0, 50.0);
        let mut pitch = 0.0;
        for _ in 0..300 {
            pitch = aim_pitch(&mount, pitch, steep, -0.1, 0.3, 30.0, DT);
        }
        assert!((pitch - 0.3).abs() < 1e-12, "Pitch should clamp at max, got {pitch}");
    }

    #[test]
    fn test_pitch_rate_limited() {
        let mount = GunMount::new(DVec3::ZERO, 0.0, PitchConvention::ForwardAxis);
        let pitch = aim_pitch(&mount, 0.0, DVec3::new(0.0, 10.0, 10.0), -1.0, 1.0, 15.0, DT);
        assert!((pitch - 15f64.to_radians() * DT).abs() < 1e-12);
    }

    #[test]
    fn test_pitch_conventions_agree_for_same_barrel() {
        let aim = DVec3::new(30.0, 40.0, 5.0);
        let heading = heading_of(aim);
        let forward = GunMount::new(DVec3::ZERO, heading, PitchConvention::ForwardAxis);
        let lateral = GunMount::new(DVec3::ZERO, heading, PitchConvention::LateralAxis);
        let a = forward.elevation_to(aim).unwrap();
        let b = lateral.elevation_to(aim).unwrap();
        assert!((a - b).abs() < 1e-12);
        assert!((a - (5.0f64).atan2(50.0)).abs() < 1e-12);
    }

    #[test]
    fn test_lateral_convention_reads_local_x() {
        // Frame built directly with yaw 0: the lateral convention measures over +x.
        let mount = GunMount {
            pivot: DVec3::ZERO,
            frame_yaw: 0.0,
            convention: PitchConvention::LateralAxis,
        };
        let e = mount.elevation_to(DVec3::new(10.0, 0.0, 10.0)).unwrap();
        assert!((e - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }
}
