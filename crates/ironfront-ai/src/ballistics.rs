//! Ballistics solver for tank main guns.
//!
//! Provides iterative lead prediction against moving targets and the
//! launch velocity for gravity-affected shells (low-arc solution of the
//! ballistic range equation, with a straight-line fallback).

use glam::{DQuat, DVec3};

use ironfront_core::types::flatten;

/// Fixed-point iterations used by `predict_lead`.
pub const LEAD_ITERATIONS: usize = 3;

/// Horizontal distance below which the range equation is degenerate (m).
const MIN_HORIZONTAL_DISTANCE: f64 = 1e-3;

/// Which trajectory the solver picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trajectory {
    /// Direct line to the lead point (gravity off, unreachable, or degenerate).
    Straight,
    /// Flatter of the two ballistic solutions.
    LowArc,
}

/// Launch solution for one shot.
#[derive(Debug, Clone, Copy)]
pub struct LaunchSolution {
    pub velocity: DVec3,
    /// Elevation of the launch vector above the horizon (radians).
    pub elevation: f64,
    /// Estimated time of flight to the lead point (s).
    pub flight_time: f64,
    pub trajectory: Trajectory,
}

/// Velocity to lead a target with: navigation velocity when the target is
/// navigated, otherwise its rigid-body velocity, otherwise at rest.
pub fn target_velocity(nav_velocity: Option<DVec3>, body_velocity: Option<DVec3>) -> DVec3 {
    nav_velocity.or(body_velocity).unwrap_or(DVec3::ZERO)
}

/// Predict where a target will be when a projectile fired now reaches it.
///
/// Refines the time-of-flight estimate `LEAD_ITERATIONS` times. A stationary
/// target converges to its own position on the first pass.
pub fn predict_lead(
    muzzle: DVec3,
    target_pos: DVec3,
    target_vel: DVec3,
    projectile_speed: f64,
) -> DVec3 {
    if projectile_speed <= 0.0 {
        return target_pos;
    }

    let mut tof = muzzle.distance(target_pos) / projectile_speed;
    let mut predicted = target_pos;
    for _ in 0..LEAD_ITERATIONS {
        predicted = target_pos + target_vel * tof;
        tof = muzzle.distance(predicted) / projectile_speed;
    }
    predicted
}

/// Both launch elevations (low, high) that hit a point `horizontal` meters
/// away and `vertical` meters up at the given speed, or None when the point
/// is out of reach or the geometry is degenerate.
pub fn launch_angles(horizontal: f64, vertical: f64, speed: f64, gravity: f64) -> Option<(f64, f64)> {
    if horizontal < MIN_HORIZONTAL_DISTANCE || gravity <= 0.0 || speed <= 0.0 {
        return None;
    }

    let v2 = speed * speed;
    let discriminant = v2 * v2 - gravity * (gravity * horizontal * horizontal + 2.0 * vertical * v2);
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    let denom = gravity * horizontal;
    let low = ((v2 - root) / denom).atan();
    let high = ((v2 + root) / denom).atan();
    Some((low, high))
}

/// Compute the launch solution toward `lead`.
///
/// Returns None only when `lead` coincides with the muzzle.
pub fn solve_launch(
    muzzle: DVec3,
    lead: DVec3,
    projectile_speed: f64,
    gravity: f64,
    use_gravity: bool,
) -> Option<LaunchSolution> {
    let offset = lead - muzzle;
    let direction = offset.try_normalize()?;

    let straight = LaunchSolution {
        velocity: direction * projectile_speed,
        elevation: direction.z.clamp(-1.0, 1.0).asin(),
        flight_time: if projectile_speed > 0.0 {
            offset.length() / projectile_speed
        } else {
            f64::INFINITY
        },
        trajectory: Trajectory::Straight,
    };

    if !use_gravity {
        return Some(straight);
    }

    let flat = flatten(offset);
    let horizontal = flat.length();
    let heading = match flat.try_normalize() {
        Some(h) => h,
        None => return Some(straight),
    };

    match launch_angles(horizontal, offset.z, projectile_speed, gravity) {
        Some((low, _high)) => {
            let axis = heading.cross(DVec3::Z);
            let launch_dir = DQuat::from_axis_angle(axis, low) * heading;
            Some(LaunchSolution {
                velocity: launch_dir * projectile_speed,
                elevation: low,
                flight_time: horizontal / (projectile_speed * low.cos()),
                trajectory: Trajectory::LowArc,
            })
        }
        None => Some(straight),
    }
}

/// Launch velocity toward `lead`; zero when the geometry is degenerate.
pub fn solve_launch_velocity(
    muzzle: DVec3,
    lead: DVec3,
    projectile_speed: f64,
    gravity: f64,
    use_gravity: bool,
) -> DVec3 {
    solve_launch(muzzle, lead, projectile_speed, gravity, use_gravity)
        .map(|s| s.velocity)
        .unwrap_or(DVec3::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ironfront_core::constants::GRAVITY;

    /// Closed-form position under constant gravity.
    fn integrate(origin: DVec3, velocity: DVec3, t: f64) -> DVec3 {
        origin + velocity * t - DVec3::Z * (0.5 * GRAVITY * t * t)
    }

    #[test]
    fn test_lead_stationary_target_is_exact() {
        let muzzle = DVec3::new(0.0, 0.0, 2.0);
        let target = DVec3::new(40.0, 75.0, 1.0);
        let lead = predict_lead(muzzle, target, DVec3::ZERO, 90.0);
        assert_eq!(lead, target);
    }

    #[test]
    fn test_lead_ahead_of_crossing_target() {
        let muzzle = DVec3::ZERO;
        let target = DVec3::new(0.0, 100.0, 0.0);
        let vel = DVec3::new(8.0, 0.0, 0.0);
        let lead = predict_lead(muzzle, target, vel, 100.0);

        assert!(lead.x > target.x, "Lead should be east of the target: {lead:?}");
        // Converged: lead matches target position after the projectile's flight time.
        let tof = muzzle.distance(lead) / 100.0;
        let expected = target + vel * tof;
        assert!(
            lead.distance(expected) < 0.05,
            "Lead should be self-consistent: {lead:?} vs {expected:?}"
        );
    }

    #[test]
    fn test_lead_zero_speed_returns_target() {
        let target = DVec3::new(5.0, 5.0, 0.0);
        let lead = predict_lead(DVec3::ZERO, target, DVec3::new(3.0, 0.0, 0.0), 0.0);
        assert_eq!(lead, target);
    }

    #[test]
    fn test_target_velocity_priority() {
        let nav = DVec3::new(1.0, 0.0, 0.0);
        let body = DVec3::new(0.0, 2.0, 0.0);
        assert_eq!(target_velocity(Some(nav), Some(body)), nav);
        assert_eq!(target_velocity(None, Some(body)), body);
        assert_eq!(target_velocity(None, None), DVec3::ZERO);
    }

    #[test]
    fn test_straight_shot_without_gravity() {
        let muzzle = DVec3::new(1.0, 1.0, 2.0);
        let lead = DVec3::new(1.0, 51.0, 2.0);
        let v = solve_launch_velocity(muzzle, lead, 80.0, GRAVITY, false);
        assert!((v.length() - 80.0).abs() < 1e-9);
        assert!(v.normalize().distance(DVec3::Y) < 1e-9);
    }

    #[test]
    fn test_low_arc_chosen_at_100m() {
        // 80 m/s, target 100 m away at equal height.
        let muzzle = DVec3::ZERO;
        let lead = DVec3::new(0.0, 100.0, 0.0);
        let (low, high) = launch_angles(100.0, 0.0, 80.0, GRAVITY).unwrap();
        assert!(low < high);

        let solution = solve_launch(muzzle, lead, 80.0, GRAVITY, true).unwrap();
        assert_eq!(solution.trajectory, Trajectory::LowArc);
        assert!((solution.elevation - low).abs() < 1e-12, "Must pick the low root");
        assert!(
            solution.elevation.to_degrees() < 10.0,
            "Low arc should be flat, got {:.2} deg",
            solution.elevation.to_degrees()
        );
        assert!((solution.velocity.length() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_low_arc_lands_on_target_distance() {
        let muzzle = DVec3::new(10.0, -20.0, 2.0);
        for lead in [
            DVec3::new(10.0, 80.0, 2.0),
            DVec3::new(70.0, 40.0, 6.0),
            DVec3::new(-50.0, 10.0, -1.0),
        ] {
            let solution = solve_launch(muzzle, lead, 80.0, GRAVITY, true).unwrap();
            assert_eq!(solution.trajectory, Trajectory::LowArc);
            let landing = integrate(muzzle, solution.velocity, solution.flight_time);

            let d_expected = flatten(lead - muzzle).length();
            let d_actual = flatten(landing - muzzle).length();
            assert!(
                (d_actual - d_expected).abs() < 1e-6,
                "Horizontal distance mismatch: {d_actual} vs {d_expected}"
            );
            assert!(
                (landing.z - lead.z).abs() < 1e-6,
                "Shell should arrive at lead height: {} vs {}",
                landing.z,
                lead.z
            );
        }
    }

    #[test]
    fn test_unreachable_falls_back_to_straight() {
        let muzzle = DVec3::ZERO;
        let lead = DVec3::new(0.0, 1000.0, 0.0);
        assert!(launch_angles(1000.0, 0.0, 20.0, GRAVITY).is_none());

        let solution = solve_launch(muzzle, lead, 20.0, GRAVITY, true).unwrap();
        assert_eq!(solution.trajectory, Trajectory::Straight);
        assert!(solution.velocity.normalize().distance(DVec3::Y) < 1e-9);
    }

    #[test]
    fn test_target_directly_overhead_is_straight() {
        let muzzle = DVec3::ZERO;
        let lead = DVec3::new(0.0, 0.0, 30.0);
        let solution = solve_launch(muzzle, lead, 50.0, GRAVITY, true).unwrap();
        assert_eq!(solution.trajectory, Trajectory::Straight);
        assert!(solution.velocity.normalize().distance(DVec3::Z) < 1e-9);
    }

    #[test]
    fn test_coincident_lead_is_degenerate() {
        let p = DVec3::new(3.0, 3.0, 3.0);
        assert!(solve_launch(p, p, 50.0, GRAVITY, true).is_none());
        assert_eq!(solve_launch_velocity(p, p, 50.0, GRAVITY, true), DVec3::ZERO);
    }
}
