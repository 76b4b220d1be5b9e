//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 30;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

/// Gravitational acceleration (m/s²), acting along -z.
pub const GRAVITY: f64 = 9.81;

// --- Tickets ---

/// Flat ticket bonus each team starts with.
pub const TICKET_BASE: u32 = 1000;

/// Extra tickets granted to a team fielding a human-controlled tank.
pub const PLAYER_TICKET_BONUS: u32 = 300;

pub const TICKET_COST_LIGHT: u32 = 100;
pub const TICKET_COST_MEDIUM: u32 = 200;
pub const TICKET_COST_HEAVY: u32 = 300;

/// Ticket cost of a tank spawned without a class.
pub const TICKET_COST_DEFAULT: u32 = 150;

/// Number of kill log entries retained.
pub const KILL_LOG_CAPACITY: usize = 5;

// --- Stars ---

pub const STAR_THRESHOLD_3: f64 = 0.99;
pub const STAR_THRESHOLD_2: f64 = 0.70;
pub const STAR_THRESHOLD_1: f64 = 0.40;

// --- Capture points ---

/// Seconds of uncontested single-agent presence to capture a point.
pub const CAPTURE_TIME: f64 = 10.0;

/// Contest value change per second per net agent.
pub const CAPTURE_RATE: f64 = 1.0;

/// Rate at which an unowned, evenly held point relaxes toward zero.
pub const NEUTRAL_DECAY_RATE: f64 = 0.5;

/// Tolerance on |c| = T when checking a point is still fully owned.
pub const CAPTURE_EPSILON: f64 = 1e-3;

/// Radius of a capture point volume (m).
pub const CAPTURE_RADIUS: f64 = 12.0;

/// Seconds between ticket drains while a point is held.
pub const DRAIN_INTERVAL_SECS: f64 = 1.0;

/// Tickets drained from the opposing pool per interval.
pub const DRAIN_AMOUNT: u32 = 10;

// --- AI ---

/// Seconds between perception re-scans.
pub const SCAN_INTERVAL_SECS: f64 = 0.5;

/// Search radius for candidate capture points (m).
pub const POINT_SEARCH_RADIUS: f64 = 250.0;

/// A hostile farther than this multiple of weapon range loses to a capture point.
pub const CHASE_RANGE_FACTOR: f64 = 1.5;

/// Maximum aim error (degrees) at which a shot is permitted.
pub const FIRING_ARC_DEG: f64 = 5.0;

/// Looser firing arc while strafing.
pub const STRAFE_FIRING_ARC_DEG: f64 = 15.0;

/// Orbit radius around the target while strafing (m).
pub const STRAFE_RADIUS: f64 = 25.0;

/// Orbit angular speed while strafing (rad/s).
pub const STRAFE_ANGULAR_SPEED: f64 = 0.4;

/// Radius around the agent for random patrol destinations (m).
pub const PATROL_RADIUS: f64 = 40.0;

/// Distance at which navigation considers a destination reached (m).
pub const NAV_STOPPING_DISTANCE: f64 = 2.0;

/// Spread multiplier while stationary.
pub const SPREAD_STATIONARY_FACTOR: f64 = 1.0;

/// Spread multiplier at full speed.
pub const SPREAD_MOVING_FACTOR: f64 = 2.5;

/// Line-of-sight target point height above the target's base (m).
pub const LOS_TARGET_HEIGHT: f64 = 1.5;

/// Forward offset of the LOS ray origin from the muzzle (m).
pub const LOS_MUZZLE_OFFSET: f64 = 0.5;

// --- Projectiles ---

/// Maximum simultaneously outstanding projectiles.
pub const PROJECTILE_POOL_CAPACITY: usize = 256;

/// Projectile lifetime before it is returned to the pool (s).
pub const PROJECTILE_LIFETIME_SECS: f64 = 4.0;

// --- Tank class stats ---

pub const LIGHT_MAX_HEALTH: f64 = 300.0;
pub const MEDIUM_MAX_HEALTH: f64 = 500.0;
pub const HEAVY_MAX_HEALTH: f64 = 800.0;

/// Hull collider radius (m).
pub const HULL_RADIUS: f64 = 2.5;

/// Height of the hull collider center above ground (m).
pub const HULL_CENTER_HEIGHT: f64 = 1.2;

/// Radius of the turret collision sphere (m).
pub const TURRET_RADIUS: f64 = 1.2;
