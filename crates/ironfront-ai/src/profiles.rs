//! Class-specific tank profiles.
//!
//! Consolidates per-class base stats used when spawning tanks.

use ironfront_core::components::Weapon;
use ironfront_core::enums::TankClass;

/// Base stats for a tank class.
pub struct TankProfile {
    pub max_health: f64,
    /// Top speed (m/s).
    pub move_speed: f64,
    pub turret_deg_per_sec: f64,
    pub gun_deg_per_sec: f64,
    /// Gun depression limit (degrees, negative = down).
    pub min_pitch_deg: f64,
    pub max_pitch_deg: f64,
    pub barrel_length: f64,
    pub turret_height: f64,
    pub weapon: Weapon,
}

/// Get the profile for a tank class. Unclassified tanks use medium stats.
pub fn get_profile(class: Option<TankClass>) -> TankProfile {
    use ironfront_core::constants::*;

    match class {
        Some(TankClass::Light) => TankProfile {
            max_health: LIGHT_MAX_HEALTH,
            move_speed: 9.0,
            turret_deg_per_sec: 90.0,
            gun_deg_per_sec: 30.0,
            min_pitch_deg: -8.0,
            max_pitch_deg: 20.0,
            barrel_length: 3.0,
            turret_height: 1.8,
            weapon: Weapon {
                fire_interval: 1.0,
                damage: 40.0,
                projectile_speed: 120.0,
                spread_deg: 1.5,
                range: 60.0,
                use_gravity: true,
            },
        },
        Some(TankClass::Medium) | None => TankProfile {
            max_health: MEDIUM_MAX_HEALTH,
            move_speed: 7.0,
            turret_deg_per_sec: 60.0,
            gun_deg_per_sec: 20.0,
            min_pitch_deg: -6.0,
            max_pitch_deg: 18.0,
            barrel_length: 4.0,
            turret_height: 2.0,
            weapon: Weapon {
                fire_interval: 1.5,
                damage: 70.0,
                projectile_speed: 100.0,
                spread_deg: 1.0,
                range: 80.0,
                use_gravity: true,
            },
        },
        Some(TankClass::Heavy) => TankProfile {
            max_health: HEAVY_MAX_HEALTH,
            move_speed: 5.0,
            turret_deg_per_sec: 40.0,
            gun_deg_per_sec: 12.0,
            min_pitch_deg: -5.0,
            max_pitch_deg: 15.0,
            barrel_length: 5.0,
            turret_height: 2.2,
            weapon: Weapon {
                fire_interval: 2.5,
                damage: 120.0,
                projectile_speed: 80.0,
                spread_deg: 0.8,
                range: 100.0,
                use_gravity: true,
            },
        },
    }
}
