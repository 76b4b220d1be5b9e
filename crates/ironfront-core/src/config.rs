//! Match rules loaded from TOML.
//!
//! Every field has a default taken from `constants`, so a rules file only
//! needs to list what it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::TankClass;
use crate::error::ConfigError;

/// Ticket cost per tank class.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketCosts {
    pub light: u32,
    pub medium: u32,
    pub heavy: u32,
    /// Cost of a tank with no class.
    pub unclassified: u32,
}

impl Default for TicketCosts {
    fn default() -> Self {
        Self {
            light: TICKET_COST_LIGHT,
            medium: TICKET_COST_MEDIUM,
            heavy: TICKET_COST_HEAVY,
            unclassified: TICKET_COST_DEFAULT,
        }
    }
}

impl TicketCosts {
    pub fn cost_of(&self, class: Option<TankClass>) -> u32 {
        match class {
            Some(TankClass::Light) => self.light,
            Some(TankClass::Medium) => self.medium,
            Some(TankClass::Heavy) => self.heavy,
            None => self.unclassified,
        }
    }
}

/// Score ratio thresholds for 3, 2 and 1 stars.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StarThresholds {
    pub three: f64,
    pub two: f64,
    pub one: f64,
}

impl Default for StarThresholds {
    fn default() -> Self {
        Self {
            three: STAR_THRESHOLD_3,
            two: STAR_THRESHOLD_2,
            one: STAR_THRESHOLD_1,
        }
    }
}

impl StarThresholds {
    /// Stars earned for `score` out of `max_score`.
    pub fn stars(&self, score: u32, max_score: u32) -> u8 {
        if max_score == 0 {
            return 0;
        }
        let ratio = score as f64 / max_score as f64;
        if ratio >= self.three {
            3
        } else if ratio >= self.two {
            2
        } else if ratio >= self.one {
            1
        } else {
            0
        }
    }
}

/// Defaults applied to capture points that do not override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureRules {
    pub capture_time: f64,
    pub friendly_rate: f64,
    pub enemy_rate: f64,
    pub neutral_decay_rate: f64,
    pub radius: f64,
    pub drain_interval_secs: f64,
    pub drain_amount: u32,
}

impl Default for CaptureRules {
    fn default() -> Self {
        Self {
            capture_time: CAPTURE_TIME,
            friendly_rate: CAPTURE_RATE,
            enemy_rate: CAPTURE_RATE,
            neutral_decay_rate: NEUTRAL_DECAY_RATE,
            radius: CAPTURE_RADIUS,
            drain_interval_secs: DRAIN_INTERVAL_SECS,
            drain_amount: DRAIN_AMOUNT,
        }
    }
}

/// Combat AI tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiRules {
    pub scan_interval_secs: f64,
    pub point_search_radius: f64,
    pub chase_range_factor: f64,
    pub firing_arc_deg: f64,
    pub strafe_firing_arc_deg: f64,
    /// Orbit the target while firing instead of holding ground.
    pub strafe: bool,
    pub strafe_radius: f64,
    pub strafe_angular_speed: f64,
    pub patrol_radius: f64,
    pub spread_stationary_factor: f64,
    pub spread_moving_factor: f64,
}

impl Default for AiRules {
    fn default() -> Self {
        Self {
            scan_interval_secs: SCAN_INTERVAL_SECS,
            point_search_radius: POINT_SEARCH_RADIUS,
            chase_range_factor: CHASE_RANGE_FACTOR,
            firing_arc_deg: FIRING_ARC_DEG,
            strafe_firing_arc_deg: STRAFE_FIRING_ARC_DEG,
            strafe: false,
            strafe_radius: STRAFE_RADIUS,
            strafe_angular_speed: STRAFE_ANGULAR_SPEED,
            patrol_radius: PATROL_RADIUS,
            spread_stationary_factor: SPREAD_STATIONARY_FACTOR,
            spread_moving_factor: SPREAD_MOVING_FACTOR,
        }
    }
}

/// Complete rule set for a match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    pub ticket_base: u32,
    pub player_ticket_bonus: u32,
    pub ticket_costs: TicketCosts,
    pub kill_log_capacity: usize,
    pub stars: StarThresholds,
    pub capture: CaptureRules,
    pub ai: AiRules,
    pub gravity: f64,
    pub projectile_pool_capacity: usize,
    pub projectile_lifetime_secs: f64,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            ticket_base: TICKET_BASE,
            player_ticket_bonus: PLAYER_TICKET_BONUS,
            ticket_costs: TicketCosts::default(),
            kill_log_capacity: KILL_LOG_CAPACITY,
            stars: StarThresholds::default(),
            capture: CaptureRules::default(),
            ai: AiRules::default(),
            gravity: GRAVITY,
            projectile_pool_capacity: PROJECTILE_POOL_CAPACITY,
            projectile_lifetime_secs: PROJECTILE_LIFETIME_SECS,
        }
    }
}

impl MatchRules {
    /// Parse and validate rules from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let rules: MatchRules = toml::from_str(text)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load and validate rules from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values that would make the contest or drain loops degenerate.
    /// Non-finite values are rejected everywhere.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.capture;
        positive("capture.capture_time", c.capture_time)?;
        positive("capture.drain_interval_secs", c.drain_interval_secs)?;
        positive("capture.radius", c.radius)?;
        non_negative("capture.friendly_rate", c.friendly_rate)?;
        non_negative("capture.enemy_rate", c.enemy_rate)?;
        non_negative("capture.neutral_decay_rate", c.neutral_decay_rate)?;

        let ai = &self.ai;
        positive("ai.scan_interval_secs", ai.scan_interval_secs)?;
        for (name, value) in [
            ("ai.point_search_radius", ai.point_search_radius),
            ("ai.chase_range_factor", ai.chase_range_factor),
            ("ai.firing_arc_deg", ai.firing_arc_deg),
            ("ai.strafe_firing_arc_deg", ai.strafe_firing_arc_deg),
            ("ai.strafe_radius", ai.strafe_radius),
            ("ai.strafe_angular_speed", ai.strafe_angular_speed),
            ("ai.patrol_radius", ai.patrol_radius),
            ("ai.spread_stationary_factor", ai.spread_stationary_factor),
            ("ai.spread_moving_factor", ai.spread_moving_factor),
        ] {
            non_negative(name, value)?;
        }

        non_negative("gravity", self.gravity)?;
        positive("projectile_lifetime_secs", self.projectile_lifetime_secs)?;

        let s = &self.stars;
        if !(s.three >= s.two && s.two >= s.one) {
            return Err(ConfigError::Invalid(
                "star thresholds must be non-increasing from three to one".into(),
            ));
        }
        if self.projectile_pool_capacity == 0 {
            return Err(ConfigError::Invalid("projectile pool needs at least one slot".into()));
        }
        Ok(())
    }
}

fn positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be a positive number, got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be a non-negative number, got {value}")))
    }
}
