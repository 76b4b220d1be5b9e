//! Match state snapshot: the complete visible state handed to the frontend each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{AudioCue, KillLogEntry, MatchEvent};
use crate::types::{Position, SimTime};

/// Complete match state broadcast after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub time: SimTime,
    pub outcome: MatchOutcome,
    pub tickets: TicketView,
    pub tanks: Vec<TankView>,
    pub points: Vec<CapturePointView>,
    pub kill_log: Vec<KillLogEntry>,
    pub events: Vec<MatchEvent>,
    pub audio: Vec<AudioCue>,
    pub result: Option<LevelResult>,
}

/// Ticket pools, alive counts and score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketView {
    pub friendly: u32,
    pub enemy: u32,
    pub friendly_alive: u32,
    pub enemy_alive: u32,
    pub score: u32,
    pub max_score: u32,
}

/// A live tank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TankView {
    pub name: String,
    pub team: Team,
    pub class: Option<TankClass>,
    pub position: Position,
    pub heading: f64,
    pub turret_yaw: f64,
    pub gun_pitch: f64,
    pub health: f64,
    pub max_health: f64,
    /// None for player-controlled tanks.
    pub ai_state: Option<AiState>,
    pub target: Option<TargetView>,
}

/// What an AI tank is driving toward or shooting at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TargetView {
    Tank { name: String },
    Point { id: u32 },
}

/// Capture point status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapturePointView {
    pub id: u32,
    pub name: String,
    pub position: Position,
    pub owner: Team,
    /// Signed contest value in [-capture_time, capture_time].
    pub contest: f64,
    pub capture_time: f64,
    pub friendly_present: u32,
    pub enemy_present: u32,
}

/// End-of-level record handed to progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelResult {
    pub score: u32,
    pub max_score: u32,
    pub stars: u8,
    pub completed: bool,
    pub next_level_unlocked: bool,
}

/// Best-ever record for one level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub best_score: u32,
    pub stars: u8,
    pub completed: bool,
    pub next_level_unlocked: bool,
}

impl LevelProgress {
    /// Fold a new result in, never lowering a previous best.
    pub fn record(&mut self, result: &LevelResult) {
        self.best_score = self.best_score.max(result.score);
        self.stars = self.stars.max(result.stars);
        self.completed |= result.completed;
        self.next_level_unlocked |= result.next_level_unlocked;
    }
}
