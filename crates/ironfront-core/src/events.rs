//! Events emitted by the match for UI and audio feedback.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// One line of the kill log. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KillLogEntry {
    /// None when the tank died without an attributed killer.
    pub killer: Option<String>,
    pub killer_team: Option<Team>,
    pub victim: String,
    pub victim_team: Team,
}

impl KillLogEntry {
    /// Rich-text line with team colors for HUD widgets.
    pub fn markup(&self) -> String {
        let victim = format!(
            "<color={}>{}</color>",
            self.victim_team.color_hex(),
            self.victim
        );
        match (&self.killer, self.killer_team) {
            (Some(killer), Some(team)) => {
                format!("<color={}>{}</color> destroyed {}", team.color_hex(), killer, victim)
            }
            (Some(killer), None) => format!("{killer} destroyed {victim}"),
            (None, _) => format!("{victim} was destroyed"),
        }
    }
}

impl fmt::Display for KillLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.killer {
            Some(killer) => write!(f, "{} destroyed {}", killer, self.victim),
            None => write!(f, "{} was destroyed", self.victim),
        }
    }
}

/// Match-level events for HUD widgets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MatchEvent {
    TicketsChanged { friendly: u32, enemy: u32 },
    TankCountChanged { friendly: u32, enemy: u32 },
    KillLogUpdated { entry: KillLogEntry },
    ScoreChanged { score: u32 },
    PointCaptured { point: u32, team: Team },
    PointLost { point: u32, team: Team },
    MatchEnded { outcome: MatchOutcome },
}

/// Audio cues for the external sound system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioCue {
    /// A tank fired its main gun.
    Fire { team: Team },
    /// A tank was destroyed.
    Explosion { team: Team },
    PointCaptured { point: u32, team: Team },
    PointLost { point: u32, team: Team },
}
