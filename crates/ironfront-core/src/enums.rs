//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Side a combat entity or capture point belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Friendly,
    Enemy,
    /// Never participates in damage or contest accounting.
    #[default]
    Neutral,
}

impl Team {
    /// The opposing side. Neutral has no opponent.
    pub fn opponent(self) -> Option<Team> {
        match self {
            Team::Friendly => Some(Team::Enemy),
            Team::Enemy => Some(Team::Friendly),
            Team::Neutral => None,
        }
    }

    /// Whether `other` is a valid hostile for this team.
    pub fn is_hostile_to(self, other: Team) -> bool {
        self.opponent() == Some(other)
    }

    /// Display color for kill log and HUD markup.
    pub fn color_hex(self) -> &'static str {
        match self {
            Team::Friendly => "#4da6ff",
            Team::Enemy => "#ff4d4d",
            Team::Neutral => "#c8c8c8",
        }
    }
}

/// Tank weight class. Determines base stats and ticket cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TankClass {
    Light,
    Medium,
    Heavy,
}

/// Combat AI state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    /// No navigation available or nothing decided yet.
    #[default]
    Idle,
    /// Wandering between random nearby points.
    Patrolling,
    /// Travelling toward a capture point or an out-of-range hostile.
    Moving,
    /// Holding position inside a capture point's volume.
    Capturing,
    /// Engaging a hostile inside weapon range.
    Fighting,
}

/// Match result. Victory and Defeat are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchOutcome {
    #[default]
    InProgress,
    Victory,
    Defeat,
}

impl MatchOutcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, MatchOutcome::InProgress)
    }
}

/// Ownership a capture point starts the match with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitialOwner {
    #[default]
    Neutral,
    /// Pre-owned by the attacking team.
    Attacker,
    /// Pre-owned by the defending team.
    Defender,
}

impl InitialOwner {
    /// Resolve to a concrete team given which side attacks.
    pub fn resolve(self, attacker: Team) -> Team {
        match self {
            InitialOwner::Neutral => Team::Neutral,
            InitialOwner::Attacker => attacker,
            InitialOwner::Defender => attacker.opponent().unwrap_or(Team::Neutral),
        }
    }
}

/// Which local axis pair the gun's elevation is measured over.
///
/// Hull models differ: most barrels point along the gun's forward axis, some
/// older models were authored with the barrel along the lateral axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PitchConvention {
    /// Elevation = atan2(up, forward).
    #[default]
    ForwardAxis,
    /// Elevation = atan2(up, right).
    LateralAxis,
}

/// Collision layer of a collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Hull,
    Obstacle,
}

/// Scenario selection for a new match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioId {
    /// All capture points start neutral.
    #[default]
    Skirmish,
    /// Capture points start owned by the defender.
    Assault,
}
