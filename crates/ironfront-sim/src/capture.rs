//! Capture point contest.
//!
//! Each point carries a signed contest value in `[-T, T]` (positive toward
//! Friendly), a controlling team that changes only at threshold crossings,
//! and one presence set per fighting team. Points live in slot storage on the
//! engine and are addressed by `PointId`.

use std::collections::HashSet;
use std::fmt;

use glam::DVec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use ironfront_core::config::CaptureRules;
use ironfront_core::constants::CAPTURE_EPSILON;
use ironfront_core::enums::Team;
use ironfront_core::state::CapturePointView;
use ironfront_core::types::Position;

/// Stable handle of a capture point (its slot index).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PointId(pub u32);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ownership changes produced by one contest step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContestChange {
    pub lost: Option<Team>,
    pub captured: Option<Team>,
}

/// Countdown to the next ticket drain while a point stays fully owned.
#[derive(Debug, Clone, Copy)]
struct DrainTimer {
    remaining: f64,
}

#[derive(Debug, Clone)]
pub struct CapturePoint {
    pub id: PointId,
    pub name: String,
    pub position: DVec3,
    pub radius: f64,
    pub capture_time: f64,
    pub friendly_rate: f64,
    pub enemy_rate: f64,
    pub neutral_decay_rate: f64,
    drain_interval: f64,
    contest: f64,
    owner: Team,
    friendly: HashSet<Entity>,
    enemy: HashSet<Entity>,
    drain: Option<DrainTimer>,
}

impl CapturePoint {
    /// Create a point. A pre-owned point starts fully captured with its drain running.
    pub fn new(id: PointId, name: impl Into<String>, position: DVec3, rules: &CaptureRules, owner: Team) -> Self {
        let mut point = Self {
            id,
            name: name.into(),
            position,
            radius: rules.radius,
            capture_time: rules.capture_time,
            friendly_rate: rules.friendly_rate,
            enemy_rate: rules.enemy_rate,
            neutral_decay_rate: rules.neutral_decay_rate,
            drain_interval: rules.drain_interval_secs,
            contest: 0.0,
            owner: Team::Neutral,
            friendly: HashSet::new(),
            enemy: HashSet::new(),
            drain: None,
        };
        if let Some(sign) = sign_of(owner) {
            point.take_control(owner, sign);
        }
        point
    }

    pub fn owner(&self) -> Team {
        self.owner
    }

    pub fn contest(&self) -> f64 {
        self.contest
    }

    pub fn is_draining(&self) -> bool {
        self.drain.is_some()
    }

    /// Number of agents of `team` inside the volume.
    pub fn presence(&self, team: Team) -> u32 {
        match team {
            Team::Friendly => self.friendly.len() as u32,
            Team::Enemy => self.enemy.len() as u32,
            Team::Neutral => 0,
        }
    }

    pub fn is_present(&self, agent: Entity) -> bool {
        self.friendly.contains(&agent) || self.enemy.contains(&agent)
    }

    /// Agents currently registered, both teams.
    pub fn occupants(&self) -> impl Iterator<Item = Entity> + '_ {
        self.friendly.iter().chain(self.enemy.iter()).copied()
    }

    /// Register an agent entering the volume. Returns false if it was already
    /// present or its team does not contest points.
    pub fn enter(&mut self, agent: Entity, team: Team) -> bool {
        match team {
            Team::Friendly => self.friendly.insert(agent),
            Team::Enemy => self.enemy.insert(agent),
            Team::Neutral => false,
        }
    }

    /// Remove an agent from whichever presence set holds it. Unknown agents are ignored.
    pub fn exit(&mut self, agent: Entity) -> bool {
        self.friendly.remove(&agent) | self.enemy.remove(&agent)
    }

    /// Advance the contest value by `dt` seconds and resolve ownership.
    pub fn step(&mut self, dt: f64) -> ContestChange {
        let mut change = ContestChange::default();
        let t = self.capture_time;

        match sign_of(self.owner) {
            None => {
                let net = self.presence(Team::Friendly) as f64 - self.presence(Team::Enemy) as f64;
                if net > 0.0 {
                    self.contest = toward(self.contest, t, net.max(1.0) * self.friendly_rate * dt);
                } else if net < 0.0 {
                    self.contest = toward(self.contest, -t, (-net).max(1.0) * self.enemy_rate * dt);
                } else {
                    self.contest = toward(self.contest, 0.0, self.neutral_decay_rate * dt);
                }
            }
            Some(sign) => {
                let owner = self.owner;
                let opponent = owner.opponent().unwrap_or(Team::Neutral);
                let own = self.presence(owner) as f64;
                let opposing = self.presence(opponent) as f64;
                if own > 0.0 && opposing < own {
                    let rate = own.max(1.0) * self.rate_of(owner);
                    self.contest = toward(self.contest, sign * t, rate * dt);
                } else if opposing > 0.0 {
                    let rate = (opposing - own).max(1.0) * self.rate_of(opponent);
                    self.contest = toward(self.contest, -sign * t, rate * dt);
                }
                // Owned and empty: hold.
            }
        }

        self.contest = self.contest.clamp(-t, t);

        if let Some(sign) = sign_of(self.owner) {
            if (self.contest - sign * t).abs() > CAPTURE_EPSILON {
                change.lost = Some(self.owner);
                self.owner = Team::Neutral;
                self.drain = None;
            }
        }

        if self.contest >= t - CAPTURE_EPSILON && self.owner != Team::Friendly {
            self.take_control(Team::Friendly, 1.0);
            change.captured = Some(Team::Friendly);
        } else if self.contest <= -t + CAPTURE_EPSILON && self.owner != Team::Enemy {
            self.take_control(Team::Enemy, -1.0);
            change.captured = Some(Team::Enemy);
        }

        change
    }

    /// Advance the drain timer. Returns the team to drain when an interval
    /// completes while the point is still fully owned. A lapsed owner
    /// cancels the cycle instead.
    pub fn step_drain(&mut self, dt: f64) -> Option<Team> {
        let still_owned = match sign_of(self.owner) {
            Some(sign) => (self.contest - sign * self.capture_time).abs() <= CAPTURE_EPSILON,
            None => false,
        };
        if !still_owned {
            self.drain = None;
            return None;
        }

        let interval = self.drain_interval;
        let timer = self.drain.as_mut()?;
        timer.remaining -= dt;
        if timer.remaining <= 1e-9 {
            timer.remaining += interval;
            return self.owner.opponent();
        }
        None
    }

    /// Drop all presence and cancel the drain cycle.
    pub fn clear(&mut self) {
        self.friendly.clear();
        self.enemy.clear();
        self.drain = None;
    }

    pub fn view(&self) -> CapturePointView {
        CapturePointView {
            id: self.id.0,
            name: self.name.clone(),
            position: Position(self.position),
            owner: self.owner,
            contest: self.contest,
            capture_time: self.capture_time,
            friendly_present: self.presence(Team::Friendly),
            enemy_present: self.presence(Team::Enemy),
        }
    }

    fn take_control(&mut self, team: Team, sign: f64) {
        self.owner = team;
        self.contest = sign * self.capture_time;
        self.drain = Some(DrainTimer {
            remaining: self.drain_interval,
        });
    }

    fn rate_of(&self, team: Team) -> f64 {
        match team {
            Team::Friendly => self.friendly_rate,
            Team::Enemy => self.enemy_rate,
            Team::Neutral => 0.0,
        }
    }
}

fn sign_of(team: Team) -> Option<f64> {
    match team {
        Team::Friendly => Some(1.0),
        Team::Enemy => Some(-1.0),
        Team::Neutral => None,
    }
}

fn toward(current: f64, target: f64, max_delta: f64) -> f64 {
    ironfront_ai::aiming::move_towards(current, target, max_delta)
}
