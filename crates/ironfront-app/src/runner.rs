//! Match runner: plays one scenario headless and summarizes the result.

use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use ironfront_core::config::MatchRules;
use ironfront_core::constants::TICK_RATE;
use ironfront_core::enums::{MatchOutcome, ScenarioId, Team};
use ironfront_core::error::ConfigError;
use ironfront_core::state::{LevelProgress, LevelResult, TicketView};
use ironfront_sim::{MatchEngine, SimConfig, SimError};

#[derive(Debug, Error)]
pub enum RunError {
    #[error("rules: {0}")]
    Config(#[from] ConfigError),

    #[error("match setup: {0}")]
    Sim(#[from] SimError),
}

/// Everything needed to play one match.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub scenario: ScenarioId,
    pub seed: u64,
    pub rules: MatchRules,
    /// Stop after this many ticks even if the match is still going.
    pub max_ticks: u64,
    pub with_player: bool,
}

impl RunOptions {
    /// Options with rules read from `path`, or the defaults when `path` is None.
    pub fn with_rules_file(
        scenario: ScenarioId,
        seed: u64,
        path: Option<&Path>,
        max_ticks: u64,
        with_player: bool,
    ) -> Result<Self, RunError> {
        let rules = match path {
            Some(p) => MatchRules::load(p)?,
            None => MatchRules::default(),
        };
        Ok(Self {
            scenario,
            seed,
            rules,
            max_ticks,
            with_player,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PointSummary {
    pub name: String,
    pub owner: Team,
    pub contest: f64,
}

/// Final state of a played match.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub scenario: ScenarioId,
    pub seed: u64,
    pub ticks: u64,
    pub elapsed_secs: f64,
    pub outcome: MatchOutcome,
    pub tickets: TicketView,
    pub points: Vec<PointSummary>,
    pub kill_log: Vec<String>,
    pub result: Option<LevelResult>,
    pub progress: LevelProgress,
}

/// Play a match to its end or to `max_ticks`, whichever comes first.
pub fn run_match(options: &RunOptions) -> Result<MatchSummary, RunError> {
    let config = SimConfig {
        seed: options.seed,
        rules: options.rules.clone(),
    };
    let mut engine = MatchEngine::from_scenario(config, options.scenario, options.with_player)?;
    info!(scenario = ?options.scenario, seed = options.seed, "running match");

    let mut snapshot = engine.tick();
    while !snapshot.outcome.is_terminal() && snapshot.time.tick < options.max_ticks {
        snapshot = engine.tick();
        if snapshot.time.tick % (TICK_RATE as u64 * 10) == 0 {
            debug!(
                t = snapshot.time.elapsed_secs,
                friendly = snapshot.tickets.friendly,
                enemy = snapshot.tickets.enemy,
                "match progress"
            );
        }
    }

    let mut progress = LevelProgress::default();
    if let Some(result) = &snapshot.result {
        progress.record(result);
    }

    let summary = MatchSummary {
        scenario: options.scenario,
        seed: options.seed,
        ticks: snapshot.time.tick,
        elapsed_secs: snapshot.time.elapsed_secs,
        outcome: snapshot.outcome,
        tickets: snapshot.tickets,
        points: snapshot
            .points
            .iter()
            .map(|p| PointSummary {
                name: p.name.clone(),
                owner: p.owner,
                contest: p.contest,
            })
            .collect(),
        kill_log: snapshot.kill_log.iter().map(ToString::to_string).collect(),
        result: snapshot.result,
        progress,
    };
    engine.teardown();
    info!(outcome = ?summary.outcome, ticks = summary.ticks, "match finished");
    Ok(summary)
}
