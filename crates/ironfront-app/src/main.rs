use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing::error;
use tracing_subscriber::EnvFilter;

use ironfront_app::runner::{run_match, RunOptions};
use ironfront_core::enums::ScenarioId;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Scenario {
    Skirmish,
    Assault,
}

impl From<Scenario> for ScenarioId {
    fn from(s: Scenario) -> Self {
        match s {
            Scenario::Skirmish => ScenarioId::Skirmish,
            Scenario::Assault => ScenarioId::Assault,
        }
    }
}

/// Play an IRONFRONT match headless and print the result as JSON.
#[derive(Parser, Debug)]
#[command(name = "ironfront", version)]
struct Args {
    /// Match rules in TOML; built-in defaults when omitted.
    #[arg(long)]
    rules: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "skirmish")]
    scenario: Scenario,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Give up after this many ticks (30 per second).
    #[arg(long, default_value_t = 30 * 60 * 10)]
    max_ticks: u64,

    /// Hand the first friendly tank to a human (it stays idle headless).
    #[arg(long)]
    player: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ironfront=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let options = match RunOptions::with_rules_file(
        args.scenario.into(),
        args.seed,
        args.rules.as_deref(),
        args.max_ticks,
        args.player,
    ) {
        Ok(o) => o,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let summary = match run_match(&options) {
        Ok(s) => s,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("failed to encode summary: {e}");
            ExitCode::FAILURE
        }
    }
}
