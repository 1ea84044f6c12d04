#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives Joyful Snake rounds headlessly.
//!
//! Headings come from a moves script, steps are paced by the clock system,
//! and the final snapshot of every round is printed as one JSON line.

mod config;
mod session;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use joyful_snake_core::SpeedTier;
use tracing_subscriber::filter::EnvFilter;

use self::{
    config::{CollisionSetting, Overrides, SessionFile, Settings},
    session::Session,
};

/// Command-line options for the Joyful Snake driver.
#[derive(Debug, Parser)]
#[command(name = "joyful-snake")]
#[command(about = "Play Joyful Snake rounds from a scripted sequence of headings")]
struct Cli {
    /// Optional TOML session file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for target placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Speed tier from 1 (slowest) to 5 (fastest).
    #[arg(long, value_parser = parse_speed_tier)]
    speed: Option<SpeedTier>,
    /// Grid side length in cells.
    #[arg(long)]
    grid_side: Option<u32>,
    /// Headings queued before successive steps: U, D, L, R, or `.` to hold.
    #[arg(long)]
    moves: Option<String>,
    /// Simulated duration of one frame in milliseconds.
    #[arg(long)]
    frame_ms: Option<u64>,
    /// Steps after which an unfinished round is abandoned.
    #[arg(long)]
    max_steps: Option<u64>,
    /// Number of rounds to play.
    #[arg(long)]
    rounds: Option<u32>,
    /// Whether entering the departing tail cell ends the round.
    #[arg(long, value_enum)]
    collision: Option<CollisionSetting>,
    /// Sleep for each frame so rounds unfold in wall time.
    #[arg(long)]
    realtime: bool,
}

fn parse_speed_tier(value: &str) -> Result<SpeedTier, String> {
    let ordinal: u8 = value
        .parse()
        .map_err(|error| format!("'{value}' is not a tier number: {error}"))?;
    SpeedTier::new(ordinal).map_err(|error| error.to_string())
}

/// Entry point for the Joyful Snake command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let file = cli
        .config
        .as_deref()
        .map(SessionFile::load)
        .transpose()?;
    let settings = Settings::resolve(
        file,
        Overrides {
            seed: cli.seed,
            speed: cli.speed,
            grid_side: cli.grid_side,
            frame_ms: cli.frame_ms,
            max_steps: cli.max_steps,
            rounds: cli.rounds,
            moves: cli.moves,
            collision: cli.collision,
            realtime: cli.realtime,
        },
    )?;

    let mut session = Session::new(settings)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    session.run(|report| {
        let line =
            serde_json::to_string(&report.snapshot).context("failed to encode round snapshot")?;
        writeln!(out, "{line}").context("failed to write round snapshot")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn speed_flag_rejects_out_of_range_tiers() {
        assert_eq!(parse_speed_tier("2"), SpeedTier::new(2).map_err(|e| e.to_string()));
        assert!(parse_speed_tier("0").is_err());
        assert!(parse_speed_tier("fast").is_err());
    }

    #[test]
    fn flags_parse_into_overrides() {
        let cli = Cli::try_parse_from([
            "joyful-snake",
            "--speed",
            "5",
            "--moves",
            "LLU",
            "--collision",
            "vacating-tail",
        ])
        .expect("valid flags");
        assert_eq!(cli.speed, Some(SpeedTier::FASTEST));
        assert_eq!(cli.moves.as_deref(), Some("LLU"));
        assert_eq!(cli.collision, Some(CollisionSetting::VacatingTail));
    }
}
