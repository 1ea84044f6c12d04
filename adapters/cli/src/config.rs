//! Session settings assembled from an optional TOML file and CLI flags.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, ensure, Context, Result};
use joyful_snake_core::{CellCoord, SpeedTier};
use joyful_snake_world::{CollisionRule, Config};
use serde::Deserialize;

const SUPPORTED_CONFIG_VERSION: u32 = 1;
const DEFAULT_FRAME_MS: u64 = 16;
const DEFAULT_MAX_STEPS: u64 = 10_000;
const DEFAULT_ROUNDS: u32 = 1;

/// Values a session file may provide beside its mandatory version.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SessionFile {
    version: u32,
    pub(crate) seed: Option<u64>,
    pub(crate) speed: Option<SpeedTier>,
    pub(crate) grid_side: Option<u32>,
    pub(crate) frame_ms: Option<u64>,
    pub(crate) max_steps: Option<u64>,
    pub(crate) rounds: Option<u32>,
    pub(crate) moves: Option<String>,
    pub(crate) collision: Option<CollisionSetting>,
}

/// Serialised spelling of [`CollisionRule`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum CollisionSetting {
    /// Entering the departing tail ends the round.
    Strict,
    /// The departing tail cell may be entered.
    VacatingTail,
}

impl From<CollisionSetting> for CollisionRule {
    fn from(value: CollisionSetting) -> Self {
        match value {
            CollisionSetting::Strict => Self::Strict,
            CollisionSetting::VacatingTail => Self::VacatingTail,
        }
    }
}

impl SessionFile {
    /// Loads and validates a session file from disk.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read session config at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid session config at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let file: Self =
            toml::from_str(contents).context("failed to parse session config toml contents")?;
        if file.version != SUPPORTED_CONFIG_VERSION {
            bail!(
                "unsupported session config version {} (expected {SUPPORTED_CONFIG_VERSION})",
                file.version
            );
        }
        Ok(file)
    }
}

/// Fully resolved settings for one CLI session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) world: Config,
    pub(crate) speed: SpeedTier,
    pub(crate) frame: Duration,
    pub(crate) max_steps: u64,
    pub(crate) rounds: u32,
    pub(crate) moves: String,
    pub(crate) realtime: bool,
}

/// Flag values that take precedence over the session file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) seed: Option<u64>,
    pub(crate) speed: Option<SpeedTier>,
    pub(crate) grid_side: Option<u32>,
    pub(crate) frame_ms: Option<u64>,
    pub(crate) max_steps: Option<u64>,
    pub(crate) rounds: Option<u32>,
    pub(crate) moves: Option<String>,
    pub(crate) collision: Option<CollisionSetting>,
    pub(crate) realtime: bool,
}

impl Settings {
    /// Merges flags over the file over built-in defaults.
    pub(crate) fn resolve(file: Option<SessionFile>, overrides: Overrides) -> Result<Self> {
        let file = file.unwrap_or_default();

        let mut world = Config::new();
        if let Some(seed) = overrides.seed.or(file.seed) {
            world = world.with_rng_seed(seed);
        }
        if let Some(side) = overrides.grid_side.or(file.grid_side) {
            ensure!(side >= 5, "grid side must be at least 5 cells");
            world = world.with_grid_side(side);
            if side != Config::new().grid_side() {
                world = world
                    .with_seed_body(centred_seed_body(side))
                    .with_opening_target(None);
            }
        }
        if let Some(collision) = overrides.collision.or(file.collision) {
            world = world.with_collision_rule(collision.into());
        }

        let frame_ms = overrides
            .frame_ms
            .or(file.frame_ms)
            .unwrap_or(DEFAULT_FRAME_MS);
        ensure!(frame_ms > 0, "frame duration must be at least 1 ms");

        let rounds = overrides.rounds.or(file.rounds).unwrap_or(DEFAULT_ROUNDS);
        ensure!(rounds > 0, "at least one round must be played");

        Ok(Self {
            world,
            speed: overrides.speed.or(file.speed).unwrap_or_default(),
            frame: Duration::from_millis(frame_ms),
            max_steps: overrides
                .max_steps
                .or(file.max_steps)
                .unwrap_or(DEFAULT_MAX_STEPS),
            rounds,
            moves: overrides.moves.or(file.moves).unwrap_or_default(),
            realtime: overrides.realtime,
        })
    }
}

/// Vertical three-cell body with its head on the centre cell, tail below.
fn centred_seed_body(side: u32) -> Vec<CellCoord> {
    let centre = side / 2;
    (0..3)
        .map(|offset| CellCoord::new(centre, centre + offset))
        .collect()
}
