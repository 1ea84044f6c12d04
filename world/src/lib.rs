#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Joyful Snake.
//!
//! The [`World`] exclusively owns the body, target, score, round state and
//! the buffered heading. Adapters and systems mutate it only through
//! [`apply`] and observe it only through the [`query`] module.

mod grid;
mod spawner;

use std::collections::VecDeque;

use joyful_snake_core::{
    CellCoord, Command, Event, Heading, RoundEnd, RoundState, SpeedTier, MIN_BODY_LENGTH,
    SCORE_INCREMENT,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info};

pub use grid::Grid;
pub use spawner::spawn;

const DEFAULT_GRID_SIDE: u32 = 15;
const DEFAULT_RNG_SEED: u64 = 0x6a6f_7966_756c_5f73;
const DEFAULT_SEED_BODY: [CellCoord; 3] = [
    CellCoord::new(7, 7),
    CellCoord::new(7, 8),
    CellCoord::new(7, 9),
];
const DEFAULT_SEED_HEADING: Heading = Heading::Up;
const DEFAULT_OPENING_TARGET: CellCoord = CellCoord::new(5, 5);

/// Decides whether the cell the tail leaves during a step may be entered by the head.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CollisionRule {
    /// Every pre-step body cell blocks the head, including the departing tail.
    #[default]
    Strict,
    /// The tail cell is free when the step does not grow the body.
    VacatingTail,
}

/// Configuration parameters required to construct the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    grid_side: u32,
    rng_seed: u64,
    seed_body: Vec<CellCoord>,
    seed_heading: Heading,
    opening_target: Option<CellCoord>,
    collision_rule: CollisionRule,
}

impl Config {
    /// Creates the classic 15x15 layout with a three-cell body heading up.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid_side: DEFAULT_GRID_SIDE,
            rng_seed: DEFAULT_RNG_SEED,
            seed_body: DEFAULT_SEED_BODY.to_vec(),
            seed_heading: DEFAULT_SEED_HEADING,
            opening_target: Some(DEFAULT_OPENING_TARGET),
            collision_rule: CollisionRule::Strict,
        }
    }

    /// Overrides the grid side length.
    #[must_use]
    pub fn with_grid_side(mut self, grid_side: u32) -> Self {
        self.grid_side = grid_side;
        self
    }

    /// Overrides the seed driving target placement.
    #[must_use]
    pub fn with_rng_seed(mut self, rng_seed: u64) -> Self {
        self.rng_seed = rng_seed;
        self
    }

    /// Overrides the body every round starts from, head first.
    #[must_use]
    pub fn with_seed_body(mut self, seed_body: Vec<CellCoord>) -> Self {
        self.seed_body = seed_body;
        self
    }

    /// Overrides the heading every round starts with.
    #[must_use]
    pub fn with_seed_heading(mut self, seed_heading: Heading) -> Self {
        self.seed_heading = seed_heading;
        self
    }

    /// Pins the first round's target; `None` spawns it randomly.
    ///
    /// Rounds started by [`Command::Reset`] always spawn randomly.
    #[must_use]
    pub fn with_opening_target(mut self, opening_target: Option<CellCoord>) -> Self {
        self.opening_target = opening_target;
        self
    }

    /// Overrides how the departing tail cell is treated.
    #[must_use]
    pub fn with_collision_rule(mut self, collision_rule: CollisionRule) -> Self {
        self.collision_rule = collision_rule;
        self
    }

    /// Grid side length.
    #[must_use]
    pub const fn grid_side(&self) -> u32 {
        self.grid_side
    }

    /// Seed driving target placement.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Body every round starts from.
    #[must_use]
    pub fn seed_body(&self) -> &[CellCoord] {
        &self.seed_body
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let grid = Grid::new(self.grid_side);
        let length = self.seed_body.len();
        if length < MIN_BODY_LENGTH {
            return Err(ConfigError::SeedBodyTooShort { length });
        }
        if grid.cell_count() <= length as u64 {
            return Err(ConfigError::GridTooSmall {
                side: self.grid_side,
                body_length: length,
            });
        }
        for (index, cell) in self.seed_body.iter().enumerate() {
            if !grid.in_bounds(*cell) {
                return Err(ConfigError::SeedCellOutOfBounds { cell: *cell });
            }
            if grid.is_occupied(&self.seed_body[..index], *cell) {
                return Err(ConfigError::SeedBodyOverlaps { cell: *cell });
            }
        }
        for pair in self.seed_body.windows(2) {
            if !pair[0].is_adjacent(pair[1]) {
                return Err(ConfigError::SeedBodyDisconnected {
                    from: pair[0],
                    to: pair[1],
                });
            }
        }
        if self.seed_body[0].offset(self.seed_heading) == Some(self.seed_body[1]) {
            return Err(ConfigError::HeadingIntoBody {
                heading: self.seed_heading,
            });
        }
        if let Some(target) = self.opening_target {
            if !grid.in_bounds(target) || grid.is_occupied(&self.seed_body, target) {
                return Err(ConfigError::InvalidOpeningTarget { cell: target });
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Reasons a [`Config`] cannot produce a playable world.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The seed body has fewer cells than every round requires.
    #[error("seed body has {length} cells; at least 3 are required")]
    SeedBodyTooShort {
        /// Number of cells supplied.
        length: usize,
    },
    /// The grid leaves no room for a target beside the seed body.
    #[error("a {side}x{side} grid cannot hold a {body_length}-cell body and a target")]
    GridTooSmall {
        /// Configured side length.
        side: u32,
        /// Number of seed body cells.
        body_length: usize,
    },
    /// A seed cell lies outside the grid.
    #[error("seed cell {cell:?} lies outside the grid")]
    SeedCellOutOfBounds {
        /// Offending cell.
        cell: CellCoord,
    },
    /// The seed body visits a cell twice.
    #[error("seed body visits {cell:?} more than once")]
    SeedBodyOverlaps {
        /// Repeated cell.
        cell: CellCoord,
    },
    /// Two consecutive seed cells do not share an edge.
    #[error("seed cells {from:?} and {to:?} are not adjacent")]
    SeedBodyDisconnected {
        /// Earlier cell of the pair.
        from: CellCoord,
        /// Later cell of the pair.
        to: CellCoord,
    },
    /// The seed heading points straight into the second segment.
    #[error("seed heading {heading} points into the body")]
    HeadingIntoBody {
        /// Configured heading.
        heading: Heading,
    },
    /// The pinned opening target is outside the grid or on the body.
    #[error("opening target {cell:?} is outside the grid or on the body")]
    InvalidOpeningTarget {
        /// Offending cell.
        cell: CellCoord,
    },
}

/// Represents the authoritative Joyful Snake world state.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    config: Config,
    rng: ChaCha8Rng,
    body: VecDeque<CellCoord>,
    target: CellCoord,
    score: u32,
    best_score: u32,
    state: RoundState,
    round_end: Option<RoundEnd>,
    pending_heading: Heading,
    last_applied_heading: Heading,
    speed_tier: SpeedTier,
    round: u32,
    steps: u64,
}

impl World {
    /// Creates a world whose first round is already active.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the configuration cannot host a round.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = Grid::new(config.grid_side);
        let mut rng = ChaCha8Rng::seed_from_u64(config.rng_seed);
        let body: VecDeque<CellCoord> = config.seed_body.iter().copied().collect();
        let target = match config.opening_target {
            Some(cell) => cell,
            None => spawn(&grid, &body, &mut rng).ok_or(ConfigError::GridTooSmall {
                side: config.grid_side,
                body_length: body.len(),
            })?,
        };

        info!(
            side = grid.side(),
            seed = config.rng_seed,
            ?target,
            "world created"
        );

        Ok(Self {
            grid,
            rng,
            body,
            target,
            score: 0,
            best_score: 0,
            state: RoundState::Active,
            round_end: None,
            pending_heading: config.seed_heading,
            last_applied_heading: config.seed_heading,
            speed_tier: SpeedTier::DEFAULT,
            round: 1,
            steps: 0,
            config,
        })
    }

    fn request_heading(&mut self, requested: Heading, out_events: &mut Vec<Event>) {
        let current = self.last_applied_heading;
        let resolved = joyful_snake_system_heading::resolve(current, requested);
        if resolved == requested {
            self.pending_heading = resolved;
            out_events.push(Event::HeadingQueued { heading: resolved });
        } else {
            debug!(%requested, %current, "reversal rejected");
            out_events.push(Event::HeadingRejected { requested, current });
        }
    }

    fn step(&mut self, out_events: &mut Vec<Event>) {
        if self.state == RoundState::Over {
            return;
        }
        let Some(&head) = self.body.front() else {
            return;
        };

        let heading = self.pending_heading;
        let Some(new_head) = self.grid.neighbor(head, heading) else {
            self.finish_round(RoundEnd::Boundary, out_events);
            return;
        };

        let grows = new_head == self.target;
        let blocked = match self.config.collision_rule {
            CollisionRule::Strict => self.grid.is_occupied(&self.body, new_head),
            CollisionRule::VacatingTail => {
                let considered = if grows {
                    self.body.len()
                } else {
                    self.body.len().saturating_sub(1)
                };
                self.grid
                    .is_occupied(self.body.iter().take(considered), new_head)
            }
        };
        if blocked {
            self.finish_round(RoundEnd::SelfCollision, out_events);
            return;
        }

        self.body.push_front(new_head);
        self.steps = self.steps.saturating_add(1);
        self.last_applied_heading = heading;

        if grows {
            self.score = self.score.saturating_add(SCORE_INCREMENT);
            debug!(cell = ?new_head, score = self.score, "target reached");
            out_events.push(Event::BodyAdvanced {
                head: new_head,
                vacated: None,
            });
            out_events.push(Event::TargetReached {
                cell: new_head,
                score: self.score,
            });
            if !self.place_target(out_events) {
                self.finish_round(RoundEnd::BoardFilled, out_events);
            }
        } else {
            let vacated = self.body.pop_back();
            out_events.push(Event::BodyAdvanced {
                head: new_head,
                vacated,
            });
        }
    }

    fn place_target(&mut self, out_events: &mut Vec<Event>) -> bool {
        match spawn(&self.grid, &self.body, &mut self.rng) {
            Some(cell) => {
                self.target = cell;
                out_events.push(Event::TargetSpawned { cell });
                true
            }
            None => false,
        }
    }

    fn finish_round(&mut self, cause: RoundEnd, out_events: &mut Vec<Event>) {
        self.state = RoundState::Over;
        self.round_end = Some(cause);
        self.best_score = self.best_score.max(self.score);
        info!(
            round = self.round,
            ?cause,
            score = self.score,
            best_score = self.best_score,
            steps = self.steps,
            "round over"
        );
        out_events.push(Event::RoundEnded {
            cause,
            score: self.score,
            best_score: self.best_score,
        });
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.body = self.config.seed_body.iter().copied().collect();
        self.pending_heading = self.config.seed_heading;
        self.last_applied_heading = self.config.seed_heading;
        self.score = 0;
        self.steps = 0;
        self.round = self.round.saturating_add(1);
        self.state = RoundState::Active;
        self.round_end = None;

        if !self.place_target(out_events) {
            self.finish_round(RoundEnd::BoardFilled, out_events);
            return;
        }

        info!(round = self.round, target = ?self.target, "round started");
        out_events.push(Event::RoundStarted);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::Step => world.step(out_events),
        Command::RequestHeading { heading } => world.request_heading(heading, out_events),
        Command::SetSpeedTier { tier } => {
            world.speed_tier = tier;
            debug!(tier = tier.get(), "speed tier changed");
            out_events.push(Event::SpeedTierChanged { tier });
        }
        Command::Reset => world.reset(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use joyful_snake_core::{CellCoord, Heading, RoundEnd, RoundState, Snapshot, SpeedTier};

    use super::World;

    /// Captures everything a presentation layer renders for one frame.
    #[must_use]
    pub fn snapshot(world: &World) -> Snapshot {
        Snapshot {
            body: world.body.iter().copied().collect(),
            target: world.target,
            score: world.score,
            best_score: world.best_score,
            state: world.state,
            speed_tier: world.speed_tier,
        }
    }

    /// Iterates the body cells head first.
    pub fn body(world: &World) -> impl Iterator<Item = CellCoord> + '_ {
        world.body.iter().copied()
    }

    /// Number of cells in the body.
    #[must_use]
    pub fn body_length(world: &World) -> usize {
        world.body.len()
    }

    /// Head cell of the body.
    #[must_use]
    pub fn head(world: &World) -> Option<CellCoord> {
        world.body.front().copied()
    }

    /// Cell holding the current target.
    #[must_use]
    pub fn target(world: &World) -> CellCoord {
        world.target
    }

    /// Score of the current round.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Highest score recorded at the end of any round.
    #[must_use]
    pub fn best_score(world: &World) -> u32 {
        world.best_score
    }

    /// Life-cycle state of the current round.
    #[must_use]
    pub fn round_state(world: &World) -> RoundState {
        world.state
    }

    /// Reason the current round ended, if it has.
    #[must_use]
    pub fn round_end(world: &World) -> Option<RoundEnd> {
        world.round_end
    }

    /// One-based index of the current round.
    #[must_use]
    pub fn round(world: &World) -> u32 {
        world.round
    }

    /// Heading the next step will apply.
    #[must_use]
    pub fn pending_heading(world: &World) -> Heading {
        world.pending_heading
    }

    /// Heading applied by the most recent step.
    #[must_use]
    pub fn last_applied_heading(world: &World) -> Heading {
        world.last_applied_heading
    }

    /// Tier currently pacing the steps.
    #[must_use]
    pub fn speed_tier(world: &World) -> SpeedTier {
        world.speed_tier
    }
}
