#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Joyful Snake engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams and respond
//! exclusively with new command batches.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Points awarded each time the head reaches the target.
pub const SCORE_INCREMENT: u32 = 10;

/// Minimum number of cells the body ever contains.
pub const MIN_BODY_LENGTH: usize = 3;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of wall time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Performs exactly one discrete movement step.
    Step,
    /// Buffers a heading for the next step, subject to the reversal rule.
    RequestHeading {
        /// Heading requested by the player.
        heading: Heading,
    },
    /// Selects the speed tier that paces future steps.
    SetSpeedTier {
        /// Tier to activate.
        tier: SpeedTier,
    },
    /// Begins a new round from the seed layout.
    Reset,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that wall time advanced.
    TimeAdvanced {
        /// Duration that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a requested heading was buffered for the next step.
    HeadingQueued {
        /// Heading that the next step will apply.
        heading: Heading,
    },
    /// Reports that a requested heading reversed the last applied heading.
    HeadingRejected {
        /// Heading the player asked for.
        requested: Heading,
        /// Heading applied by the previous step.
        current: Heading,
    },
    /// Confirms that the body moved one cell.
    BodyAdvanced {
        /// Cell the head occupies after the step.
        head: CellCoord,
        /// Tail cell released by the step, absent when the body grew.
        vacated: Option<CellCoord>,
    },
    /// Announces that the head reached the target cell.
    TargetReached {
        /// Cell that held the target.
        cell: CellCoord,
        /// Score after the increment.
        score: u32,
    },
    /// Announces the placement of a new target.
    TargetSpawned {
        /// Cell holding the new target.
        cell: CellCoord,
    },
    /// Announces that the round ended.
    RoundEnded {
        /// Reason the round terminated.
        cause: RoundEnd,
        /// Final score of the round.
        score: u32,
        /// Best score after folding in the final score.
        best_score: u32,
    },
    /// Announces that a fresh round is active.
    RoundStarted,
    /// Announces that a new speed tier is active.
    SpeedTierChanged {
        /// Tier that became active.
        tier: SpeedTier,
    },
}

/// Life-cycle state of the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundState {
    /// The round accepts steps.
    Active,
    /// The round terminated; body, target and score are frozen.
    Over,
}

/// Reasons a round may terminate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundEnd {
    /// The head left the grid.
    Boundary,
    /// The head entered a cell already occupied by the body.
    SelfCollision,
    /// The body covers every cell, so no target can be placed.
    BoardFilled,
}

/// Orthogonal travel directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Heading {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Heading {
    /// All headings in declaration order.
    pub const ALL: [Heading; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Returns the heading pointing the exact opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Unit displacement expressed as `(column, row)` deltas.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        };
        f.write_str(name)
    }
}

/// Error returned when text does not name a heading.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("'{0}' is not a heading; expected up, down, left or right")]
pub struct ParseHeadingError(pub String);

impl FromStr for Heading {
    type Err = ParseHeadingError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "u" | "up" => Ok(Self::Up),
            "d" | "down" => Ok(Self::Down),
            "l" | "left" => Ok(Self::Left),
            "r" | "right" => Ok(Self::Right),
            _ => Err(ParseHeadingError(value.to_owned())),
        }
    }
}

impl TryFrom<char> for Heading {
    type Error = ParseHeadingError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase() {
            'u' => Ok(Self::Up),
            'd' => Ok(Self::Down),
            'l' => Ok(Self::Left),
            'r' => Ok(Self::Right),
            other => Err(ParseHeadingError(other.to_string())),
        }
    }
}

/// Ordinal selecting the step interval from a fixed table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct SpeedTier(u8);

/// Step interval per tier in milliseconds; slower tiers wait longer.
const TIER_INTERVALS_MS: [u64; 5] = [400, 300, 200, 140, 80];

impl SpeedTier {
    /// Slowest selectable tier.
    pub const SLOWEST: SpeedTier = SpeedTier(1);
    /// Fastest selectable tier.
    pub const FASTEST: SpeedTier = SpeedTier(5);
    /// Tier active before any selection is made.
    pub const DEFAULT: SpeedTier = SpeedTier(3);

    /// Validates the provided ordinal.
    ///
    /// # Errors
    ///
    /// Returns [`SpeedTierError::OutOfRange`] when `value` lies outside `1..=5`.
    pub const fn new(value: u8) -> Result<Self, SpeedTierError> {
        if value >= Self::SLOWEST.0 && value <= Self::FASTEST.0 {
            Ok(Self(value))
        } else {
            Err(SpeedTierError::OutOfRange(value))
        }
    }

    /// Retrieves the ordinal value.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Resolves the wall-time interval between two steps.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(TIER_INTERVALS_MS[(self.0 - 1) as usize])
    }

    /// Coarse label describing how the tier feels to a player.
    #[must_use]
    pub const fn pace(&self) -> Pace {
        match self.0 {
            1 => Pace::Leisurely,
            5 => Pace::Sprint,
            _ => Pace::Normal,
        }
    }
}

impl Default for SpeedTier {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for SpeedTier {
    type Error = SpeedTierError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SpeedTier> for u8 {
    fn from(tier: SpeedTier) -> Self {
        tier.0
    }
}

/// Errors raised when selecting a speed tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SpeedTierError {
    /// The ordinal lies outside the supported range.
    #[error("speed tier {0} is outside the supported range 1..=5")]
    OutOfRange(u8),
}

/// Player-facing description of a speed tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pace {
    /// The slowest tier.
    Leisurely,
    /// Any intermediate tier.
    Normal,
    /// The fastest tier.
    Sprint,
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Cell one unit away along `heading`, or `None` when that would cross zero.
    ///
    /// The upper grid edge is not checked here; callers pair this with a
    /// bounds query against the grid that owns the cell.
    #[must_use]
    pub fn offset(self, heading: Heading) -> Option<CellCoord> {
        let (dc, dr) = heading.delta();
        let column = self.column.checked_add_signed(dc)?;
        let row = self.row.checked_add_signed(dr)?;
        Some(Self { column, row })
    }

    /// Reports whether `other` shares an edge with this cell.
    #[must_use]
    pub fn is_adjacent(self, other: CellCoord) -> bool {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row) == 1
    }
}

/// Read-only snapshot of everything a presentation layer renders each frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Body cells ordered head first.
    pub body: Vec<CellCoord>,
    /// Cell holding the current target.
    pub target: CellCoord,
    /// Score of the current round.
    pub score: u32,
    /// Highest score observed at the end of any round.
    pub best_score: u32,
    /// Life-cycle state of the current round.
    pub state: RoundState,
    /// Tier currently pacing the steps.
    pub speed_tier: SpeedTier,
}

impl Snapshot {
    /// Head cell of the body.
    #[must_use]
    pub fn head(&self) -> Option<CellCoord> {
        self.body.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, Heading, Pace, RoundState, Snapshot, SpeedTier, SpeedTierError};
    use std::time::Duration;

    #[test]
    fn opposites_pair_up() {
        for heading in Heading::ALL {
            assert_ne!(heading, heading.opposite());
            assert_eq!(heading, heading.opposite().opposite());
        }
        assert_eq!(Heading::Up.opposite(), Heading::Down);
        assert_eq!(Heading::Left.opposite(), Heading::Right);
    }

    #[test]
    fn offset_stops_at_zero() {
        let origin = CellCoord::new(0, 0);
        assert_eq!(origin.offset(Heading::Up), None);
        assert_eq!(origin.offset(Heading::Left), None);
        assert_eq!(origin.offset(Heading::Right), Some(CellCoord::new(1, 0)));
        assert_eq!(origin.offset(Heading::Down), Some(CellCoord::new(0, 1)));
    }

    #[test]
    fn tier_intervals_shrink_as_tiers_rise() {
        let intervals: Vec<Duration> = (1..=5)
            .map(|value| SpeedTier::new(value).expect("valid tier").interval())
            .collect();
        assert_eq!(intervals[0], Duration::from_millis(400));
        assert_eq!(intervals[2], Duration::from_millis(200));
        assert_eq!(intervals[4], Duration::from_millis(80));
        assert!(intervals.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn tiers_outside_range_are_rejected() {
        assert_eq!(SpeedTier::new(0), Err(SpeedTierError::OutOfRange(0)));
        assert_eq!(SpeedTier::new(6), Err(SpeedTierError::OutOfRange(6)));
        assert_eq!(SpeedTier::default().get(), 3);
    }

    #[test]
    fn pace_labels_follow_tier_extremes() {
        assert_eq!(SpeedTier::SLOWEST.pace(), Pace::Leisurely);
        assert_eq!(SpeedTier::DEFAULT.pace(), Pace::Normal);
        assert_eq!(SpeedTier::FASTEST.pace(), Pace::Sprint);
    }

    #[test]
    fn headings_parse_from_names_and_letters() {
        assert_eq!("Up".parse::<Heading>(), Ok(Heading::Up));
        assert_eq!(" left ".parse::<Heading>(), Ok(Heading::Left));
        assert_eq!(Heading::try_from('R'), Ok(Heading::Right));
        assert!("north".parse::<Heading>().is_err());
        assert!(Heading::try_from('x').is_err());
    }

    #[test]
    fn snapshot_round_trips_through_bincode() {
        let snapshot = Snapshot {
            body: vec![CellCoord::new(7, 6), CellCoord::new(7, 7), CellCoord::new(7, 8)],
            target: CellCoord::new(5, 5),
            score: 20,
            best_score: 40,
            state: RoundState::Active,
            speed_tier: SpeedTier::FASTEST,
        };
        let bytes = bincode::serialize(&snapshot).expect("serialize");
        let restored: Snapshot = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, snapshot);
        assert_eq!(restored.head(), Some(CellCoord::new(7, 6)));
    }
}
