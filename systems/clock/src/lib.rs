#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure clock system that paces step commands from elapsed wall time.
//!
//! The clock never touches game state. It folds `TimeAdvanced` events into an
//! accumulator and emits a single [`Command::Step`] whenever a full interval
//! has elapsed. At most one step is ever outstanding: a late frame does not
//! produce a burst of catch-up steps, and any change of tier or round
//! cancels the partially elapsed interval before scheduling anew.

use std::time::Duration;

use joyful_snake_core::{Command, Event, SpeedTier};
use tracing::trace;

/// Pure system that converts elapsed time into step commands.
#[derive(Debug)]
pub struct Clock {
    interval: Duration,
    accumulator: Duration,
    armed: bool,
}

impl Clock {
    /// Creates an armed clock pacing steps at the provided tier.
    #[must_use]
    pub const fn new(tier: SpeedTier) -> Self {
        Self {
            interval: tier.interval(),
            accumulator: Duration::ZERO,
            armed: true,
        }
    }

    /// Interval currently separating two steps.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Reports whether the clock schedules steps.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Time remaining until the next step fires, if armed.
    #[must_use]
    pub fn until_next_step(&self) -> Option<Duration> {
        self.armed
            .then(|| self.interval.saturating_sub(self.accumulator))
    }

    /// Consumes world events and emits the steps that became due.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut due = false;

        for event in events {
            match event {
                Event::SpeedTierChanged { tier } => {
                    self.interval = tier.interval();
                    self.accumulator = Duration::ZERO;
                    due = false;
                }
                Event::RoundStarted => {
                    self.armed = true;
                    self.accumulator = Duration::ZERO;
                    due = false;
                }
                Event::RoundEnded { .. } => {
                    self.armed = false;
                    self.accumulator = Duration::ZERO;
                    due = false;
                }
                Event::TimeAdvanced { dt } if self.armed => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                    if self.accumulator >= self.interval {
                        due = true;
                        self.accumulator = self.remainder();
                    }
                }
                _ => {}
            }
        }

        if due {
            trace!(interval_ms = self.interval.as_millis() as u64, "step due");
            out.push(Command::Step);
        }
    }

    fn remainder(&self) -> Duration {
        if self.interval.is_zero() {
            return Duration::ZERO;
        }
        let interval = self.interval.as_nanos();
        let leftover = self.accumulator.as_nanos() % interval;
        Duration::from_nanos(leftover as u64)
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new(SpeedTier::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_drops_whole_intervals() {
        let mut clock = Clock::new(SpeedTier::DEFAULT);
        clock.accumulator = Duration::from_millis(650);
        assert_eq!(clock.remainder(), Duration::from_millis(50));
    }

    #[test]
    fn until_next_step_is_absent_when_disarmed() {
        let mut clock = Clock::default();
        assert_eq!(clock.until_next_step(), Some(Duration::from_millis(200)));
        clock.armed = false;
        assert_eq!(clock.until_next_step(), None);
    }
}
