//! Frame loop that drives the world with the clock and a scripted player.

use std::{thread, time::Duration};

use anyhow::{Context, Result};
use joyful_snake_core::{Command, Event, Heading, Pace, ParseHeadingError, RoundState, Snapshot};
use joyful_snake_system_clock::Clock;
use joyful_snake_world::{self as world, query, World};
use tracing::{debug, info};

use crate::config::Settings;

/// Headings queued before successive steps; `None` keeps the current heading.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct MoveScript {
    moves: Vec<Option<Heading>>,
    cursor: usize,
}

impl MoveScript {
    /// Parses `U`, `D`, `L`, `R` and `.` characters, ignoring whitespace.
    pub(crate) fn parse(script: &str) -> Result<Self, ParseHeadingError> {
        let moves = script
            .chars()
            .filter(|symbol| !symbol.is_whitespace())
            .map(|symbol| match symbol {
                '.' => Ok(None),
                other => Heading::try_from(other).map(Some),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { moves, cursor: 0 })
    }

    fn next(&mut self) -> Option<Heading> {
        let entry = self.moves.get(self.cursor).copied().flatten();
        self.cursor = self.cursor.saturating_add(1);
        entry
    }

    fn rewind(&mut self) {
        self.cursor = 0;
    }
}

/// Outcome of one played round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RoundReport {
    pub(crate) snapshot: Snapshot,
    pub(crate) pace: Pace,
    pub(crate) steps: u64,
}

/// Owns the world and the systems feeding it.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    clock: Clock,
    script: MoveScript,
    frame: Duration,
    max_steps: u64,
    rounds: u32,
    realtime: bool,
}

impl Session {
    /// Builds a session from resolved settings.
    pub(crate) fn new(settings: Settings) -> Result<Self> {
        let script = MoveScript::parse(&settings.moves).context("invalid moves script")?;
        let world = World::new(settings.world).context("invalid world configuration")?;
        let mut session = Self {
            world,
            clock: Clock::default(),
            script,
            frame: settings.frame,
            max_steps: settings.max_steps,
            rounds: settings.rounds,
            realtime: settings.realtime,
        };
        session.dispatch(vec![Command::SetSpeedTier {
            tier: settings.speed,
        }]);
        Ok(session)
    }

    /// Plays every configured round, handing each report to `on_report` as
    /// soon as the round finishes. Stops at the first error from `on_report`.
    pub(crate) fn run<F>(&mut self, mut on_report: F) -> Result<()>
    where
        F: FnMut(RoundReport) -> Result<()>,
    {
        for round in 0..self.rounds {
            if round > 0 {
                self.script.rewind();
                self.dispatch(vec![Command::Reset]);
            }
            let report = self.play_round();
            info!(
                round = round + 1,
                score = report.snapshot.score,
                best_score = report.snapshot.best_score,
                pace = ?report.pace,
                steps = report.steps,
                "round finished"
            );
            on_report(report)?;
        }
        Ok(())
    }

    fn play_round(&mut self) -> RoundReport {
        let mut steps = 0;
        while query::round_state(&self.world) == RoundState::Active && steps < self.max_steps {
            let dt = self.next_frame();
            if self.realtime {
                thread::sleep(dt);
            }
            steps += self.frame_tick(dt);
        }
        if steps >= self.max_steps {
            debug!(steps, "step limit reached before round ended");
        }
        let snapshot = query::snapshot(&self.world);
        RoundReport {
            pace: snapshot.speed_tier.pace(),
            snapshot,
            steps,
        }
    }

    /// Duration of the next frame. Realtime sessions wake early when the
    /// clock's next step falls inside the configured frame.
    fn next_frame(&self) -> Duration {
        if !self.realtime {
            return self.frame;
        }
        self.clock
            .until_next_step()
            .filter(|wait| !wait.is_zero())
            .map_or(self.frame, |wait| wait.min(self.frame))
    }

    /// Advances wall time by `dt` and returns the number of steps taken.
    fn frame_tick(&mut self, dt: Duration) -> u64 {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);
        let mut steps = 0;

        loop {
            let mut scheduled = Vec::new();
            self.clock.handle(&events, &mut scheduled);
            if scheduled.is_empty() {
                return steps;
            }

            events.clear();
            for command in scheduled {
                if command == Command::Step {
                    steps += 1;
                    if let Some(heading) = self.script.next() {
                        world::apply(
                            &mut self.world,
                            Command::RequestHeading { heading },
                            &mut events,
                        );
                    }
                }
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }

    fn dispatch(&mut self, commands: Vec<Command>) {
        let mut events: Vec<Event> = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
        let mut ignored = Vec::new();
        self.clock.handle(&events, &mut ignored);
    }
}
