#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round lifecycle system that lays out a new round whenever the world asks
//! for a restart, and reports score milestones to the session.

use log::debug;
use times_table_core::{Command, Event, RunState, ScoreMilestone};

/// Tracks round outcomes and schedules round setups.
#[derive(Clone, Debug, Default)]
pub struct Round {
    rounds_started: u32,
    rounds_lost: u32,
}

impl Round {
    /// Creates a new round system with empty counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rounds_started: 0,
            rounds_lost: 0,
        }
    }

    /// Consumes world events and emits the follow-up commands.
    ///
    /// A restart request yields exactly one [`Command::SetupRound`] per batch
    /// of events. `on_milestone` observes every milestone the score crosses.
    pub fn handle<F>(&mut self, events: &[Event], mut on_milestone: F, out: &mut Vec<Command>)
    where
        F: FnMut(ScoreMilestone, i32),
    {
        let mut restart_requested = false;

        for event in events {
            match event {
                Event::RoundStarted { .. } => {
                    self.rounds_started = self.rounds_started.saturating_add(1);
                }
                Event::PlayerCollided { .. } => {
                    self.rounds_lost = self.rounds_lost.saturating_add(1);
                }
                Event::RunStateChanged {
                    to: RunState::Restart,
                    ..
                } => restart_requested = true,
                Event::ScoreMilestoneReached { milestone, score } => {
                    on_milestone(*milestone, *score);
                }
                _ => {}
            }
        }

        if restart_requested {
            debug!("scheduling round setup after restart request");
            out.push(Command::SetupRound);
        }
    }

    /// Number of rounds observed starting.
    #[must_use]
    pub const fn rounds_started(&self) -> u32 {
        self.rounds_started
    }

    /// Number of rounds that ended in a collision.
    #[must_use]
    pub const fn rounds_lost(&self) -> u32 {
        self.rounds_lost
    }
}
