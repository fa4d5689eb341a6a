#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame pacing for the session loop.
//!
//! [`FrameClock`] holds every frame to a fixed target duration: it sleeps for
//! the whole milliseconds left in the frame and spins through the remainder.
//! The measured frame length becomes the delta handed to the next tick.

use std::{cell::Cell, time::Duration, time::Instant};

use log::trace;
use thiserror::Error;

/// Frame rate used when the session does not configure one.
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Monotonic time provider driving a [`FrameClock`].
pub trait TimeSource {
    /// Time elapsed since the source's origin.
    fn now(&self) -> Duration;

    /// Blocks for roughly the provided duration.
    fn sleep(&mut self, duration: Duration);
}

/// Wall-clock time source backed by [`Instant`].
#[derive(Clone, Copy, Debug)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl SystemTimeSource {
    /// Creates a source whose origin is the moment of construction.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual time source that never blocks.
///
/// Sleeping advances the clock instantly and every reading advances it by a
/// fixed resolution, so busy-waits terminate.
#[derive(Clone, Debug)]
pub struct SteppedTimeSource {
    now: Cell<Duration>,
    resolution: Duration,
}

impl SteppedTimeSource {
    /// Creates a virtual source starting at zero.
    ///
    /// The resolution must be positive.
    pub fn new(resolution: Duration) -> Result<Self, ClockError> {
        if resolution.is_zero() {
            return Err(ClockError::ZeroResolution);
        }

        Ok(Self {
            now: Cell::new(Duration::ZERO),
            resolution,
        })
    }
}

impl TimeSource for SteppedTimeSource {
    fn now(&self) -> Duration {
        let now = self.now.get();
        self.now.set(now + self.resolution);
        now
    }

    fn sleep(&mut self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }
}

/// Errors raised while configuring a [`FrameClock`] or its time source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ClockError {
    /// The clock cannot pace frames at zero frames per second.
    #[error("target frame rate must be positive")]
    ZeroFrameRate,
    /// A stepped source needs a positive resolution to advance.
    #[error("virtual clock resolution must be positive")]
    ZeroResolution,
}

/// Fixed-rate frame pacer.
#[derive(Debug)]
pub struct FrameClock<T> {
    source: T,
    target_frame: Duration,
    delta: Duration,
}

impl<T: TimeSource> FrameClock<T> {
    /// Creates a clock pacing frames at `target_fps`.
    pub fn new(source: T, target_fps: u32) -> Result<Self, ClockError> {
        if target_fps == 0 {
            return Err(ClockError::ZeroFrameRate);
        }

        Ok(Self {
            source,
            target_frame: Duration::from_secs(1) / target_fps,
            delta: Duration::ZERO,
        })
    }

    /// Current reading of the underlying time source.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.source.now()
    }

    /// Waits out the rest of the frame started at `tick_start` and returns the
    /// measured frame length, which also becomes the new [`FrameClock::delta`].
    ///
    /// Frames that already overran their budget return immediately.
    pub fn update_and_wait(&mut self, tick_start: Duration) -> Duration {
        let elapsed = self.source.now().saturating_sub(tick_start);
        if elapsed < self.target_frame {
            let remaining = self.target_frame - elapsed;
            let whole_millis = Duration::from_millis(remaining.as_millis() as u64);
            if !whole_millis.is_zero() {
                self.source.sleep(whole_millis);
            }
            while self.source.now().saturating_sub(tick_start) < self.target_frame {
                std::hint::spin_loop();
            }
        } else {
            trace!(
                "frame overran its budget by {:?}",
                elapsed - self.target_frame
            );
        }

        self.delta = self.source.now().saturating_sub(tick_start);
        self.delta
    }

    /// Length of the most recently completed frame.
    #[must_use]
    pub const fn delta(&self) -> Duration {
        self.delta
    }

    /// Duration every frame is held to.
    #[must_use]
    pub const fn target_frame(&self) -> Duration {
        self.target_frame
    }

    /// Underlying time source.
    #[must_use]
    pub const fn source(&self) -> &T {
        &self.source
    }
}
