use std::{cell::Cell, time::Duration};

use times_table_system_clock::{
    ClockError, FrameClock, SteppedTimeSource, TimeSource, DEFAULT_TARGET_FPS,
};

/// Virtual source recording every sleep request.
#[derive(Debug, Default)]
struct RecordingSource {
    now: Cell<Duration>,
    sleeps: Vec<Duration>,
}

impl RecordingSource {
    fn starting_at(now: Duration) -> Self {
        Self {
            now: Cell::new(now),
            sleeps: Vec::new(),
        }
    }
}

impl TimeSource for RecordingSource {
    fn now(&self) -> Duration {
        let now = self.now.get();
        self.now.set(now + Duration::from_micros(50));
        now
    }

    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
        self.now.set(self.now.get() + duration);
    }
}

fn stepped(resolution: Duration) -> SteppedTimeSource {
    SteppedTimeSource::new(resolution).expect("positive resolution")
}

#[test]
fn default_rate_targets_sixty_frames_per_second() {
    let clock = FrameClock::new(stepped(Duration::from_micros(1)), DEFAULT_TARGET_FPS)
        .expect("valid frame rate");

    assert_eq!(clock.target_frame(), Duration::from_nanos(16_666_666));
    assert_eq!(clock.delta(), Duration::ZERO);
}

#[test]
fn zero_frame_rate_is_rejected() {
    let error =
        FrameClock::new(stepped(Duration::from_micros(1)), 0).expect_err("zero rate must fail");

    assert_eq!(error, ClockError::ZeroFrameRate);
}

#[test]
fn zero_resolution_virtual_source_is_rejected() {
    let error = SteppedTimeSource::new(Duration::ZERO).expect_err("zero resolution must fail");

    assert_eq!(error, ClockError::ZeroResolution);
}

#[test]
fn smallest_resolution_still_finishes_the_frame() {
    let mut clock = FrameClock::new(stepped(Duration::from_nanos(1)), DEFAULT_TARGET_FPS)
        .expect("valid frame rate");
    let tick_start = clock.now();

    let delta = clock.update_and_wait(tick_start);

    assert!(delta >= clock.target_frame());
    assert!(delta < clock.target_frame() + Duration::from_millis(1));
}

#[test]
fn short_frame_sleeps_whole_milliseconds_then_spins() {
    let mut clock = FrameClock::new(RecordingSource::default(), 60).expect("valid frame rate");
    let tick_start = clock.now();

    let delta = clock.update_and_wait(tick_start);

    assert_eq!(clock.source().sleeps.len(), 1);
    let slept = clock.source().sleeps[0];
    assert_eq!(slept.subsec_nanos() % 1_000_000, 0, "sleep is truncated to ms");
    assert!(slept <= clock.target_frame());
    assert!(delta >= clock.target_frame());
    assert!(delta < clock.target_frame() + Duration::from_millis(1));
    assert_eq!(clock.delta(), delta);
}

#[test]
fn overrunning_frame_returns_immediately() {
    let mut clock = FrameClock::new(RecordingSource::starting_at(Duration::from_millis(25)), 60)
        .expect("valid frame rate");

    let delta = clock.update_and_wait(Duration::ZERO);

    assert!(clock.source().sleeps.is_empty());
    assert!(delta >= Duration::from_millis(25));
    assert!(delta < Duration::from_millis(26));
}

#[test]
fn stepped_source_paces_consecutive_frames() {
    let mut clock =
        FrameClock::new(stepped(Duration::from_micros(10)), 50).expect("valid frame rate");

    for _ in 0..3 {
        let tick_start = clock.now();
        let delta = clock.update_and_wait(tick_start);
        assert!(delta >= Duration::from_millis(20));
        assert!(delta < Duration::from_millis(21));
    }
}
