//! Time recorder capability and its alternation invariant.

use std::time::{Duration, Instant};

/// Marks the start and end of one timed event.
///
/// Calls strictly alternate starting with [`TimeRecorder::start_event`].
/// Calling either out of order is a programming error and implementations
/// panic.
pub trait TimeRecorder {
    /// Begin an event.
    fn start_event(&mut self);
    /// End the event in progress.
    fn end_event(&mut self);
}

/// Where a recorder is in its start/end cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// No event in progress.
    Idle,
    /// `start_event` called, `end_event` pending.
    InEvent,
}

/// Start timestamp of the event in progress, enforcing alternation.
#[derive(Debug, Default)]
pub struct EventClock {
    started: Option<Instant>,
}

impl EventClock {
    /// Idle clock.
    pub const fn new() -> Self {
        Self { started: None }
    }

    /// Record the start of an event.
    ///
    /// # Panics
    ///
    /// Panics if an event is already in progress.
    pub fn start(&mut self) {
        assert!(
            self.started.is_none(),
            "start_event called while an event is in progress"
        );
        self.started = Some(Instant::now());
    }

    /// Finish the event in progress and return its duration.
    ///
    /// # Panics
    ///
    /// Panics if no event is in progress.
    pub fn stop(&mut self) -> Duration {
        match self.started.take() {
            Some(started) => started.elapsed(),
            None => panic!("end_event called with no event in progress"),
        }
    }

    /// Current state.
    pub const fn state(&self) -> RecorderState {
        if self.started.is_some() {
            RecorderState::InEvent
        } else {
            RecorderState::Idle
        }
    }
}
