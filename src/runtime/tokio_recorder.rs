//! Recorder forwarding event durations to a tokio task.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::core::{EventClock, RecorderState, TimeRecorder};

/// Sends the duration of every event into a tokio unbounded channel so an
/// async task can aggregate or export it. Sending never blocks the
/// scheduler thread.
#[derive(Debug)]
pub struct TokioRecorder {
    clock: EventClock,
    tx: UnboundedSender<Duration>,
}

impl TokioRecorder {
    /// Recorder sending into `tx`.
    pub const fn new(tx: UnboundedSender<Duration>) -> Self {
        Self {
            clock: EventClock::new(),
            tx,
        }
    }

    /// Recorder paired with a fresh channel.
    pub fn channel() -> (Self, UnboundedReceiver<Duration>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Current position in the start/end cycle.
    pub const fn state(&self) -> RecorderState {
        self.clock.state()
    }
}

impl TimeRecorder for TokioRecorder {
    fn start_event(&mut self) {
        self.clock.start();
    }

    fn end_event(&mut self) {
        let elapsed = self.clock.stop();
        if self.tx.send(elapsed).is_err() {
            tracing::trace!("duration sample dropped: receiver closed");
        }
    }
}
