//! Recorder forwarding each event duration over a crossbeam channel.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

use crate::core::{EventClock, RecorderState, TimeRecorder};

/// Sends the duration of every event to a channel, typically drained by a
/// metrics thread. A disconnected receiver is ignored.
#[derive(Debug)]
pub struct ChannelRecorder {
    clock: EventClock,
    tx: Sender<Duration>,
}

impl ChannelRecorder {
    /// Recorder sending into `tx`.
    pub const fn new(tx: Sender<Duration>) -> Self {
        Self {
            clock: EventClock::new(),
            tx,
        }
    }

    /// Recorder paired with a fresh unbounded channel.
    pub fn unbounded() -> (Self, Receiver<Duration>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self::new(tx), rx)
    }

    /// Current position in the start/end cycle.
    pub const fn state(&self) -> RecorderState {
        self.clock.state()
    }
}

impl TimeRecorder for ChannelRecorder {
    fn start_event(&mut self) {
        self.clock.start();
    }

    fn end_event(&mut self) {
        let elapsed = self.clock.stop();
        if self.tx.try_send(elapsed).is_err() {
            tracing::trace!("duration sample dropped: channel full or disconnected");
        }
    }
}
