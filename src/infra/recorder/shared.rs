//! Recorder deliberately shared between scheduler instances.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::core::TimeRecorder;

/// Cloneable handle to one recorder behind a `parking_lot` mutex.
///
/// Hand clones out from a recorder factory to make several schedulers, each
/// possibly on its own thread, record into the same place. The alternation
/// invariant then spans every sharer: two schedulers dispatching at the same
/// time trip it.
#[derive(Debug, Default)]
pub struct SharedRecorder<R> {
    inner: Arc<Mutex<R>>,
}

impl<R> Clone for SharedRecorder<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<R> SharedRecorder<R> {
    /// Share `recorder`.
    pub fn new(recorder: R) -> Self {
        Self {
            inner: Arc::new(Mutex::new(recorder)),
        }
    }

    /// Lock the shared recorder.
    pub fn lock(&self) -> MutexGuard<'_, R> {
        self.inner.lock()
    }

    /// Number of handles to this recorder.
    pub fn sharers(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<R: TimeRecorder> TimeRecorder for SharedRecorder<R> {
    fn start_event(&mut self) {
        self.inner.lock().start_event();
    }

    fn end_event(&mut self) {
        self.inner.lock().end_event();
    }
}
