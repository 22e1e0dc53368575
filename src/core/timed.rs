//! Scheduler whose ready-queue times every dispatched handle.

use std::cell::{Ref, RefCell};
use std::ops::Deref;
use std::rc::Rc;

use super::{Intercepted, Interceptor, ReadyHandle, Scheduler, TimeRecorder};
use crate::infra::queue::{BoundedDeque, MappedDeque};

/// Ready-queue of a [`TimedScheduler`]: raw handles in, intercepted handles
/// out.
pub type TimedReadyQueue = MappedDeque<ReadyHandle, Intercepted<ReadyHandle>, Interceptor>;

/// A [`Scheduler`] bound to one recorder.
///
/// Every handle popped for dispatch is wrapped so that its invocation runs
/// between `start_event` and `end_event` of the recorder. Handles cancelled
/// before dispatch are never wrapped and never timed.
pub struct TimedScheduler<R> {
    scheduler: Scheduler<TimedReadyQueue>,
    recorder: Rc<RefCell<R>>,
}

impl<R: TimeRecorder + 'static> TimedScheduler<R> {
    /// Scheduler timing its dispatches into `recorder`.
    pub fn new(recorder: R) -> Self {
        Self::with_capacity(recorder, 0)
    }

    /// Like [`TimedScheduler::new`], preallocating the ready-queue.
    pub fn with_capacity(recorder: R, ready_capacity: usize) -> Self {
        let recorder = Rc::new(RefCell::new(recorder));
        let ready: TimedReadyQueue = MappedDeque::with_mapping(
            BoundedDeque::with_capacity(ready_capacity, None),
            recorder_interceptor(&recorder),
        );
        let scheduler = Scheduler::with_ready_queue(ready);
        tracing::info!(scheduler = %scheduler.id(), "timed scheduler created");
        Self {
            scheduler,
            recorder,
        }
    }
}

impl<R> TimedScheduler<R> {
    /// The underlying scheduler.
    pub const fn scheduler(&self) -> &Scheduler<TimedReadyQueue> {
        &self.scheduler
    }

    /// Borrow the recorder.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a recorder hook.
    pub fn recorder(&self) -> Ref<'_, R> {
        self.recorder.borrow()
    }
}

impl<R> Deref for TimedScheduler<R> {
    type Target = Scheduler<TimedReadyQueue>;

    fn deref(&self) -> &Self::Target {
        &self.scheduler
    }
}

/// Interceptor running `start_event` before and `end_event` after each
/// invocation.
fn recorder_interceptor<R: TimeRecorder + 'static>(recorder: &Rc<RefCell<R>>) -> Interceptor {
    let start = Rc::clone(recorder);
    let end = Rc::clone(recorder);
    Interceptor::around(
        move || {
            start.borrow_mut().start_event();
            Ok(())
        },
        move || {
            end.borrow_mut().end_event();
            Ok(())
        },
    )
}
