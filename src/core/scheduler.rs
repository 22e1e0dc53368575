//! Single-threaded cooperative scheduler with a pluggable ready-queue.
//!
//! The scheduler owns a ready-queue and a timer heap. Each step moves due
//! timers into the ready-queue and then runs every item that was ready when
//! the step began; work submitted while the step runs waits for the next
//! one. The ready-queue is supplied at construction, which is how
//! instrumentation gets wired in (see [`crate::core::TimedScheduler`]).
//!
//! Handles are `Rc`-based and the scheduler is `!Send`: all submission and
//! dispatch happen on one thread.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AppResult, Handle, ReadyHandle, Schedulable, TimerHandle};
use crate::infra::queue::{BoundedDeque, DequeHook, InterceptedDeque, Mapping, MappedDeque};

/// Deadline used when `now + delay` is not representable.
const FAR_FUTURE: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// Container a [`Scheduler`] keeps ready handles in.
///
/// Pushes always store the raw [`ReadyHandle`]; what comes back out of
/// [`ReadyQueue::pop_ready`] is up to the implementation.
pub trait ReadyQueue {
    /// What dispatch receives for each popped handle.
    type Ready: Schedulable;

    /// Append a handle at the back.
    fn push(&mut self, handle: ReadyHandle);
    /// Pop the next handle for dispatch.
    fn pop_ready(&mut self) -> Option<Self::Ready>;
    /// Look at the next raw handle without popping it.
    fn peek_raw(&self) -> Option<&ReadyHandle>;
    /// Pop the next raw handle, bypassing any transform.
    fn discard_front(&mut self) -> Option<ReadyHandle>;
    /// Number of queued handles.
    fn len(&self) -> usize;
    /// Whether the queue is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReadyQueue for BoundedDeque<ReadyHandle> {
    type Ready = ReadyHandle;

    fn push(&mut self, handle: ReadyHandle) {
        self.push_back(handle);
    }

    fn pop_ready(&mut self) -> Option<ReadyHandle> {
        self.pop_front()
    }

    fn peek_raw(&self) -> Option<&ReadyHandle> {
        self.front()
    }

    fn discard_front(&mut self) -> Option<ReadyHandle> {
        self.pop_front()
    }

    fn len(&self) -> usize {
        Self::len(self)
    }
}

impl<X, M> ReadyQueue for MappedDeque<ReadyHandle, X, M>
where
    X: Schedulable,
    M: Mapping<ReadyHandle, X>,
{
    type Ready = X;

    fn push(&mut self, handle: ReadyHandle) {
        self.push_back(handle);
    }

    fn pop_ready(&mut self) -> Option<X> {
        self.pop_front()
    }

    fn peek_raw(&self) -> Option<&ReadyHandle> {
        self.as_inner().front()
    }

    fn discard_front(&mut self) -> Option<ReadyHandle> {
        self.pop_front_unmapped()
    }

    fn len(&self) -> usize {
        Self::len(self)
    }
}

impl<P: DequeHook, Q: DequeHook> ReadyQueue for InterceptedDeque<ReadyHandle, P, Q> {
    type Ready = ReadyHandle;

    fn push(&mut self, handle: ReadyHandle) {
        self.push_back(handle);
    }

    fn pop_ready(&mut self) -> Option<ReadyHandle> {
        self.pop_front()
    }

    fn peek_raw(&self) -> Option<&ReadyHandle> {
        self.front()
    }

    fn discard_front(&mut self) -> Option<ReadyHandle> {
        self.pop_front()
    }

    fn len(&self) -> usize {
        Self::len(self)
    }
}

/// Counters kept by a scheduler since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchStats {
    /// Handles invoked.
    pub dispatched: u64,
    /// Invoked handles that returned an error.
    pub failed: u64,
    /// Cancelled handles removed without being invoked.
    pub skipped: u64,
}

struct TimerEntry {
    when: Instant,
    seq: u64,
    handle: TimerHandle,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.when == other.when && self.seq == other.seq
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earliest deadline first, then submission order (reversed for max-heap)
        other
            .when
            .cmp(&self.when)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct SchedulerCore<Q> {
    id: Uuid,
    ready: RefCell<Q>,
    timers: RefCell<BinaryHeap<TimerEntry>>,
    timer_seq: Cell<u64>,
    stopping: Cell<bool>,
    stats: Cell<DispatchStats>,
}

/// Cooperative scheduler. Clones share the same queues, so work can capture
/// a clone and submit more work while it runs.
pub struct Scheduler<Q> {
    core: Rc<SchedulerCore<Q>>,
}

impl<Q> Clone for Scheduler<Q> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl Scheduler<BoundedDeque<ReadyHandle>> {
    /// Scheduler with a plain, unbounded ready-queue.
    pub fn new() -> Self {
        Self::with_ready_queue(BoundedDeque::new())
    }
}

impl Default for Scheduler<BoundedDeque<ReadyHandle>> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q: ReadyQueue> Scheduler<Q> {
    /// Scheduler dispatching from `ready`.
    pub fn with_ready_queue(ready: Q) -> Self {
        let id = Uuid::new_v4();
        tracing::debug!(scheduler = %id, "scheduler created");
        Self {
            core: Rc::new(SchedulerCore {
                id,
                ready: RefCell::new(ready),
                timers: RefCell::new(BinaryHeap::new()),
                timer_seq: Cell::new(0),
                stopping: Cell::new(false),
                stats: Cell::new(DispatchStats::default()),
            }),
        }
    }

    /// Instance identifier, used in log events.
    pub fn id(&self) -> Uuid {
        self.core.id
    }

    /// The scheduler's clock.
    pub fn time(&self) -> Instant {
        Instant::now()
    }

    /// Queue `callback` to run on the next step.
    pub fn call_soon<F>(&self, callback: F) -> Handle
    where
        F: Fn() -> AppResult<()> + 'static,
    {
        let handle = Handle::new(callback);
        self.core.ready.borrow_mut().push(handle.clone().into());
        handle
    }

    /// Run `callback` once `delay` has elapsed. Delays too large for the
    /// clock are clamped to roughly thirty years.
    pub fn call_later<F>(&self, delay: Duration, callback: F) -> TimerHandle
    where
        F: Fn() -> AppResult<()> + 'static,
    {
        let now = self.time();
        let when = now
            .checked_add(delay)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        self.call_at(when, callback)
    }

    /// Run `callback` at or after `when`.
    pub fn call_at<F>(&self, when: Instant, callback: F) -> TimerHandle
    where
        F: Fn() -> AppResult<()> + 'static,
    {
        let handle = TimerHandle::new(when, callback);
        let seq = self.core.timer_seq.get();
        self.core.timer_seq.set(seq + 1);
        self.core.timers.borrow_mut().push(TimerEntry {
            when,
            seq,
            handle: handle.clone(),
        });
        handle
    }

    /// Ask a running loop to return after its current step.
    pub fn stop(&self) {
        self.core.stopping.set(true);
    }

    /// Handles waiting in the ready-queue, cancelled ones included.
    pub fn ready_len(&self) -> usize {
        self.core.ready.borrow().len()
    }

    /// Timers not yet moved to the ready-queue, cancelled ones included.
    pub fn pending_timers(&self) -> usize {
        self.core.timers.borrow().len()
    }

    /// Counters since creation.
    pub fn stats(&self) -> DispatchStats {
        self.core.stats.get()
    }

    /// Run one step: promote due timers, then dispatch every handle that is
    /// ready at this point. Returns the number of handles invoked.
    ///
    /// Errors returned by work are logged and counted; panics propagate.
    pub fn run_once(&self) -> usize {
        self.promote_due_timers(self.time());

        let ntodo = self.ready_len();
        let mut ran = 0;
        for _ in 0..ntodo {
            let next = {
                let mut ready = self.core.ready.borrow_mut();
                if ready.peek_raw().is_some_and(|h| h.is_cancelled()) {
                    // Cancelled handles leave without passing through the queue's transform
                    ready.discard_front();
                    self.bump(|s| s.skipped += 1);
                    continue;
                }
                ready.pop_ready()
            };
            let Some(handle) = next else { break };
            self.dispatch(&handle);
            ran += 1;
        }
        ran
    }

    /// Run steps until nothing is ready and no live timer remains, or until
    /// [`Scheduler::stop`] is called. Sleeps while waiting for timers.
    pub fn run_until_idle(&self) -> usize {
        self.run_loop(None)
    }

    /// Like [`Scheduler::run_until_idle`] but also returns once `deadline`
    /// has passed.
    pub fn run_until(&self, deadline: Instant) -> usize {
        self.run_loop(Some(deadline))
    }

    fn run_loop(&self, deadline: Option<Instant>) -> usize {
        self.core.stopping.set(false);
        let mut total = 0;
        loop {
            total += self.run_once();
            if self.core.stopping.replace(false) {
                tracing::debug!(scheduler = %self.core.id, "scheduler stopped");
                break;
            }
            let now = self.time();
            if deadline.is_some_and(|d| now >= d) {
                break;
            }
            if self.ready_len() > 0 {
                continue;
            }
            let Some(next_timer) = self.next_timer_deadline() else {
                break;
            };
            let wake_at = deadline.map_or(next_timer, |d| d.min(next_timer));
            if wake_at > now {
                thread::sleep(wake_at - now);
            }
        }
        total
    }

    fn dispatch(&self, handle: &Q::Ready) {
        let outcome = handle.invoke();
        self.bump(|s| s.dispatched += 1);
        if let Err(err) = outcome {
            self.bump(|s| s.failed += 1);
            tracing::error!(
                scheduler = %self.core.id,
                kind = ?handle.kind(),
                error = %err,
                "dispatched work failed"
            );
        }
    }

    fn promote_due_timers(&self, now: Instant) {
        let mut timers = self.core.timers.borrow_mut();
        while timers.peek().is_some_and(|t| t.when <= now) {
            let Some(entry) = timers.pop() else { break };
            if entry.handle.is_cancelled() {
                self.bump(|s| s.skipped += 1);
                continue;
            }
            self.core.ready.borrow_mut().push(entry.handle.into());
        }
    }

    /// Earliest live timer, dropping cancelled ones from the top of the heap.
    fn next_timer_deadline(&self) -> Option<Instant> {
        let mut timers = self.core.timers.borrow_mut();
        while let Some(top) = timers.peek() {
            if !top.handle.is_cancelled() {
                return Some(top.when);
            }
            timers.pop();
            self.bump(|s| s.skipped += 1);
        }
        None
    }

    fn bump(&self, update: impl FnOnce(&mut DispatchStats)) {
        let mut stats = self.core.stats.get();
        update(&mut stats);
        self.core.stats.set(stats);
    }
}
