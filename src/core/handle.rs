//! Schedulable work handles and the capability interface wrappers delegate to.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::AppResult;

/// Work submitted to a scheduler. Callable more than once; the scheduler
/// itself invokes each handle at most once.
pub type Callback = Rc<dyn Fn() -> AppResult<()>>;

/// Category of a handle. Fixed at creation and preserved by every wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleKind {
    /// Ready-to-run callback.
    Plain,
    /// Callback scheduled for a point in time.
    Timer,
}

/// Capability interface shared by handles and anything wrapping them.
pub trait Schedulable {
    /// Run the underlying work and return its outcome.
    fn invoke(&self) -> AppResult<()>;
    /// Cancel the handle. Cancelled handles are skipped by the scheduler.
    fn cancel(&self);
    /// Whether [`Schedulable::cancel`] has been called.
    fn is_cancelled(&self) -> bool;
    /// Category of the handle.
    fn kind(&self) -> HandleKind;
    /// Scheduled time for timer handles.
    fn when(&self) -> Option<Instant> {
        None
    }
}

struct HandleState {
    callback: RefCell<Option<Callback>>,
    cancelled: Cell<bool>,
}

/// Plain handle: one unit of deferred work.
///
/// Clones share cancellation state, so the submitter can keep a clone and
/// cancel the copy sitting in the ready-queue.
#[derive(Clone)]
pub struct Handle {
    state: Rc<HandleState>,
}

impl Handle {
    /// Create a handle from a closure.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn() -> AppResult<()> + 'static,
    {
        Self::from_callback(Rc::new(callback))
    }

    /// Create a handle from an already shared callback.
    pub fn from_callback(callback: Callback) -> Self {
        Self {
            state: Rc::new(HandleState {
                callback: RefCell::new(Some(callback)),
                cancelled: Cell::new(false),
            }),
        }
    }
}

impl Schedulable for Handle {
    fn invoke(&self) -> AppResult<()> {
        // Cloned out of the cell so the callback may cancel its own handle.
        let callback = self.state.callback.borrow().clone();
        callback.map_or(Ok(()), |callback| callback())
    }

    fn cancel(&self) {
        if !self.state.cancelled.replace(true) {
            self.state.callback.borrow_mut().take();
        }
    }

    fn is_cancelled(&self) -> bool {
        self.state.cancelled.get()
    }

    fn kind(&self) -> HandleKind {
        HandleKind::Plain
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Eq for Handle {}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Handle scheduled to become ready at `when`.
#[derive(Clone, PartialEq, Eq)]
pub struct TimerHandle {
    handle: Handle,
    when: Instant,
}

impl TimerHandle {
    /// Create a timer handle from a closure.
    pub fn new<F>(when: Instant, callback: F) -> Self
    where
        F: Fn() -> AppResult<()> + 'static,
    {
        Self {
            handle: Handle::new(callback),
            when,
        }
    }

    /// Create a timer handle from an already shared callback.
    pub fn from_callback(when: Instant, callback: Callback) -> Self {
        Self {
            handle: Handle::from_callback(callback),
            when,
        }
    }

    /// Instant at which the timer becomes ready.
    pub const fn deadline(&self) -> Instant {
        self.when
    }
}

impl Schedulable for TimerHandle {
    fn invoke(&self) -> AppResult<()> {
        self.handle.invoke()
    }

    fn cancel(&self) {
        self.handle.cancel();
    }

    fn is_cancelled(&self) -> bool {
        self.handle.is_cancelled()
    }

    fn kind(&self) -> HandleKind {
        HandleKind::Timer
    }

    fn when(&self) -> Option<Instant> {
        Some(self.when)
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("when", &self.when)
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}

/// Element type of a scheduler ready-queue: either category of handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyHandle {
    /// Submitted with `call_soon`.
    Plain(Handle),
    /// A timer whose deadline has passed.
    Timer(TimerHandle),
}

impl From<Handle> for ReadyHandle {
    fn from(handle: Handle) -> Self {
        Self::Plain(handle)
    }
}

impl From<TimerHandle> for ReadyHandle {
    fn from(handle: TimerHandle) -> Self {
        Self::Timer(handle)
    }
}

impl Schedulable for ReadyHandle {
    fn invoke(&self) -> AppResult<()> {
        match self {
            Self::Plain(h) => h.invoke(),
            Self::Timer(h) => h.invoke(),
        }
    }

    fn cancel(&self) {
        match self {
            Self::Plain(h) => h.cancel(),
            Self::Timer(h) => h.cancel(),
        }
    }

    fn is_cancelled(&self) -> bool {
        match self {
            Self::Plain(h) => h.is_cancelled(),
            Self::Timer(h) => h.is_cancelled(),
        }
    }

    fn kind(&self) -> HandleKind {
        match self {
            Self::Plain(h) => h.kind(),
            Self::Timer(h) => h.kind(),
        }
    }

    fn when(&self) -> Option<Instant> {
        match self {
            Self::Plain(h) => h.when(),
            Self::Timer(h) => h.when(),
        }
    }
}
