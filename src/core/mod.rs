//! Handles, interception, recorders, and the schedulers built on them.

pub mod error;
pub mod handle;
pub mod intercept;
pub mod recorder;
pub mod scheduler;
pub mod timed;

pub use error::{AppResult, InstrumentError};
pub use handle::{Callback, Handle, HandleKind, ReadyHandle, Schedulable, TimerHandle};
pub use intercept::{intercept, Hook, InterceptMode, Intercepted, Interceptor};
pub use recorder::{EventClock, RecorderState, TimeRecorder};
pub use scheduler::{DispatchStats, ReadyQueue, Scheduler};
pub use timed::{TimedReadyQueue, TimedScheduler};
