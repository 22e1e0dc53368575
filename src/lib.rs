//! # Dispatch Timing
//!
//! Instrumentation for a single-threaded cooperative scheduler: measure how
//! long each dispatched callback takes, without touching the callbacks.
//!
//! The pieces compose bottom-up:
//!
//! - **Interception**: [`crate::core::Interceptor`] wraps a schedulable handle so a
//!   pre-hook runs before its callback and a post-hook after it. The post-hook
//!   runs even when the callback fails or panics; hook failures never reach
//!   the scheduler.
//! - **Deque decorators**: [`infra::InterceptedDeque`] fires hooks on push and
//!   pop, [`infra::MappedDeque`] transforms items lazily on the way out.
//! - **Timed scheduling**: [`crate::core::TimedScheduler`] installs a mapped
//!   ready-queue whose mapping intercepts each handle with the start/end calls
//!   of a [`crate::core::TimeRecorder`]. Cancelled handles are discarded unmapped and
//!   never timed.
//! - **Factory**: [`builders::TimedSchedulerFactory`] builds schedulers,
//!   calling its recorder factory exactly once per scheduler.
//!
//! ```rust
//! use dispatch_timing::core::{Schedulable, TimedScheduler};
//! use dispatch_timing::infra::DurationRecorder;
//!
//! let timed = TimedScheduler::new(DurationRecorder::new());
//! timed.call_soon(|| Ok(()));
//! let cancelled = timed.call_soon(|| Ok(()));
//! cancelled.cancel();
//! timed.run_until_idle();
//!
//! assert_eq!(timed.recorder().total_events(), 1);
//! ```
//!
//! Schedulers are `!Send`; everything runs on the thread that owns them.
//! Use [`infra::SharedRecorder`], [`infra::ChannelRecorder`] or
//! `runtime::TokioRecorder` to get measurements off that thread.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Handles, interception, recorders, and schedulers.
pub mod core;
/// Configuration models for schedulers and recorders.
pub mod config;
/// Factories constructing timed schedulers from configuration.
pub mod builders;
/// Deque decorators and recorder implementations.
pub mod infra;
/// Async runtime adapters.
pub mod runtime;
/// Shared utilities.
pub mod util;

pub use builders::TimedSchedulerFactory;
pub use crate::core::{
    AppResult, Handle, InstrumentError, Interceptor, Schedulable, Scheduler, TimeRecorder,
    TimedScheduler, TimerHandle,
};
