//! Factory building one timed scheduler per request.

use crate::config::SchedulerConfig;
use crate::core::{InstrumentError, TimeRecorder, TimedScheduler};
use crate::infra::DurationRecorder;

/// Produces [`TimedScheduler`]s, calling the recorder factory exactly once
/// per scheduler.
///
/// The recorder factory decides the sharing policy. Returning a fresh
/// recorder each time gives every scheduler its own; returning clones of a
/// [`crate::infra::SharedRecorder`] makes them share one.
///
/// ```rust
/// use dispatch_timing::builders::TimedSchedulerFactory;
/// use dispatch_timing::infra::DurationRecorder;
///
/// let mut factory = TimedSchedulerFactory::new(DurationRecorder::new);
/// let timed = factory.new_scheduler();
/// timed.call_soon(|| Ok(()));
/// timed.run_until_idle();
/// assert_eq!(timed.recorder().total_events(), 1);
/// ```
pub struct TimedSchedulerFactory<F> {
    recorder_factory: F,
    config: SchedulerConfig,
    created: u64,
}

impl<F, R> TimedSchedulerFactory<F>
where
    F: FnMut() -> R,
    R: TimeRecorder + 'static,
{
    /// Factory with default configuration.
    pub fn new(recorder_factory: F) -> Self {
        Self {
            recorder_factory,
            config: SchedulerConfig::default(),
            created: 0,
        }
    }

    /// Factory with validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InstrumentError::InvalidConfig`] if `config` is invalid.
    pub fn with_config(recorder_factory: F, config: SchedulerConfig) -> Result<Self, InstrumentError> {
        config.validate()?;
        Ok(Self {
            recorder_factory,
            config,
            created: 0,
        })
    }

    /// Build a scheduler owning a freshly produced recorder.
    pub fn new_scheduler(&mut self) -> TimedScheduler<R> {
        let recorder = (self.recorder_factory)();
        self.created += 1;
        TimedScheduler::with_capacity(recorder, self.config.ready_capacity)
    }
}

impl<F> TimedSchedulerFactory<F> {
    /// Schedulers built so far.
    pub const fn created(&self) -> u64 {
        self.created
    }

    /// Configuration in use.
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}

/// Factory giving every scheduler its own [`DurationRecorder`] configured
/// from `config.recorder`.
///
/// # Errors
///
/// Returns [`InstrumentError::InvalidConfig`] if `config` is invalid.
pub fn duration_factory(
    config: SchedulerConfig,
) -> Result<TimedSchedulerFactory<impl FnMut() -> DurationRecorder>, InstrumentError> {
    let recorder_cfg = config.recorder.clone();
    TimedSchedulerFactory::with_config(move || DurationRecorder::from_config(&recorder_cfg), config)
}
