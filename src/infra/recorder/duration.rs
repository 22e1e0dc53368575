//! Recorder accumulating event durations in memory.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::RecorderConfig;
use crate::core::{EventClock, RecorderState, TimeRecorder};
use crate::infra::queue::BoundedDeque;

/// Aggregate over the retained samples of a [`DurationRecorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencySummary {
    /// Samples retained.
    pub count: usize,
    /// Events recorded since creation, including evicted samples.
    pub total_events: u64,
    /// Shortest retained sample.
    pub min: Duration,
    /// Longest retained sample.
    pub max: Duration,
    /// Mean of retained samples.
    pub mean: Duration,
    /// Sum of retained samples.
    pub total: Duration,
}

/// Stores the duration of every event, optionally keeping only the most
/// recent `max_samples`. Events slower than the configured threshold are
/// logged at warn level.
#[derive(Debug, Default)]
pub struct DurationRecorder {
    clock: EventClock,
    samples: BoundedDeque<Duration>,
    slow_threshold: Option<Duration>,
    total_events: u64,
}

impl DurationRecorder {
    /// Unbounded recorder without a slow threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorder retaining at most `max_samples` samples.
    pub fn with_max_samples(max_samples: usize) -> Self {
        Self {
            samples: BoundedDeque::with_maxlen(Some(max_samples)),
            ..Self::default()
        }
    }

    /// Log events slower than `threshold`.
    #[must_use]
    pub fn with_slow_threshold(mut self, threshold: Duration) -> Self {
        self.slow_threshold = Some(threshold);
        self
    }

    /// Recorder built from configuration.
    pub fn from_config(cfg: &RecorderConfig) -> Self {
        Self {
            samples: BoundedDeque::with_maxlen(cfg.max_samples),
            slow_threshold: cfg.slow_event_threshold(),
            ..Self::default()
        }
    }

    /// Retained samples, oldest first.
    pub fn samples(&self) -> Vec<Duration> {
        self.samples.iter().copied().collect()
    }

    /// Most recent sample.
    pub fn last(&self) -> Option<Duration> {
        self.samples.back().copied()
    }

    /// Events recorded since creation.
    pub const fn total_events(&self) -> u64 {
        self.total_events
    }

    /// Current position in the start/end cycle.
    pub const fn state(&self) -> RecorderState {
        self.clock.state()
    }

    /// Summary of the retained samples, `None` when there are none.
    pub fn summary(&self) -> Option<LatencySummary> {
        let count = self.samples.len();
        let min = self.samples.iter().min().copied()?;
        let max = self.samples.iter().max().copied()?;
        let total: Duration = self.samples.iter().sum();
        let mean_nanos = total.as_nanos() / count as u128;
        Some(LatencySummary {
            count,
            total_events: self.total_events,
            min,
            max,
            mean: Duration::from_nanos(u64::try_from(mean_nanos).unwrap_or(u64::MAX)),
            total,
        })
    }

    /// Drop all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl TimeRecorder for DurationRecorder {
    fn start_event(&mut self) {
        self.clock.start();
    }

    fn end_event(&mut self) {
        let elapsed = self.clock.stop();
        self.total_events += 1;
        if self.slow_threshold.is_some_and(|t| elapsed > t) {
            tracing::warn!(elapsed_us = elapsed.as_micros(), "slow dispatch");
        } else {
            tracing::trace!(elapsed_us = elapsed.as_micros(), "dispatch timed");
        }
        self.samples.push_back(elapsed);
    }
}
