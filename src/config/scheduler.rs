//! Timed scheduler and recorder configuration structures.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::InstrumentError;

/// Environment variable for [`SchedulerConfig::ready_capacity`].
pub const ENV_READY_CAPACITY: &str = "DISPATCH_TIMING_READY_CAPACITY";
/// Environment variable for [`RecorderConfig::max_samples`].
pub const ENV_MAX_SAMPLES: &str = "DISPATCH_TIMING_MAX_SAMPLES";
/// Environment variable for [`RecorderConfig::slow_event_ms`].
pub const ENV_SLOW_EVENT_MS: &str = "DISPATCH_TIMING_SLOW_EVENT_MS";

/// Duration recorder configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecorderConfig {
    /// Keep only the most recent samples; unbounded when absent.
    pub max_samples: Option<usize>,
    /// Events longer than this many milliseconds are logged as slow.
    pub slow_event_ms: Option<u64>,
}

/// Root configuration for a timed scheduler factory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Ready-queue slots preallocated per scheduler.
    pub ready_capacity: usize,
    /// Settings for recorders created by the factory.
    pub recorder: RecorderConfig,
}

impl RecorderConfig {
    /// Validate recorder configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`InstrumentError::InvalidConfig`] for a zero sample bound or
    /// a zero slow threshold.
    pub fn validate(&self) -> Result<(), InstrumentError> {
        if self.max_samples == Some(0) {
            return Err(InstrumentError::InvalidConfig(
                "max_samples must be greater than 0".into(),
            ));
        }
        if self.slow_event_ms == Some(0) {
            return Err(InstrumentError::InvalidConfig(
                "slow_event_ms must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// Slow-event threshold as a duration.
    pub fn slow_event_threshold(&self) -> Option<Duration> {
        self.slow_event_ms.map(Duration::from_millis)
    }
}

impl SchedulerConfig {
    /// Validate all nested configuration.
    ///
    /// # Errors
    ///
    /// Returns [`InstrumentError::InvalidConfig`] naming the bad field.
    pub fn validate(&self) -> Result<(), InstrumentError> {
        self.recorder
            .validate()
            .map_err(|e| InstrumentError::InvalidConfig(format!("recorder: {e}")))
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Returns [`InstrumentError::Config`] on malformed JSON and
    /// [`InstrumentError::InvalidConfig`] on invalid values.
    pub fn from_json_str(input: &str) -> Result<Self, InstrumentError> {
        let cfg: Self = serde_json::from_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read configuration from the process environment, loading a `.env`
    /// file first if one exists. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`InstrumentError::InvalidConfig`] when a variable does not
    /// parse or the result fails validation.
    pub fn from_env() -> Result<Self, InstrumentError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                return Err(InstrumentError::InvalidConfig(format!(".env: {err}")));
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`SchedulerConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InstrumentError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(capacity) = parse_var(&lookup, ENV_READY_CAPACITY)? {
            cfg.ready_capacity = capacity;
        }
        cfg.recorder.max_samples = parse_var(&lookup, ENV_MAX_SAMPLES)?;
        cfg.recorder.slow_event_ms = parse_var(&lookup, ENV_SLOW_EVENT_MS)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>, InstrumentError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|e| InstrumentError::InvalidConfig(format!("{key}: {e}")))
        })
        .transpose()
}
