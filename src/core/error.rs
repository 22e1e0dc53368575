//! Error types for instrumentation components.

use thiserror::Error;

/// Errors produced while configuring instrumentation components.
#[derive(Debug, Error)]
pub enum InstrumentError {
    /// A component that needs at least one hook was built without any.
    #[error("at least one of '{0}' or '{1}' must be specified")]
    MissingHooks(&'static str, &'static str),
    /// Configuration values failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    /// Configuration could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for work callbacks and hooks; their failures are arbitrary
/// application errors, so anyhow carries them.
pub type AppResult<T> = Result<T, anyhow::Error>;
