//! Async runtime adapters.

#[cfg(feature = "tokio-runtime")]
pub mod tokio_recorder;

#[cfg(feature = "tokio-runtime")]
pub use tokio_recorder::TokioRecorder;
