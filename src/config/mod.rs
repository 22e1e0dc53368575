//! Configuration models for timed schedulers and recorders.

pub mod scheduler;

pub use scheduler::{RecorderConfig, SchedulerConfig};
