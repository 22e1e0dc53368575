//! Queue decorators and time recorder implementations.

pub mod queue;
pub mod recorder;

pub use queue::{BoundedDeque, InterceptedDeque, MappedDeque};
pub use recorder::{ChannelRecorder, DurationRecorder, SharedRecorder};
