//! Time recorder implementations.

pub mod channel;
pub mod duration;
pub mod shared;

pub use channel::ChannelRecorder;
pub use duration::{DurationRecorder, LatencySummary};
pub use shared::SharedRecorder;
