//! Double-ended queue decorators.

pub mod bounded;
pub mod intercepted;
pub mod mapped;

pub use bounded::BoundedDeque;
pub use intercepted::{DequeHook, InterceptedDeque, NoHook};
pub use mapped::{Identity, Mapping, MappedDeque};
