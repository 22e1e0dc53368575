//! Factories producing timed schedulers.

pub mod scheduler_factory;

pub use scheduler_factory::TimedSchedulerFactory;
