//! Tests for builder modules

use std::cell::Cell;
use std::rc::Rc;

use dispatch_timing::builders::scheduler_factory::duration_factory;
use dispatch_timing::builders::TimedSchedulerFactory;
use dispatch_timing::config::{RecorderConfig, SchedulerConfig};
use dispatch_timing::infra::{DurationRecorder, SharedRecorder};

#[test]
fn test_factory_defaults() {
    let factory = TimedSchedulerFactory::new(DurationRecorder::new);
    assert_eq!(factory.created(), 0);
    assert_eq!(factory.config(), &SchedulerConfig::default());
}

#[test]
fn test_factory_called_once_per_scheduler() {
    let calls = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&calls);
    let mut factory = TimedSchedulerFactory::new(move || {
        counter.set(counter.get() + 1);
        DurationRecorder::new()
    });

    let schedulers: Vec<_> = (0..3).map(|_| factory.new_scheduler()).collect();
    assert_eq!(calls.get(), 3);
    assert_eq!(factory.created(), 3);

    schedulers[1].call_soon(|| Ok(()));
    for s in &schedulers {
        s.run_until_idle();
    }
    let totals: Vec<u64> = schedulers.iter().map(|s| s.recorder().total_events()).collect();
    assert_eq!(totals, vec![0, 1, 0]);
}

#[test]
fn test_factory_with_config_validates() {
    let bad = SchedulerConfig {
        ready_capacity: 0,
        recorder: RecorderConfig {
            max_samples: None,
            slow_event_ms: Some(0),
        },
    };
    assert!(TimedSchedulerFactory::with_config(DurationRecorder::new, bad).is_err());
}

#[test]
fn test_duration_factory_bounds_samples() {
    let cfg = SchedulerConfig::from_json_str(r#"{"recorder": {"max_samples": 2}}"#).unwrap();
    let mut factory = duration_factory(cfg).unwrap();
    let timed = factory.new_scheduler();
    for _ in 0..5 {
        timed.call_soon(|| Ok(()));
    }
    assert_eq!(timed.run_until_idle(), 5);
    assert_eq!(timed.recorder().samples().len(), 2);
    assert_eq!(timed.recorder().total_events(), 5);
}

#[test]
fn test_factory_sharing_one_recorder() {
    let shared = SharedRecorder::new(DurationRecorder::new());
    let handout = shared.clone();
    let mut factory = TimedSchedulerFactory::new(move || handout.clone());
    let a = factory.new_scheduler();
    let b = factory.new_scheduler();
    a.call_soon(|| Ok(()));
    a.call_soon(|| Ok(()));
    b.call_soon(|| Ok(()));
    a.run_until_idle();
    b.run_until_idle();
    assert_eq!(shared.lock().total_events(), 3);
    assert_eq!(shared.sharers(), 4);
}
