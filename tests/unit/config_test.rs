//! Tests for configuration validation

use dispatch_timing::config::{RecorderConfig, SchedulerConfig};
use dispatch_timing::core::InstrumentError;

#[test]
fn test_default_config_is_valid() {
    let cfg = SchedulerConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.ready_capacity, 0);
    assert_eq!(cfg.recorder.max_samples, None);
}

#[test]
fn test_recorder_config_invalid_max_samples() {
    let invalid = RecorderConfig {
        max_samples: Some(0),
        slow_event_ms: None,
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_recorder_config_invalid_slow_threshold() {
    let invalid = RecorderConfig {
        max_samples: None,
        slow_event_ms: Some(0),
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_nested_error_names_section() {
    let cfg = SchedulerConfig {
        ready_capacity: 8,
        recorder: RecorderConfig {
            max_samples: Some(0),
            slow_event_ms: None,
        },
    };
    let err = cfg.validate().unwrap_err();
    assert!(err.to_string().contains("recorder: "));
}

#[test]
fn test_from_json_str() {
    let cfg = SchedulerConfig::from_json_str(
        r#"{"ready_capacity": 64, "recorder": {"max_samples": 500, "slow_event_ms": 20}}"#,
    )
    .unwrap();
    assert_eq!(cfg.ready_capacity, 64);
    assert_eq!(cfg.recorder.max_samples, Some(500));
    assert_eq!(cfg.recorder.slow_event_ms, Some(20));
}

#[test]
fn test_from_json_str_partial_uses_defaults() {
    let cfg = SchedulerConfig::from_json_str(r#"{"recorder": {"slow_event_ms": 5}}"#).unwrap();
    assert_eq!(cfg.ready_capacity, 0);
    assert_eq!(cfg.recorder.max_samples, None);
}

#[test]
fn test_from_json_str_malformed() {
    let err = SchedulerConfig::from_json_str("{ready_capacity").unwrap_err();
    assert!(matches!(err, InstrumentError::Config(_)));
}

#[test]
fn test_from_json_str_invalid_values() {
    let err = SchedulerConfig::from_json_str(r#"{"recorder": {"max_samples": 0}}"#).unwrap_err();
    assert!(matches!(err, InstrumentError::InvalidConfig(_)));
}

#[test]
fn test_config_serde_roundtrip() {
    let cfg = SchedulerConfig {
        ready_capacity: 32,
        recorder: RecorderConfig {
            max_samples: Some(10),
            slow_event_ms: Some(3),
        },
    };
    let json = serde_json::to_string(&cfg).unwrap();
    assert_eq!(SchedulerConfig::from_json_str(&json).unwrap(), cfg);
}
