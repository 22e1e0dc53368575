//! Tests for error types

use dispatch_timing::core::{Handle, InstrumentError, Interceptor};
use dispatch_timing::infra::queue::{BoundedDeque, InterceptedDeque, NoHook};

#[test]
fn test_missing_hooks_error() {
    let err = InstrumentError::MissingHooks("pre_run", "post_run");
    assert_eq!(
        format!("{}", err),
        "at least one of 'pre_run' or 'post_run' must be specified"
    );
}

#[test]
fn test_invalid_config_error() {
    let err = InstrumentError::InvalidConfig("max_samples must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid config: max_samples must be greater than 0"
    );
}

#[test]
fn test_config_parse_error() {
    let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
    let err: InstrumentError = json_err.into();
    assert!(format!("{}", err).starts_with("config parse error:"));
}

#[test]
fn test_interceptor_without_hooks_is_rejected() {
    let err = Interceptor::new(None, None).unwrap_err();
    assert!(matches!(err, InstrumentError::MissingHooks("pre_run", "post_run")));
}

#[test]
fn test_deque_without_hooks_is_rejected() {
    let result = InterceptedDeque::new(BoundedDeque::<Handle>::new(), NoHook, NoHook);
    assert!(matches!(
        result,
        Err(InstrumentError::MissingHooks("push_hook", "pop_hook"))
    ));
}
