//! Tests for utility functions

use dispatch_timing::util::{init_test_tracing, init_tracing, DEFAULT_DIRECTIVE};

#[test]
fn test_init_tracing_is_idempotent() {
    init_test_tracing();
    init_tracing();
    init_tracing();
    tracing::info!("still logging");
}

#[test]
fn test_default_directive_targets_crate() {
    assert!(DEFAULT_DIRECTIVE.starts_with("dispatch_timing"));
}
