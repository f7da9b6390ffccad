//! Tests for error types

use prometheus_deferred_loader::core::LoaderError;

#[test]
fn test_malformed_locator_error() {
    let err = LoaderError::malformed("nope", "relative URL without a base");
    assert_eq!(
        format!("{}", err),
        "malformed locator `nope`: relative URL without a base"
    );
}

#[test]
fn test_attach_failed_error() {
    let err = LoaderError::attach_failed("https://cdn.example.com/a.js", "404");
    assert_eq!(
        format!("{}", err),
        "failed to attach `https://cdn.example.com/a.js`: 404"
    );
}

#[test]
fn test_invalid_config_error() {
    let err = LoaderError::InvalidConfig("idle_fallback_ms must be greater than 0".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid config: idle_fallback_ms must be greater than 0"
    );
}
