//! Tests for configuration validation

use prometheus_deferred_loader::config::{LoaderConfig, ResourceEntry, TriggerPolicy};
use prometheus_deferred_loader::core::{GestureKind, RootMargin};

fn entry(locator: &str, trigger: TriggerPolicy) -> ResourceEntry {
    ResourceEntry {
        locator: locator.to_string(),
        id: None,
        asynchronous: true,
        deferred: false,
        category: None,
        related_origins: Vec::new(),
        trigger,
    }
}

#[test]
fn test_default_config_is_valid() {
    let config = LoaderConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.root_margin(), Ok(RootMargin::Pixels(200)));
    assert_eq!(config.idle_fallback().as_millis(), 2_000);
    assert_eq!(config.interaction_events, GestureKind::ALL.to_vec());
    assert_eq!(config.audit_capacity, 1_024);
}

#[test]
fn test_config_invalid_audit_capacity() {
    let config = LoaderConfig {
        audit_capacity: 0,
        ..LoaderConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.contains("audit_capacity"));
}

#[test]
fn test_config_invalid_idle_fallback() {
    let config = LoaderConfig {
        idle_fallback_ms: 0,
        ..LoaderConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_invalid_root_margin() {
    let config = LoaderConfig {
        visibility_root_margin: "lots".to_string(),
        ..LoaderConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_empty_interaction_events() {
    let config = LoaderConfig {
        interaction_events: Vec::new(),
        ..LoaderConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_rejects_malformed_resource() {
    let config = LoaderConfig {
        resources: vec![entry("not a url", TriggerPolicy::Idle)],
        ..LoaderConfig::default()
    };
    let err = config.validate().unwrap_err();
    assert!(err.contains("resource #0"));
}

#[test]
fn test_config_rejects_empty_visible_anchor() {
    let config = LoaderConfig {
        resources: vec![entry(
            "https://widget.example.com/chat.js",
            TriggerPolicy::Visible {
                anchor: " ".to_string(),
            },
        )],
        ..LoaderConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "idle_fallback_ms": 1500,
        "visibility_root_margin": "10%",
        "interaction_events": ["pointerdown", "scroll"],
        "audit_capacity": 64,
        "resources": [
            { "locator": "https://cdn.example.com/a.js", "trigger": "idle" },
            { "locator": "https://cdn.example.com/b.js",
              "trigger": { "visible": { "anchor": "footer" } } }
        ]
    }"#;

    let config = LoaderConfig::from_json_str(json).expect("valid config");
    assert_eq!(config.idle_fallback_ms, 1500);
    assert_eq!(config.root_margin(), Ok(RootMargin::Percent(10)));
    assert_eq!(
        config.interaction_events,
        vec![GestureKind::PointerDown, GestureKind::Scroll]
    );
    assert!(config.preconnect_crossorigin);
    assert_eq!(config.audit_capacity, 64);
    assert_eq!(config.resources.len(), 2);
    assert!(config.resources[0].asynchronous);
    assert_eq!(
        config.resources[1].trigger,
        TriggerPolicy::Visible {
            anchor: "footer".to_string()
        }
    );
}

#[test]
fn test_config_from_json_rejects_zero_audit_capacity() {
    let err = LoaderConfig::from_json_str(r#"{ "audit_capacity": 0 }"#).unwrap_err();
    assert!(err.contains("audit_capacity"));
}

#[test]
fn test_config_from_json_parse_error() {
    let err = LoaderConfig::from_json_str("{ not json").unwrap_err();
    assert!(err.starts_with("parse error"));
}

#[test]
fn test_resource_entry_to_descriptor() {
    let mut e = entry("https://cdn.example.com/a.js", TriggerPolicy::Interaction);
    e.id = Some("pixel".to_string());
    e.category = Some("marketing".to_string());
    e.related_origins = vec!["https://img.example.com".to_string()];

    let desc = e.to_descriptor().unwrap();
    assert_eq!(desc.locator(), "https://cdn.example.com/a.js");
    assert_eq!(desc.attributes().id.as_deref(), Some("pixel"));
    assert_eq!(desc.category(), Some("marketing"));
    assert_eq!(desc.related_origins().len(), 1);
}
