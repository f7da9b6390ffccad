//! Tests for audit sink

use prometheus_deferred_loader::core::{
    build_audit_event, AuditAction, AuditSink, InMemoryAuditSink,
};

#[test]
fn test_in_memory_audit_sink() {
    let mut sink = InMemoryAuditSink::new(10);

    let event = build_audit_event(
        "https://cdn.example.com/a.js",
        "https://cdn.example.com",
        Some("analytics".to_string()),
        AuditAction::Attach,
        None,
    );

    sink.record(event);
    let events = sink.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].locator, "https://cdn.example.com/a.js");
    assert_eq!(events[0].origin, "https://cdn.example.com");
    assert_eq!(events[0].action, AuditAction::Attach);
    assert_eq!(sink.count(AuditAction::Attach), 1);
}

#[test]
fn test_audit_sink_overflow() {
    let mut sink = InMemoryAuditSink::new(2);

    sink.record(build_audit_event("a", "o", None, AuditAction::Hint, None));
    sink.record(build_audit_event("b", "o", None, AuditAction::Attach, None));
    sink.record(build_audit_event("c", "o", None, AuditAction::Loaded, None));

    let events = sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].locator, "b"); // First one popped
    assert_eq!(events[1].locator, "c");
}

#[test]
fn test_zero_capacity_sink_drops_everything() {
    let mut sink = InMemoryAuditSink::new(0);
    sink.record(build_audit_event("a", "o", None, AuditAction::Hint, None));
    assert!(sink.events().is_empty());
}

#[test]
fn test_build_audit_event() {
    let event = build_audit_event(
        "https://cdn.example.com/a.js",
        "https://cdn.example.com",
        Some("marketing".to_string()),
        AuditAction::Failed,
        Some("404".to_string()),
    );

    assert_eq!(event.category.as_deref(), Some("marketing"));
    assert_eq!(event.action.as_str(), "failed");
    assert_eq!(event.detail, Some("404".to_string()));
    assert_eq!(event.event_id.len(), 36);
    assert!(event.created_at_ms > 0);
}

#[test]
fn test_event_ids_are_unique() {
    let a = build_audit_event("x", "o", None, AuditAction::Hint, None);
    let b = build_audit_event("x", "o", None, AuditAction::Hint, None);
    assert_ne!(a.event_id, b.event_id);
}
