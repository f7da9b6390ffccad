//! Tests for builder modules

use std::sync::Arc;
use std::time::Duration;

use prometheus_deferred_loader::builders::SchedulerBuilder;
use prometheus_deferred_loader::config::LoaderConfig;
use prometheus_deferred_loader::core::{AuditAction, LoaderError, ResourceDescriptor};
use prometheus_deferred_loader::infra::memory::InMemoryDocument;
use prometheus_deferred_loader::runtime::{TokioSpawner, TokioTimer};

#[test]
fn test_builder_defaults() {
    let builder = SchedulerBuilder::new(Arc::new(InMemoryDocument::new()));
    assert_eq!(builder.config(), &LoaderConfig::default());
}

#[test]
fn test_builder_rejects_invalid_config() {
    let config = LoaderConfig {
        idle_fallback_ms: 0,
        ..LoaderConfig::default()
    };
    let result = SchedulerBuilder::new(Arc::new(InMemoryDocument::new()))
        .with_config(config)
        .build(());
    assert!(matches!(result, Err(LoaderError::InvalidConfig(_))));
}

#[tokio::test]
async fn test_builder_without_capabilities_uses_fallbacks() {
    let doc = Arc::new(InMemoryDocument::new().with_element("footer"));
    let config = LoaderConfig {
        idle_fallback_ms: 20,
        ..LoaderConfig::default()
    };
    let scheduler = SchedulerBuilder::new(doc.clone())
        .with_config(config)
        .build(TokioSpawner::current())
        .expect("scheduler");

    let desc = ResourceDescriptor::new("https://cdn.example.com/a.js").unwrap();
    scheduler.load_on_visible("footer", &desc);
    let later = ResourceDescriptor::new("https://cdn.example.com/b.js").unwrap();
    scheduler.load_on_interaction(&later);

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(scheduler.is_loaded("https://cdn.example.com/a.js"));
    assert!(!scheduler.is_loaded("https://cdn.example.com/b.js"));
    assert_eq!(doc.scripts().len(), 1);
}

#[tokio::test]
async fn test_builder_with_tokio_timer() {
    let doc = Arc::new(InMemoryDocument::new());
    let config = LoaderConfig {
        idle_fallback_ms: 10,
        ..LoaderConfig::default()
    };
    let scheduler = SchedulerBuilder::new(doc.clone())
        .with_config(config)
        .with_timer(Arc::new(TokioTimer::current()))
        .build(TokioSpawner::current())
        .expect("scheduler");

    scheduler.load_when_idle(&ResourceDescriptor::new("https://cdn.example.com/a.js").unwrap());
    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(scheduler.is_loaded("https://cdn.example.com/a.js"));
}

#[tokio::test]
async fn test_builder_in_memory_audit_uses_configured_capacity() {
    let config = LoaderConfig {
        audit_capacity: 2,
        ..LoaderConfig::default()
    };
    let (builder, audit) = SchedulerBuilder::new(Arc::new(InMemoryDocument::new()))
        .with_config(config)
        .with_in_memory_audit();
    let scheduler = builder.build(TokioSpawner::current()).expect("scheduler");

    let desc = ResourceDescriptor::new("https://cdn.example.com/a.js").unwrap();
    scheduler.load(&desc).await.unwrap();

    let events = audit.lock().events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, AuditAction::Attach);
    assert_eq!(events[1].action, AuditAction::Loaded);
}
