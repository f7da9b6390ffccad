//! Tests for runtime adapters and the API surface

use std::sync::Arc;

use prometheus_deferred_loader::builders::SchedulerBuilder;
use prometheus_deferred_loader::config::{LoaderConfig, ResourceEntry, TriggerPolicy};
use prometheus_deferred_loader::core::{LoadState, LoaderError, Spawn};
use prometheus_deferred_loader::infra::memory::InMemoryDocument;
use prometheus_deferred_loader::runtime::{
    arm, arm_manifest, list_resources, status, TokioSpawner,
};

fn entry(locator: &str, trigger: TriggerPolicy) -> ResourceEntry {
    ResourceEntry {
        locator: locator.to_string(),
        id: None,
        asynchronous: true,
        deferred: false,
        category: Some("analytics".to_string()),
        related_origins: Vec::new(),
        trigger,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_spawn() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    spawner.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
}

#[tokio::test]
async fn test_arm_immediate_entry_and_status() {
    let doc = Arc::new(InMemoryDocument::new());
    let scheduler = SchedulerBuilder::new(doc.clone())
        .build(TokioSpawner::current())
        .unwrap();
    let locator = "https://cdn.example.com/a.js";

    assert_eq!(status(&scheduler, locator).state, LoadState::NotStarted);
    arm(&scheduler, &entry(locator, TriggerPolicy::Immediate)).unwrap();
    assert_eq!(doc.scripts_for(locator), 1);

    tokio::task::yield_now().await;
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert_eq!(status(&scheduler, locator).state, LoadState::Loaded);
}

#[tokio::test]
async fn test_arm_manifest_arms_nothing_when_an_entry_is_malformed() {
    let doc = Arc::new(InMemoryDocument::new());
    let scheduler = SchedulerBuilder::new(doc.clone())
        .build(TokioSpawner::current())
        .unwrap();
    let config = LoaderConfig {
        resources: vec![
            entry("https://cdn.example.com/a.js", TriggerPolicy::Immediate),
            entry("::broken::", TriggerPolicy::Immediate),
            entry("https://cdn.example.com/c.js", TriggerPolicy::Immediate),
        ],
        ..LoaderConfig::default()
    };

    let err = arm_manifest(&scheduler, &config).unwrap_err();
    assert!(matches!(err, LoaderError::MalformedLocator { .. }));
    assert!(doc.scripts().is_empty());
    assert!(doc.hints().is_empty());
    assert_eq!(
        status(&scheduler, "https://cdn.example.com/a.js").state,
        LoadState::NotStarted
    );
}

#[test]
fn test_list_resources() {
    let config = LoaderConfig {
        resources: vec![
            entry("https://cdn.example.com/a.js", TriggerPolicy::Idle),
            entry(
                "https://cdn.example.com/b.js",
                TriggerPolicy::Visible {
                    anchor: "footer".to_string(),
                },
            ),
        ],
        ..LoaderConfig::default()
    };

    let listed = list_resources(&config);
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].trigger, "idle");
    assert_eq!(listed[1].trigger, "visible");
    assert_eq!(listed[1].category.as_deref(), Some("analytics"));
}
