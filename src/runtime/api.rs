//! Page-composition API: arm a configured manifest and report load status.

use serde::{Deserialize, Serialize};

use crate::config::{LoaderConfig, ResourceEntry, TriggerPolicy};
use crate::core::{LoadState, LoaderResult, ResourceDescriptor, ResourceScheduler, Spawn};

/// Load status of one locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStatusResponse {
    /// Locator queried.
    pub locator: String,
    /// Current state.
    pub state: LoadState,
}

/// Manifest entry summary for listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    /// Script URL.
    pub locator: String,
    /// Trigger policy name.
    pub trigger: String,
    /// Category tag.
    pub category: Option<String>,
}

/// Arm a single manifest entry on the scheduler.
pub fn arm<S>(scheduler: &ResourceScheduler<S>, entry: &ResourceEntry) -> LoaderResult<()>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    let descriptor = entry.to_descriptor()?;
    arm_descriptor(scheduler, &entry.trigger, &descriptor);
    Ok(())
}

/// Arm every resource in `cfg` and return the number armed.
///
/// Every entry is converted before any is armed, so a malformed entry leaves
/// the page untouched.
pub fn arm_manifest<S>(
    scheduler: &ResourceScheduler<S>,
    cfg: &LoaderConfig,
) -> LoaderResult<usize>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    let descriptors = cfg
        .resources
        .iter()
        .map(ResourceEntry::to_descriptor)
        .collect::<LoaderResult<Vec<_>>>()?;
    for (entry, descriptor) in cfg.resources.iter().zip(&descriptors) {
        arm_descriptor(scheduler, &entry.trigger, descriptor);
    }
    tracing::info!(count = descriptors.len(), "manifest armed");
    Ok(descriptors.len())
}

fn arm_descriptor<S>(
    scheduler: &ResourceScheduler<S>,
    trigger: &TriggerPolicy,
    descriptor: &ResourceDescriptor,
) where
    S: Spawn + Clone + Send + Sync + 'static,
{
    match trigger {
        TriggerPolicy::Immediate => scheduler.load_now(descriptor),
        TriggerPolicy::Idle => scheduler.load_when_idle(descriptor),
        TriggerPolicy::Interaction => scheduler.load_on_interaction(descriptor),
        TriggerPolicy::Visible { anchor } => scheduler.load_on_visible(anchor, descriptor),
    }
}

/// Report the load state of `locator`.
pub fn status<S>(scheduler: &ResourceScheduler<S>, locator: &str) -> LoadStatusResponse {
    LoadStatusResponse {
        locator: locator.to_owned(),
        state: scheduler.load_state(locator),
    }
}

/// Build manifest listings from config.
pub fn list_resources(cfg: &LoaderConfig) -> Vec<ResourceSnapshot> {
    cfg.resources
        .iter()
        .map(|entry| ResourceSnapshot {
            locator: entry.locator.clone(),
            trigger: entry.trigger.name().to_owned(),
            category: entry.category.clone(),
        })
        .collect()
}
