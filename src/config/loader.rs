//! Loader configuration and resource manifest.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{GestureKind, LoaderResult, ResourceDescriptor, RootMargin};

/// When a manifest entry should be loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerPolicy {
    /// Load as soon as the entry is armed.
    Immediate,
    /// Load at the next idle period.
    Idle,
    /// Load on the first user gesture.
    Interaction,
    /// Load when the anchor element nears the viewport.
    Visible {
        /// Id of the anchor element.
        anchor: String,
    },
}

impl TriggerPolicy {
    /// Short name used in logs and audit details.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Idle => "idle",
            Self::Interaction => "interaction",
            Self::Visible { .. } => "visible",
        }
    }
}

const fn default_true() -> bool {
    true
}

/// One third-party resource declared in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Script URL.
    pub locator: String,
    /// Element id.
    #[serde(default)]
    pub id: Option<String>,
    /// `async` flag.
    #[serde(default = "default_true")]
    pub asynchronous: bool,
    /// `defer` flag.
    #[serde(default)]
    pub deferred: bool,
    /// Category tag.
    #[serde(default)]
    pub category: Option<String>,
    /// Origins the script will fetch from.
    #[serde(default)]
    pub related_origins: Vec<String>,
    /// Trigger policy.
    pub trigger: TriggerPolicy,
}

impl ResourceEntry {
    /// Build the descriptor for this entry.
    pub fn to_descriptor(&self) -> LoaderResult<ResourceDescriptor> {
        let mut desc = ResourceDescriptor::new(&self.locator)?
            .with_async(self.asynchronous)
            .with_defer(self.deferred);
        if let Some(id) = &self.id {
            desc = desc.with_id(id);
        }
        if let Some(category) = &self.category {
            desc = desc.with_category(category);
        }
        for origin in &self.related_origins {
            desc = desc.with_related_origin(origin)?;
        }
        Ok(desc)
    }
}

/// Root loader configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Delay used by the idle policy when the runtime has no idle signal.
    pub idle_fallback_ms: u64,
    /// Proximity margin for the visible policy (`"200px"`, `"10%"`).
    pub visibility_root_margin: String,
    /// Gestures that count as first interaction.
    pub interaction_events: Vec<GestureKind>,
    /// Set `crossorigin` on preconnect hints.
    pub preconnect_crossorigin: bool,
    /// Events kept by the builder's in-memory audit sink.
    pub audit_capacity: usize,
    /// Resources armed by `arm_manifest`.
    pub resources: Vec<ResourceEntry>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            idle_fallback_ms: 2_000,
            visibility_root_margin: "200px".into(),
            interaction_events: GestureKind::ALL.to_vec(),
            preconnect_crossorigin: true,
            audit_capacity: 1_024,
            resources: Vec::new(),
        }
    }
}

impl LoaderConfig {
    /// Validate configuration values and every manifest entry.
    pub fn validate(&self) -> Result<(), String> {
        if self.idle_fallback_ms == 0 {
            return Err("idle_fallback_ms must be greater than 0".into());
        }
        self.root_margin()?;
        if self.interaction_events.is_empty() {
            return Err("interaction_events must not be empty".into());
        }
        if self.audit_capacity == 0 {
            return Err("audit_capacity must be greater than 0".into());
        }
        for (idx, entry) in self.resources.iter().enumerate() {
            if let TriggerPolicy::Visible { anchor } = &entry.trigger {
                if anchor.trim().is_empty() {
                    return Err(format!(
                        "resource #{idx} `{}`: visible anchor is empty",
                        entry.locator
                    ));
                }
            }
            entry
                .to_descriptor()
                .map_err(|e| format!("resource #{idx} invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parsed visibility margin.
    pub fn root_margin(&self) -> Result<RootMargin, String> {
        self.visibility_root_margin.parse()
    }

    /// Idle fallback delay.
    pub const fn idle_fallback(&self) -> Duration {
        Duration::from_millis(self.idle_fallback_ms)
    }

    /// Parse loader configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }
}
