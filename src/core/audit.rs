//! Audit sink implementations.
//!
//! Every hint, attach and settlement is recorded with the resource's category
//! so consent and compliance tooling can reconstruct what third-party code
//! entered the page and when.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::util::clock::now_ms;

/// What happened to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// A trigger policy was armed.
    Armed,
    /// A trigger policy fired.
    Fired,
    /// Connection hints were emitted for an origin.
    Hint,
    /// The script element was attached.
    Attach,
    /// The script finished loading.
    Loaded,
    /// The script failed to load.
    Failed,
    /// Load skipped because the locator was already loaded.
    Skip,
    /// Load joined an attach already in flight.
    Join,
}

impl AuditAction {
    /// Stable name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Armed => "armed",
            Self::Fired => "fired",
            Self::Hint => "hint",
            Self::Attach => "attach",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
            Self::Skip => "skip",
            Self::Join => "join",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit event structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event_id: String,
    /// Resource locator.
    pub locator: String,
    /// Origin the event concerns (hint target or locator origin).
    pub origin: String,
    /// Category tag of the resource.
    pub category: Option<String>,
    /// Action taken.
    pub action: AuditAction,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
    /// Additional context (trigger name, failure reason).
    pub detail: Option<String>,
}

/// Audit sink abstraction.
pub trait AuditSink: Send {
    /// Record an audit event.
    fn record(&mut self, event: AuditEvent);
}

impl<T: AuditSink> AuditSink for Arc<Mutex<T>> {
    fn record(&mut self, event: AuditEvent) {
        self.lock().record(event);
    }
}

/// In-memory audit sink for testing and dev.
pub struct InMemoryAuditSink {
    events: VecDeque<AuditEvent>,
    max_events: usize,
}

impl InMemoryAuditSink {
    /// Create a new in-memory sink with a bounded buffer.
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.iter().cloned().collect()
    }

    /// Count events with the given action.
    pub fn count(&self, action: AuditAction) -> usize {
        self.events.iter().filter(|e| e.action == action).count()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&mut self, event: AuditEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Helper to build an audit event from context.
pub fn build_audit_event(
    locator: impl Into<String>,
    origin: impl Into<String>,
    category: Option<String>,
    action: AuditAction,
    detail: Option<String>,
) -> AuditEvent {
    AuditEvent {
        event_id: uuid::Uuid::new_v4().to_string(),
        locator: locator.into(),
        origin: origin.into(),
        category,
        action,
        created_at_ms: now_ms(),
        detail,
    }
}
