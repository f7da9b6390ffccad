//! Trigger policies layered over [`ResourceScheduler::load`].
//!
//! Every policy is fire-and-forget: it loads the descriptor at most once, at
//! a moment chosen by its trigger, and logs load failures instead of
//! returning them. None of them retries.

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::core::scheduler::Inner;
use crate::core::{
    AuditAction, ListenerOptions, LoaderResult, ResourceDescriptor, ResourceScheduler, Spawn,
};

/// Which policy scheduled a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Loaded on arm.
    Immediate,
    /// Loaded on the idle signal or fallback timer.
    Idle,
    /// Loaded when the anchor approached the viewport.
    Visible,
    /// Loaded on the first gesture.
    Interaction,
}

impl Trigger {
    /// Stable name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Idle => "idle",
            Self::Visible => "visible",
            Self::Interaction => "interaction",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<S> ResourceScheduler<S>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    /// Load right away. Attachment happens before this returns.
    pub fn load_now(&self, descriptor: &ResourceDescriptor) {
        self.inner
            .record_for(descriptor, AuditAction::Armed, Some(Trigger::Immediate.to_string()));
        self.inner
            .record_for(descriptor, AuditAction::Fired, Some(Trigger::Immediate.to_string()));
        let pending = Inner::load(&self.inner, &self.spawner, descriptor);
        let locator = descriptor.locator().to_owned();
        self.spawner.spawn(async move {
            settle(Trigger::Immediate, &locator, pending.await);
        });
    }

    /// Load at the next idle period, or after the fallback delay when the
    /// runtime has no idle signal.
    pub fn load_when_idle(&self, descriptor: &ResourceDescriptor) {
        self.arm_idle(descriptor, Trigger::Idle);
    }

    /// Load once the element `anchor_id` nears the viewport.
    ///
    /// A missing anchor is a silent no-op. Without an intersection primitive
    /// the idle strategy is used instead.
    pub fn load_on_visible(&self, anchor_id: &str, descriptor: &ResourceDescriptor) {
        if !self.inner.document.contains_element(anchor_id) {
            tracing::debug!(
                anchor = anchor_id,
                locator = descriptor.locator(),
                "anchor not in document; nothing to observe"
            );
            return;
        }
        let observed = self.inner.viewport.observe(anchor_id, self.inner.root_margin);
        let Some(mut observation) = observed else {
            tracing::debug!(
                anchor = anchor_id,
                "viewport observer unavailable; falling back to idle"
            );
            self.arm_idle(descriptor, Trigger::Visible);
            return;
        };

        self.inner
            .record_for(descriptor, AuditAction::Armed, Some(Trigger::Visible.to_string()));
        let inner = Arc::clone(&self.inner);
        let spawner = self.spawner.clone();
        let descriptor = descriptor.clone();
        let anchor = anchor_id.to_owned();
        self.spawner.spawn(async move {
            let approached = observation.approached().await;
            observation.disconnect();
            if approached {
                tracing::debug!(anchor = %anchor, "anchor approached viewport");
                fire(&inner, &spawner, Trigger::Visible, &descriptor).await;
            }
        });
    }

    /// Load on the first pointerdown, keydown, touchstart or scroll.
    ///
    /// Listeners are capturing and passive, and all of them are removed after
    /// the first gesture.
    pub fn load_on_interaction(&self, descriptor: &ResourceDescriptor) {
        let mut subscription = self
            .inner
            .gestures
            .listen(&self.inner.interaction_events, ListenerOptions::CAPTURE_PASSIVE);
        self.inner
            .record_for(descriptor, AuditAction::Armed, Some(Trigger::Interaction.to_string()));
        let inner = Arc::clone(&self.inner);
        let spawner = self.spawner.clone();
        let descriptor = descriptor.clone();
        self.spawner.spawn(async move {
            let gesture = subscription.next_gesture().await;
            subscription.remove();
            if let Some(kind) = gesture {
                tracing::debug!(gesture = %kind, "first interaction");
                fire(&inner, &spawner, Trigger::Interaction, &descriptor).await;
            }
        });
    }

    fn arm_idle(&self, descriptor: &ResourceDescriptor, trigger: Trigger) {
        let wait = idle_wait(&self.inner);
        self.inner
            .record_for(descriptor, AuditAction::Armed, Some(trigger.to_string()));
        let inner = Arc::clone(&self.inner);
        let spawner = self.spawner.clone();
        let descriptor = descriptor.clone();
        self.spawner.spawn(async move {
            wait.await;
            fire(&inner, &spawner, trigger, &descriptor).await;
        });
    }
}

fn idle_wait(inner: &Inner) -> BoxFuture<'static, ()> {
    if let Some(idle) = inner.idle.request_idle() {
        return idle;
    }
    let delay = inner.idle_fallback;
    tracing::debug!(?delay, "idle signal unavailable; using fallback timer");
    inner.timer.delay(delay)
}

async fn fire<S: Spawn>(
    inner: &Arc<Inner>,
    spawner: &S,
    trigger: Trigger,
    descriptor: &ResourceDescriptor,
) {
    tracing::info!(%trigger, locator = descriptor.locator(), "trigger fired");
    inner.record_for(descriptor, AuditAction::Fired, Some(trigger.to_string()));
    let result = Inner::load(inner, spawner, descriptor).await;
    settle(trigger, descriptor.locator(), result);
}

fn settle(trigger: Trigger, locator: &str, result: LoaderResult<()>) {
    if let Err(err) = result {
        tracing::warn!(%trigger, locator, error = %err, "deferred load failed");
    }
}
