//! Resource injector: hint, dedup, attach, settle.

use std::sync::Arc;
use std::time::Duration;

use futures::future::{self, BoxFuture, FutureExt};
use parking_lot::Mutex;

use crate::config::LoaderConfig;
use crate::core::tracker::Admission;
use crate::core::{
    build_audit_event, AuditAction, AuditSink, ConnectionHinter, Document, GestureKind,
    GestureSource, IdleScheduler, LoadState, LoadTracker, LoaderError, LoaderResult, Origin,
    ResourceDescriptor, RootMargin, ScriptElement, Spawn, Timer, ViewportObserver,
};

/// Host capabilities a scheduler is assembled from.
pub struct HostCapabilities {
    /// Document mutation surface.
    pub document: Arc<dyn Document>,
    /// Idle-callback primitive.
    pub idle: Arc<dyn IdleScheduler>,
    /// Viewport-intersection primitive.
    pub viewport: Arc<dyn ViewportObserver>,
    /// Gesture event stream.
    pub gestures: Arc<dyn GestureSource>,
    /// Timer for fallback delays.
    pub timer: Arc<dyn Timer>,
}

pub(crate) struct Inner {
    pub(crate) document: Arc<dyn Document>,
    pub(crate) idle: Arc<dyn IdleScheduler>,
    pub(crate) viewport: Arc<dyn ViewportObserver>,
    pub(crate) gestures: Arc<dyn GestureSource>,
    pub(crate) timer: Arc<dyn Timer>,
    pub(crate) idle_fallback: Duration,
    pub(crate) root_margin: RootMargin,
    pub(crate) interaction_events: Vec<GestureKind>,
    hinter: ConnectionHinter,
    tracker: LoadTracker,
    audit: Option<Mutex<Box<dyn AuditSink>>>,
}

/// Schedules third-party scripts into a document.
///
/// Owns the load and hint registries for one page life. Cloning is cheap and
/// clones share state, so trigger policies armed from any clone dedup against
/// each other.
pub struct ResourceScheduler<S> {
    pub(crate) inner: Arc<Inner>,
    pub(crate) spawner: S,
}

impl<S: Clone> Clone for ResourceScheduler<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            spawner: self.spawner.clone(),
        }
    }
}

impl<S> ResourceScheduler<S> {
    /// Assemble a scheduler. `config` must already be validated.
    pub fn new(
        config: &LoaderConfig,
        host: HostCapabilities,
        audit: Option<Box<dyn AuditSink>>,
        spawner: S,
    ) -> LoaderResult<Self> {
        let root_margin = config.root_margin().map_err(LoaderError::InvalidConfig)?;
        let hinter =
            ConnectionHinter::new(Arc::clone(&host.document), config.preconnect_crossorigin);
        Ok(Self {
            inner: Arc::new(Inner {
                document: host.document,
                idle: host.idle,
                viewport: host.viewport,
                gestures: host.gestures,
                timer: host.timer,
                idle_fallback: config.idle_fallback(),
                root_margin,
                interaction_events: config.interaction_events.clone(),
                hinter,
                tracker: LoadTracker::new(),
                audit: audit.map(Mutex::new),
            }),
            spawner,
        })
    }

    /// Emit connection hints for the origin of `url`, once per origin.
    pub fn hint_origin(&self, url: &str) -> LoaderResult<()> {
        let origin = Origin::from_url(url)?;
        if self.inner.hinter.hint(&origin) {
            self.inner
                .record(url, origin.as_str(), None, AuditAction::Hint, None);
        }
        Ok(())
    }

    /// Whether the locator has loaded.
    pub fn is_loaded(&self, locator: &str) -> bool {
        self.inner.tracker.is_loaded(locator)
    }

    /// Current state of a locator.
    pub fn load_state(&self, locator: &str) -> LoadState {
        self.inner.tracker.state(locator)
    }

    /// Load registry.
    pub fn tracker(&self) -> &LoadTracker {
        &self.inner.tracker
    }

    /// Hint registry.
    pub fn hinter(&self) -> &ConnectionHinter {
        &self.inner.hinter
    }
}

impl<S> ResourceScheduler<S>
where
    S: Spawn + Clone + Send + Sync + 'static,
{
    /// Load a resource at most once.
    ///
    /// Hinting, the dedup check and the attach all happen before this returns.
    /// Settlement (marking loaded, `on_loaded`, or resetting after a failure)
    /// is driven on the spawner, so it completes even if the returned future
    /// is dropped. Callers that find the locator in flight get a future
    /// joined to the same attempt.
    pub fn load(&self, descriptor: &ResourceDescriptor) -> BoxFuture<'static, LoaderResult<()>> {
        Inner::load(&self.inner, &self.spawner, descriptor)
    }
}

impl Inner {
    pub(crate) fn load<S: Spawn>(
        this: &Arc<Self>,
        spawner: &S,
        descriptor: &ResourceDescriptor,
    ) -> BoxFuture<'static, LoaderResult<()>> {
        this.hint_descriptor(descriptor);

        match this
            .tracker
            .admit(descriptor.locator(), || Self::attach(this, descriptor))
        {
            Admission::Loaded => {
                tracing::debug!(locator = descriptor.locator(), "already loaded; skipping");
                this.record_for(descriptor, AuditAction::Skip, None);
                future::ready(Ok(())).boxed()
            }
            Admission::Joined(pending) => {
                tracing::debug!(locator = descriptor.locator(), "attach in flight; joining");
                this.record_for(descriptor, AuditAction::Join, None);
                pending.boxed()
            }
            Admission::Started(pending) => {
                // Settles the locator even if every caller drops its future.
                spawner.spawn(pending.clone().map(|_| ()));
                pending.boxed()
            }
        }
    }

    fn hint_descriptor(&self, descriptor: &ResourceDescriptor) {
        for origin in descriptor.hint_targets() {
            if self.hinter.hint(origin) {
                self.record(
                    descriptor.locator(),
                    origin.as_str(),
                    descriptor.category().map(str::to_owned),
                    AuditAction::Hint,
                    None,
                );
            }
        }
    }

    /// Runs under the tracker lock.
    fn attach(
        this: &Arc<Self>,
        descriptor: &ResourceDescriptor,
    ) -> BoxFuture<'static, LoaderResult<()>> {
        tracing::info!(
            locator = descriptor.locator(),
            category = descriptor.category().unwrap_or("-"),
            "attaching script"
        );
        this.record_for(descriptor, AuditAction::Attach, None);
        let pending = this.document.attach_script(ScriptElement::from(descriptor));

        let inner = Arc::clone(this);
        let descriptor = descriptor.clone();
        async move {
            match pending.await {
                Ok(()) => {
                    inner.tracker.mark_loaded(descriptor.locator());
                    tracing::info!(locator = descriptor.locator(), "script loaded");
                    inner.record_for(&descriptor, AuditAction::Loaded, None);
                    if let Some(on_loaded) = &descriptor.attributes().on_loaded {
                        on_loaded();
                    }
                    Ok(())
                }
                Err(reason) => {
                    inner.tracker.reset(descriptor.locator());
                    inner.record_for(&descriptor, AuditAction::Failed, Some(reason.clone()));
                    Err(LoaderError::attach_failed(descriptor.locator(), reason))
                }
            }
        }
        .boxed()
    }

    pub(crate) fn record_for(
        &self,
        descriptor: &ResourceDescriptor,
        action: AuditAction,
        detail: Option<String>,
    ) {
        self.record(
            descriptor.locator(),
            descriptor.origin().as_str(),
            descriptor.category().map(str::to_owned),
            action,
            detail,
        );
    }

    fn record(
        &self,
        locator: &str,
        origin: &str,
        category: Option<String>,
        action: AuditAction,
        detail: Option<String>,
    ) {
        if let Some(sink) = &self.audit {
            sink.lock()
                .record(build_audit_event(locator, origin, category, action, detail));
        }
    }
}
