//! Builder assembling a scheduler from configuration and host capabilities.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::LoaderConfig;
use crate::core::{
    AuditSink, Document, GestureSource, HostCapabilities, IdleScheduler, InMemoryAuditSink,
    LoaderError, LoaderResult, ResourceScheduler, Timer, Unsupported, ViewportObserver,
};
use crate::runtime::ThreadTimer;

/// Builder for [`ResourceScheduler`].
///
/// Capabilities not supplied default to [`Unsupported`], which exercises the
/// idle-timer and idle-instead-of-visible fallbacks. The fallback timer
/// defaults to [`ThreadTimer`], which works under any spawner.
pub struct SchedulerBuilder {
    config: LoaderConfig,
    document: Arc<dyn Document>,
    idle: Arc<dyn IdleScheduler>,
    viewport: Arc<dyn ViewportObserver>,
    gestures: Arc<dyn GestureSource>,
    timer: Arc<dyn Timer>,
    audit: Option<Box<dyn AuditSink>>,
}

impl SchedulerBuilder {
    /// Start a builder for `document` with default configuration.
    pub fn new(document: Arc<dyn Document>) -> Self {
        Self {
            config: LoaderConfig::default(),
            document,
            idle: Arc::new(Unsupported),
            viewport: Arc::new(Unsupported),
            gestures: Arc::new(Unsupported),
            timer: Arc::new(ThreadTimer),
            audit: None,
        }
    }

    /// Use `config`.
    #[must_use]
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an idle-callback primitive.
    #[must_use]
    pub fn with_idle(mut self, idle: Arc<dyn IdleScheduler>) -> Self {
        self.idle = idle;
        self
    }

    /// Use a viewport-intersection primitive.
    #[must_use]
    pub fn with_viewport(mut self, viewport: Arc<dyn ViewportObserver>) -> Self {
        self.viewport = viewport;
        self
    }

    /// Use a gesture source.
    #[must_use]
    pub fn with_gestures(mut self, gestures: Arc<dyn GestureSource>) -> Self {
        self.gestures = gestures;
        self
    }

    /// Use a timer for the idle fallback delay.
    #[must_use]
    pub fn with_timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = timer;
        self
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Attach an [`InMemoryAuditSink`] holding `audit_capacity` events and
    /// return a handle to read it.
    ///
    /// Call after [`with_config`](Self::with_config); the capacity is taken
    /// from the configuration current at this point.
    #[must_use]
    pub fn with_in_memory_audit(mut self) -> (Self, Arc<Mutex<InMemoryAuditSink>>) {
        let sink = Arc::new(Mutex::new(InMemoryAuditSink::new(
            self.config.audit_capacity,
        )));
        self.audit = Some(Box::new(Arc::clone(&sink)));
        (self, sink)
    }

    /// Configuration the scheduler will be built with.
    pub const fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Validate configuration and assemble the scheduler.
    pub fn build<S>(self, spawner: S) -> LoaderResult<ResourceScheduler<S>> {
        self.config
            .validate()
            .map_err(LoaderError::InvalidConfig)?;
        let host = HostCapabilities {
            document: self.document,
            idle: self.idle,
            viewport: self.viewport,
            gestures: self.gestures,
            timer: self.timer,
        };
        ResourceScheduler::new(&self.config, host, self.audit, spawner)
    }
}
