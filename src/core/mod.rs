//! Core scheduling abstractions: descriptors, registries, injector and policies.

pub mod audit;
pub mod descriptor;
pub mod error;
pub mod hinter;
pub mod host;
pub mod policy;
pub mod scheduler;
pub mod tracker;

pub use audit::{build_audit_event, AuditAction, AuditEvent, AuditSink, InMemoryAuditSink};
pub use descriptor::{LoadedCallback, Origin, ResourceDescriptor, ScriptAttributes};
pub use error::{LoaderError, LoaderResult};
pub use hinter::ConnectionHinter;
pub use host::{
    ConnectionHint, Document, GestureKind, GestureSource, GestureSubscription, HintRel,
    IdleScheduler, ListenerOptions, PendingLoad, ProximityObservation, RootMargin, ScriptElement,
    Spawn, Timer, Unsupported, ViewportObserver,
};
pub use policy::Trigger;
pub use scheduler::{HostCapabilities, ResourceScheduler};
pub use tracker::{LoadState, LoadTracker};
