//! # Prometheus Deferred Loader
//!
//! A runtime-agnostic scheduler for third-party page resources: analytics
//! tags, marketing pixels, chat widgets.
//!
//! Marketing pages pull in scripts they do not control. Loading them eagerly
//! competes with first paint; loading them ad hoc tends to load them twice.
//! This crate decides *when* each script enters the page and guarantees it
//! enters at most once.
//!
//! ## Key Features
//!
//! - **Connection hints**: `preconnect` + `dns-prefetch` per origin, emitted once
//! - **At-most-once loading**: a three-state load registry closes the window
//!   between "is it loaded?" and "attach it"
//! - **Trigger policies**: immediate, idle, near-visible, first interaction
//! - **Graceful fallbacks**: idle falls back to a timer; visible falls back to idle
//! - **Best effort**: policy failures are logged, never propagated into page code
//! - **Audit trail**: every hint, attach and settlement, tagged with its category
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use prometheus_deferred_loader::builders::SchedulerBuilder;
//! use prometheus_deferred_loader::core::ResourceDescriptor;
//! use prometheus_deferred_loader::infra::memory::{InMemoryDocument, ManualGestures};
//! use prometheus_deferred_loader::runtime::TokioSpawner;
//!
//! let document = Arc::new(InMemoryDocument::new());
//! let gestures = Arc::new(ManualGestures::new());
//! let scheduler = SchedulerBuilder::new(document.clone())
//!     .with_gestures(gestures.clone())
//!     .build(TokioSpawner::current())?;
//!
//! let chat = ResourceDescriptor::new("https://widget.example.com/chat.js")?
//!     .with_category("chat")
//!     .with_related_origin("https://api.widget.example.com")?;
//! scheduler.load_on_interaction(&chat);
//! ```
//!
//! For complete scenarios, see `tests/policy_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Descriptors, registries, the injector and trigger policies.
pub mod core;
/// Loader configuration and resource manifest.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// In-memory host adapters.
pub mod infra;
/// Runtime adapters and API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
