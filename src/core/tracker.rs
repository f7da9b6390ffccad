//! Per-locator load state.
//!
//! Three states are tracked: absent (not started), in flight, and loaded. The
//! check and the transition to in-flight happen in one critical section, and
//! the caller attaches the element inside that same section, so two triggers
//! racing on one locator can never both attach.

use std::collections::HashMap;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::core::LoaderResult;

/// Completion of an in-flight load, joinable by any number of callers.
pub(crate) type SharedLoad = Shared<BoxFuture<'static, LoaderResult<()>>>;

/// Observable state of a locator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// Never attached, or the last attempt failed.
    NotStarted,
    /// Attached; waiting for the load or error event.
    InFlight,
    /// Loaded successfully.
    Loaded,
}

enum Entry {
    InFlight(SharedLoad),
    Loaded,
}

/// Outcome of asking to load a locator.
pub(crate) enum Admission {
    /// Nothing to do.
    Loaded,
    /// Someone else already attached it.
    Joined(SharedLoad),
    /// This caller attached it.
    Started(SharedLoad),
}

/// Registry of loaded and in-flight locators. Never pruned.
#[derive(Default)]
pub struct LoadTracker {
    entries: Mutex<HashMap<String, Entry>>,
}

impl LoadTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the locator finished loading.
    pub fn is_loaded(&self, locator: &str) -> bool {
        matches!(self.entries.lock().get(locator), Some(Entry::Loaded))
    }

    /// Record a successful attach.
    pub fn mark_loaded(&self, locator: &str) {
        self.entries.lock().insert(locator.to_owned(), Entry::Loaded);
    }

    /// Snapshot of a locator's state.
    pub fn state(&self, locator: &str) -> LoadState {
        match self.entries.lock().get(locator) {
            None => LoadState::NotStarted,
            Some(Entry::InFlight(_)) => LoadState::InFlight,
            Some(Entry::Loaded) => LoadState::Loaded,
        }
    }

    /// Number of loaded locators.
    pub fn loaded_count(&self) -> usize {
        self.entries
            .lock()
            .values()
            .filter(|e| matches!(e, Entry::Loaded))
            .count()
    }

    /// Decide what a load request for `locator` should do.
    ///
    /// `start` runs with the registry locked and must attach synchronously.
    pub(crate) fn admit<F>(&self, locator: &str, start: F) -> Admission
    where
        F: FnOnce() -> BoxFuture<'static, LoaderResult<()>>,
    {
        let mut entries = self.entries.lock();
        match entries.get(locator) {
            Some(Entry::Loaded) => Admission::Loaded,
            Some(Entry::InFlight(pending)) => Admission::Joined(pending.clone()),
            None => {
                let pending = start().shared();
                entries.insert(locator.to_owned(), Entry::InFlight(pending.clone()));
                Admission::Started(pending)
            }
        }
    }

    /// Forget a failed in-flight attempt so a later call may retry.
    pub(crate) fn reset(&self, locator: &str) {
        let mut entries = self.entries.lock();
        if matches!(entries.get(locator), Some(Entry::InFlight(_))) {
            entries.remove(locator);
        }
    }
}
