//! In-memory document.

use std::collections::{HashMap, HashSet};

use futures::future::{self, FutureExt};
use parking_lot::Mutex;
use futures::channel::oneshot;

use crate::core::{ConnectionHint, Document, HintRel, PendingLoad, ScriptElement};

type Settle = oneshot::Sender<Result<(), String>>;

#[derive(Default)]
struct DocumentState {
    elements: HashSet<String>,
    hints: Vec<ConnectionHint>,
    scripts: Vec<ScriptElement>,
    failures: HashMap<String, String>,
    held: HashSet<String>,
    pending: HashMap<String, Vec<Settle>>,
}

/// Document double recording hints and scripts.
///
/// Scripts load successfully at once unless the locator was set to fail
/// ([`fail_with`](Self::fail_with)) or held open ([`hold`](Self::hold)) until
/// [`settle`](Self::settle) fires its load or error event.
#[derive(Default)]
pub struct InMemoryDocument {
    state: Mutex<DocumentState>,
}

impl InMemoryDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert_element`](Self::insert_element).
    #[must_use]
    pub fn with_element(self, id: &str) -> Self {
        self.insert_element(id);
        self
    }

    /// Add an element with the given id.
    pub fn insert_element(&self, id: &str) {
        self.state.lock().elements.insert(id.to_owned());
    }

    /// Make later attaches of `locator` fire an error event.
    pub fn fail_with(&self, locator: &str, reason: &str) {
        self.state
            .lock()
            .failures
            .insert(locator.to_owned(), reason.to_owned());
    }

    /// Let later attaches of `locator` succeed again.
    pub fn clear_failure(&self, locator: &str) {
        self.state.lock().failures.remove(locator);
    }

    /// Keep later attaches of `locator` pending until settled.
    pub fn hold(&self, locator: &str) {
        self.state.lock().held.insert(locator.to_owned());
    }

    /// Fire the load (`Ok`) or error (`Err`) event for every pending attach of
    /// `locator`. Returns how many were settled.
    pub fn settle(&self, locator: &str, outcome: Result<(), String>) -> usize {
        let waiters = {
            let mut state = self.state.lock();
            state.held.remove(locator);
            state.pending.remove(locator).unwrap_or_default()
        };
        let count = waiters.len();
        for tx in waiters {
            let _ = tx.send(outcome.clone());
        }
        count
    }

    /// Every hint element, in insertion order.
    pub fn hints(&self) -> Vec<ConnectionHint> {
        self.state.lock().hints.clone()
    }

    /// Hint elements scoped to `origin`.
    pub fn hints_for(&self, origin: &str) -> usize {
        self.state
            .lock()
            .hints
            .iter()
            .filter(|h| h.origin.as_str() == origin)
            .count()
    }

    /// Hint elements of one kind scoped to `origin`.
    pub fn hints_of(&self, origin: &str, rel: HintRel) -> usize {
        self.state
            .lock()
            .hints
            .iter()
            .filter(|h| h.origin.as_str() == origin && h.rel == rel)
            .count()
    }

    /// Every attached script, in attach order.
    pub fn scripts(&self) -> Vec<ScriptElement> {
        self.state.lock().scripts.clone()
    }

    /// Script elements with `src == locator`.
    pub fn scripts_for(&self, locator: &str) -> usize {
        self.state
            .lock()
            .scripts
            .iter()
            .filter(|s| s.src == locator)
            .count()
    }
}

impl Document for InMemoryDocument {
    fn contains_element(&self, id: &str) -> bool {
        self.state.lock().elements.contains(id)
    }

    fn append_hint(&self, hint: ConnectionHint) {
        self.state.lock().hints.push(hint);
    }

    fn attach_script(&self, element: ScriptElement) -> PendingLoad {
        let mut state = self.state.lock();
        let src = element.src.clone();
        if let Some(id) = &element.id {
            state.elements.insert(id.clone());
        }
        state.scripts.push(element);

        if state.held.contains(&src) {
            let (tx, rx) = oneshot::channel();
            state.pending.entry(src).or_default().push(tx);
            return async move {
                rx.await
                    .unwrap_or_else(|_| Err("document discarded".to_owned()))
            }
            .boxed();
        }
        match state.failures.get(&src) {
            Some(reason) => future::ready(Err(reason.clone())).boxed(),
            None => future::ready(Ok(())).boxed(),
        }
    }
}
