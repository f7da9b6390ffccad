//! Connection warm-up hints.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{ConnectionHint, Document, HintRel, LoaderResult, Origin};

/// Emits `preconnect` + `dns-prefetch` pairs, at most once per origin.
pub struct ConnectionHinter {
    document: Arc<dyn Document>,
    crossorigin: bool,
    hinted: Mutex<HashSet<Origin>>,
}

impl ConnectionHinter {
    /// Create a hinter writing into `document`.
    pub fn new(document: Arc<dyn Document>, crossorigin: bool) -> Self {
        Self {
            document,
            crossorigin,
            hinted: Mutex::new(HashSet::new()),
        }
    }

    /// Hint the origin of a fully qualified URL.
    ///
    /// Returns whether new hint elements were written.
    pub fn hint_url(&self, url: &str) -> LoaderResult<bool> {
        let origin = Origin::from_url(url)?;
        Ok(self.hint(&origin))
    }

    /// Hint an already derived origin. Returns whether new elements were written.
    pub fn hint(&self, origin: &Origin) -> bool {
        if !self.hinted.lock().insert(origin.clone()) {
            tracing::debug!(%origin, "origin already hinted");
            return false;
        }
        tracing::debug!(%origin, "emitting connection hints");
        self.document.append_hint(ConnectionHint {
            rel: HintRel::Preconnect,
            origin: origin.clone(),
            crossorigin: self.crossorigin,
        });
        self.document.append_hint(ConnectionHint {
            rel: HintRel::DnsPrefetch,
            origin: origin.clone(),
            crossorigin: false,
        });
        true
    }

    /// Whether `origin` has been hinted.
    pub fn is_hinted(&self, origin: &Origin) -> bool {
        self.hinted.lock().contains(origin)
    }

    /// Number of hinted origins.
    pub fn hinted_count(&self) -> usize {
        self.hinted.lock().len()
    }
}
