//! Manually driven viewport observer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::StreamExt;
use parking_lot::Mutex;

use crate::core::{ProximityObservation, RootMargin, ViewportObserver};

struct ObserverSlot {
    element_id: String,
    margin: RootMargin,
    tx: mpsc::UnboundedSender<()>,
    connected: Arc<AtomicBool>,
}

/// Intersection primitive whose entries come from [`approach`](Self::approach).
pub struct ManualViewport {
    supported: bool,
    slots: Mutex<Vec<ObserverSlot>>,
}

impl ManualViewport {
    /// Runtime with an intersection primitive.
    pub fn new() -> Self {
        Self {
            supported: true,
            slots: Mutex::new(Vec::new()),
        }
    }

    /// Runtime without one.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            slots: Mutex::new(Vec::new()),
        }
    }

    /// Scroll `element_id` into the proximity margin. Returns how many
    /// connected observers were notified.
    pub fn approach(&self, element_id: &str) -> usize {
        self.slots
            .lock()
            .iter()
            .filter(|s| s.element_id == element_id && s.connected.load(Ordering::Acquire))
            .filter(|s| s.tx.unbounded_send(()).is_ok())
            .count()
    }

    /// Observers still connected.
    pub fn active_observers(&self) -> usize {
        self.slots
            .lock()
            .iter()
            .filter(|s| s.connected.load(Ordering::Acquire))
            .count()
    }

    /// Margins requested so far, including disconnected observers.
    pub fn requested_margins(&self) -> Vec<RootMargin> {
        self.slots.lock().iter().map(|s| s.margin).collect()
    }
}

impl Default for ManualViewport {
    fn default() -> Self {
        Self::new()
    }
}

struct ManualObservation {
    rx: mpsc::UnboundedReceiver<()>,
    connected: Arc<AtomicBool>,
}

#[async_trait]
impl ProximityObservation for ManualObservation {
    async fn approached(&mut self) -> bool {
        self.rx.next().await.is_some()
    }

    fn disconnect(&mut self) {
        self.connected.store(false, Ordering::Release);
        self.rx.close();
    }
}

impl Drop for ManualObservation {
    fn drop(&mut self) {
        self.connected.store(false, Ordering::Release);
    }
}

impl ViewportObserver for ManualViewport {
    fn observe(
        &self,
        element_id: &str,
        margin: RootMargin,
    ) -> Option<Box<dyn ProximityObservation>> {
        if !self.supported {
            return None;
        }
        let (tx, rx) = mpsc::unbounded();
        let connected = Arc::new(AtomicBool::new(true));
        self.slots.lock().push(ObserverSlot {
            element_id: element_id.to_owned(),
            margin,
            tx,
            connected: Arc::clone(&connected),
        });
        Some(Box::new(ManualObservation { rx, connected }))
    }
}
