//! Manually dispatched gesture events.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures::channel::mpsc;
use futures::StreamExt;
use parking_lot::Mutex;

use crate::core::{GestureKind, GestureSource, GestureSubscription, ListenerOptions};

struct ListenerSlot {
    subscription: u64,
    kind: GestureKind,
    options: ListenerOptions,
    tx: mpsc::UnboundedSender<GestureKind>,
}

type Listeners = Arc<Mutex<Vec<ListenerSlot>>>;

/// Gesture source driven by [`dispatch`](Self::dispatch).
#[derive(Default)]
pub struct ManualGestures {
    listeners: Listeners,
    next_id: AtomicU64,
}

impl ManualGestures {
    /// Create a source with no listeners.
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch a gesture on the document. Returns how many listeners saw it.
    pub fn dispatch(&self, kind: GestureKind) -> usize {
        self.listeners
            .lock()
            .iter()
            .filter(|l| l.kind == kind)
            .filter(|l| l.tx.unbounded_send(kind).is_ok())
            .count()
    }

    /// Registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    /// Kind and options of every registered listener.
    pub fn listeners(&self) -> Vec<(GestureKind, ListenerOptions)> {
        self.listeners
            .lock()
            .iter()
            .map(|l| (l.kind, l.options))
            .collect()
    }
}

struct ManualSubscription {
    id: u64,
    rx: mpsc::UnboundedReceiver<GestureKind>,
    listeners: Listeners,
}

impl ManualSubscription {
    fn detach(&self) {
        self.listeners.lock().retain(|l| l.subscription != self.id);
    }
}

#[async_trait]
impl GestureSubscription for ManualSubscription {
    async fn next_gesture(&mut self) -> Option<GestureKind> {
        self.rx.next().await
    }

    fn remove(&mut self) {
        self.detach();
        self.rx.close();
    }
}

impl Drop for ManualSubscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl GestureSource for ManualGestures {
    fn listen(
        &self,
        kinds: &[GestureKind],
        options: ListenerOptions,
    ) -> Box<dyn GestureSubscription> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded();
        {
            let mut listeners = self.listeners.lock();
            for &kind in kinds {
                listeners.push(ListenerSlot {
                    subscription: id,
                    kind,
                    options,
                    tx: tx.clone(),
                });
            }
        }
        Box::new(ManualSubscription {
            id,
            rx,
            listeners: Arc::clone(&self.listeners),
        })
    }
}
