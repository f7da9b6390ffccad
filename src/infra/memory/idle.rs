//! Manually driven idle signal.

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use futures::channel::oneshot;

use crate::core::IdleScheduler;

/// Idle primitive whose idle periods are fired by hand.
pub struct ManualIdle {
    supported: bool,
    waiters: Mutex<Vec<oneshot::Sender<()>>>,
}

impl ManualIdle {
    /// Runtime with an idle signal.
    pub fn new() -> Self {
        Self {
            supported: true,
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Runtime without an idle signal; the scheduler falls back to a timer.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            waiters: Mutex::new(Vec::new()),
        }
    }

    /// Start an idle period, waking every pending request. Returns how many.
    pub fn fire(&self) -> usize {
        let waiters = std::mem::take(&mut *self.waiters.lock());
        let count = waiters.len();
        for tx in waiters {
            let _ = tx.send(());
        }
        count
    }

    /// Outstanding idle requests.
    pub fn pending(&self) -> usize {
        self.waiters.lock().len()
    }
}

impl Default for ManualIdle {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleScheduler for ManualIdle {
    fn request_idle(&self) -> Option<BoxFuture<'static, ()>> {
        if !self.supported {
            return None;
        }
        let (tx, rx) = oneshot::channel();
        self.waiters.lock().push(tx);
        Some(
            async move {
                let _ = rx.await;
            }
            .boxed(),
        )
    }
}
