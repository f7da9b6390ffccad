//! Timer implementations for the idle fallback delay.

use std::thread;
use std::time::Duration;

use futures::channel::oneshot;
use futures::future::{self, BoxFuture, FutureExt};

use crate::core::Timer;

/// Timer backed by a short-lived OS thread per delay.
///
/// Needs no async runtime, so it pairs with any [`Spawn`](crate::core::Spawn)
/// implementation. This is the builder's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadTimer;

impl Timer for ThreadTimer {
    fn delay(&self, delay: Duration) -> BoxFuture<'static, ()> {
        let (tx, rx) = oneshot::channel::<()>();
        let spawned = thread::Builder::new()
            .name("deferred-loader-timer".into())
            .spawn(move || {
                thread::sleep(delay);
                let _ = tx.send(());
            });
        match spawned {
            Ok(_) => async move {
                let _ = rx.await;
            }
            .boxed(),
            Err(err) => {
                tracing::warn!(error = %err, "timer thread unavailable; firing immediately");
                future::ready(()).boxed()
            }
        }
    }
}

/// Timer driven by a tokio runtime's time driver.
#[cfg(feature = "tokio-runtime")]
#[derive(Clone)]
pub struct TokioTimer {
    handle: tokio::runtime::Handle,
}

#[cfg(feature = "tokio-runtime")]
impl TokioTimer {
    /// Timer on the runtime behind `handle`. The runtime must enable time.
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Timer for the runtime the caller is running on.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }
}

#[cfg(feature = "tokio-runtime")]
impl Timer for TokioTimer {
    fn delay(&self, delay: Duration) -> BoxFuture<'static, ()> {
        let _guard = self.handle.enter();
        tokio::time::sleep(delay).boxed()
    }
}
