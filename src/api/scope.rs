//! Request-scope cancellation.
//!
//! Every request is raced against a [`CancelScope`] tied to the
//! requesting view's lifetime. When the view goes away it cancels its
//! scope; in-flight requests resolve to `ApiError::Cancelled` and, in
//! particular, never write their late responses into the cache.

use tokio::sync::watch;

/// Cancels the scopes cloned from it. Held by the owner of the view's
/// lifetime.
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Cancellation signal passed into every request.
#[derive(Clone)]
pub struct CancelScope {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelScope {
    /// A handle/scope pair for one view lifetime.
    pub fn new() -> (CancelHandle, CancelScope) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { tx }, CancelScope { rx: Some(rx) })
    }

    /// A scope that never fires, for callers without a view lifetime
    /// (startup tasks, scripts).
    pub fn detached() -> CancelScope {
        CancelScope { rx: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves when the scope is cancelled; pends forever for
    /// detached scopes or when the handle is dropped without firing.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.rx else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        if *rx.borrow() {
            return;
        }
        while rx.changed().await.is_ok() {
            if *rx.borrow() {
                return;
            }
        }
        // Handle dropped without cancelling: never fire.
        std::future::pending().await
    }
}
