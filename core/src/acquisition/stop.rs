use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// One-shot cancellation signal for a session. Set once, observed by every
/// wait loop: polled via `is_set` inside status polls and awaited via
/// `cancelled` at suspension points.
#[derive(Clone, Default)]
pub struct StopSignal {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    stopped: AtomicBool,
    notify: Notify,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) {
        self.inner.stopped.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_set(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    /// Resolves once the signal is set; immediately if it already is.
    pub async fn cancelled(&self) {
        loop {
            let notified = self.inner.notify.notified();
            if self.is_set() {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn set_is_sticky_and_visible_to_clones() {
        let signal = StopSignal::new();
        let observer = signal.clone();
        assert!(!observer.is_set());
        signal.set();
        assert!(observer.is_set());
        signal.set();
        assert!(observer.is_set());
    }

    #[tokio::test]
    async fn cancelled_wakes_a_pending_waiter() {
        let signal = StopSignal::new();
        let observer = signal.clone();
        let waiter = tokio::spawn(async move { observer.cancelled().await });
        tokio::time::sleep(Duration::from_millis(5)).await;
        signal.set();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should resolve after set")
            .expect("waiter task should not panic");
    }

    #[tokio::test]
    async fn cancelled_resolves_immediately_when_already_set() {
        let signal = StopSignal::new();
        signal.set();
        tokio::time::timeout(Duration::from_millis(50), signal.cancelled())
            .await
            .expect("already-set signal should resolve at once");
    }
}
