//! Two-state `pending → ready` lifecycle signal.

use tokio::sync::watch;

/// One-shot readiness flag that any number of tasks can wait on.
///
/// Starts pending. [`ReadySignal::mark_ready`] flips it exactly once; later
/// calls are no-ops. Waiters that arrive after the transition return
/// immediately.
#[derive(Debug)]
pub struct ReadySignal {
    tx: watch::Sender<bool>,
}

impl ReadySignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Returns true once the signal has been marked ready.
    pub fn is_ready(&self) -> bool {
        *self.tx.borrow()
    }

    /// Marks the signal ready. Returns true only for the call that performed
    /// the transition.
    pub fn mark_ready(&self) -> bool {
        self.tx.send_if_modified(|ready| {
            if *ready {
                false
            } else {
                *ready = true;
                true
            }
        })
    }

    /// Suspends until the signal is ready.
    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so this cannot observe a close.
        let _ = rx.wait_for(|ready| *ready).await;
    }
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::new()
    }
}
