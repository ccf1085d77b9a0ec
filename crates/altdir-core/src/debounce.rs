// Debounced async operations with generation tokens
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

/// Ticket for one scheduled or immediate operation
///
/// Holds the generation number it was issued with. Anything issued later
/// makes it stale, which is how late responses get recognised and dropped.
#[derive(Debug, Clone)]
pub struct Generation {
    value: u64,
    counter: Arc<AtomicU64>,
}

impl Generation {
    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.value
    }
}

/// Runs only the trailing call after a quiet period
///
/// Every `schedule` cancels the previous timer (and the work it may have
/// started) before arming a new one.
pub struct Debouncer {
    delay: Duration,
    counter: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            counter: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Cancel whatever is pending and hand out a fresh generation
    ///
    /// Used directly for work that should run right now (submit on enter).
    pub fn begin(&self) -> Generation {
        let mut pending = self.lock_pending();
        self.advance(&mut pending)
    }

    /// Run `task` after the quiet period unless something newer comes along first
    pub fn schedule<F, Fut>(&self, task: F) -> Generation
    where
        F: FnOnce(Generation) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.lock_pending();
        let generation = self.advance(&mut pending);

        let token = generation.clone();
        let delay = self.delay;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if token.is_current() {
                task(token).await;
            }
        }));

        generation
    }

    /// Drop the pending call, if any, and invalidate outstanding generations
    pub fn cancel(&self) {
        self.begin();
    }

    /// A timer is armed or its task is still running
    pub fn is_pending(&self) -> bool {
        self.lock_pending()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn advance(&self, pending: &mut Option<JoinHandle<()>>) -> Generation {
        if let Some(handle) = pending.take() {
            handle.abort();
        }
        let value = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        trace!("Debouncer advanced to generation {}", value);
        Generation {
            value,
            counter: Arc::clone(&self.counter),
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        // Nothing we store can be left half-updated, so a poisoned lock is still usable
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(handle) = self.lock_pending().take() {
            handle.abort();
        }
    }
}
