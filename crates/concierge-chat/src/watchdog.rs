//! Restartable inactivity timer.
//!
//! Runs on the tokio timer, so tests drive it with a paused clock
//! (`tokio::time::pause` / `advance`) instead of sleeping.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Fires a callback once after a period with no [`reset`](Self::reset).
///
/// Every `reset` cancels the pending timer and arms a new one. The callback
/// runs at most once per arming. Dropping the watchdog disarms it.
pub struct InactivityWatchdog {
    timeout: Duration,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    deadline: Option<Instant>,
    on_idle: Arc<dyn Fn() + Send + Sync>,
}

impl InactivityWatchdog {
    /// Idle window used by the chat widget.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

    /// Create a disarmed watchdog. Must be armed from within a tokio runtime.
    pub fn new(timeout: Duration, on_idle: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            timeout,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
            deadline: None,
            on_idle: Arc::new(on_idle),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Cancel any pending timer and start a fresh idle window.
    pub fn reset(&mut self) {
        self.disarm();
        let armed = self.generation.load(Ordering::SeqCst);
        let generation = Arc::clone(&self.generation);
        let on_idle = Arc::clone(&self.on_idle);
        let deadline = Instant::now() + self.timeout;
        self.deadline = Some(deadline);

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            // A reset that raced the wake-up bumps the generation.
            if generation.load(Ordering::SeqCst) == armed {
                tracing::debug!("Inactivity watchdog fired");
                on_idle();
            }
        }));
    }

    /// Cancel the pending timer, if any.
    pub fn disarm(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.deadline = None;
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether the current idle window has run out.
    ///
    /// Callbacks that take a lock shared with `reset` should re-check this
    /// once they hold it, since a reset may land between wake-up and lock.
    pub fn is_expired(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Whether a timer is pending and has not fired yet.
    pub fn is_armed(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for InactivityWatchdog {
    fn drop(&mut self) {
        self.disarm();
    }
}

impl std::fmt::Debug for InactivityWatchdog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InactivityWatchdog")
            .field("timeout", &self.timeout)
            .field("armed", &self.is_armed())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
