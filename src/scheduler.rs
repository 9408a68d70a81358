// SPDX-License-Identifier: MPL-2.0
//! Auto-dismissal timers.
//!
//! The scheduler owns one cancellable delayed action per active,
//! finite-duration notification. Each timer carries a cancellation token
//! that is checked-and-cleared atomically when the timer fires, so a fired
//! timer and a concurrent manual dismissal cannot double-process the same
//! request. Timers run on the tokio runtime; callers of `start`/`cancel`
//! never block on timer duration.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::request::NotificationId;

struct TimerEntry {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl TimerEntry {
    fn cancel(self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.task.abort();
    }
}

/// Per-notification dismissal timer table.
pub(crate) struct DismissalScheduler {
    runtime: Handle,
    timers: Mutex<HashMap<NotificationId, TimerEntry>>,
}

impl DismissalScheduler {
    pub(crate) fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            timers: Mutex::new(HashMap::new()),
        }
    }

    fn table(&self) -> std::sync::MutexGuard<'_, HashMap<NotificationId, TimerEntry>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Starts a dismissal timer for `id`, invoking `on_expiry` after `delay`
    /// unless cancelled first.
    pub(crate) fn start<F>(&self, id: NotificationId, delay: Duration, on_expiry: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let cancelled = Arc::new(AtomicBool::new(false));
        let token = Arc::clone(&cancelled);
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            // Check-and-clear: once the token flips, neither a late cancel
            // nor a second observer can process this timer again.
            if token.swap(true, Ordering::SeqCst) {
                return;
            }
            on_expiry();
        });

        // IDs are never reused and each gets at most one timer, on
        // promotion, so the slot must be empty.
        let previous = self.table().insert(id, TimerEntry { cancelled, task });
        debug_assert!(previous.is_none(), "duplicate timer for {id}");
    }

    /// Cancels the timer for `id`, if one exists. Idempotent; cancelling a
    /// timer that already fired is a safe no-op.
    pub(crate) fn cancel(&self, id: NotificationId) {
        if let Some(entry) = self.table().remove(&id) {
            entry.cancel();
        }
    }

    /// Returns whether a timer entry exists for `id`.
    #[cfg(test)]
    pub(crate) fn has_timer(&self, id: NotificationId) -> bool {
        self.table().contains_key(&id)
    }
}

impl Drop for DismissalScheduler {
    fn drop(&mut self) {
        for (_, entry) in self.table().drain() {
            entry.cancel();
        }
    }
}

impl std::fmt::Debug for DismissalScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DismissalScheduler")
            .field("timers", &self.table().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn fired_flag() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
        let fired = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&fired);
        (fired, move || {
            flag.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[tokio::test(start_paused = true)]
    async fn timer_fires_after_delay() {
        let scheduler = DismissalScheduler::new(Handle::current());
        let id = NotificationId::next();
        let (fired, on_expiry) = fired_flag();

        scheduler.start(id, Duration::from_millis(100), on_expiry);
        assert!(scheduler.has_timer(id));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_fires() {
        let scheduler = DismissalScheduler::new(Handle::current());
        let id = NotificationId::next();
        let (fired, on_expiry) = fired_flag();

        scheduler.start(id, Duration::from_millis(100), on_expiry);
        tokio::time::sleep(Duration::from_millis(50)).await;
        scheduler.cancel(id);
        assert!(!scheduler.has_timer(id));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent() {
        let scheduler = DismissalScheduler::new(Handle::current());
        let id = NotificationId::next();
        let (fired, on_expiry) = fired_flag();

        scheduler.start(id, Duration::from_millis(100), on_expiry);
        scheduler.cancel(id);
        scheduler.cancel(id);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_after_fire_is_a_no_op() {
        let scheduler = DismissalScheduler::new(Handle::current());
        let id = NotificationId::next();
        let (fired, on_expiry) = fired_flag();

        scheduler.start(id, Duration::from_millis(10), on_expiry);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        scheduler.cancel(id);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_outstanding_timers() {
        let id = NotificationId::next();
        let (fired, on_expiry) = fired_flag();

        {
            let scheduler = DismissalScheduler::new(Handle::current());
            scheduler.start(id, Duration::from_millis(100), on_expiry);
        }

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
