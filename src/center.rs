// SPDX-License-Identifier: MPL-2.0
//! Notification center: the public-facing service.
//!
//! The center composes the registry and the dismissal scheduler behind one
//! mutex and exposes the caller-facing API: blocking-style `show`,
//! fire-and-forget `show_detached`, severity convenience wrappers,
//! targeted and bulk dismissal, and host attachment.
//!
//! # Locking
//!
//! A single mutex guards the registry. It is held only for a state mutation
//! plus promotion bookkeeping (including timer registration) and never
//! across an await, so timer callbacks that re-enter `dismiss` cannot
//! deadlock. Host notification happens after the lock is released.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use log::warn;
use tokio::runtime::Handle;

use crate::config::CenterConfig;
use crate::error::{Error, Result};
use crate::host::HostBinding;
use crate::registry::{Registry, TimerStarts};
use crate::request::{
    Kind, Notification, NotificationId, NotificationRequest, RequestState, Severity,
};
use crate::scheduler::DismissalScheduler;

struct Shared {
    config: CenterConfig,
    registry: Mutex<Registry>,
    scheduler: DismissalScheduler,
    host: Mutex<Option<Arc<dyn HostBinding>>>,
    runtime: Handle,
}

/// Process-wide access point for showing and dismissing notifications.
///
/// Cheap to clone; clones share the same registry and scheduler. Multiple
/// tasks and threads may call into a center concurrently.
#[derive(Clone)]
pub struct NotificationCenter {
    shared: Arc<Shared>,
}

impl NotificationCenter {
    /// Creates a center on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime context. Use
    /// [`NotificationCenter::with_runtime`] to pass a handle explicitly.
    #[must_use]
    pub fn new(config: CenterConfig) -> Self {
        Self::with_runtime(config, Handle::current())
    }

    /// Creates a center that spawns its timers and detached work on the
    /// given runtime handle.
    #[must_use]
    pub fn with_runtime(config: CenterConfig, runtime: Handle) -> Self {
        let registry = Registry::new(
            config.policy(Kind::Toast),
            config.policy(Kind::Snackbar),
            config.durations,
        );
        Self {
            shared: Arc::new(Shared {
                scheduler: DismissalScheduler::new(runtime.clone()),
                registry: Mutex::new(registry),
                host: Mutex::new(None),
                config,
                runtime,
            }),
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.shared
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Shows a notification. Returns its ID whether or not it was promoted
    /// immediately; requests beyond capacity queue, they are never dropped.
    ///
    /// Blocks the caller only for lock acquisition, never for display or
    /// dismissal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] if the message is empty.
    pub fn show(&self, request: NotificationRequest) -> Result<NotificationId> {
        if request.message().trim().is_empty() {
            return Err(Error::InvalidRequest("message is empty".to_string()));
        }

        let kind = request.kind();
        let effect = {
            let mut registry = self.registry();
            let effect = registry.enqueue(request);
            // Timer start happens inside the critical section so two racing
            // enqueues cannot promote past a kind's capacity.
            self.start_timers(&effect.timers);
            effect
        };

        if effect.active_changed {
            self.notify(kind);
        }
        Ok(effect.id)
    }

    /// Fire-and-forget `show` for non-async, non-blocking call sites such
    /// as event handlers.
    ///
    /// The request is enqueued on a background task; failures are reported
    /// through the configured error sink and never propagate to the caller.
    /// Use [`NotificationCenter::show_detached_with`] when the call site
    /// needs the assigned ID or the outcome.
    pub fn show_detached(&self, request: NotificationRequest) {
        self.show_detached_with(request, |_| {});
    }

    /// Fire-and-forget `show` with a completion callback.
    ///
    /// `on_complete` receives the assigned ID on success (so an event
    /// handler showing an `Indefinite` snackbar can still target-dismiss it
    /// later) or the validation error on failure. Failures additionally
    /// flow to the configured error sink; nothing propagates to the caller.
    pub fn show_detached_with(
        &self,
        request: NotificationRequest,
        on_complete: impl FnOnce(Result<NotificationId>) + Send + 'static,
    ) {
        let center = self.clone();
        self.shared.runtime.spawn(async move {
            let result = center.show(request);
            if let Err(error) = &result {
                center.shared.config.error_sink.report(error);
            }
            on_complete(result);
        });
    }

    /// Shows a success toast.
    pub fn show_success(&self, message: impl Into<String>) -> Result<NotificationId> {
        self.show(NotificationRequest::toast(message).with_severity(Severity::Success))
    }

    /// Shows an info toast.
    pub fn show_info(&self, message: impl Into<String>) -> Result<NotificationId> {
        self.show(NotificationRequest::toast(message).with_severity(Severity::Info))
    }

    /// Shows a warning toast.
    pub fn show_warning(&self, message: impl Into<String>) -> Result<NotificationId> {
        self.show(NotificationRequest::toast(message).with_severity(Severity::Warning))
    }

    /// Shows an error toast.
    pub fn show_error(&self, message: impl Into<String>) -> Result<NotificationId> {
        self.show(NotificationRequest::toast(message).with_severity(Severity::Error))
    }

    /// Shows an error toast built from an error value.
    ///
    /// Uses the error's display text as the message, falling back to a
    /// fixed non-empty string when it displays as empty.
    pub fn show_error_from(&self, source: &dyn std::error::Error) -> Result<NotificationId> {
        let mut message = source.to_string();
        if message.trim().is_empty() {
            message = "unexpected error".to_string();
        }
        self.show_error(message)
    }

    /// Programmatically dismisses a notification by ID. Idempotent: returns
    /// `false` for unknown or already-removed IDs, without side effects.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        let effect = {
            let mut registry = self.registry();
            let effect = registry.dismiss(id);
            for &timer in &effect.cancel_timers {
                self.shared.scheduler.cancel(timer);
            }
            self.start_timers(&effect.timers);
            effect
        };

        if effect.active_changed {
            if let Some(kind) = effect.kind {
                self.notify(kind);
            }
        }
        effect.removed
    }

    /// User-initiated dismissal (swipe, tap). Honors the request's
    /// `dismissible` flag: returns `false` without side effects when the
    /// request opted out of early dismissal.
    pub fn dismiss_by_user(&self, id: NotificationId) -> bool {
        let effect = {
            let mut registry = self.registry();
            if registry.is_dismissible(id) != Some(true) {
                return false;
            }
            let effect = registry.dismiss(id);
            for &timer in &effect.cancel_timers {
                self.shared.scheduler.cancel(timer);
            }
            self.start_timers(&effect.timers);
            effect
        };

        if effect.active_changed {
            if let Some(kind) = effect.kind {
                self.notify(kind);
            }
        }
        effect.removed
    }

    /// Dismisses every active and pending notification, optionally filtered
    /// by kind. Intended for screen or navigation teardown.
    pub fn dismiss_all(&self, kind: Option<Kind>) {
        let effect = {
            let mut registry = self.registry();
            let effect = registry.dismiss_all(kind);
            for &timer in &effect.cancel_timers {
                self.shared.scheduler.cancel(timer);
            }
            effect
        };

        for kind in effect.changed {
            self.notify(kind);
        }
    }

    /// Runs a notification's action callback, then dismisses it.
    ///
    /// Dismissal happens even when the request has no action, and even when
    /// the callback panics (the panic is contained and reported through the
    /// error sink).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownId`] if the ID names no live notification.
    pub fn invoke_action(&self, id: NotificationId) -> Result<()> {
        let action = {
            let registry = self.registry();
            if registry.state_of(id) == RequestState::Removed {
                return Err(Error::UnknownId(id));
            }
            registry.action_of(id)
        };

        if let Some(action) = action {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| action.invoke())) {
                let error = Error::CallbackPanicked(panic_message(panic.as_ref()));
                warn!("action callback for {} panicked", id);
                self.shared.config.error_sink.report(&error);
            }
        }

        self.dismiss(id);
        Ok(())
    }

    /// Attaches the renderer-side host and immediately pushes the current
    /// active-set snapshot for both kinds, so notifications shown before
    /// attachment are not silently lost.
    pub fn attach_host(&self, host: Arc<dyn HostBinding>) {
        {
            let mut slot = self
                .shared
                .host
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            *slot = Some(host);
        }
        self.notify(Kind::Toast);
        self.notify(Kind::Snackbar);
    }

    /// Detaches the host. Registry state is left intact; a later
    /// `attach_host` receives a fresh snapshot.
    pub fn detach_host(&self) {
        let mut slot = self
            .shared
            .host
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *slot = None;
    }

    /// Read-only snapshot of the active set for a kind, oldest first.
    #[must_use]
    pub fn active_snapshot(&self, kind: Kind) -> Vec<Notification> {
        self.registry().active_snapshot(kind)
    }

    /// Number of active notifications of a kind.
    #[must_use]
    pub fn active_count(&self, kind: Kind) -> usize {
        self.registry().active_count(kind)
    }

    /// Number of pending notifications of a kind.
    #[must_use]
    pub fn pending_count(&self, kind: Kind) -> usize {
        self.registry().pending_count(kind)
    }

    /// Returns the lifecycle state of a notification. IDs are never reused,
    /// so `Removed` is final for any ID a `show` call once returned.
    #[must_use]
    pub fn state_of(&self, id: NotificationId) -> RequestState {
        self.registry().state_of(id)
    }

    /// Registers dismissal timers for freshly promoted requests. Called
    /// while the registry lock is held; spawning is non-blocking.
    fn start_timers(&self, timers: &TimerStarts) {
        for &(id, delay) in timers {
            let weak = Arc::downgrade(&self.shared);
            self.shared.scheduler.start(id, delay, move || {
                Self::timer_expired(&weak, id);
            });
        }
    }

    /// Timer expiry callback: re-enters `dismiss` through a weak handle so
    /// an abandoned center never receives late fires.
    fn timer_expired(shared: &Weak<Shared>, id: NotificationId) {
        if let Some(shared) = shared.upgrade() {
            NotificationCenter { shared }.dismiss(id);
        }
    }

    /// Pushes the current active set of `kind` to the attached host, if
    /// any. The snapshot is re-read after the mutation lock is released, so
    /// it is always at least as recent as the mutation that triggered it.
    fn notify(&self, kind: Kind) {
        let host = {
            let slot = self
                .shared
                .host
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            slot.clone()
        };
        let Some(host) = host else {
            return;
        };

        let snapshot = self.registry().active_snapshot(kind);
        let result = catch_unwind(AssertUnwindSafe(|| {
            host.on_active_set_changed(kind, &snapshot);
        }));
        if let Err(panic) = result {
            let error = Error::CallbackPanicked(panic_message(panic.as_ref()));
            warn!("host binding panicked while handling {:?} update", kind);
            self.shared.config.error_sink.report(&error);
        }
    }
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("toast_active", &self.active_count(Kind::Toast))
            .field("toast_pending", &self.pending_count(Kind::Toast))
            .field("snackbar_active", &self.active_count(Kind::Snackbar))
            .field("snackbar_pending", &self.pending_count(Kind::Snackbar))
            .finish_non_exhaustive()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::DisplayDuration;
    use crate::sink::ErrorSink;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Host test double recording every signal it receives.
    #[derive(Default)]
    struct RecordingHost {
        calls: Mutex<Vec<(Kind, Vec<NotificationId>)>>,
    }

    impl RecordingHost {
        fn calls(&self) -> Vec<(Kind, Vec<NotificationId>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl HostBinding for RecordingHost {
        fn on_active_set_changed(&self, kind: Kind, active: &[Notification]) {
            let ids = active.iter().map(Notification::id).collect();
            self.calls.lock().unwrap().push((kind, ids));
        }
    }

    fn center() -> NotificationCenter {
        NotificationCenter::new(CenterConfig::default())
    }

    #[tokio::test]
    async fn empty_message_is_rejected_synchronously() {
        let center = center();
        let result = center.show(NotificationRequest::toast("   "));
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
        assert_eq!(center.active_count(Kind::Toast), 0);
    }

    #[tokio::test]
    async fn convenience_wrappers_set_severity() {
        let center = center();
        center.show_success("s").unwrap();
        center.show_info("i").unwrap();
        center.show_warning("w").unwrap();

        let severities: Vec<_> = center
            .active_snapshot(Kind::Toast)
            .iter()
            .map(Notification::severity)
            .collect();
        assert_eq!(
            severities,
            vec![Severity::Success, Severity::Info, Severity::Warning]
        );
    }

    #[tokio::test]
    async fn error_mapping_uses_display_text() {
        let center = center();
        let source = std::io::Error::other("disk full");
        let id = center.show_error_from(&source).unwrap();

        let snapshot = center.active_snapshot(Kind::Toast);
        assert_eq!(snapshot[0].id(), id);
        assert_eq!(snapshot[0].severity(), Severity::Error);
        assert_eq!(snapshot[0].message(), "disk full");
    }

    #[tokio::test]
    async fn error_mapping_falls_back_when_message_is_empty() {
        #[derive(Debug)]
        struct Silent;
        impl std::fmt::Display for Silent {
            fn fmt(&self, _: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                Ok(())
            }
        }
        impl std::error::Error for Silent {}

        let center = center();
        center.show_error_from(&Silent).unwrap();

        let snapshot = center.active_snapshot(Kind::Toast);
        assert!(!snapshot[0].message().is_empty());
        assert_eq!(snapshot[0].severity(), Severity::Error);
    }

    #[tokio::test]
    async fn attach_after_shows_pushes_current_snapshot() {
        let center = center();
        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(center.show_error(format!("toast-{i}")).unwrap());
        }

        let host = Arc::new(RecordingHost::default());
        center.attach_host(Arc::clone(&host) as Arc<dyn HostBinding>);

        let calls = host.calls();
        assert_eq!(calls.len(), 2);
        let (kind, active) = &calls[0];
        assert_eq!(*kind, Kind::Toast);
        assert_eq!(active, &ids[..3]);
        assert_eq!(center.pending_count(Kind::Toast), 2);
    }

    #[tokio::test]
    async fn one_signal_per_mutating_operation() {
        let center = center();
        let host = Arc::new(RecordingHost::default());
        center.attach_host(Arc::clone(&host) as Arc<dyn HostBinding>);
        let after_attach = host.calls().len();

        let id = center.show_success("one").unwrap();
        assert_eq!(host.calls().len(), after_attach + 1);

        center.dismiss(id);
        assert_eq!(host.calls().len(), after_attach + 2);

        // Idempotent re-dismiss emits nothing.
        center.dismiss(id);
        assert_eq!(host.calls().len(), after_attach + 2);
    }

    #[tokio::test]
    async fn enqueue_beyond_capacity_emits_no_active_signal() {
        let center = NotificationCenter::new(
            CenterConfig::new().with_toast_max_concurrent(1),
        );
        let host = Arc::new(RecordingHost::default());
        center.attach_host(Arc::clone(&host) as Arc<dyn HostBinding>);
        let baseline = host.calls().len();

        center.show_error("active").unwrap();
        center.show_error("queued").unwrap();

        // Only the first show changed the active set.
        assert_eq!(host.calls().len(), baseline + 1);
    }

    #[tokio::test]
    async fn detach_leaves_registry_intact() {
        let center = center();
        let id = center.show_error("keep me").unwrap();

        let host = Arc::new(RecordingHost::default());
        center.attach_host(Arc::clone(&host) as Arc<dyn HostBinding>);
        center.detach_host();

        assert_eq!(center.state_of(id), RequestState::Active);

        // A fresh host still sees the surviving notification.
        let second = Arc::new(RecordingHost::default());
        center.attach_host(Arc::clone(&second) as Arc<dyn HostBinding>);
        assert_eq!(second.calls()[0].1, vec![id]);
    }

    #[tokio::test]
    async fn dismiss_by_user_honors_dismissible_flag() {
        let center = center();
        let sticky = center
            .show(NotificationRequest::toast("modal-ish").not_dismissible())
            .unwrap();
        let normal = center.show(NotificationRequest::toast("normal")).unwrap();

        assert!(!center.dismiss_by_user(sticky));
        assert_eq!(center.state_of(sticky), RequestState::Active);

        assert!(center.dismiss_by_user(normal));
        assert_eq!(center.state_of(normal), RequestState::Removed);

        // Programmatic dismissal ignores the flag.
        assert!(center.dismiss(sticky));
    }

    #[tokio::test]
    async fn invoke_action_runs_callback_and_dismisses() {
        let center = center();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_in_action = Arc::clone(&hits);
        let id = center
            .show(
                NotificationRequest::snackbar("undo?")
                    .with_duration(DisplayDuration::Indefinite)
                    .with_action("Undo", move || {
                        hits_in_action.fetch_add(1, Ordering::SeqCst);
                    }),
            )
            .unwrap();

        center.invoke_action(id).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(center.state_of(id), RequestState::Removed);

        assert!(matches!(
            center.invoke_action(id),
            Err(Error::UnknownId(_))
        ));
    }

    #[tokio::test]
    async fn panicking_action_still_dismisses() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_in_sink = Arc::clone(&seen);
        let center = NotificationCenter::new(CenterConfig::new().with_error_sink(
            ErrorSink::new(move |error| {
                seen_in_sink.lock().unwrap().push(error.to_string());
            }),
        ));

        let id = center
            .show(NotificationRequest::toast("boom").with_action("Boom", || {
                panic!("action exploded");
            }))
            .unwrap();

        center.invoke_action(id).unwrap();
        assert_eq!(center.state_of(id), RequestState::Removed);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].contains("action exploded"));
    }

    #[tokio::test]
    async fn panicking_host_does_not_corrupt_state() {
        struct ExplodingHost;
        impl HostBinding for ExplodingHost {
            fn on_active_set_changed(&self, _: Kind, _: &[Notification]) {
                panic!("render failure");
            }
        }

        let seen = Arc::new(Mutex::new(0usize));
        let seen_in_sink = Arc::clone(&seen);
        let center = NotificationCenter::new(CenterConfig::new().with_error_sink(
            ErrorSink::new(move |_| {
                *seen_in_sink.lock().unwrap() += 1;
            }),
        ));

        center.attach_host(Arc::new(ExplodingHost));
        let id = center.show_error("still tracked").unwrap();

        assert_eq!(center.state_of(id), RequestState::Active);
        assert!(center.dismiss(id));
        assert_eq!(center.state_of(id), RequestState::Removed);
        assert!(*seen.lock().unwrap() >= 1);
    }

    #[tokio::test]
    async fn dismiss_all_notifies_each_changed_kind_once() {
        let center = center();
        let host = Arc::new(RecordingHost::default());
        center.show_error("t").unwrap();
        center
            .show(NotificationRequest::snackbar("s").with_duration(DisplayDuration::Indefinite))
            .unwrap();
        center.attach_host(Arc::clone(&host) as Arc<dyn HostBinding>);
        let baseline = host.calls().len();

        center.dismiss_all(None);
        let calls = host.calls();
        assert_eq!(calls.len(), baseline + 2);
        assert!(calls[baseline..].iter().all(|(_, active)| active.is_empty()));
    }
}
