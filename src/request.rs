// SPDX-License-Identifier: MPL-2.0
//! Core notification data structures.
//!
//! This module defines the [`NotificationRequest`] callers build, the
//! [`Notification`] record the registry posts from it, and the small enums
//! ([`Kind`], [`Severity`], [`DisplayDuration`], [`RequestState`]) that drive
//! scheduling decisions.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Unique identifier for a posted notification.
///
/// Identifiers are handed out from a process-wide counter while the registry
/// lock is held, so they are unique for the lifetime of the process and their
/// numeric order matches enqueue order within a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationId(u64);

impl NotificationId {
    /// Creates the next unique notification ID.
    pub(crate) fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The notification kind, selecting its display policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Kind {
    /// Stacked notifications; several may be visible at once.
    #[default]
    Toast,
    /// Single-slot notifications; strictly one at a time.
    Snackbar,
}

/// Severity level, passed through to the renderer untouched.
///
/// Severity has no scheduling effect beyond selecting which default duration
/// tier applies when the request does not carry an explicit duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Neutral message with no particular tone.
    #[default]
    Default,
    /// Informational message.
    Info,
    /// Operation completed successfully.
    Success,
    /// Warning that doesn't block operation.
    Warning,
    /// Error requiring attention (no auto-dismiss by default).
    Error,
}

/// How long a notification stays on screen once active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayDuration {
    /// Auto-dismiss after the given time.
    Finite(Duration),
    /// No auto-dismiss; removed only by manual or programmatic dismissal.
    Indefinite,
}

impl DisplayDuration {
    /// Returns the finite duration, or `None` for `Indefinite`.
    #[must_use]
    pub fn finite(self) -> Option<Duration> {
        match self {
            DisplayDuration::Finite(d) => Some(d),
            DisplayDuration::Indefinite => None,
        }
    }
}

/// Observable lifecycle state of a posted notification.
///
/// Transitions are one-directional: `Pending -> Active -> Removed` (pending
/// requests may skip straight to `Removed` when dismissed before promotion).
/// Dismissal of an active request is atomic — its timer cancellation and
/// removal happen within one critical section, so no intermediate state is
/// ever observable from outside.
///
/// A removed notification is dropped from all registry structures; no
/// tombstones are retained. IDs are never reused, so `Removed` is the
/// accurate final answer for any ID a `show` call once returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Enqueued, waiting for display capacity.
    Pending,
    /// Currently eligible for display.
    Active,
    /// Gone from the registry.
    Removed,
}

/// An optional action attached to a notification.
///
/// Invoking the action through the manager runs the callback and then
/// dismisses the notification as a side effect.
#[derive(Clone)]
pub struct NotificationAction {
    label: String,
    callback: Arc<dyn Fn() + Send + Sync>,
}

impl NotificationAction {
    /// Creates an action with a label and a callback.
    pub fn new(label: impl Into<String>, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            callback: Arc::new(callback),
        }
    }

    /// Returns the action label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Runs the action callback.
    pub fn invoke(&self) {
        (self.callback)();
    }
}

impl fmt::Debug for NotificationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// A notification request as built by the caller.
///
/// The request carries no identity; an ID and a creation timestamp are
/// assigned when the registry enqueues it. When `duration` is left unset the
/// severity's default tier from the center configuration applies.
#[derive(Debug, Clone)]
pub struct NotificationRequest {
    kind: Kind,
    severity: Severity,
    message: String,
    duration: Option<DisplayDuration>,
    action: Option<NotificationAction>,
    dismissible: bool,
}

impl NotificationRequest {
    /// Creates a request with the given kind and message.
    pub fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Default,
            message: message.into(),
            duration: None,
            action: None,
            dismissible: true,
        }
    }

    /// Creates a toast request.
    pub fn toast(message: impl Into<String>) -> Self {
        Self::new(Kind::Toast, message)
    }

    /// Creates a snackbar request.
    pub fn snackbar(message: impl Into<String>) -> Self {
        Self::new(Kind::Snackbar, message)
    }

    /// Sets the severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets an explicit display duration, overriding the severity default.
    #[must_use]
    pub fn with_duration(mut self, duration: DisplayDuration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Attaches an action with a label and a callback.
    #[must_use]
    pub fn with_action(
        mut self,
        label: impl Into<String>,
        callback: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        self.action = Some(NotificationAction::new(label, callback));
        self
    }

    /// Marks the request as not dismissible by the user.
    ///
    /// Programmatic dismissal is always allowed regardless of this flag.
    #[must_use]
    pub fn not_dismissible(mut self) -> Self {
        self.dismissible = false;
        self
    }

    /// Returns the kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the display text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the explicit duration, if one was set.
    #[must_use]
    pub fn duration(&self) -> Option<DisplayDuration> {
        self.duration
    }
}

/// A posted notification, as tracked by the registry and handed to the
/// renderer in active-set snapshots.
#[derive(Debug, Clone)]
pub struct Notification {
    id: NotificationId,
    kind: Kind,
    severity: Severity,
    message: String,
    duration: DisplayDuration,
    action: Option<NotificationAction>,
    dismissible: bool,
    created_at: Instant,
}

impl Notification {
    /// Posts a request: stamps it with an ID, a monotonic creation time, and
    /// its resolved display duration.
    pub(crate) fn post(request: NotificationRequest, duration: DisplayDuration) -> Self {
        Self {
            id: NotificationId::next(),
            kind: request.kind,
            severity: request.severity,
            message: request.message,
            duration,
            action: request.action,
            dismissible: request.dismissible,
            created_at: Instant::now(),
        }
    }

    /// Returns the unique ID.
    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the display text.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the resolved display duration.
    #[must_use]
    pub fn duration(&self) -> DisplayDuration {
        self.duration
    }

    /// Returns the attached action, if any.
    #[must_use]
    pub fn action(&self) -> Option<&NotificationAction> {
        self.action.as_ref()
    }

    /// Returns whether the user may dismiss this notification early.
    #[must_use]
    pub fn dismissible(&self) -> bool {
        self.dismissible
    }

    /// Returns how long ago this notification was enqueued (monotonic).
    #[must_use]
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}
