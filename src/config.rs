// SPDX-License-Identifier: MPL-2.0
//! Notification center configuration.
//!
//! All knobs are set programmatically by the embedder at construction time;
//! there is no settings file. Values are clamped to sane bounds so a
//! misconfigured embedder cannot wedge the scheduler.

use std::time::Duration;

use crate::policy::DisplayPolicy;
use crate::request::{DisplayDuration, Kind, Severity};
use crate::sink::ErrorSink;

/// Default maximum number of simultaneously visible toasts.
pub const DEFAULT_TOAST_MAX_CONCURRENT: usize = 3;

/// Default duration for `Default`, `Info`, and `Success` notifications.
pub const DEFAULT_BRIEF_DURATION: Duration = Duration::from_secs(3);

/// Default duration for `Warning` notifications.
pub const DEFAULT_WARNING_DURATION: Duration = Duration::from_secs(5);

/// Default display durations per severity tier.
///
/// Errors default to `Indefinite`: they stay until dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationDefaults {
    /// Duration for `Default`, `Info`, and `Success`.
    pub brief: DisplayDuration,
    /// Duration for `Warning`.
    pub warning: DisplayDuration,
    /// Duration for `Error`.
    pub error: DisplayDuration,
}

impl Default for DurationDefaults {
    fn default() -> Self {
        Self {
            brief: DisplayDuration::Finite(DEFAULT_BRIEF_DURATION),
            warning: DisplayDuration::Finite(DEFAULT_WARNING_DURATION),
            error: DisplayDuration::Indefinite,
        }
    }
}

impl DurationDefaults {
    /// Returns the default duration for a severity tier.
    #[must_use]
    pub fn for_severity(&self, severity: Severity) -> DisplayDuration {
        match severity {
            Severity::Default | Severity::Info | Severity::Success => self.brief,
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }
}

/// Configuration for a [`NotificationCenter`](crate::center::NotificationCenter).
#[derive(Debug, Clone)]
pub struct CenterConfig {
    /// Maximum simultaneously visible toasts (clamped to at least 1).
    pub toast_max_concurrent: usize,

    /// Default display durations per severity tier.
    pub durations: DurationDefaults,

    /// Sink for fire-and-forget and host-binding failures.
    pub error_sink: ErrorSink,
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            toast_max_concurrent: DEFAULT_TOAST_MAX_CONCURRENT,
            durations: DurationDefaults::default(),
            error_sink: ErrorSink::default(),
        }
    }
}

impl CenterConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of simultaneously visible toasts.
    #[must_use]
    pub fn with_toast_max_concurrent(mut self, max: usize) -> Self {
        self.toast_max_concurrent = max.max(1);
        self
    }

    /// Sets the per-severity default durations.
    #[must_use]
    pub fn with_durations(mut self, durations: DurationDefaults) -> Self {
        self.durations = durations;
        self
    }

    /// Sets the error sink.
    #[must_use]
    pub fn with_error_sink(mut self, sink: ErrorSink) -> Self {
        self.error_sink = sink;
        self
    }

    /// Returns the display policy for a kind.
    #[must_use]
    pub fn policy(&self, kind: Kind) -> DisplayPolicy {
        match kind {
            Kind::Toast => DisplayPolicy::Stacked {
                max_concurrent: self.toast_max_concurrent.max(1),
            },
            Kind::Snackbar => DisplayPolicy::SingleSlot,
        }
    }
}
