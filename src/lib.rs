// SPDX-License-Identifier: MPL-2.0
//! `toastbox` is the scheduling core behind global toast and snackbar
//! subsystems: a process-wide, concurrency-safe service that accepts
//! notification requests from arbitrary callers, serializes them against
//! the currently displayed state, enforces per-kind display policy, and
//! manages auto-dismissal timing.
//!
//! The core does not know how a notification looks. It only knows what
//! exists, in what order, for how long, and when it must disappear; a
//! renderer implements [`HostBinding`] and draws from the snapshots it is
//! handed.
//!
//! # Components
//!
//! - [`request`] - `NotificationRequest` builder and the posted
//!   `Notification` record
//! - [`policy`] - per-kind capacity rules (stacked toasts, single-slot
//!   snackbars)
//! - [`center`] - `NotificationCenter`, the caller-facing service
//! - [`global`] - process-wide instance and scoped overrides for tests
//!
//! # Usage
//!
//! ```no_run
//! use toastbox::{global, CenterConfig, NotificationRequest};
//!
//! # async fn setup() -> toastbox::Result<()> {
//! // Bind the process-wide center once at startup.
//! let center = global::init(CenterConfig::default())?;
//!
//! // From anywhere in the process:
//! center.show_success("Image saved")?;
//! let id = center.show(NotificationRequest::snackbar("Upload failed").with_action(
//!     "Retry",
//!     || { /* re-run the upload */ },
//! ))?;
//!
//! // Later, e.g. on navigation teardown:
//! center.dismiss(id);
//! # Ok(())
//! # }
//! ```
//!
//! # Scheduling model
//!
//! - Toasts stack up to a configurable limit (default 3); further requests
//!   queue and are promoted strictly FIFO as slots free up.
//! - Snackbars hold a single slot with strict handoff; severity never
//!   jumps the queue.
//! - Requests are never dropped for capacity reasons; `show` fails only on
//!   caller error (empty message) or an uninitialized global center.

#![doc(html_root_url = "https://docs.rs/toastbox/0.1.0")]

pub mod center;
pub mod config;
pub mod error;
pub mod global;
pub mod host;
pub mod policy;
pub mod request;
pub mod sink;

mod registry;
mod scheduler;

pub use center::NotificationCenter;
pub use config::{CenterConfig, DurationDefaults, DEFAULT_TOAST_MAX_CONCURRENT};
pub use error::{Error, Result};
pub use host::HostBinding;
pub use policy::DisplayPolicy;
pub use request::{
    DisplayDuration, Kind, Notification, NotificationAction, NotificationId, NotificationRequest,
    RequestState, Severity,
};
pub use sink::ErrorSink;
