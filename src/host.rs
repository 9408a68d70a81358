// SPDX-License-Identifier: MPL-2.0
//! Renderer-side host binding contract.
//!
//! The core never touches GUI framework objects; this narrow callback
//! interface is the only surface it notifies. The renderer implements it
//! and marshals the call onto its own rendering context.

use crate::request::{Kind, Notification};

/// Callback contract implemented by the renderer.
///
/// `on_active_set_changed` is invoked at most once per mutating operation
/// per affected kind, from whatever thread or task performed the mutation.
/// Each call means "re-read the current snapshot", not a delta: concurrent
/// mutations may be coalesced, but the provided set always reflects a state
/// at least as recent as the mutation that triggered the call.
///
/// A panicking implementation is caught at the boundary, reported through
/// the configured error sink, and never corrupts registry state.
pub trait HostBinding: Send + Sync {
    /// Notifies the renderer that the active set of `kind` changed.
    /// `active` is ordered oldest-first.
    fn on_active_set_changed(&self, kind: Kind, active: &[Notification]);
}
