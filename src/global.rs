// SPDX-License-Identifier: MPL-2.0
//! Process-wide center and scoped overrides.
//!
//! The "global singleton" is just one ordinary [`NotificationCenter`] bound
//! at startup via [`init`]. Call sites resolve a center through [`current`],
//! which prefers the innermost scoped override on the calling thread, so
//! tests and isolated UI subtrees can bind an independent registry and
//! scheduler without changing call sites.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::OnceLock;

use crate::center::NotificationCenter;
use crate::config::CenterConfig;
use crate::error::{Error, Result};

static GLOBAL: OnceLock<NotificationCenter> = OnceLock::new();

thread_local! {
    static OVERRIDES: RefCell<Vec<NotificationCenter>> = const { RefCell::new(Vec::new()) };
}

/// Binds the process-wide center. Call once at startup, within a tokio
/// runtime context.
///
/// Returns the bound center for convenience.
///
/// # Errors
///
/// Returns [`Error::AlreadyInitialized`] on a second call.
pub fn init(config: CenterConfig) -> Result<NotificationCenter> {
    let center = NotificationCenter::new(config);
    GLOBAL
        .set(center.clone())
        .map_err(|_| Error::AlreadyInitialized)?;
    Ok(center)
}

/// Returns the process-wide center.
///
/// # Errors
///
/// Returns [`Error::Uninitialized`] before [`init`] — using the center
/// before initialization is an explicit failure, never a silent no-op.
pub fn global() -> Result<NotificationCenter> {
    GLOBAL.get().cloned().ok_or(Error::Uninitialized)
}

/// Resolves the center for the calling thread: the innermost scoped
/// override if one is installed, otherwise the process-wide center.
///
/// # Errors
///
/// Returns [`Error::Uninitialized`] when no override is installed and
/// [`init`] has not run.
pub fn current() -> Result<NotificationCenter> {
    let overridden = OVERRIDES.with(|stack| stack.borrow().last().cloned());
    match overridden {
        Some(center) => Ok(center),
        None => global(),
    }
}

/// Guard keeping a scoped override installed; uninstalls on drop.
///
/// Not `Send`: the override is thread-local and the guard must be dropped
/// on the thread that created it.
#[must_use = "the override is uninstalled when the guard is dropped"]
pub struct ScopeGuard {
    _thread_bound: PhantomData<*const ()>,
}

/// Installs `center` as the calling thread's override for the lifetime of
/// the returned guard. Overrides nest; the innermost wins.
pub fn scoped(center: NotificationCenter) -> ScopeGuard {
    OVERRIDES.with(|stack| stack.borrow_mut().push(center));
    ScopeGuard {
        _thread_bound: PhantomData,
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        OVERRIDES.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}
