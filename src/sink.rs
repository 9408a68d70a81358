// SPDX-License-Identifier: MPL-2.0
//! Error sink for failures that must not cross the caller boundary.
//!
//! Fire-and-forget `show` failures and host-binding panics are reported
//! here instead of propagating. The sink is a cheap-to-clone handle around
//! an injected callback; the default sink writes to the `log` facade.

use std::fmt;
use std::sync::Arc;

use crate::error::Error;

/// Cheap-clone handle delivering internal failures to the embedder.
///
/// Reporting never blocks and never panics the reporting context.
#[derive(Clone)]
pub struct ErrorSink {
    report: Arc<dyn Fn(&Error) + Send + Sync>,
}

impl ErrorSink {
    /// Creates a sink from a callback.
    pub fn new(report: impl Fn(&Error) + Send + Sync + 'static) -> Self {
        Self {
            report: Arc::new(report),
        }
    }

    /// Reports an error through the sink.
    pub fn report(&self, error: &Error) {
        (self.report)(error);
    }
}

impl Default for ErrorSink {
    /// A sink that logs errors via `log::error!`.
    fn default() -> Self {
        Self::new(|error| log::error!("notification failure: {}", error))
    }
}

impl fmt::Debug for ErrorSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorSink").finish_non_exhaustive()
    }
}
