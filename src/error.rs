// SPDX-License-Identifier: MPL-2.0
use std::fmt;

use crate::request::NotificationId;

/// Errors surfaced by the notification center.
///
/// Internal scheduling races (a timer firing after manual dismissal, a
/// double dismiss) are absorbed as idempotent no-ops and never appear here;
/// only caller misuse and setup mistakes escalate.
#[derive(Debug, Clone)]
pub enum Error {
    /// The request is malformed (e.g. empty message). Surfaced synchronously
    /// to the caller, never retried.
    InvalidRequest(String),

    /// The process-wide center was used before `global::init`.
    Uninitialized,

    /// `global::init` was called a second time.
    AlreadyInitialized,

    /// The given ID does not name a live notification.
    UnknownId(NotificationId),

    /// A host binding or action callback panicked. Registry state is
    /// unaffected; reported through the error sink only.
    CallbackPanicked(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRequest(reason) => write!(f, "invalid notification request: {}", reason),
            Error::Uninitialized => {
                write!(f, "notification center used before global::init")
            }
            Error::AlreadyInitialized => {
                write!(f, "notification center already initialized")
            }
            Error::UnknownId(id) => write!(f, "no live notification with id {}", id),
            Error::CallbackPanicked(msg) => write!(f, "callback panicked: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
