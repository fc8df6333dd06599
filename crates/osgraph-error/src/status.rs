//! Retry status carried by every error.

use std::fmt;

use crate::ErrorKind;

/// Whether a failed call is worth repeating.
///
/// Discovery retries `Temporary` failures of a single resource kind; once the
/// retries are spent the error is marked `Persistent` and absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorStatus {
    /// Needs an external change: bad config, missing permission, absent service.
    #[default]
    Permanent,
    /// May clear up by itself: a timeout, a flaky read.
    Temporary,
    /// Was temporary, kept failing.
    Persistent,
}

impl ErrorStatus {
    /// Initial status for a freshly created error of `kind`.
    pub fn for_kind(kind: ErrorKind) -> Self {
        if kind.is_retryable() {
            ErrorStatus::Temporary
        } else {
            ErrorStatus::Permanent
        }
    }

    pub fn is_retryable(&self) -> bool {
        *self == ErrorStatus::Temporary
    }

    /// Give up on a temporary failure; other statuses are unchanged.
    pub fn persist(self) -> Self {
        if self == ErrorStatus::Temporary {
            ErrorStatus::Persistent
        } else {
            self
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorStatus::Permanent => "permanent",
            ErrorStatus::Temporary => "temporary",
            ErrorStatus::Persistent => "persistent",
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
