//! What went wrong, independent of where.

use strum_macros::{Display, IntoStaticStr};

/// Failure category.
///
/// Discovery matches on it to pick a log line: `ServiceUnavailable` and
/// `Forbidden` are expected on partial deployments and only warn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Nothing more specific applies.
    Unexpected,

    // -- caller input ----------------------------------------------------
    /// Config file unreadable, unknown cloud, unknown region.
    ConfigInvalid,
    /// A command-line value the command cannot act on.
    InvalidArgument,
    /// A resource type name outside the known catalog.
    UnknownResourceKind,

    // -- local files -----------------------------------------------------
    FileNotFound,
    PermissionDenied,
    IoFailed,

    // -- documents -------------------------------------------------------
    SerializationFailed,
    /// Graph document or inventory JSON did not parse or had the wrong shape.
    DeserializationFailed,

    // -- per-kind listing ------------------------------------------------
    /// No endpoint for the kind: the service is not deployed here.
    ServiceUnavailable,
    /// The project may not list the kind.
    Forbidden,
    Timeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Kinds that start out `Temporary`.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::Timeout | ErrorKind::IoFailed | ErrorKind::ServiceUnavailable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::ServiceUnavailable.to_string(), "ServiceUnavailable");
        assert_eq!(ErrorKind::UnknownResourceKind.as_str(), "UnknownResourceKind");
    }

    #[test]
    fn test_listing_failures_split_on_retry() {
        assert!(ErrorKind::Timeout.is_retryable());
        assert!(ErrorKind::ServiceUnavailable.is_retryable());
        assert!(!ErrorKind::Forbidden.is_retryable());
        assert!(!ErrorKind::ConfigInvalid.is_retryable());
    }
}
