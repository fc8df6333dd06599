use std::error::Error as StdError;
use std::fmt;
use std::io;

use crate::{ErrorKind, ErrorStatus};

type Source = Box<dyn StdError + Send + Sync + 'static>;

/// Error returned at the edges of osgraph: config, documents, discovery.
///
/// Carries the [`ErrorKind`], a retry [`ErrorStatus`], the operation that
/// failed, and `key: value` context locating the failure (a path, a cloud,
/// a resource kind).
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: ErrorStatus,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<Source>,
}

impl Error {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: ErrorStatus::for_kind(kind),
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> ErrorStatus {
        self.status
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Value of the first context entry named `key`.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_retryable(&self) -> bool {
        self.status.is_retryable()
    }

    /// Override the kind's default and allow retries.
    pub fn temporary(mut self) -> Self {
        self.status = ErrorStatus::Temporary;
        self
    }

    /// Override the kind's default and forbid retries.
    pub fn permanent(mut self) -> Self {
        self.status = ErrorStatus::Permanent;
        self
    }

    /// Retries are spent.
    pub fn persist(mut self) -> Self {
        self.status = self.status.persist();
        self
    }

    /// Record the failing operation. An inner operation already set is kept
    /// as a `called` context entry.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            let inner = std::mem::replace(&mut self.operation, operation);
            self.context.push(("called", inner.to_string()));
        } else {
            self.operation = operation;
        }
        self
    }

    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Attach the lower-level cause. Set at most once.
    pub fn set_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        debug_assert!(self.source.is_none(), "source already attached");
        self.source = Some(Box::new(source));
        self
    }

    fn write_head(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.kind, self.status)?;
        if !self.operation.is_empty() {
            write!(f, " at {}", self.operation)?;
        }
        Ok(())
    }
}

impl Error {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::new(ErrorKind::FileNotFound, format!("file '{path}' not found"))
            .with_context("path", path)
    }

    pub fn deserialization_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DeserializationFailed, message)
    }

    pub fn serialization_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SerializationFailed, message)
    }

    /// No service behind `kind` in this deployment.
    pub fn service_unavailable(kind: impl Into<String>) -> Self {
        Self::for_collection(ErrorKind::ServiceUnavailable, "service unavailable", kind)
    }

    /// The project may not list `kind`.
    pub fn forbidden(kind: impl Into<String>) -> Self {
        Self::for_collection(ErrorKind::Forbidden, "permission denied", kind)
    }

    pub fn unknown_resource_kind(name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(ErrorKind::UnknownResourceKind, format!("unknown resource kind '{name}'"))
            .with_context("kind", name)
    }

    fn for_collection(kind: ErrorKind, what: &str, collection: impl Into<String>) -> Self {
        let collection = collection.into();
        Self::new(kind, format!("{what} for '{collection}'")).with_context("kind", collection)
    }
}

/// `Kind (status) at op, context { k: v } => message`
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_head(f)?;
        if !self.context.is_empty() {
            let pairs: Vec<String> = self.context.iter().map(|(k, v)| format!("{k}: {v}")).collect();
            write!(f, ", context {{ {} }}", pairs.join(", "))?;
        }
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_head(f)?;
        writeln!(f)?;
        if !self.message.is_empty() {
            writeln!(f, "    {}", self.message)?;
        }
        for (key, value) in &self.context {
            writeln!(f, "    {key} = {value}")?;
        }
        if let Some(source) = &self.source {
            writeln!(f, "    caused by: {source:?}")?;
        }
        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_deref().map(|e| e as &(dyn StdError + 'static))
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, err.to_string()).with_operation("io").set_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_is_permanent() {
        let err = Error::deserialization_failed("expected an array of records");
        assert_eq!(err.kind(), ErrorKind::DeserializationFailed);
        assert_eq!(err.status(), ErrorStatus::Permanent);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_inner_operation_kept_as_context() {
        let err = Error::new(ErrorKind::IoFailed, "short read")
            .with_operation("inventory::read")
            .with_operation("discovery::list");

        assert_eq!(err.operation(), "discovery::list");
        assert_eq!(err.context_value("called"), Some("inventory::read"));
    }

    #[test]
    fn test_absent_service_can_be_made_permanent() {
        let err = Error::service_unavailable("load_balancers");
        assert!(err.is_retryable());
        assert_eq!(err.context_value("kind"), Some("load_balancers"));
        assert_eq!(err.message(), "service unavailable for 'load_balancers'");

        assert!(!err.permanent().is_retryable());
    }

    #[test]
    fn test_persist_after_retries() {
        let err = Error::new(ErrorKind::Timeout, "read timed out").persist();
        assert_eq!(err.status(), ErrorStatus::Persistent);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_display_line() {
        let err = Error::config_invalid("cloud 'prod' not found")
            .with_operation("config::select")
            .with_context("config", "osgraph.toml");

        assert_eq!(
            err.to_string(),
            "ConfigInvalid (permanent) at config::select, context { config: osgraph.toml } \
             => cloud 'prod' not found"
        );
    }

    #[test]
    fn test_io_error_keeps_source() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert_eq!(err.operation(), "io");
        assert!(StdError::source(&err).is_some());
    }
}
