//! # osgraph-error
//!
//! Unified error handling for osgraph.
//!
//! - **ErrorKind**: what went wrong (e.g. `DeserializationFailed`, `ServiceUnavailable`)
//! - **ErrorStatus**: whether retrying could help (Permanent, Temporary, Persistent)
//! - **Context**: operation name plus key/value pairs that locate the failure
//! - **Source**: the wrapped lower-level error, if any
//!
//! ```rust
//! use osgraph_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::ServiceUnavailable, "no load-balancer endpoint")
//!         .with_operation("discovery::list")
//!         .with_context("kind", "load_balancer"))
//! }
//! ```
//!
//! Graph linking and rendering never produce errors; only the edges of the
//! system (document I/O, configuration, discovery) return `Result`.

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using the osgraph Error
pub type Result<T> = std::result::Result<T, Error>;
