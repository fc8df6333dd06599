//! Provider contract and the parallel discovery driver.

use std::time::Instant;

use rayon::prelude::*;
use strum::IntoEnumIterator;
use tracing::{debug, error, info, warn};

use osgraph_core::{ProjectScope, Record, ResourceCollections, ResourceKind};
use osgraph_error::{ErrorKind, Result};

use crate::annotate::annotate_foreign_keys;

/// Source of raw resource records for one project.
///
/// Implementations may fail per kind; [`discover`] turns those failures
/// into empty collections so the graph builder never observes them.
pub trait DiscoveryProvider: Send + Sync {
    /// Project the records belong to.
    fn scope(&self) -> ProjectScope;

    /// Every record of `kind` visible to this project.
    fn list(&self, kind: ResourceKind) -> Result<Vec<Record>>;
}

/// Fully materialized discovery output, ready for `build_graph`.
#[derive(Debug, Clone, Default)]
pub struct Discovered {
    pub scope: ProjectScope,
    pub collections: ResourceCollections,
}

/// Attempts per kind before a temporary failure is given up on.
pub const LIST_ATTEMPTS: usize = 3;

/// List one kind, absorbing any failure into an empty collection.
///
/// Temporary failures are retried up to [`LIST_ATTEMPTS`] times.
pub fn safe_list<P>(provider: &P, kind: ResourceKind) -> Vec<Record>
where
    P: DiscoveryProvider + ?Sized,
{
    let key = kind.collection_key();
    info!(kind = kind.as_str(), "Discovering {}...", key.replace('_', " "));

    let mut attempt = 1;
    let err = loop {
        match provider.list(kind) {
            Ok(records) => {
                debug!(kind = kind.as_str(), count = records.len(), attempt, "listed");
                return records;
            }
            Err(err) if err.is_retryable() && attempt < LIST_ATTEMPTS => {
                debug!(kind = kind.as_str(), attempt, error = %err, "retrying");
                attempt += 1;
            }
            Err(err) if err.is_retryable() => break err.persist(),
            Err(err) => break err,
        }
    };

    match err.kind() {
        ErrorKind::ServiceUnavailable => {
            warn!(kind = kind.as_str(), status = %err.status(), "Service unavailable for {key}");
        }
        ErrorKind::Forbidden | ErrorKind::PermissionDenied => {
            warn!(kind = kind.as_str(), "Permission denied for {key}");
        }
        _ => {
            error!(kind = kind.as_str(), error = %err, "Error listing {key}");
        }
    }
    Vec::new()
}

/// Discover every resource kind in parallel, then annotate.
///
/// Kinds are independent, so each one is listed on the rayon pool. All of
/// them complete before annotation runs: the linking rules downstream
/// assume each collection is either complete or definitively empty.
pub fn discover<P>(provider: &P) -> Discovered
where
    P: DiscoveryProvider + ?Sized,
{
    let start = Instant::now();
    let scope = provider.scope();

    let kinds: Vec<ResourceKind> = ResourceKind::iter().collect();
    let listed: Vec<(ResourceKind, Vec<Record>)> = kinds
        .into_par_iter()
        .map(|kind| (kind, safe_list(provider, kind)))
        .collect();

    let mut collections = ResourceCollections::new();
    for (kind, records) in listed {
        collections.insert(kind, records);
    }
    annotate_foreign_keys(&mut collections);

    info!(
        project = %scope.project_id,
        records = collections.total(),
        "Discovery: {:.2}s",
        start.elapsed().as_secs_f64()
    );

    Discovered { scope, collections }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use osgraph_error::Error;
    use serde_json::json;

    struct Flaky;

    impl DiscoveryProvider for Flaky {
        fn scope(&self) -> ProjectScope {
            ProjectScope::new("p1", "demo")
        }

        fn list(&self, kind: ResourceKind) -> Result<Vec<Record>> {
            match kind {
                ResourceKind::Server => Ok(vec![
                    Record::from_value(json!({"id": "s1", "name": "web"})).unwrap(),
                ]),
                ResourceKind::Volume => Err(Error::forbidden(kind.collection_key())),
                ResourceKind::Zone => Err(Error::service_unavailable(kind.collection_key())),
                ResourceKind::Stack => Err(Error::unexpected("boom")),
                _ => Ok(Vec::new()),
            }
        }
    }

    #[test]
    fn test_safe_list_absorbs_failures() {
        assert_eq!(safe_list(&Flaky, ResourceKind::Server).len(), 1);
        assert!(safe_list(&Flaky, ResourceKind::Volume).is_empty());
        assert!(safe_list(&Flaky, ResourceKind::Zone).is_empty());
        assert!(safe_list(&Flaky, ResourceKind::Stack).is_empty());
    }

    #[test]
    fn test_discover_through_trait_object() {
        let provider: Box<dyn DiscoveryProvider> = Box::new(Flaky);
        let discovered = discover(provider.as_ref());
        assert_eq!(discovered.scope.project_name, "demo");
        assert_eq!(discovered.collections.len(ResourceKind::Server), 1);
        assert_eq!(discovered.collections.total(), 1);
    }

    /// Times out `failures` times, then succeeds.
    struct Slow {
        failures: usize,
        calls: AtomicUsize,
    }

    impl Slow {
        fn new(failures: usize) -> Self {
            Self { failures, calls: AtomicUsize::new(0) }
        }
    }

    impl DiscoveryProvider for Slow {
        fn scope(&self) -> ProjectScope {
            ProjectScope::new("p1", "demo")
        }

        fn list(&self, _kind: ResourceKind) -> Result<Vec<Record>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(Error::new(ErrorKind::Timeout, "read timed out"));
            }
            Ok(vec![Record::from_value(json!({"id": "n1"})).unwrap()])
        }
    }

    #[test]
    fn test_safe_list_retries_temporary_failures() {
        let provider = Slow::new(LIST_ATTEMPTS - 1);
        assert_eq!(safe_list(&provider, ResourceKind::Network).len(), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), LIST_ATTEMPTS);
    }

    #[test]
    fn test_safe_list_gives_up_after_attempts() {
        let provider = Slow::new(usize::MAX);
        assert!(safe_list(&provider, ResourceKind::Network).is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), LIST_ATTEMPTS);
    }

    #[test]
    fn test_permanent_failures_are_not_retried() {
        struct Denied(AtomicUsize);
        impl DiscoveryProvider for Denied {
            fn scope(&self) -> ProjectScope {
                ProjectScope::default()
            }
            fn list(&self, kind: ResourceKind) -> Result<Vec<Record>> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Err(Error::forbidden(kind.collection_key()))
            }
        }

        let provider = Denied(AtomicUsize::new(0));
        assert!(safe_list(&provider, ResourceKind::Volume).is_empty());
        assert_eq!(provider.0.load(Ordering::SeqCst), 1);
    }
}
