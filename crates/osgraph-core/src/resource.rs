//! Resource kinds and the per-kind record collections discovery delivers.

use std::collections::HashMap;
use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use osgraph_error::{Error, Result};

use crate::record::Record;

/// Every kind of resource the explorer discovers.
///
/// Variant order is node-assembly order: the graph's node list (and thus
/// every per-type listing) follows it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    // compute
    Server,
    Flavor,
    // image
    Image,
    // block storage
    Volume,
    Snapshot,
    Backup,
    // networking
    Port,
    Network,
    Subnet,
    SecurityGroup,
    Router,
    FloatingIp,
    // load balancing
    LoadBalancer,
    Listener,
    Pool,
    Member,
    HealthMonitor,
    #[strum(serialize = "l7_policy")]
    L7Policy,
    #[strum(serialize = "l7_rule")]
    L7Rule,
    // orchestration
    Stack,
    // dns
    Zone,
    Recordset,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Node type tag for this kind; `None` for lookup-only kinds that
    /// enrich other nodes but never become nodes themselves.
    pub fn node_type(&self) -> Option<&'static str> {
        match self {
            ResourceKind::Flavor | ResourceKind::Image => None,
            other => Some(other.as_str()),
        }
    }

    /// Plural key naming this kind's collection (e.g. `servers`).
    pub fn collection_key(&self) -> &'static str {
        match self {
            ResourceKind::Server => "servers",
            ResourceKind::Flavor => "flavors",
            ResourceKind::Image => "images",
            ResourceKind::Volume => "volumes",
            ResourceKind::Snapshot => "snapshots",
            ResourceKind::Backup => "backups",
            ResourceKind::Port => "ports",
            ResourceKind::Network => "networks",
            ResourceKind::Subnet => "subnets",
            ResourceKind::SecurityGroup => "security_groups",
            ResourceKind::Router => "routers",
            ResourceKind::FloatingIp => "floating_ips",
            ResourceKind::LoadBalancer => "load_balancers",
            ResourceKind::Listener => "listeners",
            ResourceKind::Pool => "pools",
            ResourceKind::Member => "members",
            ResourceKind::HealthMonitor => "health_monitors",
            ResourceKind::L7Policy => "l7_policies",
            ResourceKind::L7Rule => "l7_rules",
            ResourceKind::Stack => "stacks",
            ResourceKind::Zone => "zones",
            ResourceKind::Recordset => "recordsets",
        }
    }

    pub fn from_collection_key(key: &str) -> Option<Self> {
        ResourceKind::iter().find(|kind| kind.collection_key() == key)
    }

    /// Parse either the singular name (`load_balancer`) or the collection
    /// key (`load_balancers`).
    pub fn parse(name: &str) -> Result<Self> {
        let name = name.trim().to_ascii_lowercase();
        ResourceKind::from_str(&name)
            .ok()
            .or_else(|| Self::from_collection_key(&name))
            .ok_or_else(|| Error::unknown_resource_kind(name))
    }
}

/// Fully materialized record collections, one per resource kind.
///
/// A kind that was never inserted reads as empty, which is also what a
/// failed or forbidden discovery call leaves behind.
#[derive(Debug, Clone, Default)]
pub struct ResourceCollections {
    records: HashMap<ResourceKind, Vec<Record>>,
}

impl ResourceCollections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ResourceKind, records: Vec<Record>) {
        self.records.insert(kind, records);
    }

    pub fn with(mut self, kind: ResourceKind, records: Vec<Record>) -> Self {
        self.insert(kind, records);
        self
    }

    pub fn get(&self, kind: ResourceKind) -> &[Record] {
        self.records.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_mut(&mut self, kind: ResourceKind) -> Option<&mut Vec<Record>> {
        self.records.get_mut(&kind)
    }

    pub fn len(&self, kind: ResourceKind) -> usize {
        self.get(kind).len()
    }

    /// Total record count across all kinds.
    pub fn total(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in ResourceKind::iter() {
            assert_eq!(ResourceKind::parse(kind.as_str()).unwrap(), kind);
            assert_eq!(ResourceKind::parse(kind.collection_key()).unwrap(), kind);
        }
    }

    #[test]
    fn test_snake_case_tags() {
        assert_eq!(ResourceKind::L7Policy.as_str(), "l7_policy");
        assert_eq!(ResourceKind::FloatingIp.node_type(), Some("floating_ip"));
        assert_eq!(ResourceKind::Flavor.node_type(), None);
    }

    #[test]
    fn test_parse_unknown() {
        let err = ResourceKind::parse("bucket").unwrap_err();
        assert_eq!(err.kind(), osgraph_error::ErrorKind::UnknownResourceKind);
    }

    #[test]
    fn test_missing_kind_reads_empty() {
        let collections = ResourceCollections::new();
        assert!(collections.get(ResourceKind::Server).is_empty());
        assert!(collections.is_empty());
    }
}
