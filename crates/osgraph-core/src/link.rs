//! Linking rules: edges derived from foreign keys embedded in raw records.
//!
//! Every rule reads the raw collections of two resource kinds and appends
//! edges to the builder. Rules are total: a missing, null or empty field
//! yields no edge, never an error. They share no state besides the edge
//! list, so [`LINK_PIPELINE`] may run them in any order.

use std::collections::HashSet;

use serde_json::Value;
use tracing::debug;

use crate::builder::GraphBuilder;
use crate::edge_kind;
use crate::meta::Meta;
use crate::record::{Record, field_str};
use crate::resource::{ResourceCollections, ResourceKind};

/// Signature shared by all linking rules: `(builder, parents, children)`.
pub type LinkFn = fn(&mut GraphBuilder, &[Record], &[Record]);

/// A linking rule bound to the two resource kinds it reads.
#[derive(Clone, Copy)]
pub struct LinkRule {
    pub name: &'static str,
    pub parent: ResourceKind,
    pub child: ResourceKind,
    pub apply: LinkFn,
}

/// The fixed linking pipeline, in application order.
pub const LINK_PIPELINE: &[LinkRule] = &[
    LinkRule {
        name: "server_volumes",
        parent: ResourceKind::Server,
        child: ResourceKind::Volume,
        apply: server_volumes,
    },
    LinkRule {
        name: "volume_snapshots",
        parent: ResourceKind::Volume,
        child: ResourceKind::Snapshot,
        apply: volume_snapshots,
    },
    LinkRule {
        name: "network_subnets",
        parent: ResourceKind::Network,
        child: ResourceKind::Subnet,
        apply: network_subnets,
    },
    LinkRule {
        name: "port_security_groups",
        parent: ResourceKind::Port,
        child: ResourceKind::SecurityGroup,
        apply: port_security_groups,
    },
    LinkRule {
        name: "device_ports",
        parent: ResourceKind::Server,
        child: ResourceKind::Port,
        apply: device_ports,
    },
    LinkRule {
        name: "load_balancer_listeners",
        parent: ResourceKind::LoadBalancer,
        child: ResourceKind::Listener,
        apply: load_balancer_listeners,
    },
    LinkRule {
        name: "listener_pools",
        parent: ResourceKind::Listener,
        child: ResourceKind::Pool,
        apply: listener_pools,
    },
    LinkRule {
        name: "listener_policies",
        parent: ResourceKind::Listener,
        child: ResourceKind::L7Policy,
        apply: listener_policies,
    },
    LinkRule {
        name: "policy_rules",
        parent: ResourceKind::L7Policy,
        child: ResourceKind::L7Rule,
        apply: policy_rules,
    },
    LinkRule {
        name: "pool_health_monitors",
        parent: ResourceKind::Pool,
        child: ResourceKind::HealthMonitor,
        apply: pool_health_monitors,
    },
    LinkRule {
        name: "pool_members",
        parent: ResourceKind::Pool,
        child: ResourceKind::Member,
        apply: pool_members,
    },
    LinkRule {
        name: "volume_backups",
        parent: ResourceKind::Volume,
        child: ResourceKind::Backup,
        apply: volume_backups,
    },
    LinkRule {
        name: "zone_recordsets",
        parent: ResourceKind::Zone,
        child: ResourceKind::Recordset,
        apply: zone_recordsets,
    },
];

/// Run every rule of [`LINK_PIPELINE`] against `collections`.
pub fn apply_link_pipeline(builder: &mut GraphBuilder, collections: &ResourceCollections) {
    for rule in LINK_PIPELINE {
        let before = builder.edge_count();
        (rule.apply)(
            builder,
            collections.get(rule.parent),
            collections.get(rule.child),
        );
        debug!(
            rule = rule.name,
            edges = builder.edge_count() - before,
            "link rule applied"
        );
    }
}

fn single(key: &str, value: Option<&Value>) -> Meta {
    let mut meta = Meta::new();
    meta.insert(key.to_string(), value.cloned().unwrap_or(Value::Null));
    meta
}

/// `server -attached-> volume` for each attachment naming a discovered server.
///
/// Unlike the other rules this one checks membership: attachments to servers
/// outside `servers` produce nothing.
pub fn server_volumes(builder: &mut GraphBuilder, servers: &[Record], volumes: &[Record]) {
    let server_ids: HashSet<&str> = servers.iter().filter_map(Record::id).collect();
    for volume in volumes {
        let Some(volume_id) = volume.id() else {
            continue;
        };
        for attachment in volume.list_field("attachments") {
            let Some(server_id) = field_str(attachment, "server_id") else {
                continue;
            };
            if server_ids.contains(server_id) {
                let meta = single("device", attachment.get("device"));
                builder.add_edge(server_id, volume_id, edge_kind::ATTACHED, Some(meta));
            }
        }
    }
}

/// `volume -has_snapshot-> snapshot`, whether or not the volume was discovered.
pub fn volume_snapshots(builder: &mut GraphBuilder, _volumes: &[Record], snapshots: &[Record]) {
    link_by_parent_key(builder, snapshots, "volume_id", edge_kind::HAS_SNAPSHOT);
}

pub fn network_subnets(builder: &mut GraphBuilder, _networks: &[Record], subnets: &[Record]) {
    link_by_parent_key(builder, subnets, "network_id", edge_kind::HAS_SUBNET);
}

/// `port -has_sg-> security_group`, one edge per listed group.
///
/// `security_groups` wins when non-empty, else `security_group_ids`.
pub fn port_security_groups(
    builder: &mut GraphBuilder,
    ports: &[Record],
    _security_groups: &[Record],
) {
    for port in ports {
        let Some(port_id) = port.id() else {
            continue;
        };
        let key = if port.list_field("security_groups").is_empty() {
            "security_group_ids"
        } else {
            "security_groups"
        };
        for sg_id in port.ref_ids(key) {
            builder.add_edge(port_id, sg_id, edge_kind::HAS_SG, None);
        }
    }
}

/// `device -has_port-> port` for any port with a `device_id`.
///
/// The device is assumed to be a server. Router interfaces, DHCP agents and
/// load balancer VIPs also set `device_id`, so this over-claims: their
/// edges dangle from a non-server parent.
pub fn device_ports(builder: &mut GraphBuilder, _devices: &[Record], ports: &[Record]) {
    link_by_parent_key(builder, ports, "device_id", edge_kind::HAS_PORT);
}

/// `load_balancer -has_listener-> listener` when the listener references
/// the load balancer in `load_balancers`.
pub fn load_balancer_listeners(
    builder: &mut GraphBuilder,
    lbs: &[Record],
    listeners: &[Record],
) {
    for lb_id in lbs.iter().filter_map(Record::id) {
        for listener in listeners {
            let Some(listener_id) = listener.id() else {
                continue;
            };
            if listener.ref_ids("load_balancers").any(|id| id == lb_id) {
                builder.add_edge(lb_id, listener_id, edge_kind::HAS_LISTENER, None);
            }
        }
    }
}

/// `listener -has_pool-> pool` from the listener's `default_pool_id`.
pub fn listener_pools(builder: &mut GraphBuilder, listeners: &[Record], _pools: &[Record]) {
    for listener in listeners {
        if let (Some(listener_id), Some(pool_id)) =
            (listener.id(), listener.str_field("default_pool_id"))
        {
            builder.add_edge(listener_id, pool_id, edge_kind::HAS_POOL, None);
        }
    }
}

/// `listener -has_policy-> l7_policy`; edge meta carries the policy position.
pub fn listener_policies(builder: &mut GraphBuilder, _listeners: &[Record], policies: &[Record]) {
    for policy in policies {
        if let (Some(policy_id), Some(listener_id)) = (policy.id(), policy.str_field("listener_id"))
        {
            let meta = single("position", policy.get("position"));
            builder.add_edge(listener_id, policy_id, edge_kind::HAS_POLICY, Some(meta));
        }
    }
}

/// `l7_policy -has_rule-> l7_rule` from `l7_policy_id`, falling back to `policy_id`.
pub fn policy_rules(builder: &mut GraphBuilder, _policies: &[Record], rules: &[Record]) {
    for rule in rules {
        let Some(rule_id) = rule.id() else {
            continue;
        };
        let parent = rule
            .str_field("l7_policy_id")
            .or_else(|| rule.str_field("policy_id"));
        if let Some(policy_id) = parent {
            builder.add_edge(policy_id, rule_id, edge_kind::HAS_RULE, None);
        }
    }
}

/// `pool -has_monitor-> health_monitor`, one edge per pool the monitor lists.
pub fn pool_health_monitors(builder: &mut GraphBuilder, _pools: &[Record], monitors: &[Record]) {
    for monitor in monitors {
        let Some(monitor_id) = monitor.id() else {
            continue;
        };
        for pool_id in monitor.ref_ids("pools") {
            builder.add_edge(pool_id, monitor_id, edge_kind::HAS_MONITOR, None);
        }
    }
}

/// `pool -has_member-> member` from the `pool_id` discovery stamps on members.
pub fn pool_members(builder: &mut GraphBuilder, _pools: &[Record], members: &[Record]) {
    link_by_parent_key(builder, members, "pool_id", edge_kind::HAS_MEMBER);
}

pub fn volume_backups(builder: &mut GraphBuilder, _volumes: &[Record], backups: &[Record]) {
    link_by_parent_key(builder, backups, "volume_id", edge_kind::HAS_BACKUP);
}

pub fn zone_recordsets(builder: &mut GraphBuilder, _zones: &[Record], recordsets: &[Record]) {
    link_by_parent_key(builder, recordsets, "zone_id", edge_kind::HAS_RECORDSET);
}

/// `child[key] -kind-> child.id` for every child carrying a parent id.
fn link_by_parent_key(builder: &mut GraphBuilder, children: &[Record], key: &str, kind: &str) {
    for child in children {
        if let (Some(child_id), Some(parent_id)) = (child.id(), child.str_field(key)) {
            builder.add_edge(parent_id, child_id, kind, None);
        }
    }
}
