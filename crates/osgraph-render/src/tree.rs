//! Fixed project hierarchy renderer.
//!
//! ```text
//! Project
//!  ├─ Servers → Volumes (attached) → Snapshots (has_snapshot)
//!  │          → Ports (has_port) → Security Groups (has_sg) → Rules (meta)
//!  ├─ Networks → Subnets (has_subnet)
//!  ├─ Load Balancers → Listeners (has_listener)
//!  │                 → L7 Policies (has_policy) → Rules (has_rule)
//!  │                 → Default Pool (has_pool) → Health Monitor / Members
//!  ├─ Routers
//!  ├─ Floating IPs
//!  ├─ Volumes (Unattached)
//!  └─ Security Groups
//! ```
//!
//! Only top-level branches are filtered. An edge whose target is not in the
//! document renders nothing; a group whose children all dangle is omitted.

use std::time::Instant;

use serde_json::Value;
use tracing::debug;

use osgraph_core::edge_kind;
use osgraph_core::meta::{MetaExt, display_value, is_truthy};
use osgraph_core::{GraphDocument, Meta, Node};

use crate::filter::TypeFilter;
use crate::index::DocumentIndex;
use crate::text::TextTree;

#[derive(Debug, Clone, Default)]
pub struct TreeRenderer {
    filter: TypeFilter,
}

impl TreeRenderer {
    pub fn new(filter: TypeFilter) -> Self {
        Self { filter }
    }

    pub fn render(&self, doc: &GraphDocument) -> String {
        self.build(doc).render()
    }

    /// Build the tree without printing it.
    pub fn build(&self, doc: &GraphDocument) -> TextTree {
        let start = Instant::now();
        let index = DocumentIndex::new(doc);
        let mut root = TextTree::new(format!("Project: {}", doc.project_name));

        if self.filter.allows("server") {
            self.servers(&mut root, &index);
        }
        if self.filter.allows("network") {
            self.networks(&mut root, &index);
        }
        if self.filter.allows("load_balancer") {
            self.load_balancers(&mut root, &index);
        }
        if self.filter.allows("router") {
            self.routers(&mut root, &index);
        }
        if self.filter.allows("floating_ip") {
            self.floating_ips(&mut root, &index);
        }
        if self.filter.allows("volume") {
            self.unattached_volumes(&mut root, &index);
        }
        if self.filter.allows("security_group") {
            self.security_groups(&mut root, &index);
        }

        debug!(
            branches = root.children().len(),
            "tree built in {:.3}s",
            start.elapsed().as_secs_f64()
        );
        root
    }

    fn servers(&self, root: &mut TextTree, index: &DocumentIndex<'_>) {
        let servers = index.nodes_of_type("server");
        if servers.is_empty() {
            return;
        }
        let branch = root.add(format!("Servers ({})", servers.len()));
        for server in servers {
            let meta = &server.meta;
            let node = branch.add(format!(
                "{} ({}) AZ: {} {}",
                server.name,
                server.id,
                meta.text_or("availability_zone", "unknown-az"),
                meta.text_or("status", "UNKNOWN"),
            ));

            let details = server_details(meta);
            if !details.is_empty() {
                node.add(details.join(", "));
            }

            let volumes = index.children(&server.id, edge_kind::ATTACHED);
            if !volumes.is_empty() {
                let group = node.add("Volumes:");
                for volume in volumes {
                    let v = group.add(volume_label(volume));
                    snapshots(v, index, volume);
                }
            }

            let ports = index.children(&server.id, edge_kind::HAS_PORT);
            if !ports.is_empty() {
                let group = node.add("Ports:");
                for port in ports {
                    let p = group.add(format!(
                        "{} ({}) ({})",
                        port.name,
                        port.id,
                        fixed_ips(&port.meta)
                    ));
                    let sgs = index.children(&port.id, edge_kind::HAS_SG);
                    if !sgs.is_empty() {
                        let sg_group = p.add("Security Groups:");
                        for sg in sgs {
                            security_group(sg_group, sg);
                        }
                    }
                }
            }
        }
    }

    fn networks(&self, root: &mut TextTree, index: &DocumentIndex<'_>) {
        let networks = index.nodes_of_type("network");
        if networks.is_empty() {
            return;
        }
        let branch = root.add(format!("Networks ({})", networks.len()));
        for network in networks {
            let node = branch.add(format!("{} ({})", network.name, network.id));
            let subnets = index.children(&network.id, edge_kind::HAS_SUBNET);
            if subnets.is_empty() {
                continue;
            }
            let group = node.add("Subnets:");
            for subnet in subnets {
                group.add(format!(
                    "{} ({}) (CIDR: {}, GW: {})",
                    subnet.name,
                    subnet.id,
                    subnet.meta.text_or("cidr", "?"),
                    subnet.meta.text_or("gateway_ip", "?"),
                ));
            }
        }
    }

    fn load_balancers(&self, root: &mut TextTree, index: &DocumentIndex<'_>) {
        let lbs = index.nodes_of_type("load_balancer");
        if lbs.is_empty() {
            return;
        }
        let branch = root.add(format!("Load Balancers ({})", lbs.len()));
        for lb in lbs {
            let node = branch.add(format!("{} ({})", lb.name, lb.id));
            let listeners = index.children(&lb.id, edge_kind::HAS_LISTENER);
            if listeners.is_empty() {
                continue;
            }
            let group = node.add("Listeners:");
            for listener in listeners {
                let l = group.add(format!(
                    "{} ({}) ({}:{})",
                    listener.name,
                    listener.id,
                    listener.meta.text_or("protocol", "?"),
                    listener.meta.text_or("protocol_port", "?"),
                ));
                l7_policies(l, index, listener);
                default_pools(l, index, listener);
            }
        }
    }

    fn routers(&self, root: &mut TextTree, index: &DocumentIndex<'_>) {
        let routers = index.nodes_of_type("router");
        if routers.is_empty() {
            return;
        }
        let branch = root.add(format!("Routers ({})", routers.len()));
        for router in routers {
            branch.add(format!(
                "{} ({}) {}",
                router.name,
                router.id,
                router.meta.text_or("status", "UNKNOWN")
            ));
        }
    }

    fn floating_ips(&self, root: &mut TextTree, index: &DocumentIndex<'_>) {
        let fips = index.nodes_of_type("floating_ip");
        if fips.is_empty() {
            return;
        }
        let branch = root.add(format!("Floating IPs ({})", fips.len()));
        for fip in fips {
            branch.add(format!(
                "{} ({}) -> {} {}",
                fip.name,
                fip.id,
                fip.meta.text_or("fixed_ip_address", "-"),
                fip.meta.text_or("status", "UNKNOWN"),
            ));
        }
    }

    /// Volumes no `attached` edge points at.
    fn unattached_volumes(&self, root: &mut TextTree, index: &DocumentIndex<'_>) {
        let volumes: Vec<&Node> = index
            .nodes_of_type("volume")
            .into_iter()
            .filter(|v| !index.is_target(&v.id, edge_kind::ATTACHED))
            .collect();
        if volumes.is_empty() {
            return;
        }
        let branch = root.add(format!("Volumes (Unattached) ({})", volumes.len()));
        for volume in volumes {
            let node = branch.add(format!(
                "{} {}",
                volume_label(volume),
                volume.meta.text_or("status", "UNKNOWN")
            ));
            snapshots(node, index, volume);
        }
    }

    fn security_groups(&self, root: &mut TextTree, index: &DocumentIndex<'_>) {
        let sgs = index.nodes_of_type("security_group");
        if sgs.is_empty() {
            return;
        }
        let branch = root.add(format!("Security Groups ({})", sgs.len()));
        for sg in sgs {
            security_group(branch, sg);
        }
    }
}

fn server_details(meta: &Meta) -> Vec<String> {
    let mut details = Vec::new();
    if let Some(flavor) = meta.text("flavor_name") {
        details.push(format!("Flavor: {flavor}"));
    }
    if let Some(image) = meta.text("image_name") {
        details.push(format!("Image: {image}"));
    }
    if let Some(key) = meta.truthy_text("key_name") {
        details.push(format!("Key: {key}"));
    }
    if let Some(created) = meta.text("created_at") {
        details.push(format!("Created: {created}"));
    }
    details
}

/// `name (id) (sizeGB, type)`; unnamed volumes show their id.
fn volume_label(volume: &Node) -> String {
    let name = if volume.name.is_empty() {
        &volume.id
    } else {
        &volume.name
    };
    format!(
        "{} ({}) ({}GB, {})",
        name,
        volume.id,
        volume.meta.text_or("size", "?"),
        volume.meta.text_or("volume_type", "unknown-type"),
    )
}

fn snapshots(parent: &mut TextTree, index: &DocumentIndex<'_>, volume: &Node) {
    let snaps = index.children(&volume.id, edge_kind::HAS_SNAPSHOT);
    if snaps.is_empty() {
        return;
    }
    let group = parent.add("Snapshots:");
    for snap in snaps {
        group.add(format!(
            "{} ({}) ({}GB)",
            snap.name,
            snap.id,
            snap.meta.text_or("size", "?")
        ));
    }
}

/// Comma-joined fixed IP addresses, or `-` when the port has none.
fn fixed_ips(meta: &Meta) -> String {
    let ips: Vec<String> = meta
        .list("fixed_ips")
        .iter()
        .filter_map(|ip| ip.get("ip_address"))
        .filter(|v| !v.is_null())
        .map(display_value)
        .collect();
    if ips.is_empty() {
        "-".to_string()
    } else {
        ips.join(", ")
    }
}

fn security_group(parent: &mut TextTree, sg: &Node) {
    let node = parent.add(format!("{} ({})", sg.name, sg.id));
    let rules = sg.meta.list("security_group_rules");
    if rules.is_empty() {
        return;
    }
    let group = node.add("Rules:");
    for rule in rules {
        if let Value::Object(rule) = rule {
            group.add(sg_rule_label(rule));
        }
    }
}

/// `direction protocol ports -> remote` for one security group rule.
fn sg_rule_label(rule: &Meta) -> String {
    let direction = rule.text_or("direction", "unknown");
    let protocol = rule.text_or("protocol", "any");

    let min = rule.value("port_range_min").filter(|v| is_truthy(v));
    let max = rule.value("port_range_max").filter(|v| is_truthy(v));
    let ports = match (min, max) {
        (Some(min), Some(max)) if min == max => display_value(min),
        (Some(min), Some(max)) => format!("{}-{}", display_value(min), display_value(max)),
        (Some(min), None) => display_value(min),
        _ => "Any".to_string(),
    };

    let remote = rule
        .truthy_text("remote_ip_prefix")
        .or_else(|| {
            rule.truthy_text("remote_group_id")
                .map(|group| format!("Group: {group}"))
        })
        .unwrap_or_else(|| "Any".to_string());

    format!("{direction} {protocol} {ports} -> {remote}")
}

fn l7_policies(parent: &mut TextTree, index: &DocumentIndex<'_>, listener: &Node) {
    let policies = index.children(&listener.id, edge_kind::HAS_POLICY);
    if policies.is_empty() {
        return;
    }
    let group = parent.add("L7 Policies:");
    for policy in policies {
        let node = group.add(format!(
            "{} ({}) (Action: {})",
            policy.name,
            policy.id,
            policy.meta.text_or("action", "?")
        ));
        let rules = index.children(&policy.id, edge_kind::HAS_RULE);
        if rules.is_empty() {
            continue;
        }
        let rule_group = node.add("Rules:");
        for rule in rules {
            rule_group.add(format!(
                "{} {} {} {} ({})",
                rule.meta.text_or("type", "?"),
                rule.meta.text_or("compare_type", "?"),
                rule.meta.text_or("key", ""),
                rule.meta.text_or("value", "?"),
                rule.id,
            ));
        }
    }
}

fn default_pools(parent: &mut TextTree, index: &DocumentIndex<'_>, listener: &Node) {
    let pools = index.children(&listener.id, edge_kind::HAS_POOL);
    if pools.is_empty() {
        return;
    }
    let group = parent.add("Default Pool:");
    for pool in pools {
        let node = group.add(format!(
            "{} ({}) ({})",
            pool.name,
            pool.id,
            pool.meta.text_or("protocol", "?")
        ));

        let monitors = index.children(&pool.id, edge_kind::HAS_MONITOR);
        if !monitors.is_empty() {
            let hm_group = node.add("Health Monitor:");
            for hm in monitors {
                hm_group.add(format!(
                    "{} ({}) (Type: {}, Delay: {}s, Retries: {})",
                    hm.name,
                    hm.id,
                    hm.meta.text_or("type", "?"),
                    hm.meta.text_or("delay", "?"),
                    hm.meta.text_or("max_retries", "?"),
                ));
            }
        }

        let members = index.children(&pool.id, edge_kind::HAS_MEMBER);
        if !members.is_empty() {
            let m_group = node.add("Members:");
            for member in members {
                m_group.add(format!(
                    "{} ({}) ({})",
                    member.name,
                    member.id,
                    member.meta.text_or("address", "-")
                ));
            }
        }
    }
}
