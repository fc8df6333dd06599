//! Single-pass graph construction.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::document::GraphDocument;
use crate::link;
use crate::meta::Meta;
use crate::model::{Edge, Graph, Node};
use crate::record::Record;

/// Owns the graph while it is being built.
///
/// The graph becomes immutable once [`finish`](Self::finish) hands it out.
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub fn new(project_id: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            graph: Graph::new(project_id, project_name),
        }
    }

    /// Pin the document timestamp instead of using the build time.
    pub fn with_generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.graph
            .set_generated_at(at.to_rfc3339_opts(SecondsFormat::Secs, true));
        self
    }

    /// Insert a node, replacing any node with the same id.
    pub fn add_node(&mut self, node: Node) {
        self.graph.insert_node(node);
    }

    /// Append an edge unconditionally.
    pub fn add_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        kind: impl Into<String>,
        meta: Option<Meta>,
    ) {
        let mut edge = Edge::new(from, to, kind);
        if let Some(meta) = meta {
            edge.meta = meta;
        }
        self.graph.push_edge(edge);
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn finish(self) -> Graph {
        self.graph
    }

    pub fn to_document(&self) -> GraphDocument {
        self.graph.to_document()
    }

    pub fn link_server_volumes(&mut self, servers: &[Record], volumes: &[Record]) {
        link::server_volumes(self, servers, volumes);
    }

    pub fn link_volume_snapshots(&mut self, volumes: &[Record], snapshots: &[Record]) {
        link::volume_snapshots(self, volumes, snapshots);
    }

    pub fn link_network_subnets(&mut self, networks: &[Record], subnets: &[Record]) {
        link::network_subnets(self, networks, subnets);
    }

    pub fn link_port_security_groups(&mut self, ports: &[Record], security_groups: &[Record]) {
        link::port_security_groups(self, ports, security_groups);
    }

    pub fn link_device_ports(&mut self, devices: &[Record], ports: &[Record]) {
        link::device_ports(self, devices, ports);
    }

    pub fn link_load_balancer_listeners(&mut self, lbs: &[Record], listeners: &[Record]) {
        link::load_balancer_listeners(self, lbs, listeners);
    }

    pub fn link_listener_pools(&mut self, listeners: &[Record], pools: &[Record]) {
        link::listener_pools(self, listeners, pools);
    }

    pub fn link_listener_policies(&mut self, listeners: &[Record], policies: &[Record]) {
        link::listener_policies(self, listeners, policies);
    }

    pub fn link_policy_rules(&mut self, policies: &[Record], rules: &[Record]) {
        link::policy_rules(self, policies, rules);
    }

    pub fn link_pool_health_monitors(&mut self, pools: &[Record], monitors: &[Record]) {
        link::pool_health_monitors(self, pools, monitors);
    }

    pub fn link_pool_members(&mut self, pools: &[Record], members: &[Record]) {
        link::pool_members(self, pools, members);
    }

    pub fn link_volume_backups(&mut self, volumes: &[Record], backups: &[Record]) {
        link::volume_backups(self, volumes, backups);
    }

    pub fn link_zone_recordsets(&mut self, zones: &[Record], recordsets: &[Record]) {
        link::zone_recordsets(self, zones, recordsets);
    }
}
