//! Node assembly: raw collections to nodes, then the link pipeline.

use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::builder::GraphBuilder;
use crate::link::apply_link_pipeline;
use crate::model::{Graph, Node};
use crate::record::{Record, field_str};
use crate::resource::{ResourceCollections, ResourceKind};

const SHORT_ID_LEN: usize = 8;

/// The project a discovery run is scoped to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectScope {
    pub project_id: String,
    pub project_name: String,
}

impl ProjectScope {
    pub fn new(project_id: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            project_name: project_name.into(),
        }
    }
}

/// Build the full resource graph for one project.
///
/// Creates a node for every record of every node-producing kind, in
/// [`ResourceKind`] order, then applies the link pipeline.
pub fn build_graph(scope: &ProjectScope, collections: &ResourceCollections) -> Graph {
    let mut builder = GraphBuilder::new(&scope.project_id, &scope.project_name);
    add_nodes(&mut builder, collections);

    let link_start = Instant::now();
    apply_link_pipeline(&mut builder, collections);
    info!(
        nodes = builder.graph().node_count(),
        edges = builder.edge_count(),
        "Linking: {:.2}s",
        link_start.elapsed().as_secs_f64()
    );

    builder.finish()
}

/// Add one node per record for every node-producing kind.
pub fn add_nodes(builder: &mut GraphBuilder, collections: &ResourceCollections) {
    let lookups = Lookups::new(collections);
    for kind in ResourceKind::iter() {
        let Some(node_type) = kind.node_type() else {
            continue;
        };
        for record in collections.get(kind) {
            match node_from_record(kind, node_type, record, &lookups) {
                Some(node) => builder.add_node(node),
                None => debug!(kind = node_type, "skipping record without id"),
            }
        }
    }
}

/// Name maps for lookup-only kinds (flavors, images).
struct Lookups<'a> {
    flavors: HashMap<&'a str, &'a str>,
    images: HashMap<&'a str, &'a str>,
}

impl<'a> Lookups<'a> {
    fn new(collections: &'a ResourceCollections) -> Self {
        Self {
            flavors: name_map(collections.get(ResourceKind::Flavor)),
            images: name_map(collections.get(ResourceKind::Image)),
        }
    }
}

fn name_map(records: &[Record]) -> HashMap<&str, &str> {
    records
        .iter()
        .filter_map(|r| Some((r.id()?, r.str_field("name").unwrap_or_default())))
        .collect()
}

fn node_from_record(
    kind: ResourceKind,
    node_type: &str,
    record: &Record,
    lookups: &Lookups<'_>,
) -> Option<Node> {
    let id = record.id()?;
    let raw_name = record.str_field("name").unwrap_or_default();
    let short_id = || id.chars().take(SHORT_ID_LEN).collect::<String>();

    let (name, label) = match kind {
        ResourceKind::Snapshot
        | ResourceKind::Port
        | ResourceKind::Subnet
        | ResourceKind::Member
        | ResourceKind::HealthMonitor
        | ResourceKind::L7Policy => {
            let name = if raw_name.is_empty() {
                short_id()
            } else {
                raw_name.to_string()
            };
            (name, raw_name.to_string())
        }
        ResourceKind::FloatingIp => {
            let address = record.str_field("floating_ip_address").unwrap_or_default();
            (address.to_string(), address.to_string())
        }
        ResourceKind::L7Rule => (short_id(), id.to_string()),
        ResourceKind::Stack => {
            let name = if raw_name.is_empty() {
                record.str_field("stack_name").unwrap_or_default()
            } else {
                raw_name
            };
            (name.to_string(), name.to_string())
        }
        _ => (raw_name.to_string(), raw_name.to_string()),
    };

    let mut meta = record.fields().clone();
    if kind == ResourceKind::Server {
        let flavor_name = enriched_name(record, "flavor", &lookups.flavors);
        let image_name = enriched_name(record, "image", &lookups.images);
        meta.insert("flavor_name".to_string(), Value::String(flavor_name));
        meta.insert("image_name".to_string(), Value::String(image_name));
    }

    Some(Node {
        id: id.to_string(),
        kind: node_type.to_string(),
        name,
        label,
        meta,
        created_at: record.str_field("created_at").map(str::to_string),
        updated_at: record.str_field("updated_at").map(str::to_string),
        partial: false,
    })
}

/// Name of the flavor/image a server references by `{key: {"id": ...}}`.
///
/// Falls back to the bare id when the lookup kind does not know it, and to
/// `"unknown"` when the server carries no id at all.
fn enriched_name(server: &Record, key: &str, names: &HashMap<&str, &str>) -> String {
    let Some(reference_id) = server.get(key).and_then(|v| field_str(v, "id")) else {
        return "unknown".to_string();
    };
    match names.get(reference_id) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => reference_id.to_string(),
    }
}
