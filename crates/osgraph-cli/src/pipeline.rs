//! Core pipeline: discover → build graph → document.

use std::fs::File;
use std::io::BufReader;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use osgraph_core::{GraphDocument, build_graph};
use osgraph_discovery::{DiscoveryProvider, InventoryProvider, discover};
use osgraph_error::Error;

use crate::config::{CloudConfig, ExplorerConfig};
use crate::options::{CloudOptions, SourceOptions};

/// Run discovery against `provider` and build the wire document.
pub fn run_discovery<P>(provider: &P) -> GraphDocument
where
    P: DiscoveryProvider + ?Sized,
{
    // 1. Discover (parallel per kind, barriered)
    let discovered = discover(provider);

    // 2. Build nodes and link
    let build_start = Instant::now();
    let graph = build_graph(&discovered.scope, &discovered.collections);
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        dangling = graph.dangling_edges().count(),
        "Graph building: {:.2}s",
        build_start.elapsed().as_secs_f64()
    );

    graph.to_document()
}

/// Resolve the selected cloud from the configuration file.
pub fn resolve_cloud(opts: &CloudOptions) -> Result<CloudConfig> {
    let name = opts.cloud.as_deref().ok_or_else(|| {
        Error::invalid_argument("no cloud selected: pass --cloud or set OS_CLOUD")
            .with_operation("pipeline::resolve_cloud")
    })?;
    let path = ExplorerConfig::locate(opts.config.as_deref())?;
    let config = ExplorerConfig::from_path(&path)?;
    let cloud = config
        .cloud(name)?
        .clone()
        .with_overrides(opts.region.as_deref(), opts.project_id.as_deref());
    Ok(cloud)
}

/// Open the inventory provider a cloud entry points at.
pub fn open_provider(cloud: &CloudConfig) -> Result<InventoryProvider> {
    let mut provider = InventoryProvider::open_region(&cloud.inventory, cloud.region.as_deref())
        .with_context(|| format!("failed to open inventory {}", cloud.inventory.display()))?;
    if let Some(project_id) = &cloud.project_id {
        provider = provider.with_project_id(project_id);
    }
    if let Some(project_name) = &cloud.project_name {
        provider = provider.with_project_name(project_name);
    }
    Ok(provider)
}

/// Discover the cloud selected by `opts`.
pub fn discover_cloud(opts: &CloudOptions) -> Result<GraphDocument> {
    let cloud = resolve_cloud(opts)?;
    let provider = open_provider(&cloud)?;
    Ok(run_discovery(&provider))
}

/// Read a saved graph document.
pub fn load_document_file(path: &std::path::Path) -> Result<GraphDocument> {
    let start = Instant::now();
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let doc = GraphDocument::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid graph document {}", path.display()))?;
    info!(
        nodes = doc.nodes.len(),
        edges = doc.edges.len(),
        "Loading document: {:.2}s",
        start.elapsed().as_secs_f64()
    );
    Ok(doc)
}

/// The document a renderer works on: `--file` when given, else a fresh
/// discovery of the selected cloud.
pub fn load_document(source: &SourceOptions) -> Result<GraphDocument> {
    match &source.file {
        Some(path) => load_document_file(path),
        None => discover_cloud(&source.cloud),
    }
}
