//! Output: graph documents to disk, rendered text to stdout.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use osgraph_core::GraphDocument;
use osgraph_render::{TypeFilter, render_table, render_tree};

/// Write `doc` as pretty JSON to `path`.
pub fn write_document(doc: &GraphDocument, path: &Path) -> Result<()> {
    let json = doc.to_json_pretty()?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), "output written");
    Ok(())
}

pub fn tree_output(doc: &GraphDocument, types: Option<&str>) -> String {
    let filter = types.map(TypeFilter::parse).unwrap_or_default();
    let start = Instant::now();
    let output = render_tree(doc, &filter);
    info!("Tree rendering: {:.2}s", start.elapsed().as_secs_f64());
    output
}

pub fn table_output(doc: &GraphDocument, node_type: &str) -> String {
    render_table(doc, &node_type.trim().to_ascii_lowercase())
}

/// Print rendered text to stdout.
pub fn print(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
