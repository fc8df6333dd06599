//! Text rendering of a [`GraphDocument`].
//!
//! Renderers only ever see the wire document, never the builder's graph, so
//! rendering a freshly built graph and rendering one read back from JSON
//! give the same output.
//!
//! - [`tree`]: fixed project hierarchy, filterable by top-level branch
//! - [`table`]: flat listing of one node type
//! - [`text`]: the guide-line tree printer both build on

mod filter;
mod index;
pub mod table;
pub mod text;
pub mod tree;

use osgraph_core::GraphDocument;

pub use filter::TypeFilter;
pub use index::DocumentIndex;
pub use table::TableRenderer;
pub use text::TextTree;
pub use tree::TreeRenderer;

/// Render the project tree, showing only the branches `filter` allows.
pub fn render_tree(doc: &GraphDocument, filter: &TypeFilter) -> String {
    TreeRenderer::new(filter.clone()).render(doc)
}

/// Render every node of `node_type` as a table.
pub fn render_table(doc: &GraphDocument, node_type: &str) -> String {
    TableRenderer::new(node_type).render(doc)
}
