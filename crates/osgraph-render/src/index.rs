use std::collections::{HashMap, HashSet};

use osgraph_core::{GraphDocument, Node};

/// Lookup tables over a document, built once per render.
///
/// Edges are grouped by `(from, type)` in document order. Duplicate edges
/// stay duplicated; a duplicated node id resolves to its first occurrence.
#[derive(Debug)]
pub struct DocumentIndex<'a> {
    doc: &'a GraphDocument,
    nodes: HashMap<&'a str, &'a Node>,
    children: HashMap<(&'a str, &'a str), Vec<&'a str>>,
    targets: HashMap<&'a str, HashSet<&'a str>>,
}

impl<'a> DocumentIndex<'a> {
    pub fn new(doc: &'a GraphDocument) -> Self {
        let mut nodes = HashMap::with_capacity(doc.nodes.len());
        for node in &doc.nodes {
            nodes.entry(node.id.as_str()).or_insert(node);
        }

        let mut children: HashMap<(&str, &str), Vec<&str>> = HashMap::new();
        let mut targets: HashMap<&str, HashSet<&str>> = HashMap::new();
        for edge in &doc.edges {
            children
                .entry((edge.from.as_str(), edge.kind.as_str()))
                .or_default()
                .push(edge.to.as_str());
            targets
                .entry(edge.kind.as_str())
                .or_default()
                .insert(edge.to.as_str());
        }

        Self {
            doc,
            nodes,
            children,
            targets,
        }
    }

    pub fn node(&self, id: &str) -> Option<&'a Node> {
        self.nodes.get(id).copied()
    }

    /// Nodes reached from `from` over edges of `edge_type`. Dangling
    /// targets are skipped.
    pub fn children(&self, from: &str, edge_type: &str) -> Vec<&'a Node> {
        self.children
            .get(&(from, edge_type))
            .map(|ids| ids.iter().filter_map(|id| self.node(id)).collect())
            .unwrap_or_default()
    }

    /// Whether any edge of `edge_type` points at `id`.
    pub fn is_target(&self, id: &str, edge_type: &str) -> bool {
        self.targets
            .get(edge_type)
            .is_some_and(|ids| ids.contains(id))
    }

    /// Nodes of `node_type`, in document order.
    pub fn nodes_of_type(&self, node_type: &'a str) -> Vec<&'a Node> {
        self.doc.nodes_of_type(node_type).collect()
    }
}
