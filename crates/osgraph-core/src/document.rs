//! Wire document: the only contract between graph building and rendering.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use osgraph_error::{Error, Result};

use crate::model::{Edge, Node, null_as_default};

fn unknown_project() -> String {
    "Unknown Project".to_string()
}

/// Serialized resource graph.
///
/// ```json
/// { "project_id": "...", "project_name": "...", "generated_at": "...",
///   "nodes": [ { "id", "type", "name", "label", "meta", ... } ],
///   "edges": [ { "from", "to", "type", "meta" } ] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub project_id: String,
    #[serde(default = "unknown_project", deserialize_with = "null_as_default")]
    pub project_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub generated_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<Node>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<Edge>,
}

impl GraphDocument {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| {
            Error::deserialization_failed(err.to_string())
                .with_operation("document::from_json")
                .set_source(err)
        })
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).map_err(|err| {
            Error::deserialization_failed(err.to_string())
                .with_operation("document::from_reader")
                .set_source(err)
        })
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| {
            Error::serialization_failed(err.to_string())
                .with_operation("document::to_json")
                .set_source(err)
        })
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self).map_err(|err| {
            Error::serialization_failed(err.to_string())
                .with_operation("document::to_writer")
                .set_source(err)
        })
    }

    /// Nodes of one type, in document order.
    pub fn nodes_of_type<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use osgraph_error::ErrorKind;

    #[test]
    fn test_minimal_document() {
        let doc = GraphDocument::from_json("{}").unwrap();
        assert_eq!(doc.project_name, "Unknown Project");
        assert!(doc.nodes.is_empty());
        assert!(doc.edges.is_empty());
    }

    #[test]
    fn test_malformed_document() {
        let err = GraphDocument::from_json("{\"nodes\": 3}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeserializationFailed);
        assert_eq!(err.operation(), "document::from_json");
    }

    #[test]
    fn test_nodes_of_type() {
        let doc = GraphDocument::from_json(
            r#"{"nodes": [
                {"id": "s1", "type": "server", "name": "a"},
                {"id": "v1", "type": "volume", "name": "b"},
                {"id": "s2", "type": "server", "name": "c"}
            ]}"#,
        )
        .unwrap();
        let ids: Vec<_> = doc.nodes_of_type("server").map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2"]);
    }
}
