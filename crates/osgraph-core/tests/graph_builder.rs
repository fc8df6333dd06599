use osgraph_core::{
    GraphBuilder, GraphDocument, Node, ProjectScope, Record, ResourceCollections, ResourceKind,
    build_graph,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn records(values: Value) -> Vec<Record> {
    match values {
        Value::Array(items) => items.into_iter().filter_map(Record::from_value).collect(),
        other => panic!("expected array, got {other}"),
    }
}

fn edge_triples(doc: &GraphDocument) -> Vec<(&str, &str, &str)> {
    doc.edges
        .iter()
        .map(|e| (e.from.as_str(), e.to.as_str(), e.kind.as_str()))
        .collect()
}

#[test]
fn add_node_is_last_write_wins() {
    let mut gb = GraphBuilder::new("p1", "proj1");
    for name in ["first", "second", "third"] {
        gb.add_node(Node::new("s1", "server", name));
    }

    let graph = gb.finish();
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.node("s1").unwrap().name, "third");
}

#[test]
fn add_edge_keeps_every_call_in_order() {
    let mut gb = GraphBuilder::new("p1", "proj1");
    gb.add_edge("s1", "v1", "attached", None);
    gb.add_edge("s1", "v1", "attached", None);
    gb.add_edge("v1", "sn1", "has_snapshot", None);

    let graph = gb.finish();
    let kinds: Vec<_> = graph.edges().iter().map(|e| e.kind.as_str()).collect();
    assert_eq!(kinds, vec!["attached", "attached", "has_snapshot"]);
}

#[test]
fn server_volume_snapshot_scenario() {
    let collections = ResourceCollections::new()
        .with(ResourceKind::Server, records(json!([{"id": "S1", "name": "S1"}])))
        .with(
            ResourceKind::Volume,
            records(json!([{
                "id": "V1", "name": "V1",
                "attachments": [{"server_id": "S1", "device": "/dev/vda"}]
            }])),
        )
        .with(
            ResourceKind::Snapshot,
            records(json!([{"id": "SN1", "name": "SN1", "volume_id": "V1"}])),
        );

    let graph = build_graph(&ProjectScope::new("p1", "demo"), &collections);
    let doc = graph.to_document();

    let ids: Vec<_> = doc.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["S1", "V1", "SN1"]);
    assert_eq!(
        edge_triples(&doc),
        vec![
            ("S1", "V1", "attached"),
            ("V1", "SN1", "has_snapshot"),
        ]
    );
    assert_eq!(doc.edges[0].meta["device"], "/dev/vda");
    assert!(doc.edges[1].meta.is_empty());
    assert_eq!(graph.dangling_edges().count(), 0);
}

#[test]
fn partial_discovery_leaves_dangling_edges() {
    // volumes were forbidden: the snapshot still points at its volume
    let collections = ResourceCollections::new().with(
        ResourceKind::Snapshot,
        records(json!([{"id": "SN1", "volume_id": "V-missing"}])),
    );

    let graph = build_graph(&ProjectScope::new("p1", "demo"), &collections);
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.dangling_edges().count(), 1);
}

#[test]
fn document_survives_json_round_trip() {
    let collections = ResourceCollections::new()
        .with(ResourceKind::Network, records(json!([{"id": "n1", "name": "private"}])))
        .with(
            ResourceKind::Subnet,
            records(json!([{"id": "sub1", "network_id": "n1", "cidr": "10.0.0.0/24"}])),
        );
    let doc = build_graph(&ProjectScope::new("p1", "demo"), &collections).to_document();

    let text = doc.to_json_pretty().unwrap();
    let parsed = GraphDocument::from_json(&text).unwrap();
    assert_eq!(parsed, doc);

    let raw: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(raw["nodes"][1]["type"], "subnet");
    assert_eq!(raw["nodes"][1]["partial"], false);
    assert_eq!(raw["edges"][0]["from"], "n1");
}
