use std::fs;

use osgraph_core::{ResourceKind, build_graph};
use osgraph_discovery::{DiscoveryProvider, InventoryProvider, discover};
use osgraph_error::ErrorKind;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn write_json(dir: &TempDir, name: &str, value: serde_json::Value) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
    path
}

#[test]
fn single_file_inventory() {
    let dir = TempDir::new().unwrap();
    let path = write_json(
        &dir,
        "inventory.json",
        json!({
            "project_id": "p1",
            "project_name": "demo",
            "resources": {
                "servers": [{"id": "s1", "name": "web", "flavor": {"id": "f1"}}],
                "flavors": [{"id": "f1", "name": "m1.small"}],
                "volumes": [{"id": "v1", "attachments": [{"server_id": "s1", "device": "/dev/vdb"}]}],
                "buckets": [{"id": "b1"}]
            }
        }),
    );

    let provider = InventoryProvider::open(&path).unwrap();
    let scope = provider.scope();
    assert_eq!((scope.project_id.as_str(), scope.project_name.as_str()), ("p1", "demo"));

    assert_eq!(provider.list(ResourceKind::Server).unwrap().len(), 1);
    let err = provider.list(ResourceKind::Router).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ServiceUnavailable);
    assert!(!err.is_retryable());

    let discovered = discover(&provider);
    assert_eq!(discovered.collections.total(), 3);

    let graph = build_graph(&discovered.scope, &discovered.collections);
    assert_eq!(graph.node("s1").unwrap().meta["flavor_name"], "m1.small");
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn directory_inventory_with_region() {
    let dir = TempDir::new().unwrap();
    write_json(&dir, "project.json", json!({"project_id": "p2", "project_name": "lab"}));
    fs::create_dir(dir.path().join("RegionOne")).unwrap();
    write_json(
        &dir,
        "RegionOne/pools.json",
        json!([{"id": "pool1", "members": [{"id": "m1"}]}]),
    );
    write_json(&dir, "RegionOne/members.json", json!([{"id": "m1", "address": "10.0.0.5"}, 7]));

    let provider = InventoryProvider::open_region(dir.path(), Some("RegionOne")).unwrap();
    assert_eq!(provider.scope().project_name, "lab");

    let discovered = discover(&provider);
    let members = discovered.collections.get(ResourceKind::Member);
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].str_field("pool_id"), Some("pool1"));

    let graph = build_graph(&discovered.scope, &discovered.collections);
    let member_edges: Vec<_> = graph
        .edges()
        .iter()
        .filter(|e| e.kind == "has_member")
        .map(|e| (e.from.as_str(), e.to.as_str()))
        .collect();
    assert_eq!(member_edges, vec![("pool1", "m1")]);
}

#[test]
fn unknown_region_is_config_error() {
    let dir = TempDir::new().unwrap();
    let err = InventoryProvider::open_region(dir.path(), Some("RegionTwo")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[test]
fn malformed_kind_file_is_absorbed() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("networks.json"), "[{\"id\": ").unwrap();
    write_json(&dir, "subnets.json", json!([{"id": "sub1", "network_id": "n1"}]));

    let provider = InventoryProvider::open(dir.path()).unwrap();
    let err = provider.list(ResourceKind::Network).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DeserializationFailed);

    let discovered = discover(&provider);
    assert!(discovered.collections.get(ResourceKind::Network).is_empty());
    assert_eq!(discovered.collections.len(ResourceKind::Subnet), 1);
    assert_eq!(discovered.scope.project_name, "Unknown Project");
}

#[test]
fn missing_inventory_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = InventoryProvider::open(dir.path().join("nope.json")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::FileNotFound);
}

#[test]
fn scope_overrides() {
    let dir = TempDir::new().unwrap();
    let path = write_json(&dir, "inv.json", json!({"project_id": "p1", "resources": {}}));
    let provider = InventoryProvider::open(&path)
        .unwrap()
        .with_project_id("p9")
        .with_project_name("override");
    let scope = provider.scope();
    assert_eq!(scope.project_id, "p9");
    assert_eq!(scope.project_name, "override");
}
