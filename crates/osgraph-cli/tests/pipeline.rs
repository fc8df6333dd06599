use std::fs;
use std::path::{Path, PathBuf};

use osgraph_cli::output::{table_output, tree_output, write_document};
use osgraph_cli::pipeline::{discover_cloud, load_document, resolve_cloud};
use osgraph_cli::{CloudOptions, ExplorerConfig, SourceOptions};
use osgraph_error::ErrorKind;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

fn write(path: &Path, text: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

/// Config with one file-backed and one directory-backed cloud.
fn fixture() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let inventory = json!({
        "project_id": "p1",
        "project_name": "demo",
        "resources": {
            "servers": [{"id": "s1", "name": "web", "status": "ACTIVE",
                         "availability_zone": "nova"}],
            "volumes": [{"id": "v1", "name": "root", "size": 10,
                         "attachments": [{"server_id": "s1", "device": "/dev/vda"}]}],
            "networks": [{"id": "n1", "name": "private"}]
        }
    });
    write(
        &dir.path().join("inventories/demo.json"),
        &serde_json::to_string(&inventory).unwrap(),
    );
    write(
        &dir.path().join("inventories/lab/RegionOne/routers.json"),
        r#"[{"id": "r1", "name": "gw", "status": "ACTIVE"}]"#,
    );

    let config = dir.path().join("osgraph.toml");
    write(
        &config,
        r#"
[clouds.demo]
inventory = "inventories/demo.json"

[clouds.lab]
inventory = "inventories/lab"
region = "RegionOne"
project_id = "p-lab"
project_name = "lab"
"#,
    );
    (dir, config)
}

#[test]
fn relative_inventory_resolves_against_config_dir() {
    let (dir, config) = fixture();
    let loaded = ExplorerConfig::from_path(&config).unwrap();
    assert_eq!(
        loaded.cloud("demo").unwrap().inventory,
        dir.path().join("inventories/demo.json")
    );
}

#[test]
fn discover_write_and_render_from_file() {
    let (dir, config) = fixture();
    let opts = CloudOptions::new().with_cloud("demo").with_config(&config);

    let doc = discover_cloud(&opts).unwrap();
    assert_eq!(doc.project_name, "demo");
    assert_eq!(doc.nodes.len(), 3);
    assert_eq!(doc.edges.len(), 1);

    let out = dir.path().join("graph.json");
    write_document(&doc, &out).unwrap();
    let reloaded = load_document(&SourceOptions::from_file(&out)).unwrap();
    assert_eq!(reloaded, doc);

    let expected = "\
Project: demo
└── Servers (1)
    └── web (s1) AZ: nova ACTIVE
        ├── Flavor: unknown, Image: unknown
        └── Volumes:
            └── root (v1) (10GB, unknown-type)
";
    assert_eq!(tree_output(&reloaded, Some("server")), expected);
    assert!(table_output(&reloaded, "Network").starts_with("Network List\n"));
}

#[test]
fn region_and_project_overrides() {
    let (_dir, config) = fixture();
    let opts = CloudOptions::new()
        .with_cloud("lab")
        .with_config(&config)
        .with_project_id("p-override");

    let cloud = resolve_cloud(&opts).unwrap();
    assert_eq!(cloud.region.as_deref(), Some("RegionOne"));
    assert_eq!(cloud.project_id.as_deref(), Some("p-override"));

    let doc = discover_cloud(&opts).unwrap();
    assert_eq!(doc.project_id, "p-override");
    assert_eq!(doc.project_name, "lab");
    assert_eq!(doc.nodes.len(), 1);

    let bad_region = opts.clone().with_region("RegionNine");
    let err = discover_cloud(&bad_region).unwrap_err();
    let err = err.downcast_ref::<osgraph_error::Error>().unwrap();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
}

#[test]
fn unknown_cloud_is_config_error() {
    let (_dir, config) = fixture();
    let opts = CloudOptions::new().with_cloud("staging").with_config(&config);

    let err = resolve_cloud(&opts).unwrap_err();
    let err = err.downcast_ref::<osgraph_error::Error>().unwrap();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(err.message().contains("demo, lab"));
}

#[test]
fn missing_cloud_selection_is_rejected() {
    let (_dir, config) = fixture();
    let opts = CloudOptions::new().with_config(&config);
    let err = resolve_cloud(&opts).unwrap_err();
    let err = err.downcast_ref::<osgraph_error::Error>().unwrap();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}
