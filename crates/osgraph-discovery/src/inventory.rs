//! Inventory-backed discovery provider.
//!
//! Two layouts are accepted:
//!
//! ```text
//! inventory.json                      inventory/
//! {                                   ├── project.json   {"project_id", "project_name"}
//!   "project_id": "...",              ├── servers.json   [ {...}, ... ]
//!   "project_name": "...",            ├── volumes.json
//!   "resources": {                    └── <region>/      same layout, per region
//!     "servers": [ {...} ],
//!     "volumes": [ ... ]
//!   }
//! }
//! ```
//!
//! A kind missing from the inventory reads as an unavailable service.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use osgraph_core::{ProjectScope, Record, ResourceKind};
use osgraph_error::{Error, ErrorKind, Result};

use crate::provider::DiscoveryProvider;

const PROJECT_FILE: &str = "project.json";
const UNKNOWN_PROJECT: &str = "Unknown Project";

#[derive(Debug, Default, Deserialize)]
struct ProjectHeader {
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    project_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InventoryFile {
    #[serde(flatten)]
    header: ProjectHeader,
    #[serde(default)]
    resources: Map<String, Value>,
}

#[derive(Debug)]
enum Source {
    /// Single JSON document, loaded eagerly.
    File { resources: Map<String, Value> },
    /// One `<collection key>.json` per kind, read on demand.
    Directory { root: PathBuf },
}

/// Reads raw records from a JSON inventory on disk.
#[derive(Debug)]
pub struct InventoryProvider {
    path: PathBuf,
    scope: ProjectScope,
    source: Source,
}

impl InventoryProvider {
    /// Open an inventory file or directory.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_region(path, None)
    }

    /// Open an inventory, selecting the `region` subdirectory of a
    /// directory layout when given. File inventories hold one region and
    /// ignore it.
    pub fn open_region(path: impl AsRef<Path>, region: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|err| io_error(err, "inventory::open", path, None))?;

        if meta.is_dir() {
            Self::open_directory(path, region)
        } else {
            if let Some(region) = region {
                debug!(region, path = %path.display(), "file inventory ignores region");
            }
            Self::open_file(path)
        }
    }

    fn open_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|err| io_error(err, "inventory::open_file", path, None))?;
        let file: InventoryFile = serde_json::from_str(&text).map_err(|err| {
            Error::deserialization_failed(err.to_string())
                .with_operation("inventory::open_file")
                .with_context("path", path.display().to_string())
                .set_source(err)
        })?;

        for key in file.resources.keys() {
            if ResourceKind::from_collection_key(key).is_none() {
                warn!(key = key.as_str(), "ignoring unknown collection in inventory");
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            scope: scope_from(file.header),
            source: Source::File {
                resources: file.resources,
            },
        })
    }

    fn open_directory(path: &Path, region: Option<&str>) -> Result<Self> {
        let root = match region {
            Some(region) => {
                let root = path.join(region);
                if !root.is_dir() {
                    return Err(Error::config_invalid(format!(
                        "region '{}' not found in inventory",
                        region
                    ))
                    .with_operation("inventory::open_directory")
                    .with_context("path", path.display().to_string()));
                }
                root
            }
            None => path.to_path_buf(),
        };

        // project.json may sit next to the region directories or inside one
        let header = [root.join(PROJECT_FILE), path.join(PROJECT_FILE)]
            .iter()
            .find(|candidate| candidate.is_file())
            .map(|candidate| read_header(candidate.as_path()))
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            path: path.to_path_buf(),
            scope: scope_from(header),
            source: Source::Directory { root },
        })
    }

    /// Override the project id the inventory declares.
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.scope.project_id = project_id.into();
        self
    }

    /// Override the project name the inventory declares.
    pub fn with_project_name(mut self, project_name: impl Into<String>) -> Self {
        self.scope.project_name = project_name.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn list_file(resources: &Map<String, Value>, kind: ResourceKind) -> Result<Vec<Record>> {
        match resources.get(kind.collection_key()) {
            None => Err(Error::service_unavailable(kind.collection_key())
                .permanent()
                .with_operation("inventory::list")),
            Some(value) => records_from(value.clone(), kind),
        }
    }

    fn list_directory(root: &Path, kind: ResourceKind) -> Result<Vec<Record>> {
        let path = root.join(format!("{}.json", kind.collection_key()));
        let text = fs::read_to_string(&path)
            .map_err(|err| io_error(err, "inventory::list", &path, Some(kind)))?;
        let value: Value = serde_json::from_str(&text).map_err(|err| {
            Error::deserialization_failed(err.to_string())
                .with_operation("inventory::list")
                .with_context("path", path.display().to_string())
                .set_source(err)
        })?;
        records_from(value, kind)
    }
}

impl DiscoveryProvider for InventoryProvider {
    fn scope(&self) -> ProjectScope {
        self.scope.clone()
    }

    fn list(&self, kind: ResourceKind) -> Result<Vec<Record>> {
        match &self.source {
            Source::File { resources } => Self::list_file(resources, kind),
            Source::Directory { root } => Self::list_directory(root, kind),
        }
    }
}

fn read_header(path: &Path) -> Result<ProjectHeader> {
    let text =
        fs::read_to_string(path).map_err(|err| io_error(err, "inventory::read_header", path, None))?;
    serde_json::from_str(&text).map_err(|err| {
        Error::deserialization_failed(err.to_string())
            .with_operation("inventory::read_header")
            .with_context("path", path.display().to_string())
            .set_source(err)
    })
}

fn scope_from(header: ProjectHeader) -> ProjectScope {
    ProjectScope::new(
        header.project_id.unwrap_or_default(),
        header
            .project_name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_PROJECT.to_string()),
    )
}

/// Records of one kind from a JSON array. `null` reads as empty; non-object
/// elements are skipped.
fn records_from(value: Value, kind: ResourceKind) -> Result<Vec<Record>> {
    let items = match value {
        Value::Array(items) => items,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(Error::new(
                ErrorKind::DeserializationFailed,
                format!("expected an array of records, found {}", json_type(&other)),
            )
            .with_operation("inventory::list")
            .with_context("kind", kind.as_str()));
        }
    };

    let total = items.len();
    let records: Vec<Record> = items.into_iter().filter_map(Record::from_value).collect();
    if records.len() != total {
        debug!(
            kind = kind.as_str(),
            skipped = total - records.len(),
            "skipping non-object records"
        );
    }
    Ok(records)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Map an I/O failure. Within a kind listing a missing file means the
/// service is absent (rereading won't help) and a denied read means the
/// caller lacks access.
fn io_error(
    err: io::Error,
    operation: &'static str,
    path: &Path,
    kind: Option<ResourceKind>,
) -> Error {
    let error = match (err.kind(), kind) {
        (io::ErrorKind::NotFound, Some(kind)) => {
            Error::service_unavailable(kind.collection_key())
                .permanent()
                .set_source(err)
        }
        (io::ErrorKind::PermissionDenied, Some(kind)) => {
            Error::forbidden(kind.collection_key()).set_source(err)
        }
        (io::ErrorKind::NotFound, None) => Error::new(
            ErrorKind::FileNotFound,
            format!("inventory '{}' not found", path.display()),
        )
        .set_source(err),
        _ => Error::from(err),
    };
    error
        .with_operation(operation)
        .with_context("path", path.display().to_string())
}
