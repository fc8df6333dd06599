//! Cloud configuration file.
//!
//! ```toml
//! [clouds.lab]
//! inventory = "inventories/lab"   # relative to this file
//! region = "RegionOne"
//! project_id = "8f1c..."
//! project_name = "lab"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use osgraph_error::Error;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "osgraph.toml";

#[derive(Debug, Default, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default)]
    pub clouds: BTreeMap<String, CloudConfig>,
}

/// One named cloud: where its inventory lives and which project it scopes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CloudConfig {
    pub inventory: PathBuf,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
}

impl ExplorerConfig {
    /// Resolve the config path: the explicit one (from `--config` or
    /// `$OSGRAPH_CONFIG`), else `./osgraph.toml` when it exists.
    pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            return Ok(fallback);
        }
        Err(Error::config_invalid(format!(
            "no configuration file: pass --config, set OSGRAPH_CONFIG or create ./{DEFAULT_CONFIG_FILE}"
        ))
        .with_operation("config::locate")
        .into())
    }

    /// Load a config file. Relative inventory paths are resolved against
    /// the directory holding the file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config = Self::parse(&text)
            .with_context(|| format!("invalid TOML in {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for cloud in config.clouds.values_mut() {
            if cloud.inventory.is_relative() {
                cloud.inventory = base.join(&cloud.inventory);
            }
        }
        debug!(path = %path.display(), clouds = config.clouds.len(), "config loaded");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// The named cloud, or a `ConfigInvalid` error listing the known ones.
    pub fn cloud(&self, name: &str) -> osgraph_error::Result<&CloudConfig> {
        self.clouds.get(name).ok_or_else(|| {
            let known = self.clouds.keys().cloned().collect::<Vec<_>>().join(", ");
            Error::config_invalid(format!("cloud '{name}' not found (available: {known})"))
                .with_operation("config::cloud")
                .with_context("cloud", name)
        })
    }
}

impl CloudConfig {
    /// Apply `--region` / `--project-id` on top of the file's values.
    pub fn with_overrides(mut self, region: Option<&str>, project_id: Option<&str>) -> Self {
        if let Some(region) = region {
            self.region = Some(region.to_string());
        }
        if let Some(project_id) = project_id {
            self.project_id = Some(project_id.to_string());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [clouds.lab]
        inventory = "inv/lab.json"
        region = "RegionOne"

        [clouds.prod]
        inventory = "/srv/prod"
        project_id = "p-prod"
        project_name = "production"
    "#;

    #[test]
    fn test_parse_clouds() {
        let config = ExplorerConfig::parse(SAMPLE).unwrap();
        assert_eq!(config.clouds.len(), 2);

        let lab = config.cloud("lab").unwrap();
        assert_eq!(lab.inventory, PathBuf::from("inv/lab.json"));
        assert_eq!(lab.region.as_deref(), Some("RegionOne"));
        assert_eq!(lab.project_id, None);
    }

    #[test]
    fn test_unknown_cloud_lists_available() {
        let config = ExplorerConfig::parse(SAMPLE).unwrap();
        let err = config.cloud("staging").unwrap_err();
        assert_eq!(err.kind(), osgraph_error::ErrorKind::ConfigInvalid);
        assert!(err.message().contains("available: lab, prod"));
    }

    #[test]
    fn test_overrides() {
        let config = ExplorerConfig::parse(SAMPLE).unwrap();
        let prod = config
            .cloud("prod")
            .unwrap()
            .clone()
            .with_overrides(Some("RegionTwo"), None);
        assert_eq!(prod.region.as_deref(), Some("RegionTwo"));
        assert_eq!(prod.project_id.as_deref(), Some("p-prod"));
    }

    #[test]
    fn test_missing_inventory_is_rejected() {
        assert!(ExplorerConfig::parse("[clouds.x]\nregion = \"r\"\n").is_err());
    }
}
