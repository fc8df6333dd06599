//! Shared command-line options for the osgraph subcommands.

use std::path::PathBuf;

use clap::Args;

/// Selects a cloud from the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct CloudOptions {
    /// Cloud name from the configuration file
    #[arg(long, value_name = "NAME", env = "OS_CLOUD")]
    pub cloud: Option<String>,

    /// Configuration file (default: ./osgraph.toml)
    #[arg(long, value_name = "FILE", env = "OSGRAPH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the cloud's region
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Override the cloud's project id
    #[arg(long = "project-id", value_name = "ID")]
    pub project_id: Option<String>,
}

/// Where a renderer gets its graph: a live discovery or a saved document.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceOptions {
    #[command(flatten)]
    pub cloud: CloudOptions,

    /// Render a previously saved graph document instead of discovering
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct DiscoverArgs {
    #[command(flatten)]
    pub cloud: CloudOptions,

    /// Where to write the graph document
    #[arg(short = 'o', long = "out", value_name = "FILE", default_value = "graph.json")]
    pub out: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct TreeArgs {
    #[command(flatten)]
    pub source: SourceOptions,

    /// Comma-separated resource types to show (e.g. server,network)
    #[arg(long, value_name = "TYPES")]
    pub types: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TableArgs {
    #[command(flatten)]
    pub source: SourceOptions,

    /// Node type to list (e.g. server)
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub node_type: String,
}

impl CloudOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cloud(mut self, cloud: impl Into<String>) -> Self {
        self.cloud = Some(cloud.into());
        self
    }

    pub fn with_config(mut self, config: impl Into<PathBuf>) -> Self {
        self.config = Some(config.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }
}

impl SourceOptions {
    pub fn from_file(file: impl Into<PathBuf>) -> Self {
        Self {
            cloud: CloudOptions::default(),
            file: Some(file.into()),
        }
    }

    pub fn from_cloud(cloud: CloudOptions) -> Self {
        Self { cloud, file: None }
    }
}
