//! osgraph command-line interface: config, options, pipeline and output.

pub mod config;
pub mod options;
pub mod output;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

pub use config::{CloudConfig, ExplorerConfig};
pub use options::{CloudOptions, DiscoverArgs, SourceOptions, TableArgs, TreeArgs};
pub use pipeline::{discover_cloud, load_document, run_discovery};

/// Install the stderr log subscriber. `debug` forces the debug level,
/// otherwise `RUST_LOG` applies, defaulting to `info`.
pub fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    // a second init (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
