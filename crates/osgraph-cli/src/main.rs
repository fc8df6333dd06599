use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use osgraph_cli::output::{print, table_output, tree_output, write_document};
use osgraph_cli::pipeline::{discover_cloud, load_document};
use osgraph_cli::{DiscoverArgs, TableArgs, TreeArgs, init_logging};

#[derive(Parser, Debug)]
#[command(
    name = "osgraph",
    about = "osgraph: discover a cloud project and walk its resource graph",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true, default_value_t = false)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover resources and save the graph document
    Discover(DiscoverArgs),
    /// Render the project as a resource tree
    Tree(TreeArgs),
    /// List all resources of one type
    Table(TableArgs),
}

pub fn run(cli: Cli) -> Result<()> {
    let total_start = Instant::now();

    match cli.command {
        Command::Discover(args) => {
            let doc = discover_cloud(&args.cloud)?;
            write_document(&doc, &args.out)?;
            println!("Graph saved to {}", args.out.display());
        }
        Command::Tree(args) => {
            let doc = load_document(&args.source)?;
            print(&tree_output(&doc, args.types.as_deref()))?;
        }
        Command::Table(args) => {
            let doc = load_document(&args.source)?;
            print(&table_output(&doc, &args.node_type))?;
        }
    }

    tracing::info!(
        total_secs = total_start.elapsed().as_secs_f64(),
        "complete"
    );
    Ok(())
}

pub fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    run(cli)
}
