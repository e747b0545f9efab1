//! graph-upload - bulk upload of RDF files into a digest-protected graph store

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use graph_upload::config::{Config, ConfigOptions, DEFAULT_ROOT_DIR};
use graph_upload::pipeline::Coordinator;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "graph-upload")]
#[command(about = "Upload every file under a directory to the graph store")]
struct Args {
    /// Directory whose files are uploaded
    #[arg(long, default_value = DEFAULT_ROOT_DIR)]
    dir: PathBuf,

    /// Walk and read every file without sending anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, progress lines to stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let config = Config::new(
        args.dir,
        ConfigOptions {
            dry_run: args.dry_run,
            ..ConfigOptions::default()
        },
    )?;

    info!("Starting graph-upload");

    let coordinator = Coordinator::new(config)?;
    coordinator.run().await;

    Ok(())
}
