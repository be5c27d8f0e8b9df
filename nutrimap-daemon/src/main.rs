//! nutrimap daemon - ingredient mapping and nutrition server.
//!
//! A single Rust binary that provides:
//! - Ingredient text -> USDA record mapping (embedding + vector search)
//! - Per-serving and per-100g nutrition facts
//! - Recipe-level nutrition aggregation with daily values

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use nutrimap_daemon::DaemonArgs;

/// nutrimap ingredient mapping daemon
#[derive(Parser, Debug)]
#[command(name = "nutrimap-daemon")]
#[command(about = "Ingredient mapping and nutrition facts server")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    daemon: DaemonArgs,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads the environment
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    let config = cli.daemon.into_config()?;
    nutrimap_daemon::run(config).await
}
