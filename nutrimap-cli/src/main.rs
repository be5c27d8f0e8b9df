//! nutrimap CLI - map ingredient text to USDA records and compute nutrition.
//!
//! Talks to a running nutrimap daemon over HTTP, computes nutrition locally
//! from a snapshot, or runs the daemon in-process.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod client;
mod commands;
mod config;
mod output;

use commands::*;
use config::NutrimapConfig;
use nutrimap_daemon::DaemonArgs;
use output::OutputFormat;

/// Ingredient mapping and nutrition facts.
#[derive(Parser)]
#[command(name = "nutrimap")]
#[command(author, version)]
#[command(about = "Map recipe ingredients to USDA records and compute nutrition facts")]
#[command(propagate_version = true)]
#[command(after_help = "Quick Start:
  nutrimap serve                      Start the daemon (needs API keys)
  nutrimap map \"2 cups diced apple\"   Find USDA candidates
  nutrimap nutrition 09003            Facts per serving

Examples:
  nutrimap nutrition 09003 -m 100g --data data/nutrition_data.json
  nutrimap recipe 09003:200 19335:25")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Daemon URL (overrides config, default http://localhost:5000)
    #[arg(long, global = true, env = "NUTRIMAP_DAEMON_URL")]
    daemon: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Map free-text ingredient input to ranked USDA candidates
    #[command(visible_alias = "m")]
    Map {
        /// Ingredient text, e.g. "1 cup chopped onion"
        text: String,

        /// Number of candidates to return
        #[arg(short = 'k', long = "top-k")]
        top_k: Option<usize>,
    },

    /// Nutrition facts for one ingredient
    #[command(visible_alias = "n")]
    Nutrition {
        /// USDA ingredient id
        id: String,

        /// Scale to one serving or to 100 g
        #[arg(short, long, default_value = "serving")]
        measurement: String,

        /// Compute locally from this nutrient table snapshot
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Aggregate nutrition for a recipe
    #[command(visible_alias = "r")]
    Recipe {
        /// Ingredients as ID[:GRAMS] (grams default to 100)
        items: Vec<String>,

        /// JSON file with [{"ingredientId", "amountInGrams"}] items
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Compute locally from this nutrient table snapshot
        #[arg(long)]
        data: Option<PathBuf>,
    },

    /// Store or read a user's mapping correction
    Correct {
        #[command(subcommand)]
        action: CorrectAction,
    },

    /// Show daemon status
    #[command(visible_alias = "st")]
    Status,

    /// Run the daemon in this process
    Serve {
        #[command(flatten)]
        args: DaemonArgs,
    },
}

#[derive(Subcommand)]
enum CorrectAction {
    /// Map an ingredient to a different USDA record for one user
    Set {
        user_id: String,
        ingredient_id: String,
        mapped_ingredient: String,
    },
    /// Show the stored correction, if any
    Get {
        user_id: String,
        ingredient_id: String,
    },
}

fn setup_logging(verbose: bool, quiet: bool, serving: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug,hyper=info,reqwest=info"
    } else if serving {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before clap reads the environment
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let serving = matches!(cli.command, Some(Commands::Serve { .. }));
    setup_logging(cli.verbose, cli.quiet, serving);

    // Load configuration from .nutrimaprc.toml
    let config = NutrimapConfig::load(std::path::Path::new("."));

    // Resolve output format: CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    let ctx = CommandContext {
        format,
        daemon_url: cli
            .daemon
            .unwrap_or_else(|| config.daemon_url().to_string()),
        data: config.nutrient_table().map(|p| p.to_path_buf()),
    };

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Map { text, top_k } => map::run(&ctx, &text, top_k).await,
        Commands::Nutrition {
            id,
            measurement,
            data,
        } => nutrition::run(&ctx, &id, &measurement, data).await,
        Commands::Recipe { items, file, data } => recipe::run(&ctx, &items, file, data).await,
        Commands::Correct { action } => match action {
            CorrectAction::Set {
                user_id,
                ingredient_id,
                mapped_ingredient,
            } => correct::run_set(&ctx, &user_id, &ingredient_id, &mapped_ingredient).await,
            CorrectAction::Get {
                user_id,
                ingredient_id,
            } => correct::run_get(&ctx, &user_id, &ingredient_id).await,
        },
        Commands::Status => status::run(&ctx).await,
        Commands::Serve { args } => serve::run(args).await,
    }
}
