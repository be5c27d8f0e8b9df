//! Serve command - run the nutrimap daemon in-process.
//!
//! Takes the same flags and environment variables as the standalone
//! `nutrimap-daemon` binary.

use anyhow::Result;
use colored::Colorize;
use nutrimap_daemon::{build_state, DaemonArgs};

/// Run the serve command.
pub async fn run(args: DaemonArgs) -> Result<()> {
    let config = args.into_config()?;
    tracing::info!("Starting nutrimap daemon with {:?}", config);

    let state = build_state(&config).await?;
    let addr = config.bind_addr();

    println!();
    println!("  {} nutrimap daemon v{}", "▲".cyan(), env!("CARGO_PKG_VERSION"));
    println!();
    println!("  {} {}", "→".green(), format!("http://{}", addr).cyan());
    println!();
    println!("  {} {} ingredients", "◆".yellow(), state.table.len());
    println!(
        "  {} index {} ({})",
        "◆".yellow(),
        state.index_name,
        state.mapper.model_name()
    );
    println!();
    println!("  {}", "Endpoints:".dimmed());
    println!("    POST /map-ingredient                Map ingredient text");
    println!("    POST /update-mapping                Store a correction");
    println!("    GET  /get-mapping                   Read a correction");
    println!("    GET  /ingredients/:id/nutrition     Nutrition facts");
    println!("    POST /recipes/aggregate-nutrition   Recipe totals");
    println!();
    println!("  Press {} to stop", "Ctrl+C".yellow());
    println!();

    nutrimap_daemon::serve(state, &addr).await
}
