mod cli;
mod commands;
mod config;
mod data;
mod error;
mod logging;
mod preferences;
mod render;
mod utils;

use crate::cli::{Cli, Commands};
use crate::commands::GlobalOptions;
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!(
        "🚀 ZincSight Explorer CLI v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let globals = GlobalOptions {
        config: cli.config,
        set_values: cli.set_values,
        quiet: cli.quiet,
    };

    let command_result = match cli.command {
        Commands::Table(args) => {
            info!("Dispatching to 'table' command.");
            commands::table::run(args, &globals).await
        }
        Commands::Residues(args) => {
            info!("Dispatching to 'residues' command.");
            commands::residues::run(args, &globals).await
        }
        Commands::View(args) => {
            info!("Dispatching to 'view' command.");
            commands::view::run(args, &globals).await
        }
        Commands::Theme(args) => {
            info!("Dispatching to 'theme' command.");
            commands::theme::run(args)
        }
    };

    match &command_result {
        Ok(()) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }
    command_result
}
