//! CLI entry point for the leadgate service.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use leadgate_core::config::{
    CliOverrides, ServiceConfig, load_file_config, process_env, resolve_default_log_level,
};
use tracing::{debug, info};

mod cli;
mod commands;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    let file_config = load_file_config(args.config.as_deref())?;

    // Priority: RUST_LOG env var > quiet flag > verbose flag > config verbosity > info
    let default_level = resolve_default_log_level(
        args.verbose,
        args.quiet,
        file_config.as_ref().and_then(|c| c.verbosity),
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    match args.command {
        Command::Serve { bind, database } => {
            let overrides = CliOverrides {
                bind_addr: bind,
                database_path: database,
            };
            let config = ServiceConfig::resolve(file_config.as_ref(), &overrides, process_env)?;
            info!(bind = %config.bind_addr, "leadgate starting");
            commands::run_serve(config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Resolve { urls } => Ok(if commands::run_resolve(&urls) {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }),
        Command::Rekey { database, dry_run } => {
            let overrides = CliOverrides {
                bind_addr: None,
                database_path: database,
            };
            let config = ServiceConfig::resolve(file_config.as_ref(), &overrides, process_env)?;
            let report =
                commands::run_rekey(&config.database_path, &config.db_options, dry_run).await?;
            Ok(if report.needs_attention() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
    }
}
