use clap::Parser;
use colored::*;
use std::process;
use tracing_subscriber::EnvFilter;

mod cli;
mod methods;
mod report;

use crate::cli::{Cli, Commands};
use kb_snekmer_core::SnekmerError;

fn main() {
    let cli = Cli::parse();

    // Initialize logging with SNEKMER_LOG environment variable support;
    // -v / -vv raise the default level when the variable is absent.
    let log_level = std::env::var("SNEKMER_LOG").unwrap_or_else(|_| {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
        .to_string()
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<SnekmerError>() {
            Some(SnekmerError::Config(_)) => 2,
            Some(SnekmerError::InvalidParams(_)) => 3,
            Some(SnekmerError::Service(_)) => 4,
            Some(SnekmerError::Tool(_)) => 5,
            Some(SnekmerError::Staging(_)) => 6,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Run(args) => crate::cli::commands::run_job::run(args),
        Commands::Model(args) => crate::cli::commands::model::run(args),
        Commands::Search(args) => crate::cli::commands::search::run(args),
        Commands::Status => crate::cli::commands::status::run(),
    }
}
