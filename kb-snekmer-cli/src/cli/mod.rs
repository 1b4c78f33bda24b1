pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kb-snekmer",
    version,
    about = "KBase service module wrapper for the snekmer k-mer CLI",
    long_about = "Runs the module's model and search operations: stages protein FASTA \
                  input from workspace Genome objects, drives the external snekmer tool, \
                  collects its result tables and publishes a platform report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute a platform job file and write the result file
    Run(commands::run_job::RunArgs),

    /// Run the model operation directly (local debugging)
    Model(commands::model::ModelArgs),

    /// Run the search operation directly (local debugging)
    Search(commands::search::SearchArgs),

    /// Print module status
    Status,
}
