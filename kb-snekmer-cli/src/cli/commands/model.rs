//! Direct entry point for the model operation.

use clap::Args;

use kb_snekmer_core::params::ModelParams;
use kb_snekmer_core::DeployConfig;

#[derive(Args)]
pub struct ModelArgs {
    /// Workspace for input/output
    #[arg(long)]
    pub workspace_name: String,

    /// Genome or GenomeSet object holding the training sequences
    #[arg(long)]
    pub object_ref: String,

    /// K-mer length for features
    #[arg(long)]
    pub kmer: i64,

    /// Reduced amino-acid alphabet (hydro, standard, solvacc, hydrocharge,
    /// hydrostruct, miqs, none)
    #[arg(long)]
    pub alphabet: String,

    /// Minimum fraction of sequences a feature must appear in
    #[arg(long, default_value_t = 0.25)]
    pub min_rep_thresh: f64,

    /// Parallelism passed through to the tool
    #[arg(long, default_value_t = 1)]
    pub processes: u32,

    /// Label used in report text and artifact names
    #[arg(long)]
    pub output_model_name: Option<String>,
}

pub fn run(args: ModelArgs) -> anyhow::Result<()> {
    let params = ModelParams {
        workspace_name: args.workspace_name,
        object_ref: args.object_ref,
        kmer: args.kmer,
        alphabet: args.alphabet,
        min_rep_thresh: args.min_rep_thresh,
        processes: args.processes,
        output_model_name: args.output_model_name,
    };

    let config = DeployConfig::from_env()?;
    let output = crate::methods::model::run_model(&config, params)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
