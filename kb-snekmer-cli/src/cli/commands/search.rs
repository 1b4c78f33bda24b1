//! Direct entry point for the search operation.

use clap::Args;

use kb_snekmer_core::params::SearchParams;
use kb_snekmer_core::DeployConfig;

#[derive(Args)]
pub struct SearchArgs {
    /// Workspace for input/output
    #[arg(long)]
    pub workspace_name: String,

    /// Genome or GenomeSet object with protein translations in its features
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

    /// Write best-family assignments back into the genomes and re-save them
    #[arg(long)]
    pub save_annotated_genomes: bool,
}

pub fn run(args: SearchArgs) -> anyhow::Result<()> {
    let params = SearchParams {
        workspace_name: args.workspace_name,
        object_ref: args.object_ref,
        kmer: args.kmer,
        alphabet: args.alphabet,
        min_rep_thresh: args.min_rep_thresh,
        processes: args.processes,
        save_annotated_genomes: args.save_annotated_genomes as i64,
    };

    let config = DeployConfig::from_env()?;
    let output = crate::methods::search::run_search(&config, params)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
