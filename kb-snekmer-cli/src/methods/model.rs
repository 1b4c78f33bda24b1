//! The model operation: train family models from the proteins of the input
//! genomes and publish a report with the resulting feature tables.

use kb_snekmer_core::params::{Alphabet, ModelOutput, ModelParams};
use kb_snekmer_core::{DeployConfig, SnekmerResult};
use kb_snekmer_kbase::report::FileLink;
use kb_snekmer_tool::collect::{find_model_files, find_result_csvs, zip_files};
use kb_snekmer_tool::{JobWorkspace, SnekmerTool, ToolCommand, ToolConfig};

use crate::methods::{resolve_input_genomes, stage_input_genomes, Clients};
use crate::report::{Metric, TextReport};

pub fn run_model(config: &DeployConfig, params: ModelParams) -> SnekmerResult<ModelOutput> {
    let alphabet = params.validate()?;
    config.ensure_scratch()?;

    let mut job = JobWorkspace::create(&config.scratch, "model")?;
    match execute(config, &params, alphabet, &job) {
        Ok(output) => Ok(output),
        Err(e) => {
            job.mark_error();
            Err(e)
        }
    }
}

fn execute(
    config: &DeployConfig,
    params: &ModelParams,
    alphabet: Alphabet,
    job: &JobWorkspace,
) -> SnekmerResult<ModelOutput> {
    let clients = Clients::connect(config)?;

    let genomes = resolve_input_genomes(&clients.workspace, &params.object_ref)?;
    let staged = stage_input_genomes(&clients.genome, job, &genomes)?;

    ToolConfig::new(params.kmer, alphabet, params.min_rep_thresh, params.processes)
        .write(&job.config_path())?;

    let tool = SnekmerTool::locate()?;
    tracing::info!(version = %tool.version()?, "located snekmer");
    tool.run(ToolCommand::Model, job, params.processes)?;

    let output_dir = job.output_dir();
    let csvs = find_result_csvs(&output_dir)?;
    let models = find_model_files(&output_dir)?;

    let mut file_links = Vec::new();
    if !csvs.is_empty() {
        zip_files(&csvs, &output_dir, &job.results_zip_path())?;
        file_links.push(FileLink {
            path: job.results_zip_path().display().to_string(),
            name: "snekmer_results.zip".to_string(),
            description: Some("Feature and score tables produced by snekmer model".to_string()),
        });
    }

    let label = params
        .output_model_name
        .clone()
        .unwrap_or_else(|| "snekmer_model".to_string());

    let message = TextReport::new(format!("Snekmer model: {}", label))
        .metrics(
            "Summary",
            vec![
                Metric::new("Genomes staged", staged),
                Metric::new("Family models built", models.len()),
                Metric::new("Result tables", csvs.len()),
            ],
        )
        .key_value(
            "Parameters",
            vec![
                ("kmer".to_string(), params.kmer.to_string()),
                ("alphabet".to_string(), alphabet.to_string()),
                (
                    "min_rep_thresh".to_string(),
                    params.min_rep_thresh.to_string(),
                ),
                ("processes".to_string(), params.processes.to_string()),
            ],
        )
        .render();

    let report_name = format!("{}_report", job.id);
    let info = clients.report.create_extended(
        &params.workspace_name,
        &report_name,
        &message,
        &[],
        &file_links,
    )?;

    Ok(ModelOutput {
        report_name: info.name,
        report_ref: info.reference,
    })
}
