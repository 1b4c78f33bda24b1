//! The search operation: score the input genomes' proteins against the
//! bundled family model library, publish the combined results, and
//! optionally write the assignments back into the genomes.

use std::collections::HashMap;

use kb_snekmer_core::params::{Alphabet, SearchOutput, SearchParams};
use kb_snekmer_core::{DeployConfig, SnekmerError, SnekmerResult};
use kb_snekmer_kbase::genome_file_util::annotate_features;
use kb_snekmer_kbase::report::{CreatedObject, FileLink};
use kb_snekmer_tool::collect::{
    concatenate_csvs, count_distinct_column, find_result_csvs, read_family_assignments, zip_files,
};
use kb_snekmer_tool::{JobWorkspace, SnekmerTool, ToolCommand, ToolConfig};

use crate::methods::{resolve_input_genomes, stage_input_genomes, Clients, InputGenome};
use crate::report::{Metric, TextReport};

pub fn run_search(config: &DeployConfig, params: SearchParams) -> SnekmerResult<SearchOutput> {
    let alphabet = params.validate()?;
    config.ensure_scratch()?;

    let mut job = JobWorkspace::create(&config.scratch, "search")?;
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
    params: &SearchParams,
    alphabet: Alphabet,
    job: &JobWorkspace,
) -> SnekmerResult<SearchOutput> {
    if !config.model_dir.is_dir() {
        return Err(SnekmerError::Config(format!(
            "model library directory does not exist: {}",
            config.model_dir.display()
        )));
    }

    let clients = Clients::connect(config)?;

    let genomes = resolve_input_genomes(&clients.workspace, &params.object_ref)?;
    let staged = stage_input_genomes(&clients.genome, job, &genomes)?;

    ToolConfig::new(params.kmer, alphabet, params.min_rep_thresh, params.processes)
        .with_model_dir(&config.model_dir)
        .write(&job.config_path())?;

    let tool = SnekmerTool::locate()?;
    tracing::info!(version = %tool.version()?, "located snekmer");
    tool.run(ToolCommand::Search, job, params.processes)?;

    let output_dir = job.output_dir();
    let csvs = find_result_csvs(&output_dir)?;
    if csvs.is_empty() {
        return Err(SnekmerError::Tool(
            "snekmer search produced no result tables".to_string(),
        ));
    }

    let combined = job.combined_csv_path();
    let rows = concatenate_csvs(&csvs, &combined)?;
    let families = count_distinct_column(&combined, "family")?;
    zip_files(&csvs, &output_dir, &job.results_zip_path())?;

    let mut objects_created = Vec::new();
    if params.save_annotated_genomes() {
        objects_created = annotate_and_save(&clients, params, &genomes, job)?;
    }

    let mut metrics = vec![
        Metric::new("Genomes searched", staged),
        Metric::new("Proteins scored", rows),
        Metric::new("Result tables", csvs.len()),
    ];
    if let Some(families) = families {
        metrics.push(Metric::new("Families hit", families));
    }
    if !objects_created.is_empty() {
        metrics.push(Metric::new("Genomes re-saved", objects_created.len()));
    }

    let message = TextReport::new("Snekmer search")
        .metrics("Summary", metrics)
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

    let file_links = vec![
        FileLink {
            path: combined.display().to_string(),
            name: "combined_results.csv".to_string(),
            description: Some("All search tables concatenated into one CSV".to_string()),
        },
        FileLink {
            path: job.results_zip_path().display().to_string(),
            name: "snekmer_results.zip".to_string(),
            description: Some("Per-input search tables produced by snekmer".to_string()),
        },
    ];

    let report_name = format!("{}_report", job.id);
    let info = clients.report.create_extended(
        &params.workspace_name,
        &report_name,
        &message,
        &objects_created,
        &file_links,
    )?;

    Ok(SearchOutput {
        report_name: info.name,
        report_ref: info.reference,
        kmer: params.kmer,
        alphabet: alphabet.to_string(),
        min_rep_thresh: params.min_rep_thresh,
        processes: params.processes,
    })
}

/// Write best-family assignments into each genome's feature functions and
/// re-save the genomes that changed. Genomes with no assigned features are
/// left untouched.
fn annotate_and_save(
    clients: &Clients,
    params: &SearchParams,
    genomes: &[InputGenome],
    job: &JobWorkspace,
) -> SnekmerResult<Vec<CreatedObject>> {
    let assignments: HashMap<String, String> = read_family_assignments(&job.combined_csv_path())?;
    if assignments.is_empty() {
        tracing::warn!("no family assignments found; skipping genome annotation");
        return Ok(Vec::new());
    }

    let mut created = Vec::new();
    for genome in genomes {
        let mut data = clients.workspace.get_object_data(&genome.reference)?;
        let updated = annotate_features(&mut data, &assignments);
        if updated == 0 {
            tracing::info!(genome = %genome.name, "no features matched; not re-saving");
            continue;
        }

        let info = clients
            .genome
            .save_one_genome(&params.workspace_name, &genome.name, data)?;
        tracing::info!(genome = %genome.name, reference = %info.reference(), updated, "re-saved annotated genome");
        created.push(CreatedObject {
            reference: info.reference(),
            description: Some(format!(
                "{} with {} Snekmer family annotations",
                genome.name, updated
            )),
        });
    }

    Ok(created)
}
