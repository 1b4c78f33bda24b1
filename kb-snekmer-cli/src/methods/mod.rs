//! Operation implementations: the glue between parameter validation, the
//! platform service clients, and the tool runner.

pub mod model;
pub mod search;
pub mod status;

use kb_snekmer_core::{DeployConfig, SnekmerError, SnekmerResult};
use kb_snekmer_kbase::{GenomeFileUtilClient, KbaseReportClient, WorkspaceClient};
use kb_snekmer_tool::staging::FastaStager;
use kb_snekmer_tool::JobWorkspace;

/// The three service clients every operation talks to.
pub(crate) struct Clients {
    pub workspace: WorkspaceClient,
    pub genome: GenomeFileUtilClient,
    pub report: KbaseReportClient,
}

impl Clients {
    pub fn connect(config: &DeployConfig) -> SnekmerResult<Self> {
        Ok(Self {
            workspace: WorkspaceClient::new(&config.workspace_url, config.token.clone())?,
            genome: GenomeFileUtilClient::new(&config.callback_url, config.token.clone())?,
            report: KbaseReportClient::new(&config.callback_url, config.token.clone())?,
        })
    }
}

/// One input genome after reference resolution.
#[derive(Debug, Clone)]
pub(crate) struct InputGenome {
    pub reference: String,
    pub name: String,
}

/// Resolve `object_ref` into concrete genomes: a Genome is used alone, a
/// GenomeSet is expanded into its elements. Anything else is a parameter
/// error.
pub(crate) fn resolve_input_genomes(
    workspace: &WorkspaceClient,
    object_ref: &str,
) -> SnekmerResult<Vec<InputGenome>> {
    let info = workspace.get_object_info(object_ref)?;

    if info.is_genome() {
        return Ok(vec![InputGenome {
            reference: info.reference(),
            name: info.name,
        }]);
    }

    if info.is_genome_set() {
        let refs = workspace.get_genome_set_elements(object_ref)?;
        tracing::info!(count = refs.len(), set = %info.name, "expanding GenomeSet");
        return refs
            .iter()
            .map(|r| {
                let element = workspace.get_object_info(r)?;
                Ok(InputGenome {
                    reference: element.reference(),
                    name: element.name,
                })
            })
            .collect();
    }

    Err(SnekmerError::InvalidParams(format!(
        "object_ref must point at a Genome or GenomeSet, got {}",
        info.type_string
    )))
}

/// Download one protein FASTA per genome and stage it into the job's input
/// directory under the genome's name.
pub(crate) fn stage_input_genomes(
    genome_client: &GenomeFileUtilClient,
    job: &JobWorkspace,
    genomes: &[InputGenome],
) -> SnekmerResult<usize> {
    let input_dir = job.input_dir();
    let mut stager = FastaStager::new(&input_dir);

    for genome in genomes {
        tracing::info!(genome = %genome.name, reference = %genome.reference, "downloading protein FASTA");
        let fasta = genome_client.genome_proteins_to_fasta(&genome.reference)?;
        stager.stage(&fasta, &genome.name)?;
    }

    Ok(genomes.len())
}
