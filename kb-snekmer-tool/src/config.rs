//! Writer for the tool's `config.yaml`.
//!
//! The schema belongs to the tool; we emit exactly the keys it reads and
//! nothing else. Paths are written relative to the job directory, which is
//! also the working directory the tool runs in.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use kb_snekmer_core::params::Alphabet;
use kb_snekmer_core::SnekmerResult;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolConfig {
    pub k: i64,
    pub alphabet: String,
    pub min_rep_thresh: f64,
    pub processes: u32,
    pub input_file_exts: Vec<String>,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Family model library consulted by the search subcommand.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_dir: Option<PathBuf>,
}

impl ToolConfig {
    pub fn new(k: i64, alphabet: Alphabet, min_rep_thresh: f64, processes: u32) -> Self {
        Self {
            k,
            alphabet: alphabet.as_config_value().to_string(),
            min_rep_thresh,
            processes,
            input_file_exts: vec!["faa".to_string(), "fasta".to_string()],
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            model_dir: None,
        }
    }

    pub fn with_model_dir(mut self, model_dir: &Path) -> Self {
        self.model_dir = Some(model_dir.to_path_buf());
        self
    }

    /// Write the config file where the tool expects it.
    pub fn write(&self, path: &Path) -> SnekmerResult<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        tracing::debug!(path = %path.display(), "wrote tool config");
        Ok(())
    }
}
