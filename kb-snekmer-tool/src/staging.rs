//! FASTA staging: move the files the genome service produced into the
//! tool's input layout, named after their genome objects.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use kb_snekmer_core::{SnekmerError, SnekmerResult};

/// Turn a workspace object name into a filename-safe stem. Object names may
/// carry anything the user typed; the tool derives family/input labels from
/// file stems, so keep only word characters, dot and dash.
pub fn sanitize_object_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        "genome".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Stages downloaded FASTA files into a job's `input/` directory.
pub struct FastaStager {
    input_dir: PathBuf,
    used_stems: HashSet<String>,
}

impl FastaStager {
    pub fn new(input_dir: &Path) -> Self {
        Self {
            input_dir: input_dir.to_path_buf(),
            used_stems: HashSet::new(),
        }
    }

    /// Move `source` into the input directory as `<sanitized name>.faa`,
    /// suffixing on collision. Returns the staged path.
    pub fn stage(&mut self, source: &Path, object_name: &str) -> SnekmerResult<PathBuf> {
        if !source.exists() {
            return Err(SnekmerError::Staging(format!(
                "FASTA file for {} does not exist: {}",
                object_name,
                source.display()
            )));
        }
        let meta = fs::metadata(source)?;
        if meta.len() == 0 {
            return Err(SnekmerError::Staging(format!(
                "FASTA file for {} is empty: {}",
                object_name,
                source.display()
            )));
        }

        let stem = self.unique_stem(&sanitize_object_name(object_name));
        let dest = self.input_dir.join(format!("{}.faa", stem));

        // Rename fails across filesystems; fall back to copy + remove.
        if fs::rename(source, &dest).is_err() {
            fs::copy(source, &dest)?;
            fs::remove_file(source).ok();
        }

        tracing::debug!(from = %source.display(), to = %dest.display(), "staged FASTA");
        Ok(dest)
    }

    fn unique_stem(&mut self, stem: &str) -> String {
        let mut candidate = stem.to_string();
        let mut n = 1;
        while !self.used_stems.insert(candidate.clone()) {
            n += 1;
            candidate = format!("{}_{}", stem, n);
        }
        candidate
    }
}
