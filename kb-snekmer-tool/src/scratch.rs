//! Per-job scratch workspace management.
//!
//! Each operation runs inside its own directory under the platform-provided
//! scratch path. The layout is fixed: `input/` holds staged FASTA files,
//! `output/` is handed to the tool, `logs/` captures the subprocess streams.
//! Directories are removed on success and preserved on failure so a failed
//! job can be inspected on the node.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use kb_snekmer_core::SnekmerResult;

pub const ENV_PRESERVE_SCRATCH: &str = "SNEKMER_PRESERVE_SCRATCH";

const SUBDIRS: [&str; 3] = ["input", "output", "logs"];

#[derive(Debug)]
pub struct JobWorkspace {
    /// Unique identifier, `snekmer_<timestamp>_<uuid>`.
    pub id: String,
    /// Root path of this job's directory.
    pub root: PathBuf,
    had_error: bool,
    preserve_always: bool,
}

impl JobWorkspace {
    /// Create a fresh job directory under `scratch_root`.
    pub fn create(scratch_root: &Path, operation: &str) -> SnekmerResult<Self> {
        fs::create_dir_all(scratch_root)?;

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        let id = format!("snekmer_{}_{}_{}", operation, timestamp, Uuid::new_v4());

        let root = scratch_root.join(&id);
        fs::create_dir_all(&root)?;
        for subdir in &SUBDIRS {
            fs::create_dir_all(root.join(subdir))?;
        }

        tracing::info!(job = %id, root = %root.display(), "created job workspace");

        Ok(Self {
            id,
            root,
            had_error: false,
            preserve_always: std::env::var(ENV_PRESERVE_SCRATCH).is_ok(),
        })
    }

    pub fn input_dir(&self) -> PathBuf {
        self.root.join("input")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root.join("output")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    pub fn results_zip_path(&self) -> PathBuf {
        self.root.join("snekmer_results.zip")
    }

    pub fn combined_csv_path(&self) -> PathBuf {
        self.root.join("combined_results.csv")
    }

    /// Mark the job failed so the directory survives for inspection.
    pub fn mark_error(&mut self) {
        self.had_error = true;
    }

    fn cleanup(&self) -> std::io::Result<()> {
        if self.preserve_always || self.had_error {
            tracing::warn!(job = %self.id, root = %self.root.display(), "preserving job workspace");
            return Ok(());
        }
        fs::remove_dir_all(&self.root)
    }
}

impl Drop for JobWorkspace {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            tracing::warn!(job = %self.id, "failed to clean up job workspace: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    #[serial]
    fn test_workspace_creation() {
        let scratch = TempDir::new().unwrap();
        let job = JobWorkspace::create(scratch.path(), "search").unwrap();

        assert!(job.root.exists());
        assert!(job.input_dir().exists());
        assert!(job.output_dir().exists());
        assert!(job.logs_dir().exists());
        assert!(job.id.starts_with("snekmer_search_"));
        assert_eq!(job.config_path(), job.root.join("config.yaml"));
    }

    #[test]
    #[serial]
    fn test_workspace_removed_on_success() {
        let scratch = TempDir::new().unwrap();
        let root = {
            let job = JobWorkspace::create(scratch.path(), "model").unwrap();
            job.root.clone()
        };
        assert!(!root.exists());
    }

    #[test]
    #[serial]
    fn test_workspace_preserved_on_error() {
        let scratch = TempDir::new().unwrap();
        let root = {
            let mut job = JobWorkspace::create(scratch.path(), "model").unwrap();
            job.mark_error();
            job.root.clone()
        };
        assert!(root.exists());
    }

    #[test]
    #[serial]
    fn test_workspace_preserved_by_env() {
        std::env::set_var(ENV_PRESERVE_SCRATCH, "1");
        let scratch = TempDir::new().unwrap();
        let root = {
            let job = JobWorkspace::create(scratch.path(), "model").unwrap();
            job.root.clone()
        };
        std::env::remove_var(ENV_PRESERVE_SCRATCH);
        assert!(root.exists());
    }

    #[test]
    #[serial]
    fn test_workspace_ids_are_unique() {
        let scratch = TempDir::new().unwrap();
        let a = JobWorkspace::create(scratch.path(), "search").unwrap();
        let b = JobWorkspace::create(scratch.path(), "search").unwrap();
        assert_ne!(a.id, b.id);
    }
}
