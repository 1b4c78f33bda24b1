//! Module liveness probe.

use kb_snekmer_core::params::StatusOutput;
use kb_snekmer_core::{module_git_commit, MODULE_GIT_URL, MODULE_VERSION};

pub fn status() -> StatusOutput {
    StatusOutput {
        state: "OK".to_string(),
        message: String::new(),
        version: MODULE_VERSION.to_string(),
        git_url: MODULE_GIT_URL.to_string(),
        git_commit_hash: module_git_commit().to_string(),
    }
}
