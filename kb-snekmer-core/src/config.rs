//! Deployment configuration for the module.
//!
//! The platform hands the module its runtime wiring through the environment:
//! `KB_DEPLOYMENT_CONFIG` points at a deploy file with a `[snekmer]` section,
//! `SDK_CALLBACK_URL` is the per-job callback endpoint, and `KB_AUTH_TOKEN`
//! is forwarded on every service call.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{SnekmerError, SnekmerResult};

pub const ENV_DEPLOYMENT_CONFIG: &str = "KB_DEPLOYMENT_CONFIG";
pub const ENV_CALLBACK_URL: &str = "SDK_CALLBACK_URL";
pub const ENV_AUTH_TOKEN: &str = "KB_AUTH_TOKEN";
pub const ENV_SCRATCH_OVERRIDE: &str = "SNEKMER_SCRATCH";
pub const ENV_WORKSPACE_URL_OVERRIDE: &str = "SNEKMER_WORKSPACE_URL";

/// The `[snekmer]` section of the deploy file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct DeployFile {
    #[serde(default)]
    snekmer: DeploySection,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct DeploySection {
    #[serde(default)]
    scratch: Option<PathBuf>,
    #[serde(default, rename = "workspace-url")]
    workspace_url: Option<String>,
    #[serde(default, rename = "auth-service-url")]
    auth_service_url: Option<String>,
    #[serde(default, rename = "model-dir")]
    model_dir: Option<PathBuf>,
}

/// Resolved runtime configuration for one module process.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Module-writable working directory provided by the platform.
    pub scratch: PathBuf,
    /// Per-job callback endpoint serving GenomeFileUtil and KBaseReport.
    pub callback_url: String,
    /// Workspace service endpoint.
    pub workspace_url: String,
    /// Auth service endpoint, when configured.
    pub auth_service_url: Option<String>,
    /// Auth token forwarded on every service call.
    pub token: Option<String>,
    /// Directory holding the bundled family model library used by search.
    pub model_dir: PathBuf,
}

impl DeployConfig {
    /// Resolve configuration from the environment and the deploy file.
    pub fn from_env() -> SnekmerResult<Self> {
        let section = match std::env::var(ENV_DEPLOYMENT_CONFIG) {
            Ok(path) => load_deploy_section(Path::new(&path))?,
            Err(_) => DeploySection::default(),
        };

        let scratch = std::env::var(ENV_SCRATCH_OVERRIDE)
            .ok()
            .map(PathBuf::from)
            .or(section.scratch)
            .ok_or_else(|| {
                SnekmerError::Config(format!(
                    "no scratch directory configured; set {} or the deploy file's scratch key",
                    ENV_SCRATCH_OVERRIDE
                ))
            })?;

        let callback_url = std::env::var(ENV_CALLBACK_URL).map_err(|_| {
            SnekmerError::Config(format!("{} is not set", ENV_CALLBACK_URL))
        })?;

        let workspace_url = std::env::var(ENV_WORKSPACE_URL_OVERRIDE)
            .ok()
            .or(section.workspace_url)
            .ok_or_else(|| {
                SnekmerError::Config("no workspace-url configured".to_string())
            })?;

        let token = std::env::var(ENV_AUTH_TOKEN).ok();

        let model_dir = section
            .model_dir
            .unwrap_or_else(|| PathBuf::from("/kb/module/data/models"));

        Ok(Self {
            scratch,
            callback_url,
            workspace_url,
            auth_service_url: section.auth_service_url,
            token,
            model_dir,
        })
    }

    /// Ensure the scratch directory exists and is writable.
    pub fn ensure_scratch(&self) -> SnekmerResult<()> {
        std::fs::create_dir_all(&self.scratch)?;
        Ok(())
    }
}

fn load_deploy_section(path: &Path) -> SnekmerResult<DeploySection> {
    let contents = std::fs::read_to_string(path)?;
    let file: DeployFile = toml::from_str(&contents)
        .map_err(|e| SnekmerError::Config(format!("failed to parse deploy file: {}", e)))?;
    Ok(file.snekmer)
}
