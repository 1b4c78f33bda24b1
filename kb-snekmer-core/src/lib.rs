//! Shared foundation for the kb-snekmer service module: the error type,
//! deployment configuration, the method context carried in job files, and the
//! parameter/result types of the module's RPC operations.

pub mod config;
pub mod context;
pub mod error;
pub mod params;

pub use config::DeployConfig;
pub use context::MethodContext;
pub use error::{SnekmerError, SnekmerResult};

/// Module version reported by the `status` operation.
pub const MODULE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Repository URL reported by the `status` operation.
pub const MODULE_GIT_URL: &str = "https://github.com/kbaseapps/kb-snekmer";

/// Commit hash baked in at build time when the build sets `GIT_COMMIT_HASH`.
pub fn module_git_commit() -> &'static str {
    option_env!("GIT_COMMIT_HASH").unwrap_or("unknown")
}
