//! Everything around the external `snekmer` subprocess: per-job scratch
//! layout, input staging, config file generation, invocation, and output
//! collection. No k-mer computation happens here; the tool owns all of it.

pub mod collect;
pub mod config;
pub mod runner;
pub mod scratch;
pub mod staging;

pub use config::ToolConfig;
pub use runner::{SnekmerTool, ToolCommand};
pub use scratch::JobWorkspace;
