//! Thin JSON-RPC 1.1 clients for the KBase platform services the module
//! depends on: Workspace, GenomeFileUtil and KBaseReport.
//!
//! These are transport wrappers only; the services own their schemas.

pub mod genome_file_util;
pub mod jsonrpc;
pub mod report;
pub mod workspace;

pub use genome_file_util::GenomeFileUtilClient;
pub use jsonrpc::JsonRpcClient;
pub use report::KbaseReportClient;
pub use workspace::WorkspaceClient;
