//! KBaseReport client, reached through the job's callback URL.

use serde::{Deserialize, Serialize};
use serde_json::json;

use kb_snekmer_core::{SnekmerError, SnekmerResult};

use crate::jsonrpc::JsonRpcClient;

const SERVICE: &str = "KBaseReport";

/// A file attached to an extended report. The report service copies the file
/// out of scratch, so paths must stay valid until `create_extended_report`
/// returns.
#[derive(Debug, Clone, Serialize)]
pub struct FileLink {
    pub path: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A workspace object the operation created, listed on the report.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedObject {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportInfo {
    pub name: String,
    #[serde(rename = "ref")]
    pub reference: String,
}

pub struct KbaseReportClient {
    rpc: JsonRpcClient,
}

impl KbaseReportClient {
    pub fn new(callback_url: impl Into<String>, token: Option<String>) -> SnekmerResult<Self> {
        Ok(Self {
            rpc: JsonRpcClient::new(callback_url, token)?,
        })
    }

    /// Minimal report: a text message in a workspace.
    pub fn create(&self, workspace_name: &str, message: &str) -> SnekmerResult<ReportInfo> {
        let result = self.rpc.call(
            &format!("{}.create", SERVICE),
            json!({
                "report": {
                    "objects_created": [],
                    "text_message": message,
                },
                "workspace_name": workspace_name,
            }),
        )?;
        parse_report_info(result)
    }

    /// Extended report: message plus attached files and created objects.
    pub fn create_extended(
        &self,
        workspace_name: &str,
        report_object_name: &str,
        message: &str,
        objects_created: &[CreatedObject],
        file_links: &[FileLink],
    ) -> SnekmerResult<ReportInfo> {
        let result = self.rpc.call(
            &format!("{}.create_extended_report", SERVICE),
            json!({
                "message": message,
                "objects_created": objects_created,
                "file_links": file_links,
                "report_object_name": report_object_name,
                "workspace_name": workspace_name,
            }),
        )?;
        parse_report_info(result)
    }
}

fn parse_report_info(result: serde_json::Value) -> SnekmerResult<ReportInfo> {
    serde_json::from_value(result)
        .map_err(|e| SnekmerError::Service(format!("malformed report info: {}", e)))
}
