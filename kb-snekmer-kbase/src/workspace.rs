//! Workspace service client.
//!
//! Only the handful of methods the module needs: object info lookup (for
//! naming and type dispatch) and object fetch (for GenomeSet expansion and
//! genome annotation).

use serde_json::{json, Value};

use kb_snekmer_core::{SnekmerError, SnekmerResult};

use crate::jsonrpc::JsonRpcClient;

const SERVICE: &str = "Workspace";

/// Parsed subset of the workspace's 11-tuple object info.
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub object_id: i64,
    pub name: String,
    pub type_string: String,
    pub version: i64,
    pub workspace_id: i64,
    pub workspace_name: String,
}

impl ObjectInfo {
    /// Canonical `ws/obj/ver` reference.
    pub fn reference(&self) -> String {
        format!("{}/{}/{}", self.workspace_id, self.object_id, self.version)
    }

    pub fn is_genome(&self) -> bool {
        self.type_string.starts_with("KBaseGenomes.Genome")
    }

    pub fn is_genome_set(&self) -> bool {
        self.type_string.contains("GenomeSet")
    }

    fn from_tuple(info: &Value) -> SnekmerResult<Self> {
        let tuple = info.as_array().ok_or_else(|| {
            SnekmerError::Service("object info is not a tuple".to_string())
        })?;
        if tuple.len() < 8 {
            return Err(SnekmerError::Service(format!(
                "object info tuple has {} fields, expected 11",
                tuple.len()
            )));
        }

        Ok(Self {
            object_id: tuple[0].as_i64().unwrap_or_default(),
            name: tuple[1].as_str().unwrap_or_default().to_string(),
            type_string: tuple[2].as_str().unwrap_or_default().to_string(),
            version: tuple[4].as_i64().unwrap_or(1),
            workspace_id: tuple[6].as_i64().unwrap_or_default(),
            workspace_name: tuple[7].as_str().unwrap_or_default().to_string(),
        })
    }
}

pub struct WorkspaceClient {
    rpc: JsonRpcClient,
}

impl WorkspaceClient {
    pub fn new(url: impl Into<String>, token: Option<String>) -> SnekmerResult<Self> {
        Ok(Self {
            rpc: JsonRpcClient::new(url, token)?,
        })
    }

    /// Look up object info for a single reference.
    pub fn get_object_info(&self, object_ref: &str) -> SnekmerResult<ObjectInfo> {
        let result = self.rpc.call(
            &format!("{}.get_object_info3", SERVICE),
            json!({ "objects": [ { "ref": object_ref } ] }),
        )?;

        let infos = result["infos"].as_array().ok_or_else(|| {
            SnekmerError::Service("get_object_info3 reply missing infos".to_string())
        })?;
        let info = infos.first().ok_or_else(|| {
            SnekmerError::Service(format!("no object info returned for {}", object_ref))
        })?;
        ObjectInfo::from_tuple(info)
    }

    /// Fetch a single object's data payload.
    pub fn get_object_data(&self, object_ref: &str) -> SnekmerResult<Value> {
        let result = self.rpc.call(
            &format!("{}.get_objects2", SERVICE),
            json!({ "objects": [ { "ref": object_ref } ] }),
        )?;

        let mut data = result["data"]
            .as_array()
            .cloned()
            .ok_or_else(|| SnekmerError::Service("get_objects2 reply missing data".to_string()))?;
        if data.is_empty() {
            return Err(SnekmerError::Service(format!(
                "no object data returned for {}",
                object_ref
            )));
        }
        let mut first = data.swap_remove(0);
        Ok(first["data"].take())
    }

    /// Expand a GenomeSet object into its element genome references.
    pub fn get_genome_set_elements(&self, object_ref: &str) -> SnekmerResult<Vec<String>> {
        let data = self.get_object_data(object_ref)?;
        let refs = extract_genome_set_refs(&data);
        if refs.is_empty() {
            return Err(SnekmerError::Service(format!(
                "GenomeSet {} contains no genome references",
                object_ref
            )));
        }
        Ok(refs)
    }
}

/// Both GenomeSet layouts occur in the wild: `elements` maps labels to
/// `{ref}` records, `items` is a list of `{ref, label}` records.
pub fn extract_genome_set_refs(data: &Value) -> Vec<String> {
    let mut refs = Vec::new();

    if let Some(elements) = data["elements"].as_object() {
        for element in elements.values() {
            if let Some(r) = element["ref"].as_str() {
                refs.push(r.to_string());
            }
        }
    }

    if let Some(items) = data["items"].as_array() {
        for item in items {
            if let Some(r) = item["ref"].as_str() {
                refs.push(r.to_string());
            }
        }
    }

    refs.sort();
    refs.dedup();
    refs
}
