//! GenomeFileUtil client, reached through the job's callback URL.
//!
//! Used in two directions: pulling protein FASTA out of Genome objects for
//! staging, and pushing annotated Genome objects back into the workspace.
//! Also holds the pure annotation helper applied to genome JSON before the
//! re-save.

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::{json, Value};

use kb_snekmer_core::{SnekmerError, SnekmerResult};

use crate::jsonrpc::JsonRpcClient;
use crate::workspace::ObjectInfo;

const SERVICE: &str = "GenomeFileUtil";

pub struct GenomeFileUtilClient {
    rpc: JsonRpcClient,
}

impl GenomeFileUtilClient {
    pub fn new(callback_url: impl Into<String>, token: Option<String>) -> SnekmerResult<Self> {
        Ok(Self {
            rpc: JsonRpcClient::new(callback_url, token)?,
        })
    }

    /// Produce a protein FASTA file from the CDS features of a Genome.
    /// Returns the path the service wrote the file to (on shared scratch).
    pub fn genome_proteins_to_fasta(&self, genome_ref: &str) -> SnekmerResult<PathBuf> {
        let result = self.rpc.call(
            &format!("{}.genome_proteins_to_fasta", SERVICE),
            json!({
                "genome_ref": genome_ref,
                "include_functions": 0,
                "include_aliases": 0,
            }),
        )?;

        let path = result["file_path"].as_str().ok_or_else(|| {
            SnekmerError::Service(format!(
                "genome_proteins_to_fasta returned no file_path for {}",
                genome_ref
            ))
        })?;
        Ok(PathBuf::from(path))
    }

    /// Save a (modified) Genome object back to the workspace.
    pub fn save_one_genome(
        &self,
        workspace_name: &str,
        name: &str,
        genome_data: Value,
    ) -> SnekmerResult<ObjectInfo> {
        let result = self.rpc.call(
            &format!("{}.save_one_genome", SERVICE),
            json!({
                "workspace": workspace_name,
                "name": name,
                "data": genome_data,
            }),
        )?;

        parse_saved_info(&result)
    }
}

fn parse_saved_info(result: &Value) -> SnekmerResult<ObjectInfo> {
    let tuple = result["info"].as_array().ok_or_else(|| {
        SnekmerError::Service("save_one_genome reply missing info tuple".to_string())
    })?;
    if tuple.len() < 8 {
        return Err(SnekmerError::Service(
            "save_one_genome info tuple too short".to_string(),
        ));
    }
    Ok(ObjectInfo {
        object_id: tuple[0].as_i64().unwrap_or_default(),
        name: tuple[1].as_str().unwrap_or_default().to_string(),
        type_string: tuple[2].as_str().unwrap_or_default().to_string(),
        version: tuple[4].as_i64().unwrap_or(1),
        workspace_id: tuple[6].as_i64().unwrap_or_default(),
        workspace_name: tuple[7].as_str().unwrap_or_default().to_string(),
    })
}

/// Write family assignments into a genome's feature functions. Returns the
/// number of features touched. Feature ids absent from `assignments` are left
/// alone; existing function lists are appended to, not replaced.
pub fn annotate_features(genome: &mut Value, assignments: &HashMap<String, String>) -> usize {
    let mut updated = 0;

    let Some(features) = genome["features"].as_array_mut() else {
        return 0;
    };

    for feature in features.iter_mut() {
        let Some(id) = feature["id"].as_str().map(str::to_string) else {
            continue;
        };
        let Some(family) = assignments.get(&id) else {
            continue;
        };
        let annotation = format!("Snekmer family: {}", family);

        match feature.get_mut("functions") {
            Some(Value::Array(functions)) => {
                functions.push(Value::String(annotation));
            }
            _ => {
                feature["functions"] = json!([annotation]);
            }
        }
        updated += 1;
    }

    updated
}
