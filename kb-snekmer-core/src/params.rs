//! Parameter and result types for the module's RPC operations.

use serde::{Deserialize, Serialize};

use crate::error::{SnekmerError, SnekmerResult};

/// Reduced amino-acid recoding schemes recognized by the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alphabet {
    Hydro,
    Standard,
    Solvacc,
    Hydrocharge,
    Hydrostruct,
    Miqs,
    #[serde(rename = "None")]
    None,
}

impl Alphabet {
    /// The value written into the tool's config file.
    pub fn as_config_value(&self) -> &'static str {
        match self {
            Alphabet::Hydro => "hydro",
            Alphabet::Standard => "standard",
            Alphabet::Solvacc => "solvacc",
            Alphabet::Hydrocharge => "hydrocharge",
            Alphabet::Hydrostruct => "hydrostruct",
            Alphabet::Miqs => "miqs",
            Alphabet::None => "None",
        }
    }
}

impl std::str::FromStr for Alphabet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hydro" => Ok(Alphabet::Hydro),
            "standard" => Ok(Alphabet::Standard),
            "solvacc" => Ok(Alphabet::Solvacc),
            "hydrocharge" => Ok(Alphabet::Hydrocharge),
            "hydrostruct" => Ok(Alphabet::Hydrostruct),
            "miqs" => Ok(Alphabet::Miqs),
            "none" => Ok(Alphabet::None),
            _ => Err(format!("Unknown alphabet: {}", s)),
        }
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_config_value())
    }
}

fn default_min_rep_thresh() -> f64 {
    0.25
}

fn default_processes() -> u32 {
    1
}

/// Input parameters for the model operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParams {
    pub workspace_name: String,
    pub object_ref: String,
    pub kmer: i64,
    pub alphabet: String,
    #[serde(default = "default_min_rep_thresh")]
    pub min_rep_thresh: f64,
    #[serde(default = "default_processes")]
    pub processes: u32,
    #[serde(default)]
    pub output_model_name: Option<String>,
}

/// Input parameters for the search operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    pub workspace_name: String,
    pub object_ref: String,
    pub kmer: i64,
    pub alphabet: String,
    #[serde(default = "default_min_rep_thresh")]
    pub min_rep_thresh: f64,
    #[serde(default = "default_processes")]
    pub processes: u32,
    #[serde(default)]
    pub save_annotated_genomes: i64,
}

/// Output of the model operation: the published report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelOutput {
    pub report_name: String,
    pub report_ref: String,
}

/// Output of the search operation: the report plus the echoed parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutput {
    pub report_name: String,
    pub report_ref: String,
    pub kmer: i64,
    pub alphabet: String,
    pub min_rep_thresh: f64,
    pub processes: u32,
}

/// Output of the status operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOutput {
    pub state: String,
    pub message: String,
    pub version: String,
    pub git_url: String,
    pub git_commit_hash: String,
}

fn require_nonempty(value: &str, name: &str) -> SnekmerResult<()> {
    if value.trim().is_empty() {
        return Err(SnekmerError::InvalidParams(format!(
            "Parameter {} is not set in input arguments",
            name
        )));
    }
    Ok(())
}

fn check_common(
    workspace_name: &str,
    object_ref: &str,
    kmer: i64,
    alphabet: &str,
    min_rep_thresh: f64,
    processes: u32,
) -> SnekmerResult<Alphabet> {
    require_nonempty(workspace_name, "workspace_name")?;
    require_nonempty(object_ref, "object_ref")?;
    require_nonempty(alphabet, "alphabet")?;

    if kmer <= 0 {
        return Err(SnekmerError::InvalidParams(format!(
            "Parameter kmer must be a positive integer, got {}",
            kmer
        )));
    }
    if processes == 0 {
        return Err(SnekmerError::InvalidParams(
            "Parameter processes must be a positive integer".to_string(),
        ));
    }
    if !(0.0..=1.0).contains(&min_rep_thresh) {
        return Err(SnekmerError::InvalidParams(format!(
            "Parameter min_rep_thresh must be within [0, 1], got {}",
            min_rep_thresh
        )));
    }

    alphabet
        .parse::<Alphabet>()
        .map_err(SnekmerError::InvalidParams)
}

impl ModelParams {
    /// Validate all fields and resolve the alphabet.
    pub fn validate(&self) -> SnekmerResult<Alphabet> {
        check_common(
            &self.workspace_name,
            &self.object_ref,
            self.kmer,
            &self.alphabet,
            self.min_rep_thresh,
            self.processes,
        )
    }
}

impl SearchParams {
    /// Validate all fields and resolve the alphabet.
    pub fn validate(&self) -> SnekmerResult<Alphabet> {
        check_common(
            &self.workspace_name,
            &self.object_ref,
            self.kmer,
            &self.alphabet,
            self.min_rep_thresh,
            self.processes,
        )
    }

    pub fn save_annotated_genomes(&self) -> bool {
        self.save_annotated_genomes != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn search_params() -> SearchParams {
        SearchParams {
            workspace_name: "test_ws".to_string(),
            object_ref: "79/16/1".to_string(),
            kmer: 12,
            alphabet: "hydro".to_string(),
            min_rep_thresh: 0.25,
            processes: 2,
            save_annotated_genomes: 0,
        }
    }

    #[test]
    fn test_valid_search_params() {
        let alphabet = search_params().validate().unwrap();
        assert_eq!(alphabet, Alphabet::Hydro);
    }

    #[test]
    fn test_missing_workspace_name() {
        let mut params = search_params();
        params.workspace_name = String::new();

        match params.validate().unwrap_err() {
            SnekmerError::InvalidParams(msg) => assert!(msg.contains("workspace_name")),
            other => panic!("Expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_object_ref() {
        let mut params = search_params();
        params.object_ref = "  ".to_string();

        match params.validate().unwrap_err() {
            SnekmerError::InvalidParams(msg) => assert!(msg.contains("object_ref")),
            other => panic!("Expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_nonpositive_kmer() {
        let mut params = search_params();
        params.kmer = 0;

        match params.validate().unwrap_err() {
            SnekmerError::InvalidParams(msg) => assert!(msg.contains("kmer")),
            other => panic!("Expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_processes() {
        let mut params = search_params();
        params.processes = 0;

        match params.validate().unwrap_err() {
            SnekmerError::InvalidParams(msg) => assert!(msg.contains("processes")),
            other => panic!("Expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_min_rep_thresh_out_of_range() {
        let mut params = search_params();
        params.min_rep_thresh = 1.5;

        match params.validate().unwrap_err() {
            SnekmerError::InvalidParams(msg) => assert!(msg.contains("min_rep_thresh")),
            other => panic!("Expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_alphabet() {
        let mut params = search_params();
        params.alphabet = "klingon".to_string();

        match params.validate().unwrap_err() {
            SnekmerError::InvalidParams(msg) => assert!(msg.contains("klingon")),
            other => panic!("Expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_alphabet_parsing() {
        assert_eq!("hydro".parse::<Alphabet>().unwrap(), Alphabet::Hydro);
        assert_eq!("MIQS".parse::<Alphabet>().unwrap(), Alphabet::Miqs);
        assert_eq!("None".parse::<Alphabet>().unwrap(), Alphabet::None);
        assert!("".parse::<Alphabet>().is_err());
    }

    #[test]
    fn test_search_params_defaults() {
        let json = r#"{
            "workspace_name": "test_ws",
            "object_ref": "79/16/1",
            "kmer": 8,
            "alphabet": "standard"
        }"#;
        let params: SearchParams = serde_json::from_str(json).unwrap();

        assert_eq!(params.min_rep_thresh, 0.25);
        assert_eq!(params.processes, 1);
        assert!(!params.save_annotated_genomes());
    }

    #[test]
    fn test_model_params_defaults() {
        let json = r#"{
            "workspace_name": "test_ws",
            "object_ref": "79/16/1",
            "kmer": 8,
            "alphabet": "hydro"
        }"#;
        let params: ModelParams = serde_json::from_str(json).unwrap();

        assert_eq!(params.min_rep_thresh, 0.25);
        assert_eq!(params.processes, 1);
        assert!(params.output_model_name.is_none());
        params.validate().unwrap();
    }

    #[test]
    fn test_save_annotated_genomes_flag() {
        let mut params = search_params();
        assert!(!params.save_annotated_genomes());
        params.save_annotated_genomes = 1;
        assert!(params.save_annotated_genomes());
    }

    #[test]
    fn test_search_output_round_trip() {
        let output = SearchOutput {
            report_name: "snekmer_search_report_x".to_string(),
            report_ref: "79/22/1".to_string(),
            kmer: 12,
            alphabet: "hydro".to_string(),
            min_rep_thresh: 0.25,
            processes: 2,
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["report_ref"], "79/22/1");
        assert_eq!(value["kmer"], 12);
    }
}
