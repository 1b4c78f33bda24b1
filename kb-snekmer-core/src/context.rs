//! Method context carried in job files.
//!
//! The platform's job runner includes caller identity and provenance with
//! each request; the module passes provenance through to objects it saves.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MethodContext {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub provenance: Vec<ProvenanceAction>,
    #[serde(default)]
    pub authenticated: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvenanceAction {
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub method_params: Vec<serde_json::Value>,
}

impl MethodContext {
    /// Provenance entry for an operation this module is about to run.
    pub fn for_method(method: &str, params: serde_json::Value) -> Self {
        Self {
            token: None,
            user_id: None,
            provenance: vec![ProvenanceAction {
                service: "Snekmer".to_string(),
                method: method.to_string(),
                method_params: vec![params],
            }],
            authenticated: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_round_trip() {
        let ctx = MethodContext::for_method(
            "run_Snekmer_search",
            serde_json::json!({"kmer": 8}),
        );
        let encoded = serde_json::to_string(&ctx).unwrap();
        let decoded: MethodContext = serde_json::from_str(&encoded).unwrap();

        assert_eq!(decoded.provenance.len(), 1);
        assert_eq!(decoded.provenance[0].service, "Snekmer");
        assert_eq!(decoded.provenance[0].method, "run_Snekmer_search");
        assert_eq!(decoded.authenticated, 1);
    }

    #[test]
    fn test_context_tolerates_missing_fields() {
        let decoded: MethodContext = serde_json::from_str("{}").unwrap();
        assert!(decoded.token.is_none());
        assert!(decoded.provenance.is_empty());
        assert_eq!(decoded.authenticated, 0);
    }
}
