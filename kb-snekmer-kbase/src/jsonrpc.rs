//! Generic KBase JSON-RPC 1.1 transport.
//!
//! Every platform service speaks the same convention: POST to the service
//! URL with `{"version": "1.1", "id": ..., "method": "Service.method",
//! "params": [<one positional object>]}` and the auth token in the
//! `Authorization` header. Replies carry either `result` (an array whose
//! first element is the payload) or `error`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use kb_snekmer_core::{SnekmerError, SnekmerResult};

const RPC_VERSION: &str = "1.1";
const DEFAULT_TIMEOUT_SECS: u64 = 1800;

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    version: &'static str,
    id: String,
    method: &'a str,
    params: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RpcReply {
    #[serde(default)]
    result: Option<Vec<Value>>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Server-side traceback, when the service includes one.
    #[serde(default)]
    pub error: Option<String>,
}

/// One JSON-RPC endpoint plus the credentials to call it.
pub struct JsonRpcClient {
    url: String,
    token: Option<String>,
    http: reqwest::blocking::Client,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(url: impl Into<String>, token: Option<String>) -> SnekmerResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| SnekmerError::Service(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            token,
            http,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Call `Service.method` with one positional parameter object and return
    /// the first element of the reply's `result` array.
    pub fn call(&self, method: &str, params: Value) -> SnekmerResult<Value> {
        let request = RpcRequest {
            version: RPC_VERSION,
            id: self.next_id.fetch_add(1, Ordering::Relaxed).to_string(),
            method,
            params: vec![params],
        };

        tracing::debug!(method, url = %self.url, "calling service");

        let mut builder = self.http.post(&self.url).json(&request);
        if let Some(token) = &self.token {
            builder = builder.header("Authorization", token);
        }

        let response = builder
            .send()
            .map_err(|e| SnekmerError::Service(format!("{} request failed: {}", method, e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| SnekmerError::Service(format!("{} reply unreadable: {}", method, e)))?;

        let reply: RpcReply = serde_json::from_str(&body).map_err(|_| {
            SnekmerError::Service(format!(
                "{} returned a malformed reply (HTTP {}): {}",
                method,
                status.as_u16(),
                truncate(&body, 200)
            ))
        })?;

        if let Some(error) = reply.error {
            if let Some(trace) = &error.error {
                tracing::debug!(method, "service traceback: {}", trace);
            }
            let message = error
                .message
                .or(error.name)
                .unwrap_or_else(|| "unknown service error".to_string());
            return Err(SnekmerError::Service(format!("{}: {}", method, message)));
        }

        if !status.is_success() {
            return Err(SnekmerError::Service(format!(
                "{} returned HTTP {}",
                method,
                status.as_u16()
            )));
        }

        let mut result = reply.result.ok_or_else(|| {
            SnekmerError::Service(format!("{} reply carried neither result nor error", method))
        })?;

        if result.is_empty() {
            return Ok(Value::Null);
        }
        Ok(result.swap_remove(0))
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Serialize the request envelope the way the services expect it. Split out
/// so tests can check the wire shape without a server.
pub fn envelope(id: u64, method: &str, params: Value) -> Value {
    serde_json::json!({
        "version": RPC_VERSION,
        "id": id.to_string(),
        "method": method,
        "params": [params],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_envelope_shape() {
        let env = envelope(7, "Workspace.get_object_info3", serde_json::json!({"objects": []}));

        assert_eq!(env["version"], "1.1");
        assert_eq!(env["id"], "7");
        assert_eq!(env["method"], "Workspace.get_object_info3");
        assert!(env["params"].is_array());
        assert_eq!(env["params"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_reply_with_result() {
        let reply: RpcReply = serde_json::from_str(
            r#"{"version": "1.1", "result": [{"name": "x"}]}"#,
        )
        .unwrap();
        assert!(reply.error.is_none());
        assert_eq!(reply.result.unwrap()[0]["name"], "x");
    }

    #[test]
    fn test_reply_with_error() {
        let reply: RpcReply = serde_json::from_str(
            r#"{"version": "1.1", "error": {"name": "JSONRPCError", "message": "boom", "error": "Traceback..."}}"#,
        )
        .unwrap();
        let error = reply.error.unwrap();
        assert_eq!(error.message.as_deref(), Some("boom"));
        assert_eq!(error.error.as_deref(), Some("Traceback..."));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 200), "short");
        assert_eq!(truncate("abcdef", 3), "abc");
    }
}
