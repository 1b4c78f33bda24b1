//! Platform job execution: read a job file, dispatch on its method, write
//! the result (or error) envelope where the job runner expects it.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Deserialize;
use serde_json::{json, Value};

use kb_snekmer_core::{DeployConfig, MethodContext, SnekmerError, SnekmerResult};

#[derive(Args)]
pub struct RunArgs {
    /// Job file: {"method": ..., "params": [...], "context": {...}}
    #[arg(long, value_name = "PATH")]
    pub input: PathBuf,

    /// Where to write {"result": [...]} or {"error": {...}}
    #[arg(long, value_name = "PATH")]
    pub output: PathBuf,
}

#[derive(Debug, Deserialize)]
struct JobRequest {
    method: String,
    #[serde(default)]
    params: Vec<Value>,
    #[serde(default)]
    context: Option<MethodContext>,
}

pub fn run(args: RunArgs) -> anyhow::Result<()> {
    match dispatch(&args.input) {
        Ok(result) => {
            write_envelope(&args.output, &json!({ "result": [result] }))?;
            Ok(())
        }
        Err(e) => {
            write_envelope(
                &args.output,
                &json!({ "error": { "name": e.name(), "message": e.to_string() } }),
            )?;
            Err(e.into())
        }
    }
}

fn write_envelope(path: &Path, envelope: &Value) -> SnekmerResult<()> {
    fs::write(path, serde_json::to_string_pretty(envelope)?)?;
    Ok(())
}

fn dispatch(input: &Path) -> SnekmerResult<Value> {
    let contents = fs::read_to_string(input)?;
    let request: JobRequest = serde_json::from_str(&contents)?;

    // Method strings arrive module-qualified ("Snekmer.run_Snekmer_search").
    let method = request
        .method
        .rsplit('.')
        .next()
        .unwrap_or(request.method.as_str());

    tracing::info!(method, "dispatching job");

    match method {
        "run_Snekmer_model" => {
            let params = first_param(&request.params, &request.method)?;
            let config = deploy_config(request.context.as_ref())?;
            let output = crate::methods::model::run_model(&config, serde_json::from_value(params)?)?;
            Ok(serde_json::to_value(output)?)
        }
        "run_Snekmer_search" => {
            let params = first_param(&request.params, &request.method)?;
            let config = deploy_config(request.context.as_ref())?;
            let output =
                crate::methods::search::run_search(&config, serde_json::from_value(params)?)?;
            Ok(serde_json::to_value(output)?)
        }
        "status" => Ok(serde_json::to_value(crate::methods::status::status())?),
        _ => Err(SnekmerError::InvalidParams(format!(
            "Unknown method: {}",
            request.method
        ))),
    }
}

/// Environment configuration, with the job context's token filling in when
/// KB_AUTH_TOKEN is not exported.
fn deploy_config(context: Option<&MethodContext>) -> SnekmerResult<DeployConfig> {
    let mut config = DeployConfig::from_env()?;
    if config.token.is_none() {
        config.token = context.and_then(|c| c.token.clone());
    }
    Ok(config)
}

fn first_param(params: &[Value], method: &str) -> SnekmerResult<Value> {
    params.first().cloned().ok_or_else(|| {
        SnekmerError::InvalidParams(format!("{} expects one positional parameter object", method))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_job(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("job.json");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_dispatch_status() {
        let dir = TempDir::new().unwrap();
        let job = write_job(
            dir.path(),
            r#"{"method": "Snekmer.status", "params": []}"#,
        );

        let result = dispatch(&job).unwrap();
        assert_eq!(result["state"], "OK");
        assert_eq!(result["version"], kb_snekmer_core::MODULE_VERSION);
    }

    #[test]
    fn test_dispatch_unknown_method() {
        let dir = TempDir::new().unwrap();
        let job = write_job(
            dir.path(),
            r#"{"method": "Snekmer.run_Snekmer_frobnicate", "params": []}"#,
        );

        match dispatch(&job).unwrap_err() {
            SnekmerError::InvalidParams(msg) => assert!(msg.contains("run_Snekmer_frobnicate")),
            other => panic!("Expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_dispatch_missing_params() {
        let dir = TempDir::new().unwrap();
        let job = write_job(
            dir.path(),
            r#"{"method": "Snekmer.run_Snekmer_search", "params": []}"#,
        );

        match dispatch(&job).unwrap_err() {
            SnekmerError::InvalidParams(msg) => assert!(msg.contains("positional parameter")),
            other => panic!("Expected InvalidParams, got {:?}", other),
        }
    }

    #[test]
    fn test_dispatch_malformed_job_file() {
        let dir = TempDir::new().unwrap();
        let job = write_job(dir.path(), "{not json");

        match dispatch(&job).unwrap_err() {
            SnekmerError::Serialization(_) => {}
            other => panic!("Expected Serialization error, got {:?}", other),
        }
    }

    #[test]
    fn test_run_writes_error_envelope() {
        let dir = TempDir::new().unwrap();
        let job = write_job(
            dir.path(),
            r#"{"method": "Snekmer.nope", "params": []}"#,
        );
        let output = dir.path().join("result.json");

        let result = run(RunArgs {
            input: job,
            output: output.clone(),
        });
        assert!(result.is_err());

        let envelope: Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(envelope["error"]["name"], "ValueError");
        assert!(envelope["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Unknown method"));
    }

    #[test]
    fn test_run_writes_result_envelope() {
        let dir = TempDir::new().unwrap();
        let job = write_job(dir.path(), r#"{"method": "status", "params": []}"#);
        let output = dir.path().join("result.json");

        run(RunArgs {
            input: job,
            output: output.clone(),
        })
        .unwrap();

        let envelope: Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(envelope["result"][0]["state"], "OK");
    }
}
