//! Invocation of the external `snekmer` CLI.

use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use kb_snekmer_core::{SnekmerError, SnekmerResult};

use crate::scratch::JobWorkspace;

pub const ENV_BINARY_OVERRIDE: &str = "SNEKMER_BIN";

const BINARY_NAME: &str = "snekmer";
const STDERR_TAIL_LINES: usize = 20;

/// The two subcommands the module drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCommand {
    Model,
    Search,
}

impl ToolCommand {
    pub fn as_arg(&self) -> &'static str {
        match self {
            ToolCommand::Model => "model",
            ToolCommand::Search => "search",
        }
    }
}

impl std::fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_arg())
    }
}

/// Handle on a located snekmer binary.
#[derive(Debug)]
pub struct SnekmerTool {
    binary: PathBuf,
}

impl SnekmerTool {
    /// Locate the binary: `$SNEKMER_BIN` wins, else search PATH.
    pub fn locate() -> SnekmerResult<Self> {
        if let Ok(path) = std::env::var(ENV_BINARY_OVERRIDE) {
            let binary = PathBuf::from(path);
            if !binary.exists() {
                return Err(SnekmerError::Tool(format!(
                    "{} points at {}, which does not exist",
                    ENV_BINARY_OVERRIDE,
                    binary.display()
                )));
            }
            return Ok(Self { binary });
        }

        let binary = which::which(BINARY_NAME).map_err(|_| {
            SnekmerError::Tool(format!(
                "{} is either not installed or not in PATH",
                BINARY_NAME
            ))
        })?;
        Ok(Self { binary })
    }

    pub fn from_path(binary: PathBuf) -> Self {
        Self { binary }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Probe the binary with `--version`.
    pub fn version(&self) -> SnekmerResult<String> {
        let output = Command::new(&self.binary)
            .arg("--version")
            .output()
            .map_err(|e| SnekmerError::Tool(format!("failed to run {}: {}", BINARY_NAME, e)))?;

        if !output.status.success() {
            return Err(SnekmerError::Tool(format!(
                "{} --version exited with {}",
                BINARY_NAME, output.status
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run one subcommand inside the job directory, blocking until exit.
    ///
    /// stdout and stderr are drained on their own threads into the job's
    /// `logs/` files, with each line mirrored to the structured log. A
    /// nonzero exit status is an error carrying the stderr tail.
    pub fn run(
        &self,
        command: ToolCommand,
        job: &JobWorkspace,
        cores: u32,
    ) -> SnekmerResult<()> {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(command.as_arg())
            .arg("--configfile")
            .arg(job.config_path())
            .arg("--cores")
            .arg(cores.to_string())
            .current_dir(&job.root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        tracing::info!(job = %job.id, "running: {:?}", cmd);

        let mut child = cmd
            .spawn()
            .map_err(|e| SnekmerError::Tool(format!("failed to start {}: {}", BINARY_NAME, e)))?;

        let stdout_log = job.logs_dir().join("snekmer_stdout.log");
        let stderr_log = job.logs_dir().join("snekmer_stderr.log");

        let stdout_handle = child
            .stdout
            .take()
            .map(|pipe| drain_pipe(pipe, stdout_log.clone(), "stdout"));
        let stderr_handle = child
            .stderr
            .take()
            .map(|pipe| drain_pipe(pipe, stderr_log.clone(), "stderr"));

        let status = child
            .wait()
            .map_err(|e| SnekmerError::Tool(format!("failed to wait for {}: {}", BINARY_NAME, e)))?;

        if let Some(handle) = stdout_handle {
            handle.join().ok();
        }
        if let Some(handle) = stderr_handle {
            handle.join().ok();
        }

        if !status.success() {
            let tail = read_tail(&stderr_log, STDERR_TAIL_LINES);
            return Err(SnekmerError::Tool(format!(
                "{} {} exited with {}{}",
                BINARY_NAME,
                command.as_arg(),
                status,
                if tail.is_empty() {
                    String::new()
                } else {
                    format!("; stderr tail:\n{}", tail)
                }
            )));
        }

        tracing::info!(job = %job.id, "{} {} finished", BINARY_NAME, command.as_arg());
        Ok(())
    }
}

fn drain_pipe<R: Read + Send + 'static>(
    pipe: R,
    log_path: PathBuf,
    stream: &'static str,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut log = File::create(&log_path).ok();
        let reader = BufReader::new(pipe);
        for line in reader.lines() {
            let Ok(line) = line else { break };
            tracing::debug!(target: "snekmer", "[{}] {}", stream, line);
            if let Some(file) = log.as_mut() {
                writeln!(file, "{}", line).ok();
            }
        }
    })
}

fn read_tail(path: &Path, lines: usize) -> String {
    let Ok(contents) = std::fs::read_to_string(path) else {
        return String::new();
    };
    let all: Vec<&str> = contents.lines().collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join("\n")
}
