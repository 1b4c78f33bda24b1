//! Error types for kb-snekmer operations

use thiserror::Error;

/// Main error type for module operations
#[derive(Error, Debug)]
pub enum SnekmerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid parameter: {0}")]
    InvalidParams(String),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Staging error: {0}")]
    Staging(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for module operations
pub type SnekmerResult<T> = Result<T, SnekmerError>;

impl From<serde_json::Error> for SnekmerError {
    fn from(err: serde_json::Error) -> Self {
        SnekmerError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for SnekmerError {
    fn from(err: serde_yaml::Error) -> Self {
        SnekmerError::Serialization(err.to_string())
    }
}

impl From<anyhow::Error> for SnekmerError {
    fn from(err: anyhow::Error) -> Self {
        SnekmerError::Other(err.to_string())
    }
}

impl SnekmerError {
    /// Name used in the job-file error envelope.
    pub fn name(&self) -> &'static str {
        match self {
            SnekmerError::Io(_) => "IOError",
            SnekmerError::Config(_) => "ConfigurationError",
            SnekmerError::InvalidParams(_) => "ValueError",
            SnekmerError::Service(_) => "ServerError",
            SnekmerError::Tool(_) => "ToolError",
            SnekmerError::Staging(_) => "StagingError",
            SnekmerError::Serialization(_) => "SerializationError",
            SnekmerError::Other(_) => "Error",
        }
    }
}
