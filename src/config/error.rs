//! Error types for the configuration system.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigFileError {
    #[error("Missing required field: {0}")]
    MissingField(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Duplicate id error: {0}")]
    DuplicateId(String),
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Missing env var: {0}")]
    MissingEnvVar(String),
    #[error("Invalid network: {0}")]
    InvalidNetwork(String),
}
