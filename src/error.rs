// ABOUTME: Application-wide error types for boxrun.
// ABOUTME: Uses thiserror for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::ErrorKind;
use crate::runtime::RuntimeError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown ecosystem '{0}' (run `boxrun languages` to list them)")]
    UnknownEcosystem(String),

    #[error("source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("failed to clone {url}: {message}")]
    Clone { url: String, message: String },

    #[error("aborted by user")]
    Aborted,

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("{kind}: {diagnostic}")]
    PipelineFailed { kind: ErrorKind, diagnostic: String },

    #[error("{failed} of {total} fixture cases failed")]
    SuiteFailed { failed: usize, total: usize },

    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
