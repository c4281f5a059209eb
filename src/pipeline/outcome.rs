// ABOUTME: Structured pipeline verdict: error kind, exit code and captured output.
// ABOUTME: Serialized verbatim into the batch report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Captured streams longer than this keep only their tail.
pub const MAX_CAPTURED_BYTES: usize = 64 * 1024;

/// Failure categories of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    NoLanguageDetected,
    StageError,
    EngineUnavailable,
    BuildError,
    BuildTimeout,
    RunError,
    RunTimeout,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NoLanguageDetected => "NO_LANGUAGE_DETECTED",
            ErrorKind::StageError => "STAGE_ERROR",
            ErrorKind::EngineUnavailable => "ENGINE_UNAVAILABLE",
            ErrorKind::BuildError => "BUILD_ERROR",
            ErrorKind::BuildTimeout => "BUILD_TIMEOUT",
            ErrorKind::RunError => "RUN_ERROR",
            ErrorKind::RunTimeout => "RUN_TIMEOUT",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub succeeded: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    /// Human-readable explanation accompanying `error_kind`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
}

impl ExecutionOutcome {
    pub fn success(exit_code: Option<i32>, stdout: &str, stderr: &str) -> Self {
        Self {
            succeeded: true,
            exit_code,
            stdout: tail(stdout),
            stderr: tail(stderr),
            error_kind: None,
            diagnostic: None,
        }
    }

    pub fn failure(kind: ErrorKind, diagnostic: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            exit_code: None,
            stdout: String::new(),
            stderr: String::new(),
            error_kind: Some(kind),
            diagnostic: Some(diagnostic.into()),
        }
    }

    /// Attach captured process output to a failure.
    pub fn with_output(mut self, exit_code: Option<i32>, stdout: &str, stderr: &str) -> Self {
        self.exit_code = exit_code;
        self.stdout = tail(stdout);
        self.stderr = tail(stderr);
        self
    }

    pub fn no_language_detected(project: &str) -> Self {
        Self::failure(
            ErrorKind::NoLanguageDetected,
            format!("could not determine the language of {project}"),
        )
    }
}

/// Keep at most the last [`MAX_CAPTURED_BYTES`] of `text`, on a char boundary.
fn tail(text: &str) -> String {
    if text.len() <= MAX_CAPTURED_BYTES {
        return text.to_string();
    }
    let mut start = text.len() - MAX_CAPTURED_BYTES;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}
