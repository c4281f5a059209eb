// ABOUTME: Container engine capability trait: build, run, ping and image cleanup.
// ABOUTME: Shared request/response types for engine invocations.

use super::sealed::Sealed;
use crate::types::ImageTag;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Label stamped on every image boxrun builds, used for cleanup.
pub const MANAGED_LABEL: &str = "boxrun.managed=true";

/// Captured result of one finished engine process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// `None` when the process was ended by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl EngineOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout and stderr joined for diagnostics.
    pub fn combined(&self) -> String {
        match (self.stdout.is_empty(), self.stderr.is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}

/// Image build parameters.
#[derive(Debug, Clone)]
pub struct BuildRequest<'a> {
    pub context: &'a Path,
    pub tag: &'a ImageTag,
    pub build_args: &'a [(String, String)],
    pub timeout: Duration,
}

/// Container run parameters. The container is always removed after exit.
#[derive(Debug, Clone)]
pub struct RunRequest<'a> {
    pub tag: &'a ImageTag,
    pub container_name: &'a str,
    pub timeout: Duration,
}

/// Engine capabilities the pipeline relies on.
///
/// `build` and `run` return `Ok` for any process that ran to completion,
/// whatever its exit code; `Err` is reserved for the engine being unusable
/// or the step running out of time.
#[async_trait]
pub trait ContainerEngine: Sealed + Send + Sync {
    /// Build an image from a staged context.
    async fn build(&self, request: &BuildRequest<'_>) -> Result<EngineOutput, EngineError>;

    /// Run an image to completion.
    async fn run(&self, request: &RunRequest<'_>) -> Result<EngineOutput, EngineError>;

    /// Check that the engine and its daemon answer.
    async fn ping(&self) -> Result<String, EngineError>;

    /// Remove every image carrying [`MANAGED_LABEL`]; returns how many were removed.
    async fn remove_managed_images(&self) -> Result<usize, EngineError>;
}

/// Errors from engine invocations.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("container engine unavailable: {0}")]
    Unavailable(String),

    #[error("timed out after {}", format_budget(.0))]
    Timeout(Duration),

    #[error("`{command}` failed with exit code {code:?}: {output}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        output: String,
    },
}

fn format_budget(budget: &Duration) -> humantime_serde::re::humantime::FormattedDuration {
    humantime_serde::re::humantime::format_duration(*budget)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_requires_zero_exit() {
        let ok = EngineOutput {
            exit_code: Some(0),
            ..Default::default()
        };
        let signalled = EngineOutput::default();
        assert!(ok.success());
        assert!(!signalled.success());
    }

    #[test]
    fn combined_joins_streams() {
        let out = EngineOutput {
            exit_code: Some(1),
            stdout: "step 1\n".to_string(),
            stderr: "boom".to_string(),
        };
        assert_eq!(out.combined(), "step 1\nboom");
    }

    #[test]
    fn timeout_message_keeps_sub_second_budgets() {
        let err = EngineError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "timed out after 250ms");
    }
}
