// ABOUTME: Runtime error types with SNAFU pattern.
// ABOUTME: Unifies engine detection and engine invocation errors for programmatic handling.

use snafu::Snafu;

use super::detection::DetectionError;
use super::engine::EngineError;

/// Unified runtime error for detection and invocation failures.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("engine detection failed: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("engine command failed: {source}"))]
    Engine { source: EngineError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// No container engine found on the system.
    NoRuntimeFound,
    /// Engine program missing or its daemon unreachable.
    Unavailable,
    /// Engine command exceeded its time budget.
    Timeout,
    /// Engine command ran but reported failure.
    CommandFailed,
}

impl RuntimeError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> RuntimeErrorKind {
        match self {
            RuntimeError::Detection { source } => match source {
                DetectionError::NoRuntimeFound => RuntimeErrorKind::NoRuntimeFound,
            },
            RuntimeError::Engine { source } => match source {
                EngineError::Unavailable(_) => RuntimeErrorKind::Unavailable,
                EngineError::Timeout(_) => RuntimeErrorKind::Timeout,
                EngineError::CommandFailed { .. } => RuntimeErrorKind::CommandFailed,
            },
        }
    }

    /// Whether the engine cannot be used at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self.kind(),
            RuntimeErrorKind::NoRuntimeFound | RuntimeErrorKind::Unavailable
        )
    }
}

impl From<DetectionError> for RuntimeError {
    fn from(source: DetectionError) -> Self {
        RuntimeError::Detection { source }
    }
}

impl From<EngineError> for RuntimeError {
    fn from(source: EngineError) -> Self {
        RuntimeError::Engine { source }
    }
}
