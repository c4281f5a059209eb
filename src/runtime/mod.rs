// ABOUTME: Container engine access for Docker and Podman.
// ABOUTME: Auto-detects the available engine and drives it through its CLI.

mod cli;
mod detection;
mod engine;
mod error;
pub(crate) mod sealed;
mod types;

pub use cli::CliEngine;
pub use detection::{DetectionError, detect_engine};
pub use engine::{
    BuildRequest, ContainerEngine, EngineError, EngineOutput, MANAGED_LABEL, RunRequest,
};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use types::{EngineInfo, RuntimeConfig, RuntimeType};

/// Detect the local engine and wrap it in a [`CliEngine`].
pub fn connect(config: Option<&RuntimeConfig>) -> Result<CliEngine, RuntimeError> {
    let info = detect_engine(config)?;
    tracing::debug!(runtime = %info.runtime_type, program = %info.program.display(), "Using engine");
    Ok(CliEngine::new(info))
}
