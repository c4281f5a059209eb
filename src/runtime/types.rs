// ABOUTME: Engine type definitions for Docker and Podman.
// ABOUTME: Includes RuntimeType, the resolved EngineInfo and the config override.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The container engine flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeType {
    Docker,
    Podman,
}

impl RuntimeType {
    /// CLI program name looked up on `PATH` when no explicit path is configured.
    pub fn default_program(&self) -> &'static str {
        match self {
            RuntimeType::Docker => "docker",
            RuntimeType::Podman => "podman",
        }
    }
}

impl std::fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RuntimeType::Docker => write!(f, "docker"),
            RuntimeType::Podman => write!(f, "podman"),
        }
    }
}

/// Resolved engine: which flavour and which program to invoke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineInfo {
    pub runtime_type: RuntimeType,
    pub program: PathBuf,
}

impl EngineInfo {
    pub fn new(runtime_type: RuntimeType) -> Self {
        Self {
            runtime_type,
            program: PathBuf::from(runtime_type.default_program()),
        }
    }
}

/// Explicit engine override from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuntimeConfig {
    /// Explicit engine type (overrides auto-detection).
    pub runtime: Option<RuntimeType>,
    /// Explicit CLI program (overrides the default name).
    pub program: Option<PathBuf>,
}
