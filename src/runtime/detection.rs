// ABOUTME: Container engine detection on the local system.
// ABOUTME: Honors explicit config, then DOCKER_HOST, then Podman and Docker sockets, then PATH.

use super::types::{EngineInfo, RuntimeConfig, RuntimeType};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Error during engine detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container engine found (checked Podman and Docker sockets and PATH)")]
    NoRuntimeFound,
}

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Detect the container engine to drive.
///
/// Detection order (when not explicitly configured):
/// 1. `DOCKER_HOST` set: Docker
/// 2. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 3. Rootful Podman socket (`/run/podman/podman.sock`)
/// 4. Docker socket (`/var/run/docker.sock`)
/// 5. `docker`, then `podman`, found on `PATH`
///
/// An explicit `program` without a `runtime` is treated as Docker-compatible.
pub fn detect_engine(config: Option<&RuntimeConfig>) -> Result<EngineInfo, DetectionError> {
    if let Some(cfg) = config {
        match (cfg.runtime, &cfg.program) {
            (Some(runtime_type), Some(program)) => {
                return Ok(EngineInfo {
                    runtime_type,
                    program: program.clone(),
                });
            }
            (Some(runtime_type), None) => return Ok(EngineInfo::new(runtime_type)),
            (None, Some(program)) => {
                return Ok(EngineInfo {
                    runtime_type: RuntimeType::Docker,
                    program: program.clone(),
                });
            }
            (None, None) => {}
        }
    }

    if env::var_os("DOCKER_HOST").is_some() {
        debug!("DOCKER_HOST is set, using docker");
        return Ok(EngineInfo::new(RuntimeType::Docker));
    }

    if let Some(uid) = get_uid() {
        let rootless_socket = format!("/run/user/{}/podman/podman.sock", uid);
        if Path::new(&rootless_socket).exists() {
            return Ok(EngineInfo::new(RuntimeType::Podman));
        }
    }

    if Path::new(ROOTFUL_PODMAN).exists() {
        return Ok(EngineInfo::new(RuntimeType::Podman));
    }

    if Path::new(DOCKER_SOCKET).exists() {
        return Ok(EngineInfo::new(RuntimeType::Docker));
    }

    for runtime_type in [RuntimeType::Docker, RuntimeType::Podman] {
        if let Some(program) = find_on_path(runtime_type.default_program()) {
            debug!(program = %program.display(), "Found engine on PATH");
            return Ok(EngineInfo {
                runtime_type,
                program,
            });
        }
    }

    Err(DetectionError::NoRuntimeFound)
}

fn get_uid() -> Option<String> {
    env::var("UID").ok().or_else(|| {
        // Fall back to reading /proc/self/status
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}

fn find_on_path(program: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
