// ABOUTME: ContainerEngine implementation that shells out to the docker/podman CLI.
// ABOUTME: Enforces wall-clock timeouts and kills the client and container on expiry.

use super::engine::{
    BuildRequest, ContainerEngine, EngineError, EngineOutput, MANAGED_LABEL, RunRequest,
};
use super::sealed::Sealed;
use super::types::EngineInfo;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};

const PING_TIMEOUT: Duration = Duration::from_secs(15);
const ADMIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Phrases engines print when the CLI works but the daemon does not answer.
const DAEMON_UNREACHABLE: &[&str] = &[
    "Cannot connect to the Docker daemon",
    "Is the docker daemon running",
    "error during connect",
    "Cannot connect to Podman",
    "unable to connect to Podman socket",
];

/// Engine driven through its command-line client.
#[derive(Debug, Clone)]
pub struct CliEngine {
    info: EngineInfo,
}

impl CliEngine {
    pub fn new(info: EngineInfo) -> Self {
        Self { info }
    }

    pub fn info(&self) -> &EngineInfo {
        &self.info
    }

    fn program(&self) -> &Path {
        &self.info.program
    }

    async fn execute(
        &self,
        args: Vec<OsString>,
        timeout: Duration,
    ) -> Result<EngineOutput, EngineError> {
        debug!(program = %self.program().display(), ?args, "Invoking engine");

        let child = Command::new(self.program())
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                EngineError::Unavailable(format!(
                    "failed to start {}: {}",
                    self.program().display(),
                    e
                ))
            })?;

        // On expiry the wait future is dropped and kill_on_drop ends the client.
        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| EngineError::Timeout(timeout))?
            .map_err(|e| EngineError::Unavailable(format!("failed to wait for engine: {}", e)))?;

        let output = EngineOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.success() && daemon_unreachable(&output.stderr) {
            return Err(EngineError::Unavailable(output.stderr.trim().to_string()));
        }

        Ok(output)
    }

    /// Run an administrative command that must succeed.
    async fn checked(
        &self,
        args: &[&str],
        timeout: Duration,
    ) -> Result<EngineOutput, EngineError> {
        let output = self
            .execute(args.iter().map(OsString::from).collect(), timeout)
            .await?;
        if output.success() {
            Ok(output)
        } else {
            Err(EngineError::CommandFailed {
                command: format!("{} {}", self.program().display(), args.join(" ")),
                code: output.exit_code,
                output: output.combined(),
            })
        }
    }

    async fn force_remove_container(&self, name: &str) {
        match self.checked(&["rm", "-f", name], PING_TIMEOUT).await {
            Ok(_) => debug!(container = name, "Removed timed-out container"),
            Err(e) => warn!("Failed to remove container {}: {}", name, e),
        }
    }
}

impl Sealed for CliEngine {}

#[async_trait]
impl ContainerEngine for CliEngine {
    async fn build(&self, request: &BuildRequest<'_>) -> Result<EngineOutput, EngineError> {
        info!(tag = %request.tag, context = %request.context.display(), "Building image");
        self.execute(build_args(request), request.timeout).await
    }

    async fn run(&self, request: &RunRequest<'_>) -> Result<EngineOutput, EngineError> {
        info!(tag = %request.tag, container = request.container_name, "Running container");

        let mut guard = ContainerGuard::new(self.program(), request.container_name);
        let args = run_args(request);
        let result = self.execute(args, request.timeout).await;

        if matches!(result, Err(EngineError::Timeout(_))) {
            self.force_remove_container(request.container_name).await;
        }
        guard.disarm();
        result
    }

    async fn ping(&self) -> Result<String, EngineError> {
        let output = self
            .checked(&["version", "--format", "{{.Server.Version}}"], PING_TIMEOUT)
            .await
            .map_err(|e| match e {
                EngineError::CommandFailed { output, .. } => EngineError::Unavailable(output),
                other => other,
            })?;
        Ok(output.stdout.trim().to_string())
    }

    async fn remove_managed_images(&self) -> Result<usize, EngineError> {
        let filter = format!("label={}", MANAGED_LABEL);
        let listing = self
            .checked(&["images", "-q", "--filter", &filter], ADMIN_TIMEOUT)
            .await?;

        let mut ids: Vec<&str> = listing.stdout.split_whitespace().collect();
        ids.sort_unstable();
        ids.dedup();
        if ids.is_empty() {
            return Ok(0);
        }

        let mut args = vec!["rmi", "-f"];
        args.extend(ids.iter().copied());
        self.checked(&args, ADMIN_TIMEOUT).await?;
        info!(count = ids.len(), "Removed managed images");
        Ok(ids.len())
    }
}

fn build_args(request: &BuildRequest<'_>) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["build".into()];
    for (key, value) in request.build_args {
        args.push("--build-arg".into());
        args.push(format!("{key}={value}").into());
    }
    args.push("--label".into());
    args.push(MANAGED_LABEL.into());
    args.push("-t".into());
    args.push(request.tag.to_string().into());
    args.push(request.context.as_os_str().to_owned());
    args
}

fn run_args(request: &RunRequest<'_>) -> Vec<OsString> {
    vec![
        "run".into(),
        "--rm".into(),
        "--name".into(),
        request.container_name.into(),
        request.tag.to_string().into(),
    ]
}

fn daemon_unreachable(stderr: &str) -> bool {
    DAEMON_UNREACHABLE.iter().any(|phrase| stderr.contains(phrase))
}

/// Force-removes a named container if the run future is dropped mid-flight.
///
/// Covers cancellation (Ctrl-C, aborted suite tasks), where only the client
/// process would otherwise be killed and the container left running.
struct ContainerGuard {
    program: PathBuf,
    name: String,
    armed: bool,
}

impl ContainerGuard {
    fn new(program: &Path, name: &str) -> Self {
        Self {
            program: program.to_path_buf(),
            name: name.to_string(),
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ContainerGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let spawned = std::process::Command::new(&self.program)
            .args(["rm", "-f", self.name.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if let Err(e) = spawned {
            warn!("Failed to remove container {} on cancel: {}", self.name, e);
        }
    }
}
