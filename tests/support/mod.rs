// ABOUTME: Test support utilities.
// ABOUTME: Provides tracing setup, a scripted stand-in for the docker CLI and tree builders.

use boxrun::runtime::{CliEngine, EngineInfo, RuntimeType};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("boxrun=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Create `files` (relative paths) under `root`, with parent directories.
#[allow(dead_code)]
pub fn write_tree(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, format!("contents of {file}\n")).unwrap();
    }
}

/// A shell script that answers like the docker CLI.
///
/// Every invocation is appended to `calls.log`. A build records the context
/// path and a listing of it, then runs `build` as its body; `run` runs the
/// `run` body. `version`, `rm`, `images` and `rmi` succeed.
#[allow(dead_code)]
pub struct FakeEngine {
    dir: TempDir,
    program: PathBuf,
}

#[allow(dead_code)]
impl FakeEngine {
    pub fn new(build: &str, run: &str) -> Self {
        Self::with_version(build, run, "echo 24.0.7-fake")
    }

    /// Engine whose daemon does not answer.
    pub fn unreachable() -> Self {
        Self::with_version(
            "exit 0",
            "exit 0",
            "echo 'Cannot connect to the Docker daemon at unix:///var/run/docker.sock.' >&2; exit 1",
        )
    }

    pub fn with_version(build: &str, run: &str, version: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let state = dir.path();
        let script = format!(
            r#"#!/bin/sh
echo "$*" >> "{state}/calls.log"
case "$1" in
  version)
    {version}
    ;;
  build)
    for last; do :; done
    echo "$last" > "{state}/context_path"
    ls -A "$last" > "{state}/context_listing"
    {build}
    ;;
  run)
    {run}
    ;;
  images)
    echo sha256:aaa
    echo sha256:bbb
    echo sha256:aaa
    ;;
  *)
    exit 0
    ;;
esac
"#,
            state = state.display(),
        );

        let program = state.join("docker");
        fs::write(&program, script).unwrap();
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();
        Self { dir, program }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn engine(&self) -> CliEngine {
        CliEngine::new(EngineInfo {
            runtime_type: RuntimeType::Docker,
            program: self.program.clone(),
        })
    }

    /// Invocations so far, one argument string per call.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn calls_to(&self, subcommand: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.split_whitespace().next() == Some(subcommand))
            .collect()
    }

    /// Build context handed to the most recent build.
    pub fn last_context(&self) -> Option<PathBuf> {
        fs::read_to_string(self.dir.path().join("context_path"))
            .ok()
            .map(|p| PathBuf::from(p.trim()))
    }

    /// Entries of the most recent build context.
    pub fn last_listing(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("context_listing"))
            .map(|l| l.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
