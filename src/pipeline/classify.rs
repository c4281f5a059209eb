// ABOUTME: Pure mapping from build/run step results to an ExecutionOutcome.
// ABOUTME: Decides the error kind; never performs I/O.

use super::outcome::{ErrorKind, ExecutionOutcome};
use crate::runtime::{EngineError, EngineOutput};
use humantime_serde::re::humantime::format_duration;

pub type StepResult = Result<EngineOutput, EngineError>;

/// Classify a build step and the run step that followed it, if any.
///
/// With `success_marker` set, a clean exit additionally needs the marker in
/// stdout.
pub fn classify(
    build: &StepResult,
    run: Option<&StepResult>,
    success_marker: Option<&str>,
) -> ExecutionOutcome {
    let build = match build {
        Ok(output) => output,
        Err(e) => return engine_failure(e, ErrorKind::BuildTimeout, ErrorKind::BuildError),
    };

    if !build.success() {
        return ExecutionOutcome::failure(
            ErrorKind::BuildError,
            format!("image build failed{}", describe_exit(build.exit_code)),
        )
        .with_output(build.exit_code, &build.stdout, &build.stderr);
    }

    let run = match run {
        Some(Ok(output)) => output,
        Some(Err(e)) => return engine_failure(e, ErrorKind::RunTimeout, ErrorKind::RunError),
        None => {
            return ExecutionOutcome::failure(ErrorKind::RunError, "container was never started");
        }
    };

    if !run.success() {
        return ExecutionOutcome::failure(
            ErrorKind::RunError,
            format!("container exited{}", describe_exit(run.exit_code)),
        )
        .with_output(run.exit_code, &run.stdout, &run.stderr);
    }

    if let Some(marker) = success_marker
        && !run.stdout.contains(marker)
    {
        return ExecutionOutcome::failure(
            ErrorKind::RunError,
            format!("success marker '{marker}' not found in container output"),
        )
        .with_output(run.exit_code, &run.stdout, &run.stderr);
    }

    ExecutionOutcome::success(run.exit_code, &run.stdout, &run.stderr)
}

fn engine_failure(err: &EngineError, timeout: ErrorKind, failed: ErrorKind) -> ExecutionOutcome {
    match err {
        EngineError::Unavailable(msg) => {
            ExecutionOutcome::failure(ErrorKind::EngineUnavailable, msg.clone())
        }
        EngineError::Timeout(after) => ExecutionOutcome::failure(
            timeout,
            format!("step exceeded its {} time budget", format_duration(*after)),
        ),
        EngineError::CommandFailed { .. } => ExecutionOutcome::failure(failed, err.to_string()),
    }
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {code}"),
        None => " after being killed by a signal".to_string(),
    }
}
