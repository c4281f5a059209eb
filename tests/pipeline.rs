// ABOUTME: Integration tests for the stage-build-run-classify pipeline.
// ABOUTME: Drives a scripted engine and checks outcomes, engine calls and cleanup.

mod support;

use boxrun::pipeline::{ErrorKind, Executor, ExecutorSettings, Pipeline};
use boxrun::stage::RecipeBook;
use boxrun::types::{EcosystemId, ImageTag};
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use support::{FakeEngine, init_tracing, write_tree};
use tempfile::TempDir;

struct Fixture {
    project: TempDir,
    recipes: TempDir,
}

impl Fixture {
    fn python() -> Self {
        let project = TempDir::new().unwrap();
        write_tree(project.path(), &["main.py", "utils.py", "requirements.txt"]);

        let recipes = TempDir::new().unwrap();
        fs::write(
            recipes.path().join("Dockerfile.python"),
            "FROM python:3.12-slim\nCOPY . /app\nCMD [\"python\", \"/app/main.py\"]\n",
        )
        .unwrap();
        Self { project, recipes }
    }

    fn pipeline(&self, fake: &FakeEngine, settings: ExecutorSettings) -> Pipeline {
        Pipeline::new(
            Executor::new(Arc::new(fake.engine()), settings),
            RecipeBook::new(self.recipes.path()),
        )
    }
}

fn python() -> EcosystemId {
    EcosystemId::new("python").unwrap()
}

fn tag() -> ImageTag {
    ImageTag::for_run("pipeline-test", "run1")
}

fn marker_settings() -> ExecutorSettings {
    ExecutorSettings {
        success_marker: Some("SUCCESS".to_string()),
        ..ExecutorSettings::default()
    }
}

#[tokio::test]
async fn build_failure_skips_run_and_removes_stage() {
    init_tracing();
    let fixture = Fixture::python();
    let fake = FakeEngine::new("echo 'COPY failed' >&2; exit 1", "echo SUCCESS");

    let outcome = fixture
        .pipeline(&fake, ExecutorSettings::default())
        .run_project(fixture.project.path(), &python(), &tag())
        .await;

    assert!(!outcome.succeeded);
    assert_eq!(outcome.error_kind, Some(ErrorKind::BuildError));
    assert_eq!(outcome.exit_code, Some(1));
    assert!(outcome.stderr.contains("COPY failed"));
    assert!(fake.calls_to("run").is_empty(), "run must not be attempted");

    let context = fake.last_context().unwrap();
    assert!(!context.exists(), "staging directory should be removed");
}

#[tokio::test]
async fn marker_in_stdout_succeeds() {
    let fixture = Fixture::python();
    let fake = FakeEngine::new("exit 0", "echo 'PYTHON SIMPLE: SUCCESS!'");

    let outcome = fixture
        .pipeline(&fake, marker_settings())
        .run_project(fixture.project.path(), &python(), &tag())
        .await;

    assert!(outcome.succeeded, "{outcome:?}");
    assert_eq!(outcome.exit_code, Some(0));
    assert!(outcome.stdout.contains("SUCCESS"));
    assert!(!fake.last_context().unwrap().exists());
}

#[tokio::test]
async fn clean_exit_without_marker_is_run_error() {
    let fixture = Fixture::python();
    let fake = FakeEngine::new("exit 0", "echo 'hello world'");

    let outcome = fixture
        .pipeline(&fake, marker_settings())
        .run_project(fixture.project.path(), &python(), &tag())
        .await;

    assert_eq!(outcome.error_kind, Some(ErrorKind::RunError));
    assert_eq!(outcome.exit_code, Some(0));
}

#[tokio::test]
async fn nonzero_run_exit_is_run_error() {
    let fixture = Fixture::python();
    let fake = FakeEngine::new("exit 0", "echo 'Traceback' >&2; exit 3");

    let outcome = fixture
        .pipeline(&fake, ExecutorSettings::default())
        .run_project(fixture.project.path(), &python(), &tag())
        .await;

    assert_eq!(outcome.error_kind, Some(ErrorKind::RunError));
    assert_eq!(outcome.exit_code, Some(3));
    assert!(outcome.stderr.contains("Traceback"));
}

#[tokio::test]
async fn run_timeout_kills_container_and_removes_stage() {
    let fixture = Fixture::python();
    let fake = FakeEngine::new("exit 0", "exec sleep 10");
    let settings = ExecutorSettings {
        run_timeout: Duration::from_millis(300),
        ..ExecutorSettings::default()
    };

    let outcome = fixture
        .pipeline(&fake, settings)
        .run_project(fixture.project.path(), &python(), &tag())
        .await;

    assert_eq!(outcome.error_kind, Some(ErrorKind::RunTimeout));
    let removals = fake.calls_to("rm");
    assert_eq!(removals, [format!("rm -f {}", tag().container_name())]);
    assert!(!fake.last_context().unwrap().exists());
}

/// Poll `condition` until it holds, failing the test after a few seconds.
async fn wait_for(what: &str, condition: impl Fn() -> bool) {
    for _ in 0..250 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("timed out waiting for {what}");
}

#[tokio::test]
async fn cancelled_run_removes_stage_and_container() {
    init_tracing();
    let fixture = Fixture::python();
    let fake = FakeEngine::new("exit 0", "exec sleep 10");
    let pipeline = fixture.pipeline(&fake, ExecutorSettings::default());
    let project = fixture.project.path().to_path_buf();

    let task = tokio::spawn(async move { pipeline.run_project(&project, &python(), &tag()).await });
    wait_for("the container to start", || !fake.calls_to("run").is_empty()).await;

    task.abort();
    let joined = task.await;
    assert!(joined.is_err_and(|e| e.is_cancelled()));

    assert!(
        !fake.last_context().unwrap().exists(),
        "staging directory should be removed on cancel"
    );
    wait_for("the container removal", || !fake.calls_to("rm").is_empty()).await;
    assert_eq!(
        fake.calls_to("rm"),
        [format!("rm -f {}", tag().container_name())]
    );
}

#[tokio::test]
async fn build_timeout_is_classified() {
    let fixture = Fixture::python();
    let fake = FakeEngine::new("exec sleep 10", "echo SUCCESS");
    let settings = ExecutorSettings {
        build_timeout: Duration::from_millis(300),
        ..ExecutorSettings::default()
    };

    let outcome = fixture
        .pipeline(&fake, settings)
        .run_project(fixture.project.path(), &python(), &tag())
        .await;

    assert_eq!(outcome.error_kind, Some(ErrorKind::BuildTimeout));
    assert!(fake.calls_to("run").is_empty());
    assert!(!fake.last_context().unwrap().exists());
}

#[tokio::test]
async fn unreachable_daemon_is_engine_unavailable() {
    let fixture = Fixture::python();
    let fake = FakeEngine::new(
        "echo 'Cannot connect to the Docker daemon. Is the docker daemon running?' >&2; exit 1",
        "exit 0",
    );

    let outcome = fixture
        .pipeline(&fake, ExecutorSettings::default())
        .run_project(fixture.project.path(), &python(), &tag())
        .await;

    assert_eq!(outcome.error_kind, Some(ErrorKind::EngineUnavailable));
}

#[tokio::test]
async fn context_carries_project_and_recipe() {
    let fixture = Fixture::python();
    let fake = FakeEngine::new("exit 0", "echo SUCCESS");
    let settings = ExecutorSettings {
        build_args: vec![("PIP_INDEX_URL".to_string(), "http://mirror".to_string())],
        ..ExecutorSettings::default()
    };

    let outcome = fixture
        .pipeline(&fake, settings)
        .run_project(fixture.project.path(), &python(), &tag())
        .await;
    assert!(outcome.succeeded);

    let listing = fake.last_listing();
    for expected in ["Dockerfile", "main.py", "utils.py", "requirements.txt"] {
        assert!(listing.iter().any(|e| e == expected), "missing {expected}");
    }

    let builds = fake.calls_to("build");
    assert_eq!(builds.len(), 1);
    assert!(builds[0].contains("--build-arg LANG_NAME=python"));
    assert!(builds[0].contains("--build-arg PIP_INDEX_URL=http://mirror"));
    assert!(builds[0].contains("--label boxrun.managed=true"));
    assert!(builds[0].contains(&format!("-t {}", tag())));

    let runs = fake.calls_to("run");
    assert_eq!(
        runs,
        [format!("run --rm --name {} {}", tag().container_name(), tag())]
    );
}

#[tokio::test]
async fn missing_recipe_is_stage_error_without_engine_calls() {
    let fixture = Fixture::python();
    let fake = FakeEngine::new("exit 0", "exit 0");

    let outcome = fixture
        .pipeline(&fake, ExecutorSettings::default())
        .run_project(
            fixture.project.path(),
            &EcosystemId::new("go").unwrap(),
            &tag(),
        )
        .await;

    assert_eq!(outcome.error_kind, Some(ErrorKind::StageError));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn missing_project_is_stage_error() {
    let fixture = Fixture::python();
    let fake = FakeEngine::new("exit 0", "exit 0");
    let gone = fixture.project.path().join("does-not-exist");

    let outcome = fixture
        .pipeline(&fake, ExecutorSettings::default())
        .run_project(&gone, &python(), &tag())
        .await;

    assert_eq!(outcome.error_kind, Some(ErrorKind::StageError));
    assert!(fake.calls_to("build").is_empty());
}
