// ABOUTME: Drives the pipeline across fixture cases, sequentially or on a bounded pool.
// ABOUTME: Applies the image policy around the run and never lets one case cancel another.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use super::aggregate::Aggregator;
use super::catalog::{FixtureCase, preflight_cases};
use super::report::AggregateReport;
use crate::config::ImagePolicy;
use crate::detect::Detector;
use crate::diagnostics::{Diagnostics, Warning};
use crate::pipeline::{ErrorKind, ExecutionOutcome, Pipeline};
use crate::runtime::ContainerEngine;
use crate::types::{EcosystemId, ImageTag};

#[derive(Debug, Clone)]
pub struct SuiteOptions {
    pub fixtures_dir: PathBuf,
    pub only: Option<EcosystemId>,
    pub jobs: usize,
    pub images: ImagePolicy,
    pub run_id: String,
}

pub struct SuiteRunner {
    pipeline: Pipeline,
    detector: Arc<Detector>,
    options: SuiteOptions,
}

impl SuiteRunner {
    pub fn new(pipeline: Pipeline, detector: Detector, options: SuiteOptions) -> Self {
        Self {
            pipeline,
            detector: Arc::new(detector),
            options,
        }
    }

    /// Cases that survive the `only` filter, in declaration order.
    pub fn select(&self, cases: Vec<FixtureCase>) -> Vec<FixtureCase> {
        match &self.options.only {
            Some(only) => cases.into_iter().filter(|c| &c.ecosystem == only).collect(),
            None => cases,
        }
    }

    pub async fn run(&self, cases: Vec<FixtureCase>, diag: &mut Diagnostics) -> AggregateReport {
        let cases = self.select(cases);
        self.run_selected(cases, self.options.images, diag).await
    }

    /// Run only the preflight subset of `cases`, keeping every built image.
    pub async fn preflight(
        &self,
        cases: Vec<FixtureCase>,
        diag: &mut Diagnostics,
    ) -> AggregateReport {
        let cases = preflight_cases(self.select(cases));
        self.run_selected(cases, ImagePolicy::Keep, diag).await
    }

    async fn run_selected(
        &self,
        cases: Vec<FixtureCase>,
        images: ImagePolicy,
        diag: &mut Diagnostics,
    ) -> AggregateReport {
        let aggregator = Arc::new(Aggregator::new(&cases));
        let engine = self.pipeline.executor().engine().clone();

        match engine.ping().await {
            Ok(version) => info!(%version, cases = cases.len(), "Starting suite"),
            Err(e) => {
                warn!("Container engine unavailable: {}", e);
                for case in &cases {
                    aggregator.record(
                        case,
                        ExecutionOutcome::failure(ErrorKind::EngineUnavailable, e.to_string()),
                    );
                }
                return finish(aggregator);
            }
        }

        if images.cleans_before() {
            clean_images(&*engine, diag).await;
        }

        if self.options.jobs <= 1 {
            for case in &cases {
                let outcome = run_case(
                    &self.pipeline,
                    &self.detector,
                    &self.options.fixtures_dir,
                    case,
                    &self.options.run_id,
                )
                .await;
                aggregator.record(case, outcome);
            }
        } else {
            self.run_pooled(cases, &aggregator).await;
        }

        if images.cleans_after() {
            clean_images(&*engine, diag).await;
        }

        finish(aggregator)
    }

    async fn run_pooled(&self, cases: Vec<FixtureCase>, aggregator: &Arc<Aggregator>) {
        let permits = Arc::new(Semaphore::new(self.options.jobs));
        let mut tasks = JoinSet::new();

        for case in cases {
            let permits = permits.clone();
            let pipeline = self.pipeline.clone();
            let detector = self.detector.clone();
            let fixtures_dir = self.options.fixtures_dir.clone();
            let run_id = self.options.run_id.clone();
            let aggregator = aggregator.clone();

            tasks.spawn(async move {
                let Ok(_permit) = permits.acquire_owned().await else {
                    return;
                };
                let outcome = run_case(&pipeline, &detector, &fixtures_dir, &case, &run_id).await;
                aggregator.record(&case, outcome);
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!("Suite task failed: {}", e);
            }
        }
    }
}

/// Run a single fixture case through the pipeline.
pub async fn run_case(
    pipeline: &Pipeline,
    detector: &Arc<Detector>,
    fixtures_dir: &Path,
    case: &FixtureCase,
    run_id: &str,
) -> ExecutionOutcome {
    let project = case.project_dir(fixtures_dir);
    if !project.is_dir() {
        return ExecutionOutcome::failure(
            ErrorKind::StageError,
            format!("fixture directory not found: {}", project.display()),
        );
    }

    if case.verify_detection {
        let detector = detector.clone();
        let root = project.clone();
        let detected = tokio::task::spawn_blocking(move || detector.detect(&root))
            .await
            .ok()
            .and_then(|result| result.ecosystem);
        if detected.as_ref() != Some(&case.ecosystem) {
            let found = detected.map_or_else(|| "nothing".to_string(), |e| e.to_string());
            return ExecutionOutcome::failure(
                ErrorKind::NoLanguageDetected,
                format!("detected {found}, expected {}", case.ecosystem),
            );
        }
    }

    let tag = ImageTag::for_run(&case.id, run_id);
    let outcome = pipeline
        .run_project_with(&project, &case.ecosystem, case.recipe.as_deref(), &tag)
        .await;
    info!(case = %case.id, succeeded = outcome.succeeded, "Case finished");
    outcome
}

async fn clean_images(engine: &dyn ContainerEngine, diag: &mut Diagnostics) {
    match engine.remove_managed_images().await {
        Ok(count) => info!(count, "Removed managed images"),
        Err(e) => diag.warn(Warning::image_cleanup(format!(
            "failed to remove managed images: {e}"
        ))),
    }
}

fn finish(aggregator: Arc<Aggregator>) -> AggregateReport {
    match Arc::try_unwrap(aggregator) {
        Ok(aggregator) => aggregator.finish(),
        // A detached task still holds a reference; snapshot what was recorded.
        Err(shared) => shared.snapshot(),
    }
}
