// ABOUTME: Suite command implementation.
// ABOUTME: Optionally generates fixtures and runs a preflight, then runs the catalog and reports.

use super::engine::{build_pipeline, connect_engine};
use super::prompt::confirm;
use boxrun::config::{Config, ImagePolicy};
use boxrun::diagnostics::Diagnostics;
use boxrun::error::{Error, Result};
use boxrun::output::Output;
use boxrun::suite::{AggregateReport, FixtureCase, SuiteOptions, SuiteRunner, generate_fixtures};
use boxrun::types::{EcosystemId, new_run_id};
use std::path::PathBuf;

pub struct SuiteArgs {
    pub only: Option<String>,
    pub jobs: Option<usize>,
    pub images: Option<ImagePolicy>,
    pub fixtures: Option<PathBuf>,
    pub results: Option<PathBuf>,
    pub generate: bool,
    pub preflight: bool,
    pub yes: bool,
}

pub async fn suite(config: Config, args: SuiteArgs, mut output: Output) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    let catalog = config.catalog();
    let only = match args.only.as_deref() {
        Some(lang) => Some(
            EcosystemId::new(lang)
                .ok()
                .filter(|id| catalog.contains(id))
                .ok_or_else(|| Error::UnknownEcosystem(lang.to_string()))?,
        ),
        None => None,
    };

    let jobs = args.jobs.unwrap_or(config.suite.jobs);
    if jobs == 0 {
        return Err(Error::InvalidConfig("--jobs must be at least 1".into()));
    }

    let fixtures_dir = args.fixtures.unwrap_or_else(|| config.fixtures_dir());
    let results_dir = args.results.unwrap_or_else(|| config.results_dir());

    let engine = connect_engine(&config, &output)?;
    let pipeline = build_pipeline(&config, engine, Some(config.suite.success_marker.clone()))?;

    let runner = SuiteRunner::new(
        pipeline,
        config.detector(),
        SuiteOptions {
            fixtures_dir: fixtures_dir.clone(),
            only,
            jobs,
            images: args.images.unwrap_or(config.suite.images),
            run_id: new_run_id(),
        },
    );

    let cases = runner.select(config.suite.cases());
    if cases.is_empty() {
        return Err(Error::InvalidConfig("no fixture cases selected".into()));
    }

    if args.generate {
        let written = generate_fixtures(&fixtures_dir, &cases, &config.suite.success_marker)?;
        output.progress(&format!(
            "  → Generated {} fixture project(s) in {}",
            written.len(),
            fixtures_dir.display()
        ));
    }

    if args.preflight {
        preflight(&runner, &cases, args.yes, &output, &mut diag).await?;
    }

    output.progress(&format!(
        "Running {} fixture case(s) with {} worker(s)",
        cases.len(),
        jobs
    ));
    let report = runner.run(cases, &mut diag).await;
    let (json_path, html_path) = report.persist(&results_dir)?;

    output.result(&summary(&report), &report);
    output.progress(&format!(
        "Reports: {} and {}",
        json_path.display(),
        html_path.display()
    ));

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    if report.succeeded() {
        output.success(&format!("All {} case(s) passed", report.total()));
        Ok(())
    } else {
        Err(Error::SuiteFailed {
            failed: report.failed(),
            total: report.total(),
        })
    }
}

/// Run the critical subset first; on failure continue only when confirmed.
async fn preflight(
    runner: &SuiteRunner,
    cases: &[FixtureCase],
    yes: bool,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<()> {
    let report = runner.preflight(cases.to_vec(), diag).await;
    if report.total() == 0 {
        output.progress("  → No preflight cases selected");
        return Ok(());
    }

    output.progress(&format!(
        "Preflight: {}/{} case(s) passed",
        report.total() - report.failed(),
        report.total()
    ));
    if report.succeeded() {
        return Ok(());
    }

    output.progress(&summary(&report));
    let prompt = "Preflight failed. Run the full suite anyway?".to_string();
    if yes || confirm(prompt, false).await? {
        Ok(())
    } else {
        Err(Error::Aborted)
    }
}

fn summary(report: &AggregateReport) -> String {
    let mut lines = Vec::new();
    for (ecosystem, tally) in &report.per_ecosystem {
        let mark = if tally.is_green() { "✓" } else { "✗" };
        lines.push(format!(
            "  {mark} {ecosystem}: {}/{} passed",
            tally.passed, tally.total
        ));
        for (id, record) in report.failures(ecosystem) {
            let kind = record
                .outcome
                .error_kind
                .map_or_else(|| "FAILED".to_string(), |k| k.to_string());
            lines.push(format!("      {id}: {kind}"));
        }
    }
    lines.join("\n")
}
