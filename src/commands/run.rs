// ABOUTME: Run command implementation.
// ABOUTME: Resolves the source, detects and confirms the ecosystem, then builds and runs it.

use super::engine::{build_pipeline, connect_engine};
use super::prompt::confirm;
use boxrun::config::Config;
use boxrun::detect::{DetectionResult, Detector};
use boxrun::diagnostics::{Diagnostics, Warning};
use boxrun::error::{Error, Result};
use boxrun::output::{Output, OutputMode};
use boxrun::pipeline::{ErrorKind, ExecutionOutcome};
use boxrun::source::{self, Checkout, Source};
use boxrun::types::{EcosystemId, ImageTag, new_run_id};

pub struct RunArgs {
    pub source: String,
    pub lang: Option<String>,
    pub yes: bool,
    pub marker: Option<String>,
}

pub async fn run(config: Config, args: RunArgs, mut output: Output) -> Result<()> {
    output.start_timer();
    let mut diag = Diagnostics::default();

    let detector = config.detector();
    let explicit = args
        .lang
        .as_deref()
        .map(|lang| resolve_lang(&detector, lang))
        .transpose()?;

    let source = Source::parse(&args.source);
    if source.is_remote() {
        output.progress(&format!("  → Cloning {}...", source));
    }
    let checkout = source::acquire(&source).await?;

    let result = run_checkout(
        &config, &args, &source, &checkout, explicit, &output, &mut diag,
    )
    .await;

    if checkout.is_temporary()
        && let Err(e) = checkout.close()
    {
        diag.warn(Warning::checkout_cleanup(format!(
            "failed to remove cloned checkout: {e}"
        )));
    }

    for warning in diag.warnings() {
        output.warning(&warning.message);
    }

    result
}

async fn run_checkout(
    config: &Config,
    args: &RunArgs,
    source: &Source,
    checkout: &Checkout,
    explicit: Option<EcosystemId>,
    output: &Output,
    diag: &mut Diagnostics,
) -> Result<()> {
    output.progress("  → Detecting language...");
    let detected = detect(config.detector(), checkout).await;

    let ecosystem = match explicit {
        Some(lang) => {
            if let Some(found) = &detected.ecosystem
                && found != &lang
            {
                diag.warn(Warning::detection_mismatch(format!(
                    "detected {found} but running as {lang}"
                )));
            }
            lang
        }
        None => {
            let Some(found) = detected.ecosystem else {
                let outcome = ExecutionOutcome::no_language_detected(&source.to_string());
                return finish(outcome, output);
            };
            output.progress(&format!("  → Detected {} ({})", found, detected.method));
            if !args.yes
                && !confirm(format!("Build and run this project as {found}?"), true).await?
            {
                return Err(Error::Aborted);
            }
            found
        }
    };

    let engine = connect_engine(config, output)?;
    let pipeline = build_pipeline(config, engine, args.marker.clone())?;
    let tag = ImageTag::for_run(&source.label(), &new_run_id());

    output.progress(&format!("  → Building and running {}...", tag));
    let outcome = pipeline.run_project(checkout.path(), &ecosystem, &tag).await;
    finish(outcome, output)
}

async fn detect(detector: Detector, checkout: &Checkout) -> DetectionResult {
    let root = checkout.path().to_path_buf();
    tokio::task::spawn_blocking(move || detector.detect(&root))
        .await
        .unwrap_or_else(|_| DetectionResult::none())
}

fn resolve_lang(detector: &Detector, lang: &str) -> Result<EcosystemId> {
    EcosystemId::new(lang)
        .ok()
        .filter(|id| detector.catalog().contains(id))
        .ok_or_else(|| Error::UnknownEcosystem(lang.to_string()))
}

fn finish(outcome: ExecutionOutcome, output: &Output) -> Result<()> {
    let summary = if outcome.succeeded {
        outcome.stdout.trim_end().to_string()
    } else {
        let captured = if outcome.stderr.trim().is_empty() {
            &outcome.stdout
        } else {
            &outcome.stderr
        };
        captured.trim_end().to_string()
    };
    if !summary.is_empty() || output.mode() == OutputMode::Json {
        output.result(&summary, &outcome);
    }

    match outcome.error_kind {
        None if outcome.succeeded => {
            output.success("Run succeeded");
            Ok(())
        }
        kind => Err(Error::PipelineFailed {
            kind: kind.unwrap_or(ErrorKind::RunError),
            diagnostic: outcome.diagnostic.unwrap_or_default(),
        }),
    }
}
