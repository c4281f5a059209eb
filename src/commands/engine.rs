// ABOUTME: Shared helpers for locating the container engine and assembling the pipeline.
// ABOUTME: Used by the run, suite and clean commands.

use boxrun::config::Config;
use boxrun::error::Result;
use boxrun::output::Output;
use boxrun::pipeline::{Executor, Pipeline};
use boxrun::runtime::{self, ContainerEngine};
use std::sync::Arc;

/// Locate the container engine configured for (or found on) this machine.
pub fn connect_engine(config: &Config, output: &Output) -> Result<Arc<dyn ContainerEngine>> {
    output.progress("  → Detecting container engine...");
    let mut engine_config = config.engine.clone();
    if let Some(program) = engine_config.as_mut().and_then(|c| c.program.as_mut())
        && program.components().count() > 1
    {
        *program = config.resolve(program);
    }

    let engine = runtime::connect(engine_config.as_ref())?;
    output.progress(&format!(
        "  → Using {} ({})",
        engine.info().runtime_type,
        engine.info().program.display()
    ));
    Ok(Arc::new(engine))
}

/// Pipeline over `engine` with the configured budgets and recipes.
pub fn build_pipeline(
    config: &Config,
    engine: Arc<dyn ContainerEngine>,
    success_marker: Option<String>,
) -> Result<Pipeline> {
    let settings = config.executor_settings(success_marker)?;
    Ok(Pipeline::new(
        Executor::new(engine, settings),
        config.recipe_book(),
    ))
}
