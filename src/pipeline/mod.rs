// ABOUTME: Detection-and-containerized-execution pipeline for one project.
// ABOUTME: Resolves the recipe, stages the context, builds, runs and classifies.

mod classify;
mod executor;
mod outcome;

pub use classify::{StepResult, classify};
pub use executor::{
    DEFAULT_BUILD_TIMEOUT, DEFAULT_RUN_TIMEOUT, Executor, ExecutorSettings, LANG_BUILD_ARG,
};
pub use outcome::{ErrorKind, ExecutionOutcome, MAX_CAPTURED_BYTES};

use std::path::Path;
use tracing::debug;

use crate::stage::{BuildContext, RecipeBook};
use crate::types::{EcosystemId, ImageTag};

/// Runs an already-resolved project through stage, build, run and classify.
///
/// Never prompts and never returns an error: every failure is folded into
/// the returned [`ExecutionOutcome`].
#[derive(Clone)]
pub struct Pipeline {
    executor: Executor,
    recipes: RecipeBook,
}

impl Pipeline {
    pub fn new(executor: Executor, recipes: RecipeBook) -> Self {
        Self { executor, recipes }
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub async fn run_project(
        &self,
        project: &Path,
        ecosystem: &EcosystemId,
        image_tag: &ImageTag,
    ) -> ExecutionOutcome {
        self.run_project_with(project, ecosystem, None, image_tag).await
    }

    /// Like [`Pipeline::run_project`], optionally naming the recipe file
    /// instead of resolving it from the ecosystem.
    pub async fn run_project_with(
        &self,
        project: &Path,
        ecosystem: &EcosystemId,
        recipe: Option<&Path>,
        image_tag: &ImageTag,
    ) -> ExecutionOutcome {
        let resolved = match recipe {
            Some(file) => self.recipes.recipe_at(file),
            None => self.recipes.recipe_for(ecosystem),
        };
        let recipe = match resolved {
            Ok(recipe) => recipe,
            Err(e) => return ExecutionOutcome::failure(ErrorKind::StageError, e.to_string()),
        };
        debug!(recipe = %recipe.path.display(), %ecosystem, "Resolved recipe");

        let project_path = project.to_path_buf();
        let staged =
            tokio::task::spawn_blocking(move || BuildContext::stage(&project_path, &recipe)).await;

        let context = match staged {
            Ok(Ok(context)) => context,
            Ok(Err(e)) => return ExecutionOutcome::failure(ErrorKind::StageError, e.to_string()),
            Err(e) => {
                return ExecutionOutcome::failure(
                    ErrorKind::StageError,
                    format!("staging task failed: {e}"),
                );
            }
        };

        self.executor
            .build_and_run(context, ecosystem, image_tag)
            .await
    }
}
