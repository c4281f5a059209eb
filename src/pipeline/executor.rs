// ABOUTME: Build-then-run executor over a staged build context.
// ABOUTME: Closes the context on every path before returning a classified outcome.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::classify::classify;
use super::outcome::ExecutionOutcome;
use crate::runtime::{BuildRequest, ContainerEngine, RunRequest};
use crate::stage::BuildContext;
use crate::types::{EcosystemId, ImageTag};

/// Build argument through which recipes select their toolchain.
pub const LANG_BUILD_ARG: &str = "LANG_NAME";

pub const DEFAULT_BUILD_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(60);

/// Time budgets, verification marker and extra build arguments.
#[derive(Debug, Clone)]
pub struct ExecutorSettings {
    pub build_timeout: Duration,
    pub run_timeout: Duration,
    pub success_marker: Option<String>,
    pub build_args: Vec<(String, String)>,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            build_timeout: DEFAULT_BUILD_TIMEOUT,
            run_timeout: DEFAULT_RUN_TIMEOUT,
            success_marker: None,
            build_args: Vec::new(),
        }
    }
}

#[derive(Clone)]
pub struct Executor {
    engine: Arc<dyn ContainerEngine>,
    settings: ExecutorSettings,
}

impl Executor {
    pub fn new(engine: Arc<dyn ContainerEngine>, settings: ExecutorSettings) -> Self {
        Self { engine, settings }
    }

    pub fn engine(&self) -> &Arc<dyn ContainerEngine> {
        &self.engine
    }

    /// Build `image_tag` from `context`, run it, and classify the result.
    ///
    /// The run step only happens after a successful build. The built image
    /// is left on the engine.
    pub async fn build_and_run(
        &self,
        context: BuildContext,
        ecosystem: &EcosystemId,
        image_tag: &ImageTag,
    ) -> ExecutionOutcome {
        let mut build_args = Vec::with_capacity(self.settings.build_args.len() + 1);
        build_args.push((LANG_BUILD_ARG.to_string(), ecosystem.to_string()));
        build_args.extend(self.settings.build_args.iter().cloned());

        let build = self
            .engine
            .build(&BuildRequest {
                context: context.path(),
                tag: image_tag,
                build_args: &build_args,
                timeout: self.settings.build_timeout,
            })
            .await;

        let run = match &build {
            Ok(output) if output.success() => {
                let container_name = image_tag.container_name();
                Some(
                    self.engine
                        .run(&RunRequest {
                            tag: image_tag,
                            container_name: &container_name,
                            timeout: self.settings.run_timeout,
                        })
                        .await,
                )
            }
            _ => None,
        };

        if let Err(e) = context.close() {
            warn!("Failed to remove build context: {}", e);
        }

        let outcome = classify(&build, run.as_ref(), self.settings.success_marker.as_deref());
        info!(
            tag = %image_tag,
            succeeded = outcome.succeeded,
            error_kind = ?outcome.error_kind,
            "Pipeline step finished"
        );
        outcome
    }
}
