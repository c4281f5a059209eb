// ABOUTME: Batch-mode settings: fixture location, report directory and case list.
// ABOUTME: Falls back to the built-in fixture catalog when no cases are configured.

use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::PathBuf;

use super::deserialize::deserialize_cases;
use super::image_policy::ImagePolicy;
use crate::suite::{FixtureCase, default_cases};

pub const DEFAULT_FIXTURES_DIR: &str = "test_projects";
pub const DEFAULT_RESULTS_DIR: &str = "results";
pub const DEFAULT_SUCCESS_MARKER: &str = "SUCCESS";

#[derive(Debug, Clone, Deserialize)]
pub struct SuiteConfig {
    #[serde(default = "default_fixtures_dir")]
    pub fixtures_dir: PathBuf,

    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    #[serde(default = "default_success_marker")]
    pub success_marker: String,

    #[serde(default = "default_jobs")]
    pub jobs: usize,

    #[serde(default)]
    pub images: ImagePolicy,

    #[serde(default, deserialize_with = "deserialize_cases")]
    pub cases: Option<NonEmpty<FixtureCase>>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: default_fixtures_dir(),
            results_dir: default_results_dir(),
            success_marker: default_success_marker(),
            jobs: default_jobs(),
            images: ImagePolicy::default(),
            cases: None,
        }
    }
}

impl SuiteConfig {
    /// Configured cases, or the built-in catalog.
    pub fn cases(&self) -> Vec<FixtureCase> {
        match &self.cases {
            Some(cases) => cases.iter().cloned().collect(),
            None => default_cases(),
        }
    }
}

fn default_fixtures_dir() -> PathBuf {
    PathBuf::from(DEFAULT_FIXTURES_DIR)
}

fn default_results_dir() -> PathBuf {
    PathBuf::from(DEFAULT_RESULTS_DIR)
}

fn default_success_marker() -> String {
    DEFAULT_SUCCESS_MARKER.to_string()
}

fn default_jobs() -> usize {
    1
}
