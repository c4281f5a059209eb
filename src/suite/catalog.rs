// ABOUTME: Fixture cases for batch mode and the built-in fixture catalog.
// ABOUTME: A case names a project directory under the fixtures root and its ecosystem.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::types::EcosystemId;

/// Built-in fixtures, grouped by ecosystem.
const BUILTIN: &[(&str, &[&str])] = &[
    ("java", &["simple", "maven", "gradle", "spring-boot"]),
    (
        "go",
        &["simple", "modules", "multi-file", "task", "mage", "cmd-structure"],
    ),
    (
        "js",
        &["simple", "npm", "typescript", "express", "react", "yarn"],
    ),
];

/// Cases that must build before the rest of the suite is worth running.
pub const PREFLIGHT_CASES: &[&str] = &[
    "java/simple",
    "java/maven",
    "go/simple",
    "go/modules",
    "js/simple",
    "js/npm",
];

/// One project of the suite.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FixtureCase {
    /// Path of the project below the fixtures directory, e.g. `java/maven`.
    pub id: String,
    pub ecosystem: EcosystemId,
    /// Recipe file relative to the recipe directory; resolved from the
    /// ecosystem when absent.
    #[serde(default)]
    pub recipe: Option<PathBuf>,
    /// Require the detector to agree with `ecosystem` before building.
    #[serde(default)]
    pub verify_detection: bool,
}

impl FixtureCase {
    pub fn new(id: impl Into<String>, ecosystem: EcosystemId) -> Self {
        Self {
            id: id.into(),
            ecosystem,
            recipe: None,
            verify_detection: false,
        }
    }

    pub fn with_recipe(mut self, recipe: impl Into<PathBuf>) -> Self {
        self.recipe = Some(recipe.into());
        self
    }

    pub fn verifying_detection(mut self) -> Self {
        self.verify_detection = true;
        self
    }

    pub fn project_dir(&self, fixtures_dir: &Path) -> PathBuf {
        fixtures_dir.join(&self.id)
    }
}

pub fn default_cases() -> Vec<FixtureCase> {
    BUILTIN
        .iter()
        .flat_map(|(ecosystem, projects)| {
            projects.iter().filter_map(move |project| {
                let ecosystem = EcosystemId::new(ecosystem).ok()?;
                Some(FixtureCase::new(format!("{ecosystem}/{project}"), ecosystem))
            })
        })
        .collect()
}

/// The preflight subset of `cases`, in declaration order.
pub fn preflight_cases(cases: Vec<FixtureCase>) -> Vec<FixtureCase> {
    cases
        .into_iter()
        .filter(|c| PREFLIGHT_CASES.contains(&c.id.as_str()))
        .collect()
}
