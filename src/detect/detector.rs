// ABOUTME: Two-phase language detection over a project tree.
// ABOUTME: Extension scoring first, marker-file search as the fallback.

use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use super::catalog::SignatureCatalog;
use super::scanner::{self, DEFAULT_MAX_DEPTH, ExtensionProfile};
use crate::types::EcosystemId;

/// How an ecosystem was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionMethod {
    ExtensionScore,
    MarkerFile,
    None,
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionMethod::ExtensionScore => write!(f, "extension score"),
            DetectionMethod::MarkerFile => write!(f, "marker file"),
            DetectionMethod::None => write!(f, "none"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectionResult {
    pub ecosystem: Option<EcosystemId>,
    pub method: DetectionMethod,
}

impl DetectionResult {
    pub fn none() -> Self {
        Self {
            ecosystem: None,
            method: DetectionMethod::None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.ecosystem.is_some()
    }
}

/// Picks one ecosystem for a project tree using an injected catalog.
#[derive(Debug, Clone)]
pub struct Detector {
    catalog: SignatureCatalog,
    max_depth: usize,
}

impl Detector {
    pub fn new(catalog: SignatureCatalog) -> Self {
        Self {
            catalog,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn catalog(&self) -> &SignatureCatalog {
        &self.catalog
    }

    pub fn detect(&self, root: &Path) -> DetectionResult {
        let profile = scanner::scan(root, self.max_depth);

        if let Some(ecosystem) = self.best_by_extension(&profile) {
            info!(%ecosystem, "Detected ecosystem by extension score");
            return DetectionResult {
                ecosystem: Some(ecosystem),
                method: DetectionMethod::ExtensionScore,
            };
        }

        if let Some(ecosystem) = self.first_by_marker(root) {
            info!(%ecosystem, "Detected ecosystem by marker file");
            return DetectionResult {
                ecosystem: Some(ecosystem),
                method: DetectionMethod::MarkerFile,
            };
        }

        info!(root = %root.display(), "No ecosystem detected");
        DetectionResult::none()
    }

    /// Strictly highest nonzero score; the earlier catalog entry keeps a tie.
    fn best_by_extension(&self, profile: &ExtensionProfile) -> Option<EcosystemId> {
        let mut best: Option<(&EcosystemId, usize)> = None;

        for entry in self.catalog.iter() {
            let score = entry
                .extensions
                .iter()
                .filter(|ext| profile.contains(ext))
                .count();
            debug!(ecosystem = %entry.identifier, score, "Extension score");

            if score > 0 && best.is_none_or(|(_, top)| score > top) {
                best = Some((&entry.identifier, score));
            }
        }

        best.map(|(id, _)| id.clone())
    }

    fn first_by_marker(&self, root: &Path) -> Option<EcosystemId> {
        let names = scanner::file_names(root, self.max_depth);
        self.catalog
            .iter()
            .find(|entry| entry.marker_files.iter().any(|m| names.contains(m)))
            .map(|entry| entry.identifier.clone())
    }
}

impl Default for Detector {
    fn default() -> Self {
        Self::new(SignatureCatalog::builtin())
    }
}
