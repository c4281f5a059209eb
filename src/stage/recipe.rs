// ABOUTME: Locates container recipes and shared support files on disk.
// ABOUTME: `Dockerfile.<ecosystem>` wins over the shared `Dockerfile`.

use std::path::{Path, PathBuf};

use super::StageError;
use crate::types::EcosystemId;

/// File name the container engine expects inside a build context.
pub const RECIPE_FILENAME: &str = "Dockerfile";

/// A resolved recipe plus the support files to stage next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub path: PathBuf,
    pub support_files: Vec<PathBuf>,
}

impl Recipe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            support_files: Vec::new(),
        }
    }

    pub fn with_support_files(mut self, files: Vec<PathBuf>) -> Self {
        self.support_files = files;
        self
    }
}

/// Directory of per-ecosystem recipes.
#[derive(Debug, Clone)]
pub struct RecipeBook {
    dir: PathBuf,
    support_files: Vec<String>,
}

impl RecipeBook {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            support_files: Vec::new(),
        }
    }

    /// Support files are looked up relative to the recipe directory.
    pub fn with_support_files(mut self, files: Vec<String>) -> Self {
        self.support_files = files;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve the recipe for `ecosystem`.
    pub fn recipe_for(&self, ecosystem: &EcosystemId) -> Result<Recipe, StageError> {
        let specific = self.dir.join(format!("{RECIPE_FILENAME}.{ecosystem}"));
        let shared = self.dir.join(RECIPE_FILENAME);

        let path = if specific.is_file() {
            specific
        } else if shared.is_file() {
            shared
        } else {
            return Err(StageError::RecipeNotFound {
                ecosystem: ecosystem.to_string(),
                dir: self.dir.clone(),
            });
        };

        self.with_support(path)
    }

    /// Use an explicitly named recipe file, relative to the recipe directory.
    pub fn recipe_at(&self, file: &Path) -> Result<Recipe, StageError> {
        let path = self.dir.join(file);
        if !path.is_file() {
            return Err(StageError::RecipeFileNotFound(path));
        }
        self.with_support(path)
    }

    fn with_support(&self, path: PathBuf) -> Result<Recipe, StageError> {
        let mut support = Vec::with_capacity(self.support_files.len());
        for name in &self.support_files {
            let file = self.dir.join(name);
            if !file.is_file() {
                return Err(StageError::SupportFileNotFound(file));
            }
            support.push(file);
        }

        Ok(Recipe::new(path).with_support_files(support))
    }
}
