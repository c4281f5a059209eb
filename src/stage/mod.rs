// ABOUTME: Build context staging: a disposable copy of the project plus its recipe.
// ABOUTME: The staging directory is removed on close or drop, whichever comes first.

mod recipe;

pub use recipe::{RECIPE_FILENAME, Recipe, RecipeBook};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Errors while materializing a build context.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("project directory not found: {0}")]
    ProjectNotFound(PathBuf),

    #[error("no recipe for ecosystem '{ecosystem}' in {dir}")]
    RecipeNotFound { ecosystem: String, dir: PathBuf },

    #[error("recipe file not found: {0}")]
    RecipeFileNotFound(PathBuf),

    #[error("support file not found: {0}")]
    SupportFileNotFound(PathBuf),

    #[error("failed to create staging directory: {0}")]
    TempDir(#[source] io::Error),

    #[error("failed to copy {path}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to walk project tree at {path}: {message}")]
    Walk { path: PathBuf, message: String },
}

/// Exclusively owned staging directory handed to the engine's build step.
#[derive(Debug)]
pub struct BuildContext {
    root: Option<TempDir>,
    context: PathBuf,
}

impl BuildContext {
    /// Copy `project` and `recipe` into a fresh temporary directory.
    ///
    /// Symlinks are followed; linked content lands as regular files. Any
    /// unreadable entry fails the whole stage and the partial copy is removed.
    pub fn stage(project: &Path, recipe: &Recipe) -> Result<Self, StageError> {
        if !project.is_dir() {
            return Err(StageError::ProjectNotFound(project.to_path_buf()));
        }

        let root = tempfile::Builder::new()
            .prefix("boxrun-")
            .tempdir()
            .map_err(StageError::TempDir)?;
        let context = root.path().join("context");

        copy_tree(project, &context)?;

        copy_file(&recipe.path, &context.join(RECIPE_FILENAME))?;
        for support in &recipe.support_files {
            let Some(name) = support.file_name() else {
                return Err(StageError::SupportFileNotFound(support.clone()));
            };
            copy_file(support, &context.join(name))?;
        }

        debug!(
            project = %project.display(),
            context = %context.display(),
            "Staged build context"
        );

        Ok(Self {
            root: Some(root),
            context,
        })
    }

    /// Directory to pass to the engine's build step.
    pub fn path(&self) -> &Path {
        &self.context
    }

    /// Temporary directory holding the context; gone after [`BuildContext::close`].
    pub fn staging_root(&self) -> Option<&Path> {
        self.root.as_ref().map(TempDir::path)
    }

    /// Remove the staging directory, reporting failures instead of ignoring them.
    pub fn close(mut self) -> io::Result<()> {
        match self.root.take() {
            Some(root) => root.close(),
            None => Ok(()),
        }
    }
}

impl Drop for BuildContext {
    fn drop(&mut self) {
        if let Some(root) = self.root.take() {
            let path = root.path().to_path_buf();
            if let Err(e) = root.close() {
                warn!("Failed to remove staging directory {}: {}", path.display(), e);
            }
        }
    }
}

fn copy_tree(src: &Path, dst: &Path) -> Result<(), StageError> {
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| walk_error(src, e))?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|source| StageError::Copy {
                path: target.clone(),
                source,
            })?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn copy_file(src: &Path, dst: &Path) -> Result<(), StageError> {
    fs::copy(src, dst).map(|_| ()).map_err(|source| StageError::Copy {
        path: src.to_path_buf(),
        source,
    })
}

fn walk_error(root: &Path, err: walkdir::Error) -> StageError {
    let path = err.path().unwrap_or(root).to_path_buf();
    match err.into_io_error() {
        Some(source) => StageError::Copy { path, source },
        None => StageError::Walk {
            path,
            message: "symlink loop".to_string(),
        },
    }
}
