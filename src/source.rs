// ABOUTME: Resolves a project source: a local directory or a git URL cloned to a temp dir.
// ABOUTME: A clone lives as long as its Checkout and is removed on close or drop.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Error, Result};

const REMOTE_PREFIXES: &[&str] = &["http://", "https://", "git@", "ssh://"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(PathBuf),
    Remote(String),
}

impl Source {
    pub fn parse(input: &str) -> Self {
        if REMOTE_PREFIXES.iter().any(|p| input.starts_with(p)) {
            Source::Remote(input.to_string())
        } else {
            Source::Local(PathBuf::from(input))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Source::Remote(_))
    }

    /// Short human label, used to name images built from this source.
    pub fn label(&self) -> String {
        let raw = match self {
            Source::Local(path) => path
                .canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned())),
            Source::Remote(url) => url
                .trim_end_matches('/')
                .rsplit(['/', ':'])
                .next()
                .map(|name| name.trim_end_matches(".git").to_string()),
        };
        raw.filter(|s| !s.is_empty())
            .unwrap_or_else(|| "project".to_string())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Local(path) => write!(f, "{}", path.display()),
            Source::Remote(url) => write!(f, "{url}"),
        }
    }
}

/// A project directory ready for detection and staging.
#[derive(Debug)]
pub struct Checkout {
    path: PathBuf,
    clone_dir: Option<TempDir>,
}

impl Checkout {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_temporary(&self) -> bool {
        self.clone_dir.is_some()
    }

    /// Remove a cloned checkout. Local checkouts are left alone.
    pub fn close(mut self) -> io::Result<()> {
        match self.clone_dir.take() {
            Some(dir) => dir.close(),
            None => Ok(()),
        }
    }
}

pub async fn acquire(source: &Source) -> Result<Checkout> {
    match source {
        Source::Local(path) => {
            if !path.is_dir() {
                return Err(Error::SourceNotFound(path.clone()));
            }
            Ok(Checkout {
                path: path.clone(),
                clone_dir: None,
            })
        }
        Source::Remote(url) => clone(url).await,
    }
}

async fn clone(url: &str) -> Result<Checkout> {
    let dir = tempfile::Builder::new().prefix("boxrun-src-").tempdir()?;
    let target = dir.path().join("repo");
    info!(%url, "Cloning repository");

    let output = Command::new("git")
        .args(["clone", "--depth", "1", "--quiet", url])
        .arg(&target)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| Error::Clone {
            url: url.to_string(),
            message: format!("failed to run git: {e}"),
        })?;

    if !output.status.success() {
        return Err(Error::Clone {
            url: url.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    debug!(path = %target.display(), "Clone complete");
    Ok(Checkout {
        path: target,
        clone_dir: Some(dir),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_remote_prefixes() {
        assert!(Source::parse("https://github.com/acme/app.git").is_remote());
        assert!(Source::parse("git@github.com:acme/app.git").is_remote());
        assert!(Source::parse("ssh://git@host/app").is_remote());
        assert!(!Source::parse("./app").is_remote());
        assert!(!Source::parse("/srv/https-proxy").is_remote());
    }

    #[test]
    fn labels_strip_git_suffix() {
        assert_eq!(Source::parse("https://github.com/acme/app.git").label(), "app");
        assert_eq!(Source::parse("git@github.com:acme/tool").label(), "tool");
    }

    #[test]
    fn local_label_uses_directory_name() {
        let dir = tempfile::Builder::new().prefix("myproj").tempdir().unwrap();
        let label = Source::Local(dir.path().to_path_buf()).label();
        assert!(label.starts_with("myproj"));
    }

    #[tokio::test]
    async fn missing_local_source_is_an_error() {
        let err = acquire(&Source::parse("/definitely/not/here"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::SourceNotFound(_)));
    }

    #[tokio::test]
    async fn local_checkout_is_not_removed() {
        let dir = TempDir::new().unwrap();
        let checkout = acquire(&Source::Local(dir.path().to_path_buf()))
            .await
            .unwrap();
        assert!(!checkout.is_temporary());
        checkout.close().unwrap();
        assert!(dir.path().exists());
    }
}
