// ABOUTME: Depth-bounded project tree walk that tallies file extensions.
// ABOUTME: Skips VCS, dependency and build-output directories; unreadable subtrees are dropped.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Directories never entered, whatever their depth.
pub const SKIPPED_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "vendor",
    "target",
    "build",
    "dist",
    "out",
    "bin",
    "obj",
    "__pycache__",
    ".venv",
    "venv",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    ".gradle",
    ".idea",
    ".vscode",
    ".next",
];

/// Default walk depth: `root/a/b.py` sits at depth 2.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// Extension occurrence counts for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionProfile {
    counts: HashMap<String, usize>,
}

impl ExtensionProfile {
    pub fn record(&mut self, extension: &str) {
        *self.counts.entry(extension.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, extension: &str) -> usize {
        self.counts.get(extension).copied().unwrap_or(0)
    }

    pub fn contains(&self, extension: &str) -> bool {
        self.counts.contains_key(extension)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Count the extensions of every regular file under `root`.
///
/// Entries deeper than `max_depth` are not visited. Symlinks are followed, as
/// staging does; link loops and other I/O errors only drop the subtree they
/// occur in.
pub fn scan(root: &Path, max_depth: usize) -> ExtensionProfile {
    let mut profile = ExtensionProfile::default();
    for entry in files(root, max_depth) {
        if let Some(ext) = extension_of(&entry) {
            profile.record(&ext);
        }
    }
    debug!(
        root = %root.display(),
        extensions = profile.len(),
        "Scanned project tree"
    );
    profile
}

/// Collect the file names present under `root`, with the same bounds as [`scan`].
pub fn file_names(root: &Path, max_depth: usize) -> HashSet<String> {
    files(root, max_depth)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
}

fn files(root: &Path, max_depth: usize) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(
                    path = ?e.path(),
                    error = %e,
                    "Skipping unreadable entry"
                );
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn extension_of(entry: &DirEntry) -> Option<String> {
    let name = entry.file_name().to_string_lossy();
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    #[test]
    fn counts_extensions_case_preserved() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "main.py");
        touch(dir.path(), "pkg/util.py");
        touch(dir.path(), "Legacy.PY");

        let profile = scan(dir.path(), DEFAULT_MAX_DEPTH);
        assert_eq!(profile.count("py"), 2);
        assert_eq!(profile.count("PY"), 1);
    }

    #[test]
    fn ignores_extensionless_and_dotfiles() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Makefile");
        touch(dir.path(), ".gitignore");
        touch(dir.path(), "trailing.");

        assert!(scan(dir.path(), DEFAULT_MAX_DEPTH).is_empty());
    }

    #[test]
    fn uses_last_dot_only() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "bundle.min.js");

        let profile = scan(dir.path(), DEFAULT_MAX_DEPTH);
        assert_eq!(profile.count("js"), 1);
        assert!(!profile.contains("min.js"));
    }

    #[test]
    fn skips_noise_directories() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "index.ts");
        touch(dir.path(), "node_modules/lib/index.js");
        touch(dir.path(), "target/debug/build.rs");
        touch(dir.path(), "sub/.git/hooks/pre-commit.sample");

        let profile = scan(dir.path(), DEFAULT_MAX_DEPTH);
        assert_eq!(profile.count("ts"), 1);
        assert!(!profile.contains("js"));
        assert!(!profile.contains("rs"));
        assert!(!profile.contains("sample"));
    }

    #[test]
    fn root_named_like_skip_dir_is_still_scanned() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("build");
        touch(&root, "main.go");

        assert_eq!(scan(&root, DEFAULT_MAX_DEPTH).count("go"), 1);
    }

    #[test]
    fn respects_max_depth() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "top.py");
        touch(dir.path(), "a/b/c/deep.go");

        let shallow = scan(dir.path(), 2);
        assert!(shallow.contains("py"));
        assert!(!shallow.contains("go"));

        let deep = scan(dir.path(), 4);
        assert!(deep.contains("go"));
    }

    #[test]
    fn file_names_collects_markers() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "pom.xml");
        touch(dir.path(), "node_modules/package.json");

        let names = file_names(dir.path(), DEFAULT_MAX_DEPTH);
        assert!(names.contains("pom.xml"));
        assert!(!names.contains("package.json"));
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinked_sources() {
        let dir = TempDir::new().unwrap();
        let shared = TempDir::new().unwrap();
        touch(shared.path(), "lib/util.go");
        touch(shared.path(), "main.go");
        std::os::unix::fs::symlink(shared.path().join("main.go"), dir.path().join("main.go"))
            .unwrap();
        std::os::unix::fs::symlink(shared.path().join("lib"), dir.path().join("lib")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

        let profile = scan(dir.path(), DEFAULT_MAX_DEPTH);
        assert_eq!(profile.count("go"), 2);
        assert!(file_names(dir.path(), DEFAULT_MAX_DEPTH).contains("util.go"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subtree_does_not_abort_scan() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        touch(dir.path(), "ok.py");
        touch(dir.path(), "locked/hidden.go");
        let locked = dir.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let profile = scan(dir.path(), DEFAULT_MAX_DEPTH);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(profile.count("py"), 1);
    }
}
