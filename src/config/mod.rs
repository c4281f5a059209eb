// ABOUTME: Configuration types and parsing for boxrun.yml.
// ABOUTME: Handles YAML parsing, env var interpolation, and path resolution.

mod deserialize;
mod env_value;
mod image_policy;
mod init;
mod suite;

pub use env_value::{EnvValue, resolve_build_args};
pub use image_policy::ImagePolicy;
pub use init::init_config;
pub use suite::{DEFAULT_FIXTURES_DIR, DEFAULT_RESULTS_DIR, DEFAULT_SUCCESS_MARKER, SuiteConfig};

use crate::detect::{DEFAULT_MAX_DEPTH, Detector, SignatureCatalog};
use crate::error::{Error, Result};
use crate::pipeline::{DEFAULT_BUILD_TIMEOUT, DEFAULT_RUN_TIMEOUT, ExecutorSettings};
use crate::runtime::RuntimeConfig;
use crate::stage::RecipeBook;
use deserialize::deserialize_catalog;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "boxrun.yml";
pub const CONFIG_FILENAME_ALT: &str = "boxrun.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".boxrun/config.yml";

pub const DEFAULT_RECIPES_DIR: &str = "dockers";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: Option<RuntimeConfig>,

    #[serde(default = "default_recipes_dir")]
    pub recipes_dir: PathBuf,

    #[serde(default)]
    pub support_files: Vec<String>,

    #[serde(default = "default_build_timeout", with = "humantime_serde")]
    pub build_timeout: Duration,

    #[serde(default = "default_run_timeout", with = "humantime_serde")]
    pub run_timeout: Duration,

    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    #[serde(default)]
    pub build_args: BTreeMap<String, EnvValue>,

    #[serde(default, deserialize_with = "deserialize_catalog")]
    pub ecosystems: Option<SignatureCatalog>,

    #[serde(default)]
    pub suite: SuiteConfig,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: None,
            recipes_dir: default_recipes_dir(),
            support_files: Vec::new(),
            build_timeout: default_build_timeout(),
            run_timeout: default_run_timeout(),
            max_depth: default_max_depth(),
            build_args: BTreeMap::new(),
            ecosystems: None,
            suite: SuiteConfig::default(),
            base_dir: PathBuf::new(),
        }
    }
}

fn default_recipes_dir() -> PathBuf {
    PathBuf::from(DEFAULT_RECIPES_DIR)
}

fn default_build_timeout() -> Duration {
    DEFAULT_BUILD_TIMEOUT
}

fn default_run_timeout() -> Duration {
    DEFAULT_RUN_TIMEOUT
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; relative paths inside it resolve against its directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(config)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                let mut config = Self::load(path)?;
                config.base_dir = dir.to_path_buf();
                return Ok(config);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Like [`Config::discover`], but an absent file yields the defaults
    /// rooted at `dir`.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => Ok(Self::default().with_base_dir(dir)),
            other => other,
        }
    }

    pub fn with_base_dir(mut self, dir: &Path) -> Self {
        self.base_dir = dir.to_path_buf();
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn validate(&self) -> Result<()> {
        if self.build_timeout.is_zero() {
            return Err(Error::InvalidConfig("build_timeout must be positive".into()));
        }
        if self.run_timeout.is_zero() {
            return Err(Error::InvalidConfig("run_timeout must be positive".into()));
        }
        if self.suite.jobs == 0 {
            return Err(Error::InvalidConfig("suite.jobs must be at least 1".into()));
        }
        if self.suite.success_marker.is_empty() {
            return Err(Error::InvalidConfig(
                "suite.success_marker cannot be empty".into(),
            ));
        }
        if let Some(cases) = &self.suite.cases {
            let catalog = self.catalog();
            for case in cases {
                if !catalog.contains(&case.ecosystem) {
                    return Err(Error::InvalidConfig(format!(
                        "case '{}' uses unknown ecosystem '{}'",
                        case.id, case.ecosystem
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn catalog(&self) -> SignatureCatalog {
        self.ecosystems.clone().unwrap_or_default()
    }

    pub fn detector(&self) -> Detector {
        Detector::new(self.catalog()).with_max_depth(self.max_depth)
    }

    pub fn recipe_book(&self) -> RecipeBook {
        RecipeBook::new(self.resolve(&self.recipes_dir))
            .with_support_files(self.support_files.clone())
    }

    pub fn fixtures_dir(&self) -> PathBuf {
        self.resolve(&self.suite.fixtures_dir)
    }

    pub fn results_dir(&self) -> PathBuf {
        self.resolve(&self.suite.results_dir)
    }

    /// Executor settings with build arguments resolved from the environment.
    pub fn executor_settings(&self, success_marker: Option<String>) -> Result<ExecutorSettings> {
        Ok(ExecutorSettings {
            build_timeout: self.build_timeout,
            run_timeout: self.run_timeout,
            success_marker,
            build_args: resolve_build_args(&self.build_args)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_yaml("{}").unwrap();
        assert_eq!(config.recipes_dir, PathBuf::from("dockers"));
        assert_eq!(config.build_timeout, Duration::from_secs(300));
        assert_eq!(config.run_timeout, Duration::from_secs(60));
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.suite.jobs, 1);
        assert_eq!(config.suite.images, ImagePolicy::Before);
        assert_eq!(config.catalog(), SignatureCatalog::builtin());
    }

    #[test]
    fn parses_humantime_durations() {
        let config = Config::from_yaml("build_timeout: 10m\nrun_timeout: 90s\n").unwrap();
        assert_eq!(config.build_timeout, Duration::from_secs(600));
        assert_eq!(config.run_timeout, Duration::from_secs(90));
    }

    #[test]
    fn rejects_zero_jobs() {
        let err = Config::from_yaml("suite:\n  jobs: 0\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_case_with_unknown_ecosystem() {
        let yaml = "suite:\n  cases:\n    - { id: rust/simple, ecosystem: rust }\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("unknown ecosystem"));
    }

    #[test]
    fn rejects_empty_case_list() {
        assert!(Config::from_yaml("suite:\n  cases: []\n").is_err());
    }

    #[test]
    fn custom_catalog_replaces_builtin() {
        let yaml = r#"
ecosystems:
  - id: rust
    extensions: [rs]
    markers: [Cargo.toml]
suite:
  cases:
    - { id: rust/simple, ecosystem: rust }
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let catalog = config.catalog();
        assert_eq!(catalog.len(), 1);
        assert_eq!(config.suite.cases().len(), 1);
    }

    #[test]
    fn relative_paths_resolve_against_base_dir() {
        let config = Config::default().with_base_dir(Path::new("/work"));
        assert_eq!(config.recipe_book().dir(), Path::new("/work/dockers"));
        assert_eq!(config.results_dir(), PathBuf::from("/work/results"));
        assert_eq!(
            config.resolve(Path::new("/abs/fixtures")),
            PathBuf::from("/abs/fixtures")
        );
    }

    #[test]
    fn unknown_image_policy_is_rejected() {
        let err = Config::from_yaml("suite:\n  images: sometimes\n").unwrap_err();
        assert!(err.to_string().contains("unknown image policy"));
    }
}
