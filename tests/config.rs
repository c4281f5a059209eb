// ABOUTME: Integration tests for configuration parsing and discovery.
// ABOUTME: Tests YAML parsing, env var interpolation and config file lookup.

use boxrun::config::*;
use boxrun::error::Error;
use boxrun::runtime::RuntimeType;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

mod parsing {
    use super::*;

    #[test]
    fn parse_full_config() {
        let yaml = r#"
engine:
  runtime: podman
  program: /usr/local/bin/podman
recipes_dir: recipes
support_files: [python_run.sh]
build_timeout: 10m
run_timeout: 2m
max_depth: 4
build_args:
  HTTP_PROXY: http://proxy:3128
suite:
  fixtures_dir: fixtures
  results_dir: out
  success_marker: PASSED
  jobs: 4
  images: after
  cases:
    - { id: java/simple, ecosystem: java }
    - { id: go/task, ecosystem: go, recipe: Dockerfile.task, verify_detection: true }
"#;
        let config = Config::from_yaml(yaml).unwrap();

        let engine = config.engine.as_ref().unwrap();
        assert_eq!(engine.runtime, Some(RuntimeType::Podman));
        assert_eq!(engine.program, Some(PathBuf::from("/usr/local/bin/podman")));
        assert_eq!(config.support_files, ["python_run.sh"]);
        assert_eq!(config.build_timeout, Duration::from_secs(600));
        assert_eq!(config.run_timeout, Duration::from_secs(120));
        assert_eq!(config.max_depth, 4);
        assert_eq!(
            config.build_args.get("HTTP_PROXY"),
            Some(&EnvValue::Literal("http://proxy:3128".to_string()))
        );

        assert_eq!(config.suite.success_marker, "PASSED");
        assert_eq!(config.suite.jobs, 4);
        assert_eq!(config.suite.images, ImagePolicy::After);

        let cases = config.suite.cases();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[1].recipe, Some(PathBuf::from("Dockerfile.task")));
        assert!(cases[1].verify_detection);
    }

    #[test]
    fn default_cases_when_none_configured() {
        let config = Config::from_yaml("{}").unwrap();
        let cases = config.suite.cases();
        assert_eq!(cases.len(), 16);
        assert!(cases.iter().any(|c| c.id == "go/cmd-structure"));
    }

    #[test]
    fn duplicate_case_ids_are_rejected() {
        let yaml = r#"
suite:
  cases:
    - { id: go/simple, ecosystem: go }
    - { id: go/simple, ecosystem: go }
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn invalid_ecosystem_id_is_rejected() {
        let yaml = "suite:\n  cases:\n    - { id: x, ecosystem: Java }\n";
        assert!(matches!(Config::from_yaml(yaml), Err(Error::Yaml(_))));
    }

    #[test]
    fn duplicate_catalog_entries_are_rejected() {
        let yaml = r#"
ecosystems:
  - { id: go, extensions: [go], markers: [] }
  - { id: go, extensions: [go2], markers: [] }
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Config::from_yaml("run_timeout: 0s\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}

mod build_args {
    use super::*;

    fn config() -> Config {
        Config::from_yaml(
            r#"
build_args:
  PIP_INDEX_URL: { env: BOXRUN_TEST_PIP_INDEX, default: https://pypi.org/simple }
  GOPROXY: { env: BOXRUN_TEST_GOPROXY }
  NODE_ENV: production
"#,
        )
        .unwrap()
    }

    #[test]
    fn resolves_from_environment_in_key_order() {
        temp_env::with_vars(
            [
                ("BOXRUN_TEST_PIP_INDEX", Some("http://mirror/simple")),
                ("BOXRUN_TEST_GOPROXY", Some("http://goproxy")),
            ],
            || {
                let settings = config().executor_settings(None).unwrap();
                assert_eq!(
                    settings.build_args,
                    [
                        ("GOPROXY".to_string(), "http://goproxy".to_string()),
                        ("NODE_ENV".to_string(), "production".to_string()),
                        ("PIP_INDEX_URL".to_string(), "http://mirror/simple".to_string()),
                    ]
                );
            },
        );
    }

    #[test]
    fn falls_back_to_default() {
        temp_env::with_vars(
            [
                ("BOXRUN_TEST_PIP_INDEX", None),
                ("BOXRUN_TEST_GOPROXY", Some("direct")),
            ],
            || {
                let settings = config().executor_settings(None).unwrap();
                assert!(settings.build_args.contains(&(
                    "PIP_INDEX_URL".to_string(),
                    "https://pypi.org/simple".to_string()
                )));
            },
        );
    }

    #[test]
    fn missing_variable_without_default_is_an_error() {
        temp_env::with_var_unset("BOXRUN_TEST_GOPROXY", || {
            let err = config().executor_settings(None).unwrap_err();
            assert!(matches!(err, Error::MissingEnvVar(ref v) if v == "BOXRUN_TEST_GOPROXY"));
        });
    }

    #[test]
    fn marker_and_budgets_flow_into_settings() {
        let config = Config::from_yaml("build_timeout: 90s\n").unwrap();
        let settings = config
            .executor_settings(Some("SUCCESS".to_string()))
            .unwrap();
        assert_eq!(settings.build_timeout, Duration::from_secs(90));
        assert_eq!(settings.success_marker.as_deref(), Some("SUCCESS"));
    }
}

mod discovery {
    use super::*;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn finds_boxrun_yml() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "boxrun.yml", "max_depth: 3\n");
        assert_eq!(Config::discover(dir.path()).unwrap().max_depth, 3);
    }

    #[test]
    fn finds_dot_directory_config() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".boxrun/config.yml", "recipes_dir: recipes\n");

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.base_dir(), dir.path());
        assert_eq!(config.recipe_book().dir(), dir.path().join("recipes"));
    }

    #[test]
    fn yml_wins_over_yaml() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "boxrun.yml", "max_depth: 2\n");
        write(dir.path(), "boxrun.yaml", "max_depth: 5\n");
        assert_eq!(Config::discover(dir.path()).unwrap().max_depth, 2);
    }

    #[test]
    fn absent_config_is_reported_or_defaulted() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::discover(dir.path()),
            Err(Error::ConfigNotFound(_))
        ));

        let config = Config::discover_or_default(dir.path()).unwrap();
        assert_eq!(config.fixtures_dir(), dir.path().join("test_projects"));
        assert_eq!(config.results_dir(), dir.path().join("results"));
    }

    #[test]
    fn explicit_file_resolves_paths_against_its_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "ci/boxrun.yml", "suite:\n  fixtures_dir: ../fixtures\n");

        let config = Config::load(&dir.path().join("ci/boxrun.yml")).unwrap();
        assert_eq!(config.fixtures_dir(), dir.path().join("ci/../fixtures"));
    }

    #[test]
    fn malformed_yaml_surfaces_parse_error() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "boxrun.yml", "suite: [unclosed\n");
        assert!(matches!(Config::discover(dir.path()), Err(Error::Yaml(_))));
    }
}

mod init {
    use super::*;

    #[test]
    fn init_writes_parseable_template() {
        let dir = TempDir::new().unwrap();
        init_config(dir.path(), false).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.suite.images, ImagePolicy::Before);
        assert_eq!(config.recipes_dir, PathBuf::from(DEFAULT_RECIPES_DIR));
    }
}
