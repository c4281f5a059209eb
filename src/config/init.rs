// ABOUTME: Config scaffolding for new workspaces.
// ABOUTME: Creates a commented boxrun.yml template.

use std::path::Path;

use crate::error::{Error, Result};

use super::CONFIG_FILENAME;

const TEMPLATE: &str = r#"# boxrun configuration
#
# Every key is optional; the values below are the defaults.

# engine:
#   runtime: docker          # or podman
#   program: /usr/bin/docker # explicit CLI path

recipes_dir: dockers
# support_files: [python_run.sh]

build_timeout: 5m
run_timeout: 60s
max_depth: 8

# build_args:
#   PIP_INDEX_URL: { env: PIP_INDEX_URL, default: https://pypi.org/simple }

suite:
  fixtures_dir: test_projects
  results_dir: results
  success_marker: SUCCESS
  jobs: 1
  images: before             # keep, before, after or both
  # cases:
  #   - { id: java/simple, ecosystem: java }
"#;

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, TEMPLATE)?;
    Ok(())
}
