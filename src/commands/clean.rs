// ABOUTME: Clean command implementation.
// ABOUTME: Removes every image boxrun built, identified by its managed label.

use super::engine::connect_engine;
use boxrun::config::Config;
use boxrun::error::Result;
use boxrun::output::Output;
use boxrun::runtime::RuntimeError;

pub async fn clean(config: Config, mut output: Output) -> Result<()> {
    output.start_timer();
    let engine = connect_engine(&config, &output)?;

    output.progress("  → Removing managed images...");
    let removed = engine
        .remove_managed_images()
        .await
        .map_err(RuntimeError::from)?;

    output.success(&format!("Removed {removed} image(s)"));
    Ok(())
}
