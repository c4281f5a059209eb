// ABOUTME: Terminal confirmation prompts for interactive commands.
// ABOUTME: Runs the blocking dialoguer prompt off the async workers.

use boxrun::error::{Error, Result};
use dialoguer::Confirm;

/// Ask a yes/no question on the terminal.
///
/// Fails when there is no terminal to ask on; callers offer `--yes` instead.
pub async fn confirm(prompt: String, default: bool) -> Result<bool> {
    let answer = tokio::task::spawn_blocking(move || {
        Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
    })
    .await
    .map_err(|_| Error::Aborted)??;
    Ok(answer)
}
