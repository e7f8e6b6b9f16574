//! Interactive prompts with CI/non-interactive fallback

use super::context::UiContext;
use crate::error::{PylayerError, PylayerResult};

/// Prompt for confirmation.
///
/// Returns true under `--yes`, and `default` when not attached to a terminal.
pub async fn confirm(ctx: &UiContext, message: &str, default: bool) -> PylayerResult<bool> {
    if ctx.auto_yes() {
        return Ok(true);
    }

    if !ctx.is_interactive() {
        return Ok(default);
    }

    // cliclack blocks on the terminal
    let message = message.to_string();
    let result = tokio::task::spawn_blocking(move || {
        cliclack::confirm(&message).initial_value(default).interact()
    })
    .await
    .map_err(|e| PylayerError::User(format!("Prompt task failed: {}", e)))?;

    result.map_err(|e| PylayerError::User(format!("Prompt failed: {}", e)))
}
