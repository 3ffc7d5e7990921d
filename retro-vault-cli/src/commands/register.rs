use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_vault_catalog::RegisterResult;

use super::{Output, open_store};
use crate::CliError;
use crate::settings::Settings;

/// Entry point for `register <game> <console>`.
pub(crate) fn run_register(
    settings: &Settings,
    game_id: i64,
    console_id: i64,
    out: Output,
) -> Result<(), CliError> {
    let store = open_store(settings)?;
    let result = store.register(game_id, console_id)?;

    match result {
        RegisterResult::Registered { ref path } => {
            if !out.json(&result)? {
                log::info!(
                    "Registered game {} on console {}: {}",
                    game_id,
                    console_id,
                    path.if_supports_color(Stdout, |t| t.green())
                );
            }
            Ok(())
        }
        RegisterResult::NotFound => {
            out.json(&result)?;
            Err(CliError::not_found(format!(
                "game {} is not linked to console {}",
                game_id, console_id
            )))
        }
    }
}
