pub(crate) mod accounts;
pub(crate) mod catalog;
pub(crate) mod classify;
pub(crate) mod ingest;
pub(crate) mod register;
pub(crate) mod search;

use serde::Serialize;

use retro_vault_db::{CatalogStore, Registrar};

use crate::CliError;
use crate::settings::Settings;

/// How command results are printed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Output {
    pub json: bool,
}

impl Output {
    /// Print `value` as pretty JSON if `--json` was given.
    ///
    /// Returns `true` if it printed, so callers can skip their text output.
    pub(crate) fn json<T: Serialize + ?Sized>(&self, value: &T) -> Result<bool, CliError> {
        if !self.json {
            return Ok(false);
        }
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(true)
    }
}

/// Open the configured store and bring its schema up to date.
pub(crate) fn open_store(settings: &Settings) -> Result<CatalogStore, CliError> {
    let store = CatalogStore::new(
        settings.database.clone(),
        Registrar::new(settings.cloud_root.clone()),
    );
    store.initialize().map_err(|e| {
        CliError::database(format!(
            "Failed to open catalog at {}: {}",
            settings.database.display(),
            e
        ))
    })?;
    Ok(store)
}

/// Truncate a string to a maximum width in characters, appending "..." if needed.
pub(crate) fn truncate_str(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}

/// Read a password from stdin when none was given on the command line.
pub(crate) fn password_or_prompt(password: Option<String>) -> Result<String, CliError> {
    if let Some(p) = password {
        return Ok(p);
    }
    use std::io::Write;
    print!("Password: ");
    std::io::stdout().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}
