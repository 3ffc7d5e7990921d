use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_vault_catalog::{SearchScope, Visibility};

use super::{Output, open_store, truncate_str};
use crate::CliError;
use crate::settings::Settings;

/// Entry point for `search <term>`.
pub(crate) fn run_search(
    settings: &Settings,
    term: &str,
    scope: SearchScope,
    visibility: Visibility,
    out: Output,
) -> Result<(), CliError> {
    let store = open_store(settings)?;
    let results = store.with_connection(|conn| {
        retro_vault_db::search(conn, term, scope, visibility.is_published_only())
            .map_err(|e| CliError::database(format!("Search failed: {}", e)))
    })?;
    if out.json(&results)? {
        return Ok(());
    }

    if results.is_empty() {
        log::info!("No matches for '{}'.", term);
        return Ok(());
    }

    if scope.includes_companies() && !results.companies.is_empty() {
        log::info!("{}", "Companies".if_supports_color(Stdout, |t| t.bold()));
        for company in &results.companies {
            log::info!("  {:>6}  {}", company.id, company.name);
        }
    }
    if scope.includes_consoles() && !results.consoles.is_empty() {
        log::info!("{}", "Consoles".if_supports_color(Stdout, |t| t.bold()));
        for console in &results.consoles {
            match console.company_id {
                Some(company_id) => log::info!(
                    "  {:>6}  {:<30}  (company {})",
                    console.id,
                    console.name,
                    company_id
                ),
                None => log::info!("  {:>6}  {}", console.id, console.name),
            }
        }
    }
    if scope.includes_games() && !results.games.is_empty() {
        log::info!("{}", "Games".if_supports_color(Stdout, |t| t.bold()));
        for game in &results.games {
            log::info!(
                "  {:>8}  {:<40}  console {:<6}  {}",
                game.id,
                truncate_str(&game.title, 40),
                game.console_id,
                game.release_date.as_deref().unwrap_or("-"),
            );
        }
    }
    Ok(())
}
