use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_vault_catalog::Visibility;
use retro_vault_db::CatalogStore;
use retro_vault_import::{LogProgress, MergeOutcome, MergeProgress, MergeStats, SilentProgress};

use super::{Output, open_store, truncate_str};
use crate::CliError;
use crate::settings::Settings;

/// Entry point for `init`: ensure the schema, then merge the secondary store.
pub(crate) fn run_init(settings: &Settings, out: Output) -> Result<(), CliError> {
    let store = open_store(settings)?;
    log::info!("Catalog ready at {}", store.path().display());

    let outcome = merge_into(&store, &settings.secondary_database, out)?;
    match &outcome {
        MergeOutcome::NoSecondary => log::info!(
            "No secondary store at {}, nothing to merge",
            settings.secondary_database.display()
        ),
        MergeOutcome::Merged(stats) => report_merge(stats, out)?,
    }
    Ok(())
}

/// Entry point for `merge <path>`.
pub(crate) fn run_merge(settings: &Settings, path: &Path, out: Output) -> Result<(), CliError> {
    let store = open_store(settings)?;
    match merge_into(&store, path, out)? {
        MergeOutcome::NoSecondary => Err(CliError::not_found(format!(
            "no catalog store at {}",
            path.display()
        ))),
        MergeOutcome::Merged(stats) => report_merge(&stats, out),
    }
}

fn merge_into(store: &CatalogStore, path: &Path, out: Output) -> Result<MergeOutcome, CliError> {
    let progress: &dyn MergeProgress = if out.json {
        &SilentProgress
    } else {
        &LogProgress
    };
    store.with_connection(|conn| {
        retro_vault_import::merge_secondary(conn, path, progress)
            .map_err(|e| CliError::merge(e.to_string()))
    })
}

fn report_merge(stats: &MergeStats, out: Output) -> Result<(), CliError> {
    let tables: Vec<serde_json::Value> = stats
        .tables
        .iter()
        .map(|t| {
            serde_json::json!({
                "table": t.table,
                "columns": t.columns,
                "inserted": t.inserted,
                "skipped": t.skipped,
                "failed": t.failed,
                "skipped_missing": t.skipped_missing,
            })
        })
        .collect();
    out.json(&tables)?;
    if stats.failed() > 0 {
        log::warn!(
            "{} row(s) could not be merged; see warnings above",
            stats.failed()
        );
    }
    Ok(())
}

/// Entry point for `stats`.
pub(crate) fn run_stats(settings: &Settings, out: Output) -> Result<(), CliError> {
    let store = open_store(settings)?;
    let stats = store
        .with_connection(|conn| {
            retro_vault_db::catalog_stats(conn)
                .map_err(|e| CliError::database(format!("Failed to query catalog stats: {}", e)))
        })?;
    if out.json(&stats)? {
        return Ok(());
    }

    log::info!(
        "{}",
        "Catalog Statistics".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Database: {}", store.path().display());
    let cloud_root = store.registrar().cloud_root();
    if !cloud_root.is_empty() {
        log::info!("  Cloud root: {}", cloud_root);
    }
    crate::log_blank();
    log::info!("  Companies:      {:>8}", stats.companies);
    log::info!("  Consoles:       {:>8}", stats.consoles);
    log::info!("  Games:          {:>8}", stats.games);
    log::info!("  Links:          {:>8}", stats.links);
    log::info!("  Archived:       {:>8}", stats.published_links);
    Ok(())
}

/// Entry point for `companies`.
pub(crate) fn run_companies(
    settings: &Settings,
    visibility: Visibility,
    out: Output,
) -> Result<(), CliError> {
    let store = open_store(settings)?;
    let companies = store.with_connection(|conn| {
        retro_vault_db::list_companies(conn, visibility)
            .map_err(|e| CliError::database(format!("Failed to list companies: {}", e)))
    })?;
    if out.json(&companies)? {
        return Ok(());
    }

    log::info!(
        "{}",
        heading("Companies", visibility).if_supports_color(Stdout, |t| t.bold())
    );
    if companies.is_empty() {
        log::info!("  (none)");
    }
    for company in &companies {
        log::info!("  {:>6}  {}", company.id, company.name);
    }
    Ok(())
}

/// Entry point for `consoles`.
pub(crate) fn run_consoles(
    settings: &Settings,
    company: Option<i64>,
    visibility: Visibility,
    out: Output,
) -> Result<(), CliError> {
    let store = open_store(settings)?;

    let Some(company_id) = company else {
        let consoles = store.with_connection(|conn| {
            retro_vault_db::list_consoles(conn, visibility)
                .map_err(|e| CliError::database(format!("Failed to list consoles: {}", e)))
        })?;
        if out.json(&consoles)? {
            return Ok(());
        }

        let mut current_company: Option<&str> = None;
        for console in &consoles {
            if current_company != Some(console.company_name.as_str()) {
                if current_company.is_some() {
                    crate::log_blank();
                }
                current_company = Some(console.company_name.as_str());
                log::info!(
                    "{}:",
                    console.company_name.if_supports_color(Stdout, |t| t.bold())
                );
            }
            log::info!("  {:>6}  {}", console.id, console.name);
        }
        if consoles.is_empty() {
            log::info!("No consoles.");
        }
        return Ok(());
    };

    let consoles = store.with_connection(|conn| {
        retro_vault_db::consoles_for_company(conn, company_id, visibility)
            .map_err(|e| CliError::database(format!("Failed to list consoles: {}", e)))
    })?;
    if out.json(&consoles)? {
        return Ok(());
    }

    log::info!(
        "{}",
        heading(&format!("Consoles for company {}", company_id), visibility)
            .if_supports_color(Stdout, |t| t.bold())
    );
    if consoles.is_empty() {
        log::info!("  (none)");
    }
    for console in &consoles {
        log::info!("  {:>6}  {}", console.id, console.name);
    }
    Ok(())
}

/// Entry point for `games <console>`.
pub(crate) fn run_games(
    settings: &Settings,
    console_id: i64,
    visibility: Visibility,
    out: Output,
) -> Result<(), CliError> {
    let store = open_store(settings)?;
    let games = store.with_connection(|conn| {
        retro_vault_db::games_for_console(conn, console_id, visibility)
            .map_err(|e| CliError::database(format!("Failed to list games: {}", e)))
    })?;
    if out.json(&games)? {
        return Ok(());
    }

    log::info!(
        "{}",
        heading(&format!("Games on console {}", console_id), visibility)
            .if_supports_color(Stdout, |t| t.bold())
    );
    if games.is_empty() {
        log::info!("  (none)");
    }
    for game in &games {
        let date = game.release_date.as_deref().unwrap_or("-");
        match &game.cloud_path {
            Some(path) => log::info!(
                "  {:>8}  {:<40}  {:<10}  {}",
                game.id,
                truncate_str(&game.name, 40),
                date,
                path.if_supports_color(Stdout, |t| t.dimmed()),
            ),
            None => log::info!(
                "  {:>8}  {:<40}  {}",
                game.id,
                truncate_str(&game.name, 40),
                date
            ),
        }
    }
    Ok(())
}

fn heading(title: &str, visibility: Visibility) -> String {
    match visibility {
        Visibility::Published => format!("{} (archived)", title),
        Visibility::All => format!("{} (all)", title),
    }
}
