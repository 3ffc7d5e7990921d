//! Manual ingestion of upstream platforms and games.

use retro_vault_catalog::Game;

use super::{Output, open_store};
use crate::CliError;
use crate::settings::Settings;

/// Entry point for `add-platform <id> <name>`.
pub(crate) fn run_add_platform(
    settings: &Settings,
    id: i64,
    name: &str,
    catalog_count: Option<i64>,
    out: Output,
) -> Result<(), CliError> {
    let store = open_store(settings)?;
    let (registration, in_sync) = store.with_connection(|conn| {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| CliError::database(e.to_string()))?;
        let registration = retro_vault_db::register_platform(&tx, id, name)
            .map_err(|e| CliError::database(format!("Failed to add platform: {}", e)))?;
        let in_sync = match catalog_count {
            Some(_) => {
                retro_vault_db::set_catalog_count(&tx, id, catalog_count).map_err(|e| {
                    CliError::database(format!("Failed to set game count: {}", e))
                })?;
                Some(
                    retro_vault_db::console_in_sync(&tx, id)
                        .map_err(|e| CliError::database(e.to_string()))?,
                )
            }
            None => None,
        };
        tx.commit()
            .map_err(|e| CliError::database(e.to_string()))?;
        Ok::<_, CliError>((registration, in_sync))
    })?;

    if out.json(&serde_json::json!({
        "console_id": registration.console_id,
        "company_id": registration.company_id,
        "manufacturer": registration.manufacturer,
        "created": registration.created,
        "in_sync": in_sync,
    }))? {
        return Ok(());
    }

    if registration.created {
        log::info!(
            "Added console {} '{}' under {}",
            id,
            name,
            registration.manufacturer
        );
    } else {
        log::warn!("Console {} already exists; left unchanged", id);
    }
    match in_sync {
        Some(true) => log::info!("Local games match the upstream count"),
        Some(false) => log::info!("Local games do not match the upstream count yet"),
        None => {}
    }
    Ok(())
}

/// Arguments for `add-game`.
pub(crate) struct NewGame {
    pub id: i64,
    pub name: String,
    pub consoles: Vec<i64>,
    pub release_date: Option<String>,
    pub description: Option<String>,
    pub publishers: Vec<String>,
}

/// Entry point for `add-game`: insert the game and link it to each console.
pub(crate) fn run_add_game(settings: &Settings, new: NewGame, out: Output) -> Result<(), CliError> {
    let game = Game {
        id: new.id,
        name: new.name,
        release_date: new.release_date,
        description: new.description,
        publishers: new.publishers.join(", "),
    };

    let store = open_store(settings)?;
    let (created, linked) = store.with_connection(|conn| {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| CliError::database(e.to_string()))?;
        let created = retro_vault_db::insert_game(&tx, &game)
            .map_err(|e| CliError::database(format!("Failed to add game: {}", e)))?;
        let mut linked = Vec::new();
        for &console_id in &new.consoles {
            match retro_vault_db::link_game(&tx, game.id, console_id) {
                Ok(true) => linked.push(console_id),
                Ok(false) => log::debug!("Game {} already linked to {}", game.id, console_id),
                Err(retro_vault_db::OperationError::NotFound { entity_type, id }) => {
                    return Err(CliError::not_found(format!("{} {}", entity_type, id)));
                }
                Err(e) => return Err(CliError::database(format!("Failed to link game: {}", e))),
            }
        }
        tx.commit()
            .map_err(|e| CliError::database(e.to_string()))?;
        Ok((created, linked))
    })?;

    if out.json(&serde_json::json!({
        "game_id": game.id,
        "created": created,
        "linked": linked,
    }))? {
        return Ok(());
    }

    if created {
        log::info!("Added game {} '{}'", game.id, game.name);
    } else {
        log::warn!("Game {} already exists; left unchanged", game.id);
    }
    for console_id in &linked {
        log::info!("  linked to console {}", console_id);
    }
    Ok(())
}
