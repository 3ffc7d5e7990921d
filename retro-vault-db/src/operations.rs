//! Write operations for catalog entities.
//!
//! Every write here is insert-or-ignore: rows are created once per id and
//! never rewritten. The only mutable catalog field, a link's cloud path, is
//! owned by [`crate::register`].

use retro_vault_catalog::classifier;
use retro_vault_catalog::types::*;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },
}

impl OperationError {
    fn not_found(entity_type: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }
}

// ── Company Operations ──────────────────────────────────────────────────────

/// Make sure a company with this exact name exists. Returns its ID.
pub fn ensure_company(conn: &Connection, name: &str) -> Result<i64, OperationError> {
    conn.execute(
        "INSERT OR IGNORE INTO EMPRESAS (name) VALUES (?1)",
        params![name],
    )?;
    let id = conn.query_row(
        "SELECT id FROM EMPRESAS WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Find a company by exact (case-sensitive) name.
pub fn find_company_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<Company>, OperationError> {
    conn.query_row(
        "SELECT id, name FROM EMPRESAS WHERE name = ?1",
        params![name],
        |row| {
            Ok(Company {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

// ── Console Operations ──────────────────────────────────────────────────────

/// Result of registering an upstream platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformRegistration {
    pub console_id: i64,
    pub company_id: i64,
    pub manufacturer: &'static str,
    /// False if a console with this id already existed (and was left alone).
    pub created: bool,
}

/// Register an upstream platform: classify its manufacturer, make sure the
/// company exists, then insert the console under it.
pub fn register_platform(
    conn: &Connection,
    console_id: i64,
    name: &str,
) -> Result<PlatformRegistration, OperationError> {
    let manufacturer = classifier::classify(name);
    let company_id = ensure_company(conn, manufacturer)?;
    let created = insert_console(
        conn,
        &Console {
            id: console_id,
            name: name.to_string(),
            company_id,
            catalog_count: None,
        },
    )?;
    Ok(PlatformRegistration {
        console_id,
        company_id,
        manufacturer,
        created,
    })
}

/// Insert a console if its id is new. Returns whether a row was written.
///
/// The owning company must already exist.
pub fn insert_console(conn: &Connection, console: &Console) -> Result<bool, OperationError> {
    if !row_exists(conn, "SELECT EXISTS(SELECT 1 FROM EMPRESAS WHERE id = ?1)", console.company_id)? {
        return Err(OperationError::not_found("company", console.company_id));
    }
    let changed = conn.execute(
        "INSERT OR IGNORE INTO CONSOLAS (id, name, company_id, catalog_count)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            console.id,
            console.name,
            console.company_id,
            console.catalog_count,
        ],
    )?;
    Ok(changed > 0)
}

/// Find a console by ID.
pub fn find_console(conn: &Connection, id: i64) -> Result<Option<Console>, OperationError> {
    conn.query_row(
        "SELECT id, COALESCE(name, ''), company_id, catalog_count FROM CONSOLAS WHERE id = ?1",
        params![id],
        |row| {
            Ok(Console {
                id: row.get(0)?,
                name: row.get(1)?,
                company_id: row.get(2)?,
                catalog_count: row.get(3)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

/// Record the upstream game count for a console.
pub fn set_catalog_count(
    conn: &Connection,
    console_id: i64,
    count: Option<i64>,
) -> Result<(), OperationError> {
    let changed = conn.execute(
        "UPDATE CONSOLAS SET catalog_count = ?2 WHERE id = ?1",
        params![console_id, count],
    )?;
    if changed == 0 {
        return Err(OperationError::not_found("console", console_id));
    }
    Ok(())
}

/// Number of games linked to a console in this store.
pub fn count_links_for_console(conn: &Connection, console_id: i64) -> Result<i64, OperationError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM JUEGOS_CONSOLAS WHERE console_id = ?1",
        params![console_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Whether the local link count matches the last-known upstream count.
///
/// A console with no recorded upstream count is never considered in sync.
pub fn console_in_sync(conn: &Connection, console_id: i64) -> Result<bool, OperationError> {
    let console =
        find_console(conn, console_id)?.ok_or_else(|| OperationError::not_found("console", console_id))?;
    let Some(expected) = console.catalog_count else {
        return Ok(false);
    };
    Ok(count_links_for_console(conn, console_id)? == expected)
}

// ── Game Operations ─────────────────────────────────────────────────────────

/// Insert a game if its id is new. Existing rows are never updated.
///
/// Returns whether a row was written.
pub fn insert_game(conn: &Connection, game: &Game) -> Result<bool, OperationError> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO JUEGOS (id, name, release_date, description, publishers)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            game.id,
            game.name,
            game.release_date,
            game.description,
            game.publishers,
        ],
    )?;
    Ok(changed > 0)
}

/// Find a game by ID.
pub fn find_game(conn: &Connection, id: i64) -> Result<Option<Game>, OperationError> {
    conn.query_row(
        "SELECT id, COALESCE(name, ''), release_date, description, COALESCE(publishers, '')
         FROM JUEGOS WHERE id = ?1",
        params![id],
        |row| {
            Ok(Game {
                id: row.get(0)?,
                name: row.get(1)?,
                release_date: row.get(2)?,
                description: row.get(3)?,
                publishers: row.get(4)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

// ── Link Operations ─────────────────────────────────────────────────────────

/// Record that a game is available on a console, with no cloud path yet.
///
/// Both rows must exist. Returns whether a new link was written; an existing
/// link (and its cloud path) is left untouched.
pub fn link_game(conn: &Connection, game_id: i64, console_id: i64) -> Result<bool, OperationError> {
    if !row_exists(conn, "SELECT EXISTS(SELECT 1 FROM JUEGOS WHERE id = ?1)", game_id)? {
        return Err(OperationError::not_found("game", game_id));
    }
    if !row_exists(conn, "SELECT EXISTS(SELECT 1 FROM CONSOLAS WHERE id = ?1)", console_id)? {
        return Err(OperationError::not_found("console", console_id));
    }
    let changed = conn.execute(
        "INSERT OR IGNORE INTO JUEGOS_CONSOLAS (game_id, console_id, cloud_path)
         VALUES (?1, ?2, '')",
        params![game_id, console_id],
    )?;
    Ok(changed > 0)
}

/// Find the link for a game/console pair.
pub fn find_link(
    conn: &Connection,
    game_id: i64,
    console_id: i64,
) -> Result<Option<GameConsoleLink>, OperationError> {
    conn.query_row(
        "SELECT game_id, console_id, COALESCE(cloud_path, '')
         FROM JUEGOS_CONSOLAS WHERE game_id = ?1 AND console_id = ?2",
        params![game_id, console_id],
        |row| {
            Ok(GameConsoleLink {
                game_id: row.get(0)?,
                console_id: row.get(1)?,
                cloud_path: row.get(2)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn row_exists(conn: &Connection, sql: &str, id: i64) -> Result<bool, OperationError> {
    let exists = conn.query_row(sql, params![id], |row| row.get(0))?;
    Ok(exists)
}
