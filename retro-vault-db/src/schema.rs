//! SQLite schema creation and migration.
//!
//! Migration is additive only. Columns that later versions added are
//! appended in place; a column that would have to be dropped is reported as
//! drift and left for an operator to resolve.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use thiserror::Error;

use crate::accounts;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Cannot open catalog database at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error(
        "Table {table} still has legacy column '{column}'; it must be migrated manually before the catalog can be served"
    )]
    DriftUnresolvable { table: String, column: String },
    #[error("Migration error: expected version {expected}, found {found}")]
    VersionMismatch { expected: i32, found: i32 },
}

/// Current schema version. Increment when adding migrations.
pub const CURRENT_VERSION: i32 = 2;

/// Catalog tables in dependency order (referenced tables first).
pub const CATALOG_TABLES: [&str; 4] = ["EMPRESAS", "CONSOLAS", "JUEGOS", "JUEGOS_CONSOLAS"];

/// Columns on JUEGOS that predate `cloud_path` and cannot be dropped in place.
const LEGACY_GAME_COLUMNS: &[&str] = &["route"];

/// Create missing tables and bring existing ones up to date.
///
/// This is idempotent — safe to call on an existing database. A store with
/// unresolvable drift is rejected before anything is written to it.
pub fn ensure_schema(conn: &Connection) -> Result<(), SchemaError> {
    check_legacy_columns(conn)?;

    conn.execute_batch(SCHEMA_SQL)?;
    add_column_if_missing(conn, "CONSOLAS", "catalog_count", "INTEGER")?;
    add_column_if_missing(
        conn,
        "JUEGOS_CONSOLAS",
        "cloud_path",
        "TEXT NOT NULL DEFAULT ''",
    )?;
    accounts::ensure_account_tables(conn)?;

    let version = get_schema_version(conn)?;
    if version > CURRENT_VERSION {
        return Err(SchemaError::VersionMismatch {
            expected: CURRENT_VERSION,
            found: version,
        });
    }
    if version < CURRENT_VERSION {
        set_schema_version(conn, CURRENT_VERSION)?;
    }
    Ok(())
}

/// Open or create a catalog database at the given path.
pub fn open_database(path: &Path) -> Result<Connection, SchemaError> {
    let conn = Connection::open(path).map_err(|source| SchemaError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Open an in-memory database with the full schema. Useful for testing.
pub fn open_memory() -> Result<Connection, SchemaError> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Column names of `table`, in declaration order. Empty if the table is absent.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    rows.collect()
}

/// Names of the primary-key columns of `table`, in key order.
pub fn primary_key_columns(
    conn: &Connection,
    table: &str,
) -> Result<Vec<String>, rusqlite::Error> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
    let mut keyed: Vec<(i64, String)> = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(5)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .filter(|(pk, _)| *pk > 0)
        .collect();
    keyed.sort_by_key(|(pk, _)| *pk);
    Ok(keyed.into_iter().map(|(_, name)| name).collect())
}

/// Quote an SQL identifier, doubling embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn has_column(columns: &[String], column: &str) -> bool {
    columns.iter().any(|c| c.eq_ignore_ascii_case(column))
}

fn check_legacy_columns(conn: &Connection) -> Result<(), SchemaError> {
    let columns = table_columns(conn, "JUEGOS")?;
    for legacy in LEGACY_GAME_COLUMNS {
        if let Some(found) = columns.iter().find(|c| c.eq_ignore_ascii_case(legacy)) {
            return Err(SchemaError::DriftUnresolvable {
                table: "JUEGOS".to_string(),
                column: found.clone(),
            });
        }
    }
    Ok(())
}

fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<bool, SchemaError> {
    let columns = table_columns(conn, table)?;
    if has_column(&columns, column) {
        return Ok(false);
    }
    log::info!("Adding column {column} to {table}");
    conn.execute_batch(&format!(
        "ALTER TABLE {} ADD COLUMN {} {}",
        quote_ident(table),
        quote_ident(column),
        definition
    ))?;
    Ok(true)
}

/// Get the current schema version, or 0 if no version has been recorded.
fn get_schema_version(conn: &Connection) -> Result<i32, SchemaError> {
    let version: i32 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

/// Record a schema version.
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), SchemaError> {
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

// catalog_count and cloud_path are declared here for fresh stores and
// appended by `ensure_schema` on stores created before they existed.
const SCHEMA_SQL: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Companies (manufacturers, platform vendors)
CREATE TABLE IF NOT EXISTS EMPRESAS (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT UNIQUE
);

-- Consoles/platforms, ids assigned upstream
CREATE TABLE IF NOT EXISTS CONSOLAS (
    id INTEGER PRIMARY KEY,
    name TEXT,
    company_id INTEGER REFERENCES EMPRESAS(id),
    catalog_count INTEGER
);
CREATE INDEX IF NOT EXISTS idx_consolas_company ON CONSOLAS(company_id);

-- Games, ids assigned upstream
CREATE TABLE IF NOT EXISTS JUEGOS (
    id INTEGER PRIMARY KEY,
    name TEXT,
    release_date TEXT,
    description TEXT,
    publishers TEXT
);

-- Game ↔ console availability, with the archived file path
CREATE TABLE IF NOT EXISTS JUEGOS_CONSOLAS (
    game_id INTEGER REFERENCES JUEGOS(id),
    console_id INTEGER REFERENCES CONSOLAS(id),
    cloud_path TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (game_id, console_id)
);
CREATE INDEX IF NOT EXISTS idx_juegos_consolas_console ON JUEGOS_CONSOLAS(console_id);
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("name"), "\"name\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn has_column_ignores_case() {
        let cols = vec!["ID".to_string(), "Cloud_Path".to_string()];
        assert!(has_column(&cols, "cloud_path"));
        assert!(!has_column(&cols, "catalog_count"));
    }
}
