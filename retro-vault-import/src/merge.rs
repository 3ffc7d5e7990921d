//! Merge a secondary catalog store into the primary one.
//!
//! The secondary is read-only and may lag behind the primary's schema, so
//! each table is copied over the columns both sides have in common. Rows are
//! inserted with `INSERT OR IGNORE`: whatever the primary already holds for a
//! key always wins, which also makes a repeated merge a no-op.

use std::path::{Path, PathBuf};

use retro_vault_db::schema::{self, quote_ident, CATALOG_TABLES};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ErrorCode, OpenFlags};
use thiserror::Error;

use crate::progress::MergeProgress;

#[derive(Debug, Error)]
pub enum MergeError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Secondary store at {path} is not readable: {source}")]
    SecondaryUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
}

/// What happened to a single secondary row.
#[derive(Debug)]
pub enum RowOutcome {
    Inserted,
    /// The primary already had a row with this key.
    Skipped,
    /// The row violated a constraint other than the key, e.g. a dangling
    /// foreign key or a missing required reference.
    Failed(String),
}

/// Reference columns a row must carry a value for, per table.
///
/// SQLite lets a NULL foreign key through, so these are checked before insert.
const REQUIRED_REFERENCES: &[(&str, &str)] = &[("CONSOLAS", "company_id")];

/// Per-table merge counts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableMerge {
    pub table: String,
    /// Columns copied, in the secondary's order.
    pub columns: Vec<String>,
    pub inserted: u64,
    pub skipped: u64,
    pub failed: u64,
    /// The table was not merged: absent from the secondary, or sharing too
    /// few columns with the primary to preserve keys.
    pub skipped_missing: bool,
}

impl TableMerge {
    fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            ..Default::default()
        }
    }

    fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Inserted => self.inserted += 1,
            RowOutcome::Skipped => self.skipped += 1,
            RowOutcome::Failed(_) => self.failed += 1,
        }
    }
}

/// Statistics from a whole merge, one entry per catalog table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub tables: Vec<TableMerge>,
}

impl MergeStats {
    pub fn table(&self, name: &str) -> Option<&TableMerge> {
        self.tables.iter().find(|t| t.table.eq_ignore_ascii_case(name))
    }

    pub fn inserted(&self) -> u64 {
        self.tables.iter().map(|t| t.inserted).sum()
    }

    pub fn skipped(&self) -> u64 {
        self.tables.iter().map(|t| t.skipped).sum()
    }

    pub fn failed(&self) -> u64 {
        self.tables.iter().map(|t| t.failed).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No file at the secondary path; nothing was done.
    NoSecondary,
    Merged(MergeStats),
}

impl MergeOutcome {
    pub fn stats(&self) -> Option<&MergeStats> {
        match self {
            Self::NoSecondary => None,
            Self::Merged(stats) => Some(stats),
        }
    }
}

/// Merge every catalog table of the store at `secondary_path` into `primary`.
///
/// Tables are merged in dependency order inside a single transaction that is
/// committed once. Rows that fail on their own are counted and skipped; any
/// other error rolls the whole merge back.
pub fn merge_secondary(
    primary: &Connection,
    secondary_path: &Path,
    progress: &dyn MergeProgress,
) -> Result<MergeOutcome, MergeError> {
    if !secondary_path.exists() {
        log::debug!("No secondary store at {}", secondary_path.display());
        return Ok(MergeOutcome::NoSecondary);
    }

    let secondary = open_secondary(secondary_path)?;
    let tx = primary.unchecked_transaction()?;

    let mut stats = MergeStats::default();
    for table in CATALOG_TABLES {
        let merge = merge_table(&tx, &secondary, table, progress)?;
        progress.on_table_done(&merge);
        stats.tables.push(merge);
    }

    tx.commit()?;
    progress.on_complete(&stats);
    Ok(MergeOutcome::Merged(stats))
}

fn open_secondary(path: &Path) -> Result<Connection, MergeError> {
    let unavailable = |source| MergeError::SecondaryUnavailable {
        path: path.to_path_buf(),
        source,
    };
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(unavailable)?;
    // Opening is lazy; force a read so a non-database file fails here.
    conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    })
    .map_err(unavailable)?;
    Ok(conn)
}

/// Pair up columns present on both sides, matched case-insensitively.
///
/// Returns `(secondary_name, primary_name)` in the secondary's column order.
fn shared_columns(primary: &[String], secondary: &[String]) -> Vec<(String, String)> {
    secondary
        .iter()
        .filter_map(|s| {
            primary
                .iter()
                .find(|p| p.eq_ignore_ascii_case(s))
                .map(|p| (s.clone(), p.clone()))
        })
        .collect()
}

fn merge_table(
    primary: &Connection,
    secondary: &Connection,
    table: &str,
    progress: &dyn MergeProgress,
) -> Result<TableMerge, MergeError> {
    let mut merge = TableMerge::new(table);

    let secondary_columns = schema::table_columns(secondary, table)?;
    if secondary_columns.is_empty() {
        log::warn!("Secondary store has no {table} table, skipping");
        merge.skipped_missing = true;
        return Ok(merge);
    }

    let primary_columns = schema::table_columns(primary, table)?;
    let shared = shared_columns(&primary_columns, &secondary_columns);
    let keys = schema::primary_key_columns(primary, table)?;
    if let Some(missing) = keys
        .iter()
        .find(|k| !shared.iter().any(|(_, p)| p.eq_ignore_ascii_case(k)))
    {
        log::warn!("Secondary {table} lacks key column {missing}, skipping");
        merge.skipped_missing = true;
        return Ok(merge);
    }

    let select_list = shared
        .iter()
        .map(|(s, _)| quote_ident(s))
        .collect::<Vec<_>>()
        .join(", ");
    let insert_list = shared
        .iter()
        .map(|(_, p)| quote_ident(p))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = (1..=shared.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    merge.columns = shared.into_iter().map(|(s, _)| s).collect();
    let required = required_references(table, &merge.columns);

    let rows = read_rows(secondary, table, &select_list, merge.columns.len())?;
    progress.on_table(table, rows.len());
    log::debug!("{table}: copying columns [{insert_list}]");

    let mut insert = primary.prepare(&format!(
        "INSERT OR IGNORE INTO {} ({insert_list}) VALUES ({placeholders})",
        quote_ident(table)
    ))?;
    for (i, row) in rows.iter().enumerate() {
        let outcome = match missing_reference(&required, row) {
            Some(column) => RowOutcome::Failed(format!("no value for required column {column}")),
            None => insert_row(&mut insert, row)?,
        };
        if let RowOutcome::Failed(reason) = &outcome {
            log::warn!("{table}: row {} not merged: {reason}", i + 1);
        }
        merge.record(&outcome);
        progress.on_row(table, i + 1, rows.len());
    }

    Ok(merge)
}

fn read_rows(
    conn: &Connection,
    table: &str,
    select_list: &str,
    width: usize,
) -> Result<Vec<Vec<Value>>, MergeError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {select_list} FROM {}",
        quote_ident(table)
    ))?;
    let rows = stmt.query_map([], |row| {
        (0..width)
            .map(|i| row.get::<_, Value>(i))
            .collect::<rusqlite::Result<Vec<_>>>()
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Required reference columns of `table`, each with its position among the
/// copied columns (`None` if the secondary does not have it at all).
fn required_references(table: &str, columns: &[String]) -> Vec<(&'static str, Option<usize>)> {
    REQUIRED_REFERENCES
        .iter()
        .filter(|(t, _)| t.eq_ignore_ascii_case(table))
        .map(|&(_, column)| {
            let index = columns.iter().position(|c| c.eq_ignore_ascii_case(column));
            (column, index)
        })
        .collect()
}

fn missing_reference(
    required: &[(&'static str, Option<usize>)],
    row: &[Value],
) -> Option<&'static str> {
    required
        .iter()
        .find(|(_, index)| index.is_none_or(|i| matches!(row[i], Value::Null)))
        .map(|&(column, _)| column)
}

/// Insert one row. Constraint violations fail just this row; any other error
/// (a full disk, a lost lock) aborts the merge so the transaction rolls back.
fn insert_row(
    stmt: &mut rusqlite::Statement<'_>,
    row: &[Value],
) -> Result<RowOutcome, MergeError> {
    match stmt.execute(params_from_iter(row.iter())) {
        Ok(0) => Ok(RowOutcome::Skipped),
        Ok(_) => Ok(RowOutcome::Inserted),
        Err(e) if e.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) => {
            Ok(RowOutcome::Failed(e.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
