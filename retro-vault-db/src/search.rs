//! Case-insensitive substring search across companies, consoles, and games.
//!
//! Matching uses `instr` rather than `LIKE`, so `%` and `_` in a search term
//! are matched literally. The term is lowercased here rather than in SQL,
//! whose `lower()` only folds ASCII.

use retro_vault_catalog::types::*;
use rusqlite::{params, Connection};

use crate::operations::OperationError;

/// Search the catalog by name.
///
/// Each entity kind in `scope` is searched independently. With
/// `published_only`, only entities reachable through a link that has a cloud
/// path are returned. An empty term matches everything.
pub fn search(
    conn: &Connection,
    term: &str,
    scope: SearchScope,
    published_only: bool,
) -> Result<SearchResults, OperationError> {
    let needle = term.to_lowercase();
    let term = needle.as_str();
    let mut results = SearchResults::default();
    if scope.includes_companies() {
        results.companies = search_companies(conn, term, published_only)?;
    }
    if scope.includes_consoles() {
        results.consoles = search_consoles(conn, term, published_only)?;
    }
    if scope.includes_games() {
        results.games = search_games(conn, term, published_only)?;
    }
    log::debug!(
        "search '{term}' ({scope}): {} companies, {} consoles, {} games",
        results.companies.len(),
        results.consoles.len(),
        results.games.len()
    );
    Ok(results)
}

fn search_companies(
    conn: &Connection,
    term: &str,
    published_only: bool,
) -> Result<Vec<CompanyHit>, OperationError> {
    let sql = if published_only {
        "SELECT DISTINCT e.id, COALESCE(e.name, '')
         FROM EMPRESAS e
         JOIN CONSOLAS c ON c.company_id = e.id
         JOIN JUEGOS_CONSOLAS jc ON jc.console_id = c.id
         WHERE instr(lower(COALESCE(e.name, '')), ?1) > 0
           AND jc.cloud_path != ''
         ORDER BY e.name, e.id"
    } else {
        "SELECT id, COALESCE(name, '')
         FROM EMPRESAS
         WHERE instr(lower(COALESCE(name, '')), ?1) > 0
         ORDER BY name, id"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![term], |row| {
        Ok(CompanyHit {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn search_consoles(
    conn: &Connection,
    term: &str,
    published_only: bool,
) -> Result<Vec<ConsoleHit>, OperationError> {
    let sql = if published_only {
        "SELECT DISTINCT c.id, COALESCE(c.name, ''), c.company_id
         FROM CONSOLAS c
         JOIN JUEGOS_CONSOLAS jc ON jc.console_id = c.id
         WHERE instr(lower(COALESCE(c.name, '')), ?1) > 0
           AND jc.cloud_path != ''
         ORDER BY c.name, c.id"
    } else {
        "SELECT id, COALESCE(name, ''), company_id
         FROM CONSOLAS
         WHERE instr(lower(COALESCE(name, '')), ?1) > 0
         ORDER BY name, id"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![term], |row| {
        Ok(ConsoleHit {
            id: row.get(0)?,
            name: row.get(1)?,
            company_id: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn search_games(
    conn: &Connection,
    term: &str,
    published_only: bool,
) -> Result<Vec<GameHit>, OperationError> {
    let published_filter = if published_only {
        "AND jc.cloud_path != ''"
    } else {
        ""
    };
    let sql = format!(
        "SELECT DISTINCT j.id, COALESCE(j.name, ''), jc.console_id, j.release_date
         FROM JUEGOS j
         JOIN JUEGOS_CONSOLAS jc ON jc.game_id = j.id
         WHERE instr(lower(COALESCE(j.name, '')), ?1) > 0
           {published_filter}
         ORDER BY j.name, j.id, jc.console_id"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![term], |row| {
        Ok(GameHit {
            id: row.get(0)?,
            title: row.get(1)?,
            console_id: row.get(2)?,
            release_date: row.get(3)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}
