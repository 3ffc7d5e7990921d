//! Read queries for the catalog database.
//!
//! Every listing takes a [`Visibility`]: `Published` restricts results to
//! entities reachable through a link that has a cloud path, `All` returns
//! everything.

use retro_vault_catalog::types::*;
use rusqlite::{params, Connection};

use crate::operations::OperationError;

// ── Companies ───────────────────────────────────────────────────────────────

/// List companies, ordered by name.
pub fn list_companies(
    conn: &Connection,
    visibility: Visibility,
) -> Result<Vec<Company>, OperationError> {
    let sql = match visibility {
        Visibility::Published => {
            "SELECT DISTINCT e.id, COALESCE(e.name, '')
             FROM EMPRESAS e
             JOIN CONSOLAS c ON c.company_id = e.id
             JOIN JUEGOS_CONSOLAS jc ON jc.console_id = c.id
             WHERE jc.cloud_path != ''
             ORDER BY e.name, e.id"
        }
        Visibility::All => {
            "SELECT id, COALESCE(name, '') FROM EMPRESAS ORDER BY name, id"
        }
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(Company {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Consoles ────────────────────────────────────────────────────────────────

/// List a company's consoles, ordered by name.
pub fn consoles_for_company(
    conn: &Connection,
    company_id: i64,
    visibility: Visibility,
) -> Result<Vec<Console>, OperationError> {
    let sql = match visibility {
        Visibility::Published => {
            "SELECT DISTINCT c.id, COALESCE(c.name, ''), c.company_id, c.catalog_count
             FROM CONSOLAS c
             JOIN JUEGOS_CONSOLAS jc ON jc.console_id = c.id
             WHERE c.company_id = ?1 AND jc.cloud_path != ''
             ORDER BY c.name, c.id"
        }
        Visibility::All => {
            "SELECT id, COALESCE(name, ''), company_id, catalog_count
             FROM CONSOLAS WHERE company_id = ?1
             ORDER BY name, id"
        }
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![company_id], row_to_console)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// List every console with its company's name, ordered by company then console.
pub fn list_consoles(
    conn: &Connection,
    visibility: Visibility,
) -> Result<Vec<ConsoleWithCompany>, OperationError> {
    let sql = match visibility {
        Visibility::Published => {
            "SELECT DISTINCT c.id, COALESCE(c.name, ''), COALESCE(e.name, '')
             FROM CONSOLAS c
             JOIN EMPRESAS e ON e.id = c.company_id
             JOIN JUEGOS_CONSOLAS jc ON jc.console_id = c.id
             WHERE jc.cloud_path != ''
             ORDER BY e.name, c.name, c.id"
        }
        Visibility::All => {
            "SELECT c.id, COALESCE(c.name, ''), COALESCE(e.name, '')
             FROM CONSOLAS c
             LEFT JOIN EMPRESAS e ON e.id = c.company_id
             ORDER BY e.name, c.name, c.id"
        }
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(ConsoleWithCompany {
            id: row.get(0)?,
            name: row.get(1)?,
            company_name: row.get(2)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Games ───────────────────────────────────────────────────────────────────

/// List the games linked to a console, ordered by name.
///
/// Published rows carry their cloud path; unfiltered rows do not.
pub fn games_for_console(
    conn: &Connection,
    console_id: i64,
    visibility: Visibility,
) -> Result<Vec<GameRow>, OperationError> {
    let sql = match visibility {
        Visibility::Published => {
            "SELECT j.id, COALESCE(j.name, ''), j.release_date, jc.cloud_path
             FROM JUEGOS j
             JOIN JUEGOS_CONSOLAS jc ON jc.game_id = j.id
             WHERE jc.console_id = ?1 AND jc.cloud_path != ''
             ORDER BY j.name, j.id"
        }
        Visibility::All => {
            "SELECT j.id, COALESCE(j.name, ''), j.release_date, NULL
             FROM JUEGOS j
             JOIN JUEGOS_CONSOLAS jc ON jc.game_id = j.id
             WHERE jc.console_id = ?1
             ORDER BY j.name, j.id"
        }
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params![console_id], |row| {
        Ok(GameRow {
            id: row.get(0)?,
            name: row.get(1)?,
            release_date: row.get(2)?,
            cloud_path: row.get(3)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Statistics ──────────────────────────────────────────────────────────────

/// Get summary statistics about the catalog.
pub fn catalog_stats(conn: &Connection) -> Result<CatalogStats, OperationError> {
    let companies: i64 = conn.query_row("SELECT COUNT(*) FROM EMPRESAS", [], |r| r.get(0))?;
    let consoles: i64 = conn.query_row("SELECT COUNT(*) FROM CONSOLAS", [], |r| r.get(0))?;
    let games: i64 = conn.query_row("SELECT COUNT(*) FROM JUEGOS", [], |r| r.get(0))?;
    let links: i64 = conn.query_row("SELECT COUNT(*) FROM JUEGOS_CONSOLAS", [], |r| r.get(0))?;
    let published_links: i64 = conn.query_row(
        "SELECT COUNT(*) FROM JUEGOS_CONSOLAS WHERE cloud_path != ''",
        [],
        |r| r.get(0),
    )?;

    Ok(CatalogStats {
        companies,
        consoles,
        games,
        links,
        published_links,
    })
}

/// Summary statistics for the catalog.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CatalogStats {
    pub companies: i64,
    pub consoles: i64,
    pub games: i64,
    pub links: i64,
    pub published_links: i64,
}

// ── Row Mapping ─────────────────────────────────────────────────────────────

fn row_to_console(row: &rusqlite::Row<'_>) -> rusqlite::Result<Console> {
    Ok(Console {
        id: row.get(0)?,
        name: row.get(1)?,
        company_id: row.get(2)?,
        catalog_count: row.get(3)?,
    })
}
