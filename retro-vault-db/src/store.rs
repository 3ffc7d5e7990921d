//! Connection management for a catalog store on disk.
//!
//! A [`CatalogStore`] holds no open handle. Each operation opens its own
//! short-lived connection, which is closed when it goes out of scope.

use std::path::{Path, PathBuf};
use std::time::Duration;

use retro_vault_catalog::types::RegisterResult;
use rusqlite::Connection;
use thiserror::Error;

use crate::accounts::AccountError;
use crate::operations::OperationError;
use crate::register::Registrar;
use crate::schema::{self, SchemaError};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Catalog store unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Operation(#[from] OperationError),
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// A catalog database path plus the registrar that writes cloud paths into it.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
    registrar: Registrar,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>, registrar: Registrar) -> Self {
        Self {
            path: path.into(),
            registrar,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn registrar(&self) -> &Registrar {
        &self.registrar
    }

    /// Open a connection with foreign keys enforced and a busy timeout.
    pub fn connect(&self) -> Result<Connection, StoreError> {
        let unavailable = |source| StoreError::Unavailable {
            path: self.path.clone(),
            source,
        };
        let conn = Connection::open(&self.path).map_err(unavailable)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(unavailable)?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(unavailable)?;
        Ok(conn)
    }

    /// Run `f` with a fresh connection, closing it afterwards.
    pub fn with_connection<T, E>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let conn = self.connect()?;
        f(&conn)
    }

    /// Create or upgrade the schema. Run once before serving anything.
    pub fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        schema::ensure_schema(&conn)?;
        log::debug!("Catalog schema ready at {}", self.path.display());
        Ok(())
    }

    /// Register the cloud path for a game on a console.
    pub fn register(&self, game_id: i64, console_id: i64) -> Result<RegisterResult, StoreError> {
        self.with_connection(|conn| {
            self.registrar
                .register(conn, game_id, console_id)
                .map_err(StoreError::from)
        })
    }
}
