//! SQLite persistence layer for the game catalog.
//!
//! Provides schema management, insert-only catalog writes, listing and
//! search queries, cloud path registration, and user accounts, backed by
//! SQLite (via rusqlite with bundled feature).

pub mod accounts;
pub mod operations;
pub mod queries;
pub mod register;
pub mod schema;
pub mod search;
pub mod store;

pub use accounts::{
    create_user, find_role, insert_role, list_roles, users_by_role, verify_login, AccountError,
    Role, Session, User,
};
pub use operations::{
    console_in_sync, count_links_for_console, ensure_company, find_company_by_name,
    find_console, find_game, find_link, insert_console, insert_game, link_game,
    register_platform, set_catalog_count, OperationError, PlatformRegistration,
};
pub use queries::{
    catalog_stats, consoles_for_company, games_for_console, list_companies, list_consoles,
    CatalogStats,
};
pub use register::{cloud_path_for, Registrar};
pub use schema::{ensure_schema, open_database, open_memory, SchemaError};
pub use search::search;
pub use store::{CatalogStore, StoreError};
