//! Users and roles stored alongside the catalog.
//!
//! Roles are reference data seeded out of band. Passwords are stored as
//! salted argon2 PHC strings; this module never sees them in clear form
//! beyond hashing and verification.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("User '{0}' already exists")]
    UserExists(String),
    #[error("Role not found: {0}")]
    RoleNotFound(String),
    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// A role users can be assigned to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
}

/// A user, without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

/// The identity established by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: i64,
    pub name: String,
    /// Role name, lowercased.
    pub role: String,
}

/// Create the user and role tables if they don't exist.
pub fn ensure_account_tables(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS roles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );
        CREATE TABLE IF NOT EXISTS usuarios (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            role_id INTEGER NOT NULL REFERENCES roles(id)
        );
        "#,
    )
}

// ── Roles ───────────────────────────────────────────────────────────────────

/// Insert a role if it doesn't exist. Returns its ID either way.
pub fn insert_role(conn: &Connection, name: &str) -> Result<i64, AccountError> {
    conn.execute(
        "INSERT OR IGNORE INTO roles (name) VALUES (?1)",
        params![name],
    )?;
    let id = conn.query_row(
        "SELECT id FROM roles WHERE name = ?1",
        params![name],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// List all roles, ordered by name.
pub fn list_roles(conn: &Connection) -> Result<Vec<Role>, AccountError> {
    let mut stmt = conn.prepare("SELECT id, name FROM roles ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        Ok(Role {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

/// Find a role by name, ignoring case.
pub fn find_role(conn: &Connection, name: &str) -> Result<Option<Role>, AccountError> {
    conn.query_row(
        "SELECT id, name FROM roles WHERE LOWER(name) = LOWER(?1) LIMIT 1",
        params![name],
        |row| {
            Ok(Role {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        },
    )
    .optional()
    .map_err(Into::into)
}

// ── Users ───────────────────────────────────────────────────────────────────

/// Create a user with a hashed password. Returns the new user's ID.
pub fn create_user(
    conn: &Connection,
    name: &str,
    password: &str,
    role_id: i64,
) -> Result<i64, AccountError> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM usuarios WHERE name = ?1)",
        params![name],
        |row| row.get(0),
    )?;
    if exists {
        return Err(AccountError::UserExists(name.to_string()));
    }

    let role_exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM roles WHERE id = ?1)",
        params![role_id],
        |row| row.get(0),
    )?;
    if !role_exists {
        return Err(AccountError::RoleNotFound(role_id.to_string()));
    }

    let hash = hash_password(password)?;
    conn.execute(
        "INSERT INTO usuarios (name, password_hash, role_id) VALUES (?1, ?2, ?3)",
        params![name, hash, role_id],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Check a user's credentials.
///
/// Returns `None` for an unknown user or a wrong password; the two cases are
/// deliberately indistinguishable to the caller.
pub fn verify_login(
    conn: &Connection,
    name: &str,
    password: &str,
) -> Result<Option<Session>, AccountError> {
    let row: Option<(i64, String, i64)> = conn
        .query_row(
            "SELECT id, password_hash, role_id FROM usuarios WHERE name = ?1",
            params![name],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .optional()?;
    let Some((user_id, stored_hash, role_id)) = row else {
        return Ok(None);
    };

    if !verify_password(password, &stored_hash)? {
        return Ok(None);
    }

    let role: Option<String> = conn
        .query_row(
            "SELECT name FROM roles WHERE id = ?1",
            params![role_id],
            |row| row.get(0),
        )
        .optional()?;
    let role = role.ok_or_else(|| AccountError::RoleNotFound(role_id.to_string()))?;

    Ok(Some(Session {
        user_id,
        name: name.to_string(),
        role: role.to_lowercase(),
    }))
}

/// List the users holding a role (matched case-insensitively).
pub fn users_by_role(conn: &Connection, role: &str) -> Result<Vec<User>, AccountError> {
    let role = find_role(conn, role)?.ok_or_else(|| AccountError::RoleNotFound(role.to_string()))?;
    let mut stmt = conn.prepare("SELECT id, name FROM usuarios WHERE role_id = ?1 ORDER BY name")?;
    let rows = stmt.query_map(params![role.id], |row| {
        Ok(User {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

// ── Password Hashing ────────────────────────────────────────────────────────

fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::Hash(e.to_string()))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AccountError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|e| AccountError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(AccountError::Hash(_))
        ));
    }
}
