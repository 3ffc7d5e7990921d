//! Cloud path registration for game/console links.

use retro_vault_catalog::types::RegisterResult;
use rusqlite::{params, Connection, OptionalExtension};

use crate::operations::OperationError;

/// Assigns archive paths under a fixed cloud root.
#[derive(Debug, Clone, Default)]
pub struct Registrar {
    cloud_root: String,
}

impl Registrar {
    pub fn new(cloud_root: impl Into<String>) -> Self {
        Self {
            cloud_root: cloud_root.into(),
        }
    }

    pub fn cloud_root(&self) -> &str {
        &self.cloud_root
    }

    /// Record the archive path for a game on a console.
    ///
    /// The path is derived from the company, console, and game names joined
    /// through the link. Any previously registered path is replaced. Returns
    /// [`RegisterResult::NotFound`] when the pair is not linked.
    pub fn register(
        &self,
        conn: &Connection,
        game_id: i64,
        console_id: i64,
    ) -> Result<RegisterResult, OperationError> {
        let names: Option<(String, String, String)> = conn
            .query_row(
                "SELECT COALESCE(e.name, ''), COALESCE(c.name, ''), COALESCE(j.name, '')
                 FROM JUEGOS_CONSOLAS jc
                 JOIN JUEGOS j ON j.id = jc.game_id
                 JOIN CONSOLAS c ON c.id = jc.console_id
                 JOIN EMPRESAS e ON e.id = c.company_id
                 WHERE jc.game_id = ?1 AND jc.console_id = ?2",
                params![game_id, console_id],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        let Some((company, console, game)) = names else {
            log::debug!("No link for game {game_id} on console {console_id}");
            return Ok(RegisterResult::NotFound);
        };

        let path = cloud_path_for(&self.cloud_root, &company, &console, &game);
        conn.execute(
            "UPDATE JUEGOS_CONSOLAS SET cloud_path = ?3
             WHERE game_id = ?1 AND console_id = ?2",
            params![game_id, console_id, path],
        )?;
        log::debug!("Registered game {game_id} on console {console_id} at {path}");
        Ok(RegisterResult::Registered { path })
    }
}

/// Build the archive path for a game: `{root}/{company}/{console}/{game}.zip`.
///
/// Only the game name is trimmed.
pub fn cloud_path_for(root: &str, company: &str, console: &str, game: &str) -> String {
    format!("{root}/{company}/{console}/{}.zip", game.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_layout() {
        assert_eq!(
            cloud_path_for("/cloud", "Nintendo", "NES", "Zelda "),
            "/cloud/Nintendo/NES/Zelda.zip"
        );
    }

    #[test]
    fn empty_root_keeps_leading_separator() {
        assert_eq!(
            cloud_path_for("", "SEGA", "Genesis", "  Sonic"),
            "/SEGA/Genesis/Sonic.zip"
        );
    }
}
