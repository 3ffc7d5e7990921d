//! Catalog settings: database locations and the cloud path root.
//!
//! Each value is resolved through a priority chain:
//!
//! 1. CLI flag
//! 2. Environment variable (`RETRO_VAULT_DB`, `RETRO_VAULT_SECONDARY_DB`,
//!    `RETRO_VAULT_CLOUD_ROOT`)
//! 3. `[catalog]` table in `~/.config/retro-vault/settings.toml`
//! 4. Built-in default

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::CliError;

pub(crate) const ENV_DB: &str = "RETRO_VAULT_DB";
pub(crate) const ENV_SECONDARY_DB: &str = "RETRO_VAULT_SECONDARY_DB";
pub(crate) const ENV_CLOUD_ROOT: &str = "RETRO_VAULT_CLOUD_ROOT";

const DEFAULT_DB: &str = "catalog.db";
const DEFAULT_SECONDARY_DB: &str = "catalog-secondary.db";

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Settings {
    pub database: PathBuf,
    pub secondary_database: PathBuf,
    pub cloud_root: String,
}

/// Values given on the command line.
#[derive(Debug, Default)]
pub(crate) struct Overrides {
    pub database: Option<PathBuf>,
    pub cloud_root: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    catalog: CatalogSection,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogSection {
    database: Option<PathBuf>,
    secondary_database: Option<PathBuf>,
    cloud_root: Option<String>,
}

/// Canonical path to the settings file: `~/.config/retro-vault/settings.toml`.
pub(crate) fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("retro-vault").join("settings.toml")
}

/// Resolve settings from the command line, environment, and settings file.
pub(crate) fn resolve(overrides: Overrides) -> Result<Settings, CliError> {
    let file = load_catalog_section(&settings_path())?;
    Ok(resolve_with(overrides, |key| std::env::var(key).ok(), file))
}

fn load_catalog_section(path: &Path) -> Result<CatalogSection, CliError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Default::default()),
        Err(e) => return Err(e.into()),
    };
    let file: SettingsFile = toml::from_str(&contents)
        .map_err(|e| CliError::config(format!("Invalid {}: {}", path.display(), e)))?;
    log::debug!("Loaded settings from {}", path.display());
    Ok(file.catalog)
}

fn resolve_with(
    overrides: Overrides,
    env: impl Fn(&str) -> Option<String>,
    file: CatalogSection,
) -> Settings {
    let env_nonempty = |key: &str| env(key).filter(|v| !v.is_empty());

    let database = overrides
        .database
        .or_else(|| env_nonempty(ENV_DB).map(PathBuf::from))
        .or(file.database)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB));

    let secondary_database = env_nonempty(ENV_SECONDARY_DB)
        .map(PathBuf::from)
        .or(file.secondary_database)
        .unwrap_or_else(|| database.with_file_name(DEFAULT_SECONDARY_DB));

    // An empty root is meaningful here, so an empty variable still counts.
    let cloud_root = overrides
        .cloud_root
        .or_else(|| env(ENV_CLOUD_ROOT))
        .or(file.cloud_root)
        .unwrap_or_default();

    Settings {
        database,
        secondary_database,
        cloud_root,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let s = resolve_with(Overrides::default(), env_from(&[]), CatalogSection::default());
        assert_eq!(s.database, PathBuf::from("catalog.db"));
        assert_eq!(s.secondary_database, PathBuf::from("catalog-secondary.db"));
        assert_eq!(s.cloud_root, "");
    }

    #[test]
    fn secondary_defaults_beside_primary() {
        let overrides = Overrides {
            database: Some(PathBuf::from("/data/vault/main.db")),
            cloud_root: None,
        };
        let s = resolve_with(overrides, env_from(&[]), CatalogSection::default());
        assert_eq!(
            s.secondary_database,
            PathBuf::from("/data/vault/catalog-secondary.db")
        );
    }

    #[test]
    fn flag_beats_env_beats_file() {
        let file = CatalogSection {
            database: Some(PathBuf::from("file.db")),
            secondary_database: Some(PathBuf::from("file-secondary.db")),
            cloud_root: Some("/file".to_string()),
        };
        let env = env_from(&[(ENV_DB, "env.db"), (ENV_CLOUD_ROOT, "/env")]);
        let overrides = Overrides {
            database: Some(PathBuf::from("flag.db")),
            cloud_root: None,
        };
        let s = resolve_with(overrides, env, file);
        assert_eq!(s.database, PathBuf::from("flag.db"));
        assert_eq!(s.cloud_root, "/env");
        assert_eq!(s.secondary_database, PathBuf::from("file-secondary.db"));
    }

    #[test]
    fn file_used_when_nothing_else_set() {
        let file = CatalogSection {
            database: Some(PathBuf::from("file.db")),
            secondary_database: None,
            cloud_root: Some("/cloud".to_string()),
        };
        let s = resolve_with(Overrides::default(), env_from(&[]), file);
        assert_eq!(s.database, PathBuf::from("file.db"));
        assert_eq!(s.cloud_root, "/cloud");
    }

    #[test]
    fn empty_env_root_is_respected() {
        let file = CatalogSection {
            cloud_root: Some("/cloud".to_string()),
            ..Default::default()
        };
        let s = resolve_with(
            Overrides::default(),
            env_from(&[(ENV_CLOUD_ROOT, ""), (ENV_DB, "")]),
            file,
        );
        assert_eq!(s.cloud_root, "");
        assert_eq!(s.database, PathBuf::from("catalog.db"));
    }

    #[test]
    fn settings_file_parsing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        assert!(load_catalog_section(&path).unwrap().database.is_none());

        std::fs::write(
            &path,
            "[catalog]\ndatabase = \"/srv/catalog.db\"\ncloud_root = \"/cloud\"\n\n[other]\nx = 1\n",
        )
        .unwrap();
        let section = load_catalog_section(&path).unwrap();
        assert_eq!(section.database, Some(PathBuf::from("/srv/catalog.db")));
        assert_eq!(section.cloud_root.as_deref(), Some("/cloud"));

        std::fs::write(&path, "[catalog\n").unwrap();
        assert!(matches!(
            load_catalog_section(&path),
            Err(CliError::Config(_))
        ));
    }
}
