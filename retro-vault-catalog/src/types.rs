//! Data model types for the game catalog.
//!
//! These types represent the persistent catalog schema: companies, consoles,
//! games, and the game↔console links that carry the cloud archive path.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── Company ─────────────────────────────────────────────────────────────────

/// A manufacturer or platform vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
}

// ── Console ─────────────────────────────────────────────────────────────────

/// A gaming platform or operating system, owned by a company.
///
/// The id is assigned by the upstream catalog and is never regenerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Console {
    pub id: i64,
    pub name: String,
    pub company_id: i64,
    /// Last-known upstream game count. Only used for sync bookkeeping.
    #[serde(default)]
    pub catalog_count: Option<i64>,
}

/// A console listed together with its company's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleWithCompany {
    pub id: i64,
    pub name: String,
    pub company_name: String,
}

// ── Game ────────────────────────────────────────────────────────────────────

/// A title record, independent of any console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Comma-joined publisher names.
    #[serde(default)]
    pub publishers: String,
}

/// A game as listed under a console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRow {
    pub id: i64,
    pub name: String,
    pub release_date: Option<String>,
    /// Present only in published listings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_path: Option<String>,
}

// ── Link ────────────────────────────────────────────────────────────────────

/// The association between a game and a console.
///
/// An empty `cloud_path` means the game has not been archived yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConsoleLink {
    pub game_id: i64,
    pub console_id: i64,
    #[serde(default)]
    pub cloud_path: String,
}

impl GameConsoleLink {
    /// Whether the link has an archived file.
    pub fn is_published(&self) -> bool {
        !self.cloud_path.is_empty()
    }
}

// ── Listing Modes ───────────────────────────────────────────────────────────

/// Which rows a listing or search returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Only entities reachable through a link with a non-empty cloud path.
    #[default]
    Published,
    /// Everything, regardless of publication state.
    All,
}

impl Visibility {
    pub fn from_published_only(published_only: bool) -> Self {
        if published_only {
            Self::Published
        } else {
            Self::All
        }
    }

    pub fn is_published_only(&self) -> bool {
        matches!(self, Self::Published)
    }
}

// ── Search ──────────────────────────────────────────────────────────────────

/// Which entity kinds a search covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    Companies,
    Consoles,
    Games,
    #[default]
    All,
}

impl SearchScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Companies => "companies",
            Self::Consoles => "consoles",
            Self::Games => "games",
            Self::All => "all",
        }
    }

    pub fn includes_companies(&self) -> bool {
        matches!(self, Self::Companies | Self::All)
    }

    pub fn includes_consoles(&self) -> bool {
        matches!(self, Self::Consoles | Self::All)
    }

    pub fn includes_games(&self) -> bool {
        matches!(self, Self::Games | Self::All)
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a search scope string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown search scope '{0}' (expected companies, consoles, games, or all)")]
pub struct UnknownScope(pub String);

impl FromStr for SearchScope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "companies" => Ok(Self::Companies),
            "consoles" => Ok(Self::Consoles),
            "games" => Ok(Self::Games),
            "all" => Ok(Self::All),
            other => Err(UnknownScope(other.to_string())),
        }
    }
}

/// A company matching a search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyHit {
    pub id: i64,
    pub name: String,
}

/// A console matching a search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleHit {
    pub id: i64,
    pub name: String,
    /// `None` for a legacy row that never recorded its company.
    pub company_id: Option<i64>,
}

/// A game matching a search term, reported once per console it is linked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameHit {
    pub id: i64,
    pub title: String,
    pub console_id: i64,
    pub release_date: Option<String>,
}

/// Search results, one independently computed list per entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResults {
    pub companies: Vec<CompanyHit>,
    pub consoles: Vec<ConsoleHit>,
    pub games: Vec<GameHit>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.companies.is_empty() && self.consoles.is_empty() && self.games.is_empty()
    }
}

// ── Registration ────────────────────────────────────────────────────────────

/// Outcome of registering a cloud path for a game/console pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegisterResult {
    Registered { path: String },
    /// No link exists for the requested pair.
    NotFound,
}

impl RegisterResult {
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Registered { path } => Some(path),
            Self::NotFound => None,
        }
    }
}
