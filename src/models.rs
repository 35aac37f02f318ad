/*
 * Responsibility
 * - domain records handed out by the stores (User, Repository, AccessToken)
 * - AccessMode: ordered permission level, compared with a single `>=`
 */
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A user account as seen by the gate.
///
/// Used both for the authenticated caller (wrapped in `Actor`) and for the
/// owner of the repository named in the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub two_factor_enabled: bool,
}

impl User {
    /// Caller id used when no identity was resolved for the request.
    pub const ANONYMOUS_ID: i64 = 0;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub private: bool,
}

/// Stored side of a personal access token. The raw secret never reaches here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub sha256: String,
}

/// Permission level on a repository.
///
/// Variant order is the privilege order: `None < Read < Write < Admin`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    #[default]
    None,
    Read,
    Write,
    Admin,
}

impl AccessMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessMode::None => "none",
            AccessMode::Read => "read",
            AccessMode::Write => "write",
            AccessMode::Admin => "admin",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown access mode: {0}")]
pub struct UnknownAccessMode(pub String);

impl FromStr for AccessMode {
    type Err = UnknownAccessMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(AccessMode::None),
            "read" => Ok(AccessMode::Read),
            "write" => Ok(AccessMode::Write),
            "admin" => Ok(AccessMode::Admin),
            _ => Err(UnknownAccessMode(s.to_string())),
        }
    }
}

/// Repository facts the permission predicate needs besides the ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccessModeOptions {
    pub owner_id: i64,
    pub private: bool,
}

impl From<&Repository> for AccessModeOptions {
    fn from(repo: &Repository) -> Self {
        Self {
            owner_id: repo.owner_id,
            private: repo.private,
        }
    }
}
