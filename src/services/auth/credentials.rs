//! `Authorization` header parsing.
//!
//! Values produced here live for one request only and must never be logged.

use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// `Basic base64(username[:password])`. A value without a colon yields an
    /// empty password so the username can be retried as a token.
    Basic { username: String, password: String },
    Bearer(String),
}

impl Credentials {
    /// Returns `None` for a missing scheme, undecodable payload, or empty username/token.
    pub fn parse(header: &str) -> Option<Self> {
        let (scheme, value) = header.trim().split_once(' ')?;
        let value = value.trim();

        if scheme.eq_ignore_ascii_case("basic") {
            let decoded = STANDARD.decode(value).ok()?;
            let decoded = String::from_utf8(decoded).ok()?;
            let (username, password) = match decoded.split_once(':') {
                Some((u, p)) => (u.to_string(), p.to_string()),
                None => (decoded, String::new()),
            };
            if username.is_empty() {
                return None;
            }
            Some(Credentials::Basic { username, password })
        } else if scheme.eq_ignore_ascii_case("bearer") {
            if value.is_empty() {
                return None;
            }
            Some(Credentials::Bearer(value.to_string()))
        } else {
            None
        }
    }
}

// Never print secrets, even at trace level.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Credentials::Bearer(_) => f.write_str("Bearer(..)"),
        }
    }
}

/// Hex SHA-256 of a raw token, the key access tokens are stored under.
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
