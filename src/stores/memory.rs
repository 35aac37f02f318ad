//! In-memory implementation of every store interface, loaded from a JSON seed.
//!
//! The binary uses it as its backing store and the tests use it as a fake.
//! Passwords and token secrets are only ever held as hex SHA-256 digests.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::{AccessMode, AccessModeOptions, AccessToken, Repository, User};
use crate::stores::{
    AccessTokensStore, PermsStore, ReposStore, StoreError, StoreResult, UsersStore,
};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse seed file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid seed: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub users: Vec<SeedUser>,
    pub tokens: Vec<SeedToken>,
    pub repos: Vec<SeedRepo>,
    pub access: Vec<SeedAccess>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedUser {
    pub id: i64,
    pub name: String,
    pub password_sha256: String,
    #[serde(default)]
    pub two_factor_enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedToken {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedRepo {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedAccess {
    pub user_id: i64,
    pub repo_id: i64,
    pub mode: AccessMode,
}

impl Seed {
    pub fn with_user(mut self, id: i64, name: &str, password: &str) -> Self {
        self.users.push(SeedUser {
            id,
            name: name.to_string(),
            password_sha256: sha256_hex(password),
            two_factor_enabled: false,
        });
        self
    }

    pub fn with_two_factor_user(mut self, id: i64, name: &str, password: &str) -> Self {
        self = self.with_user(id, name, password);
        if let Some(user) = self.users.last_mut() {
            user.two_factor_enabled = true;
        }
        self
    }

    pub fn with_token(mut self, id: i64, user_id: i64, secret: &str) -> Self {
        self.tokens.push(SeedToken {
            id,
            user_id,
            name: format!("token-{id}"),
            sha256: sha256_hex(secret),
        });
        self
    }

    pub fn with_repo(mut self, id: i64, owner_id: i64, name: &str, private: bool) -> Self {
        self.repos.push(SeedRepo {
            id,
            owner_id,
            name: name.to_string(),
            private,
        });
        self
    }

    pub fn with_access(mut self, user_id: i64, repo_id: i64, mode: AccessMode) -> Self {
        self.access.push(SeedAccess {
            user_id,
            repo_id,
            mode,
        });
        self
    }

    fn validate(&self) -> Result<(), SeedError> {
        let mut ids = HashSet::new();
        let mut names = HashSet::new();
        for user in &self.users {
            if user.id <= User::ANONYMOUS_ID {
                return Err(SeedError::Invalid(format!("user id {} is reserved", user.id)));
            }
            if !ids.insert(user.id) || !names.insert(user.name.to_ascii_lowercase()) {
                return Err(SeedError::Invalid(format!("duplicate user {}", user.name)));
            }
        }

        let mut token_ids = HashSet::new();
        let mut digests = HashSet::new();
        for token in &self.tokens {
            if !ids.contains(&token.user_id) {
                tracing::warn!(token_id = token.id, "seed token belongs to an unknown user");
            }
            if !token_ids.insert(token.id) || !digests.insert(token.sha256.to_ascii_lowercase()) {
                return Err(SeedError::Invalid(format!("duplicate token {}", token.id)));
            }
        }

        let mut repo_ids = HashSet::new();
        let mut repos = HashSet::new();
        for repo in &self.repos {
            if !repo_ids.insert(repo.id) {
                return Err(SeedError::Invalid(format!("duplicate repository id {}", repo.id)));
            }
            if !repos.insert((repo.owner_id, repo.name.to_ascii_lowercase())) {
                return Err(SeedError::Invalid(format!("duplicate repository {}", repo.name)));
            }
        }

        // one grant per (user, repository), so the effective mode is never ambiguous
        let mut grants = HashSet::new();
        for grant in &self.access {
            if !grants.insert((grant.user_id, grant.repo_id)) {
                return Err(SeedError::Invalid(format!(
                    "duplicate grant for user {} on repository {}",
                    grant.user_id, grant.repo_id
                )));
            }
        }

        Ok(())
    }
}

pub struct MemoryStore {
    seed: Seed,
    token_last_used: RwLock<HashMap<i64, DateTime<Utc>>>,
}

impl MemoryStore {
    pub fn new(seed: Seed) -> Result<Self, SeedError> {
        seed.validate()?;
        Ok(Self {
            seed,
            token_last_used: RwLock::new(HashMap::new()),
        })
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let raw = tokio::fs::read(path).await?;
        let seed: Seed = serde_json::from_slice(&raw)?;
        Self::new(seed)
    }

    pub async fn last_used(&self, token_id: i64) -> Option<DateTime<Utc>> {
        self.token_last_used.read().await.get(&token_id).copied()
    }

    fn find_user(&self, pred: impl Fn(&SeedUser) -> bool) -> Option<User> {
        self.seed.users.iter().find(|u| pred(u)).map(|u| User {
            id: u.id,
            name: u.name.clone(),
            two_factor_enabled: u.two_factor_enabled,
        })
    }

    fn access_mode(&self, user_id: i64, repo_id: i64, opts: AccessModeOptions) -> AccessMode {
        let mut mode = if opts.private {
            AccessMode::None
        } else {
            AccessMode::Read
        };

        if user_id <= User::ANONYMOUS_ID {
            return mode;
        }
        if user_id == opts.owner_id {
            return AccessMode::Admin;
        }

        if let Some(grant) = self
            .seed
            .access
            .iter()
            .find(|a| a.user_id == user_id && a.repo_id == repo_id)
        {
            mode = mode.max(grant.mode);
        }
        mode
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("users", &self.seed.users.len())
            .field("tokens", &self.seed.tokens.len())
            .field("repos", &self.seed.repos.len())
            .finish()
    }
}

#[async_trait]
impl UsersStore for MemoryStore {
    async fn authenticate(&self, username: &str, password: &str) -> StoreResult<User> {
        let digest = sha256_hex(password);
        self.seed
            .users
            .iter()
            .find(|u| u.name.eq_ignore_ascii_case(username))
            .filter(|u| u.password_sha256.eq_ignore_ascii_case(&digest))
            .map(|u| User {
                id: u.id,
                name: u.name.clone(),
                two_factor_enabled: u.two_factor_enabled,
            })
            .ok_or(StoreError::BadCredentials)
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<User> {
        self.find_user(|u| u.id == id)
            .ok_or(StoreError::NotExist("user"))
    }

    async fn get_by_username(&self, username: &str) -> StoreResult<User> {
        self.find_user(|u| u.name.eq_ignore_ascii_case(username))
            .ok_or(StoreError::NotExist("user"))
    }
}

#[async_trait]
impl AccessTokensStore for MemoryStore {
    async fn get_by_sha256(&self, sha256: &str) -> StoreResult<AccessToken> {
        self.seed
            .tokens
            .iter()
            .find(|t| t.sha256.eq_ignore_ascii_case(sha256))
            .map(|t| AccessToken {
                id: t.id,
                user_id: t.user_id,
                name: t.name.clone(),
                sha256: t.sha256.to_ascii_lowercase(),
            })
            .ok_or(StoreError::NotExist("access token"))
    }

    async fn touch(&self, id: i64) -> StoreResult<()> {
        if !self.seed.tokens.iter().any(|t| t.id == id) {
            return Err(StoreError::NotExist("access token"));
        }
        self.token_last_used.write().await.insert(id, Utc::now());
        Ok(())
    }
}

#[async_trait]
impl ReposStore for MemoryStore {
    async fn get_by_name(&self, owner_id: i64, name: &str) -> StoreResult<Repository> {
        self.seed
            .repos
            .iter()
            .find(|r| r.owner_id == owner_id && r.name.eq_ignore_ascii_case(name))
            .map(|r| Repository {
                id: r.id,
                owner_id: r.owner_id,
                name: r.name.clone(),
                private: r.private,
            })
            .ok_or(StoreError::NotExist("repository"))
    }
}

#[async_trait]
impl PermsStore for MemoryStore {
    async fn authorize(
        &self,
        user_id: i64,
        repo_id: i64,
        desired: AccessMode,
        opts: AccessModeOptions,
    ) -> StoreResult<bool> {
        Ok(desired <= self.access_mode(user_id, repo_id, opts))
    }
}

fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        let seed = Seed::default()
            .with_user(1, "alice", "secret")
            .with_two_factor_user(2, "bob", "hunter2")
            .with_user(3, "carol", "pw")
            .with_token(10, 1, "alice-token")
            .with_repo(100, 1, "public", false)
            .with_repo(101, 1, "private", true)
            .with_access(3, 101, AccessMode::Write);
        MemoryStore::new(seed).expect("seed")
    }

    fn opts(store: &MemoryStore, repo_id: i64) -> AccessModeOptions {
        let repo = store
            .seed
            .repos
            .iter()
            .find(|r| r.id == repo_id)
            .expect("repo");
        AccessModeOptions {
            owner_id: repo.owner_id,
            private: repo.private,
        }
    }

    #[tokio::test]
    async fn authenticate_checks_password_digest() {
        let store = store();
        let user = store.authenticate("Alice", "secret").await.expect("user");
        assert_eq!(user.id, 1);
        assert_eq!(
            store.authenticate("alice", "wrong").await,
            Err(StoreError::BadCredentials)
        );
        assert_eq!(
            store.authenticate("nobody", "secret").await,
            Err(StoreError::BadCredentials)
        );
        assert!(store.authenticate("bob", "hunter2").await.expect("bob").two_factor_enabled);
    }

    #[tokio::test]
    async fn token_lookup_and_touch() {
        let store = store();
        let token = store
            .get_by_sha256(&sha256_hex("alice-token"))
            .await
            .expect("token");
        assert_eq!(token.user_id, 1);
        assert!(store.last_used(token.id).await.is_none());

        store.touch(token.id).await.expect("touch");
        assert!(store.last_used(token.id).await.is_some());

        assert!(store.get_by_sha256(&sha256_hex("nope")).await.unwrap_err().is_not_exist());
        assert!(store.touch(99).await.unwrap_err().is_not_exist());
    }

    #[test]
    fn effective_access_levels() {
        let store = store();
        let public = opts(&store, 100);
        let private = opts(&store, 101);

        assert_eq!(store.access_mode(0, 100, public), AccessMode::Read);
        assert_eq!(store.access_mode(0, 101, private), AccessMode::None);
        assert_eq!(store.access_mode(1, 101, private), AccessMode::Admin);
        assert_eq!(store.access_mode(2, 101, private), AccessMode::None);
        assert_eq!(store.access_mode(2, 100, public), AccessMode::Read);
        assert_eq!(store.access_mode(3, 101, private), AccessMode::Write);
    }

    #[test]
    fn rejects_duplicate_users() {
        let seed = Seed::default()
            .with_user(1, "alice", "a")
            .with_user(2, "ALICE", "b");
        assert!(matches!(MemoryStore::new(seed), Err(SeedError::Invalid(_))));

        let seed = Seed::default().with_user(0, "ghost", "a");
        assert!(matches!(MemoryStore::new(seed), Err(SeedError::Invalid(_))));
    }

    #[test]
    fn parses_json_seed() {
        let raw = r#"{
            "users": [{"id": 1, "name": "alice", "password_sha256": "00"}],
            "repos": [{"id": 5, "owner_id": 1, "name": "assets", "private": true}],
            "access": [{"user_id": 1, "repo_id": 5, "mode": "write"}]
        }"#;
        let seed: Seed = serde_json::from_str(raw).expect("seed");
        assert_eq!(seed.users.len(), 1);
        assert!(seed.tokens.is_empty());
        assert_eq!(seed.access[0].mode, AccessMode::Write);
        assert!(MemoryStore::new(seed).is_ok());
    }

    #[test]
    fn duplicate_repository_ids_and_grants_are_rejected() {
        let base = || {
            Seed::default()
                .with_user(1, "alice", "secret")
                .with_repo(100, 1, "one", false)
        };

        let err = MemoryStore::new(base().with_repo(100, 1, "two", true)).err();
        assert!(matches!(err, Some(SeedError::Invalid(msg)) if msg.contains("repository id 100")));

        let err = MemoryStore::new(
            base()
                .with_access(1, 100, AccessMode::Read)
                .with_access(1, 100, AccessMode::Write),
        )
        .err();
        assert!(matches!(err, Some(SeedError::Invalid(msg)) if msg.contains("duplicate grant")));

        let err = MemoryStore::new(
            base()
                .with_token(10, 1, "first")
                .with_token(10, 1, "second"),
        )
        .err();
        assert!(matches!(err, Some(SeedError::Invalid(_))));
    }
}
