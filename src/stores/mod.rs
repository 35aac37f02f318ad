/*
 * Responsibility
 * - interfaces of the external stores the gate consults (users, tokens, repos, perms)
 * - StoreError: the meaning a store passes up ("does not exist" vs backend failure)
 * - Stores: the bundle injected into AppState / guards
 */
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AccessMode, AccessModeOptions, AccessToken, Repository, User};

pub mod memory;

pub use memory::MemoryStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0} does not exist")]
    NotExist(&'static str),
    // Unknown user or wrong password; deliberately not distinguished.
    #[error("bad credentials")]
    BadCredentials,
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_not_exist(&self) -> bool {
        matches!(self, StoreError::NotExist(_))
    }
}

#[async_trait]
pub trait UsersStore: Send + Sync {
    /// Verifies a username/password pair.
    ///
    /// Returns `StoreError::BadCredentials` for an unknown user as well as for a
    /// wrong password.
    async fn authenticate(&self, username: &str, password: &str) -> StoreResult<User>;

    async fn get_by_id(&self, id: i64) -> StoreResult<User>;

    async fn get_by_username(&self, username: &str) -> StoreResult<User>;
}

#[async_trait]
pub trait AccessTokensStore: Send + Sync {
    /// Looks a token up by the hex SHA-256 of its secret.
    async fn get_by_sha256(&self, sha256: &str) -> StoreResult<AccessToken>;

    /// Records that the token was just used.
    async fn touch(&self, id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait ReposStore: Send + Sync {
    async fn get_by_name(&self, owner_id: i64, name: &str) -> StoreResult<Repository>;
}

#[async_trait]
pub trait PermsStore: Send + Sync {
    /// Whether `user_id` (0 for anonymous) holds at least `desired` on the repository.
    async fn authorize(
        &self,
        user_id: i64,
        repo_id: i64,
        desired: AccessMode,
        opts: AccessModeOptions,
    ) -> StoreResult<bool>;
}

#[derive(Clone)]
pub struct Stores {
    pub users: Arc<dyn UsersStore>,
    pub tokens: Arc<dyn AccessTokensStore>,
    pub repos: Arc<dyn ReposStore>,
    pub perms: Arc<dyn PermsStore>,
}

impl Stores {
    /// Uses one backend for every store interface.
    pub fn shared<T>(store: Arc<T>) -> Self
    where
        T: UsersStore + AccessTokensStore + ReposStore + PermsStore + 'static,
    {
        Self {
            users: store.clone(),
            tokens: store.clone(),
            repos: store.clone(),
            perms: store,
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
