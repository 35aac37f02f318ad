/*
 * Responsibility
 * - request-scoped values the guards attach to request extensions
 *   - Actor: who is calling (authenticate)
 *   - RepoCtx: which owner/repository was resolved (authorize)
 *   - Oid: the validated object id (verify_oid)
 * - extractors so handlers receive these types directly
 *
 * Notes
 * - a missing value means the route was wired without the matching guard
 */
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::LfsError;
use crate::models::{Repository, User};
use crate::oid::Oid;

/// The authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(pub User);

impl Actor {
    pub fn id(&self) -> i64 {
        self.0.id
    }
}

/// Owner and repository resolved from `/{username}/{reponame}`, already authorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCtx {
    pub owner: User,
    pub repo: Repository,
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = LfsError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Actor>()
            .cloned()
            .ok_or(LfsError::CredentialsNeeded)
    }
}

impl<S> FromRequestParts<S> for RepoCtx
where
    S: Send + Sync,
{
    type Rejection = LfsError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<RepoCtx>().cloned().ok_or_else(|| {
            tracing::error!(path = %parts.uri.path(), "route is missing the authorize guard");
            LfsError::Internal
        })
    }
}

impl<S> FromRequestParts<S> for Oid
where
    S: Send + Sync,
{
    type Rejection = LfsError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Oid>().cloned().ok_or_else(|| {
            tracing::error!(path = %parts.uri.path(), "route is missing the oid guard");
            LfsError::Internal
        })
    }
}
