//! Hand-off point to the object storage layer.
//!
//! Everything behind this trait (batch parsing, content storage) lives outside
//! the gate. Handlers only call it once every guard on the route has passed.

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::StatusCode,
    response::Response,
};

use crate::context::{Actor, RepoCtx};
use crate::error::LfsError;
use crate::oid::Oid;

#[async_trait]
pub trait ObjectService: Send + Sync {
    async fn batch(&self, actor: &Actor, target: &RepoCtx, body: Bytes)
    -> Result<Response, LfsError>;

    async fn download(&self, actor: &Actor, target: &RepoCtx, oid: &Oid)
    -> Result<Response, LfsError>;

    async fn upload(
        &self,
        actor: &Actor,
        target: &RepoCtx,
        oid: &Oid,
        body: Body,
    ) -> Result<Response, LfsError>;

    async fn verify(&self, actor: &Actor, target: &RepoCtx, body: Bytes)
    -> Result<Response, LfsError>;
}

/// Installed when no storage backend is wired in; answers 501 on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

const NOT_CONFIGURED: &str = "Object storage is not configured";

#[async_trait]
impl ObjectService for Unconfigured {
    async fn batch(&self, _: &Actor, _: &RepoCtx, _: Bytes) -> Result<Response, LfsError> {
        Err(LfsError::fail(StatusCode::NOT_IMPLEMENTED, NOT_CONFIGURED))
    }

    async fn download(&self, _: &Actor, _: &RepoCtx, _: &Oid) -> Result<Response, LfsError> {
        Err(LfsError::fail(StatusCode::NOT_IMPLEMENTED, NOT_CONFIGURED))
    }

    async fn upload(
        &self,
        _: &Actor,
        _: &RepoCtx,
        _: &Oid,
        _: Body,
    ) -> Result<Response, LfsError> {
        Err(LfsError::fail(StatusCode::NOT_IMPLEMENTED, NOT_CONFIGURED))
    }

    async fn verify(&self, _: &Actor, _: &RepoCtx, _: Bytes) -> Result<Response, LfsError> {
        Err(LfsError::fail(StatusCode::NOT_IMPLEMENTED, NOT_CONFIGURED))
    }
}
