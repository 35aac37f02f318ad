/*
 * Responsibility
 * - LFS endpoints, reached only after every guard on the route has passed
 * - pull Actor / RepoCtx / Oid from the guards and forward to ObjectService
 */
use axum::{
    body::{Body, Bytes},
    extract::State,
    response::Response,
};

use crate::{
    context::{Actor, RepoCtx},
    error::LfsError,
    oid::Oid,
    state::AppState,
};

pub async fn serve_batch(
    State(state): State<AppState>,
    actor: Actor,
    target: RepoCtx,
    body: Bytes,
) -> Result<Response, LfsError> {
    state.objects.batch(&actor, &target, body).await
}

pub async fn serve_basic_download(
    State(state): State<AppState>,
    actor: Actor,
    target: RepoCtx,
    oid: Oid,
) -> Result<Response, LfsError> {
    state.objects.download(&actor, &target, &oid).await
}

pub async fn serve_basic_upload(
    State(state): State<AppState>,
    actor: Actor,
    target: RepoCtx,
    oid: Oid,
    body: Body,
) -> Result<Response, LfsError> {
    state.objects.upload(&actor, &target, &oid, body).await
}

pub async fn serve_basic_verify(
    State(state): State<AppState>,
    actor: Actor,
    target: RepoCtx,
    body: Bytes,
) -> Result<Response, LfsError> {
    state.objects.verify(&actor, &target, body).await
}
