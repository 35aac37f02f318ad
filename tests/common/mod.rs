#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{HeaderMap, Request, Response, header},
    response::{IntoResponse, Response as AxumResponse},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use lfs_gate::{
    context::{Actor, RepoCtx},
    error::LfsError,
    models::{AccessMode, AccessModeOptions, AccessToken, Repository, User},
    oid::Oid,
    services::objects::ObjectService,
    stores::{
        AccessTokensStore, MemoryStore, PermsStore, ReposStore, StoreError, StoreResult, Stores,
        UsersStore, memory::Seed,
    },
};
use tower::ServiceExt;

pub const ALICE_TOKEN: &str = "alice-token";
pub const BOB_TOKEN: &str = "bob-token";
pub const ORPHAN_TOKEN: &str = "orphan-token";
pub const GOOD_OID: &str = "ef797c8118f02dfb649607dd5d3f8c7623048c9c063d532cc95c5ed7a898a64f";
pub const LFS_JSON: &str = "application/vnd.git-lfs+json";

/// alice(1) plain account, bob(2) 2FA account, owner(3) owns "repo" (public) and
/// "private"; alice may write to "private".
pub fn seed() -> Seed {
    Seed::default()
        .with_user(1, "alice", "password")
        .with_two_factor_user(2, "bob", "password")
        .with_user(3, "owner", "owner-password")
        .with_token(10, 1, ALICE_TOKEN)
        .with_token(11, 99, ORPHAN_TOKEN)
        .with_token(12, 2, BOB_TOKEN)
        .with_repo(100, 3, "repo", false)
        .with_repo(101, 3, "private", true)
        .with_access(1, 101, AccessMode::Write)
}

pub fn memory() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::new(seed()).expect("seed"))
}

pub fn stores() -> Stores {
    Stores::shared(memory())
}

pub fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

pub fn basic_raw(value: &str) -> String {
    format!("Basic {}", STANDARD.encode(value))
}

pub fn request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub fn request_with_auth(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .expect("request")
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("response")
}

/// Response headers minus the content-length the router fills in.
pub fn headers_without_length(resp: &Response<Body>) -> HeaderMap {
    let mut headers = resp.headers().clone();
    headers.remove(header::CONTENT_LENGTH);
    headers
}

pub async fn body_string(resp: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// Every call fails with a backend error.
pub struct BrokenStore;

fn broken<T>() -> StoreResult<T> {
    Err(StoreError::Backend("connection refused".to_string()))
}

#[async_trait]
impl UsersStore for BrokenStore {
    async fn authenticate(&self, _: &str, _: &str) -> StoreResult<User> {
        broken()
    }

    async fn get_by_id(&self, _: i64) -> StoreResult<User> {
        broken()
    }

    async fn get_by_username(&self, _: &str) -> StoreResult<User> {
        broken()
    }
}

#[async_trait]
impl AccessTokensStore for BrokenStore {
    async fn get_by_sha256(&self, _: &str) -> StoreResult<AccessToken> {
        broken()
    }

    async fn touch(&self, _: i64) -> StoreResult<()> {
        broken()
    }
}

#[async_trait]
impl ReposStore for BrokenStore {
    async fn get_by_name(&self, _: i64, _: &str) -> StoreResult<Repository> {
        broken()
    }
}

#[async_trait]
impl PermsStore for BrokenStore {
    async fn authorize(
        &self,
        _: i64,
        _: i64,
        _: AccessMode,
        _: AccessModeOptions,
    ) -> StoreResult<bool> {
        broken()
    }
}

/// Object service that describes what reached it.
pub struct EchoObjects;

fn describe(op: &str, actor: &Actor, target: &RepoCtx) -> String {
    format!(
        "{op} by {} on {}/{}",
        actor.0.name, target.owner.name, target.repo.name
    )
}

#[async_trait]
impl ObjectService for EchoObjects {
    async fn batch(
        &self,
        actor: &Actor,
        target: &RepoCtx,
        body: Bytes,
    ) -> Result<AxumResponse, LfsError> {
        Ok(format!("{} ({} bytes)", describe("batch", actor, target), body.len()).into_response())
    }

    async fn download(
        &self,
        actor: &Actor,
        target: &RepoCtx,
        oid: &Oid,
    ) -> Result<AxumResponse, LfsError> {
        Ok(format!("{} {oid}", describe("download", actor, target)).into_response())
    }

    async fn upload(
        &self,
        actor: &Actor,
        target: &RepoCtx,
        oid: &Oid,
        body: Body,
    ) -> Result<AxumResponse, LfsError> {
        let bytes = axum::body::to_bytes(body, usize::MAX)
            .await
            .map_err(|_| LfsError::Internal)?;
        Ok(format!(
            "{} {oid} ({} bytes)",
            describe("upload", actor, target),
            bytes.len()
        )
        .into_response())
    }

    async fn verify(
        &self,
        actor: &Actor,
        target: &RepoCtx,
        _body: Bytes,
    ) -> Result<AxumResponse, LfsError> {
        Ok(describe("verify", actor, target).into_response())
    }
}

/// Delegates to a `MemoryStore` but fails the selected calls.
#[derive(Default)]
pub struct Faulty {
    pub fail_touch: bool,
    pub fail_get_by_id: bool,
}

pub struct FaultyStore {
    inner: Arc<MemoryStore>,
    faults: Faulty,
}

impl FaultyStore {
    pub fn new(inner: Arc<MemoryStore>, faults: Faulty) -> Arc<Self> {
        Arc::new(Self { inner, faults })
    }
}

#[async_trait]
impl UsersStore for FaultyStore {
    async fn authenticate(&self, username: &str, password: &str) -> StoreResult<User> {
        self.inner.authenticate(username, password).await
    }

    async fn get_by_id(&self, id: i64) -> StoreResult<User> {
        if self.faults.fail_get_by_id {
            return broken();
        }
        self.inner.get_by_id(id).await
    }

    async fn get_by_username(&self, username: &str) -> StoreResult<User> {
        self.inner.get_by_username(username).await
    }
}

#[async_trait]
impl AccessTokensStore for FaultyStore {
    async fn get_by_sha256(&self, sha256: &str) -> StoreResult<AccessToken> {
        self.inner.get_by_sha256(sha256).await
    }

    async fn touch(&self, id: i64) -> StoreResult<()> {
        if self.faults.fail_touch {
            return broken();
        }
        self.inner.touch(id).await
    }
}
