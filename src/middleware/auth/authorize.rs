//! Per-route access check against the repository named in the path.
//!
//! Reads the `username` and `reponame` path params, puts `RepoCtx` into request
//! extensions on success. Callers without an `Actor` are checked as anonymous.

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{Path, State, rejection::PathRejection},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::context::Actor;
use crate::error::LfsError;
use crate::models::{AccessMode, User};
use crate::services::auth::AccessAuthorizer;
use crate::stores::Stores;

#[derive(Clone)]
struct AuthorizeGuard {
    authorizer: AccessAuthorizer,
    required: AccessMode,
}

/// Wraps `route` so it only runs for callers holding at least `required`.
pub fn on<S>(route: MethodRouter<S>, stores: &Stores, required: AccessMode) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let guard = AuthorizeGuard {
        authorizer: AccessAuthorizer::from_stores(stores),
        required,
    };
    route.route_layer(middleware::from_fn_with_state(guard, authorize_middleware))
}

async fn authorize_middleware(
    State(guard): State<AuthorizeGuard>,
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, LfsError> {
    // a segment that does not decode can never name an owner or repository
    let Ok(Path(params)) = params else {
        return Err(LfsError::NotFound);
    };
    let (Some(username), Some(reponame)) = (params.get("username"), params.get("reponame"))
    else {
        return Err(LfsError::NotFound);
    };

    let actor_id = req
        .extensions()
        .get::<Actor>()
        .map_or(User::ANONYMOUS_ID, Actor::id);

    let target = guard
        .authorizer
        .authorize(actor_id, username, reponame, guard.required)
        .await?;

    req.extensions_mut().insert(target);

    Ok(next.run(req).await)
}
