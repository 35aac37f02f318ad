//! `Authorization` header → `Actor` in request extensions.
//!
//! Failures end the request here with the LFS challenge (401) or the 2FA
//! refusal (400); see `CredentialResolver` for the resolution order.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::context::Actor;
use crate::error::LfsError;
use crate::services::auth::CredentialResolver;
use crate::stores::Stores;

/// Requires authentication on every route already added to `router`.
///
/// ```ignore
/// let lfs = Router::new().route("/{username}/{reponame}/info/lfs/objects/batch", batch);
/// let lfs = middleware::auth::authenticate::apply(lfs, &state.stores);
/// ```
pub fn apply<S>(router: Router<S>, stores: &Stores) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    let resolver = CredentialResolver::from_stores(stores);
    // route_layer: unmatched paths stay a plain 404 instead of a 401 challenge
    router.route_layer(middleware::from_fn_with_state(resolver, authenticate_middleware))
}

async fn authenticate_middleware(
    State(resolver): State<CredentialResolver>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, LfsError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let user = resolver.resolve(authorization).await?;

    // middleware -> extractor hand-off
    req.extensions_mut().insert(Actor(user));

    Ok(next.run(req).await)
}
