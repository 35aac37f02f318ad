//! Stateless request validators.
//!
//! - `header_contains`: a header must contain a given substring, else a fixed status with no body
//! - `oid`: the `oid` path param must be a valid object id, else 400 `Invalid oid`

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{Path, State, rejection::PathRejection},
    http::{HeaderName, Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
};

use crate::error::{CONTENT_TYPE, LfsError};
use crate::oid::Oid;

#[derive(Debug, Clone)]
struct HeaderRule {
    name: HeaderName,
    expected: &'static str,
    failure: StatusCode,
}

/// Substring match so that parameters such as `; charset=utf-8` still pass.
pub fn header_contains<S>(
    route: MethodRouter<S>,
    name: HeaderName,
    expected: &'static str,
    failure: StatusCode,
) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let rule = HeaderRule {
        name,
        expected,
        failure,
    };
    route.route_layer(middleware::from_fn_with_state(rule, verify_header_middleware))
}

pub fn accept<S>(route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    header_contains(route, header::ACCEPT, CONTENT_TYPE, StatusCode::NOT_ACCEPTABLE)
}

pub fn content_type_json<S>(route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    header_contains(route, header::CONTENT_TYPE, CONTENT_TYPE, StatusCode::BAD_REQUEST)
}

pub fn content_type_stream<S>(route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    header_contains(
        route,
        header::CONTENT_TYPE,
        "application/octet-stream",
        StatusCode::BAD_REQUEST,
    )
}

async fn verify_header_middleware(
    State(rule): State<HeaderRule>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let matched = req
        .headers()
        .get(&rule.name)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains(rule.expected));

    if !matched {
        tracing::debug!(header = %rule.name, status = %rule.failure, "lfs: header check failed");
        return rule.failure.into_response();
    }

    next.run(req).await
}

/// Validates `{oid}` and hands the parsed `Oid` to the handler.
pub fn oid<S>(route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn(verify_oid_middleware))
}

async fn verify_oid_middleware(
    params: Result<Path<HashMap<String, String>>, PathRejection>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, LfsError> {
    // an undecodable segment is just another malformed oid
    let Ok(Path(params)) = params else {
        return Err(LfsError::InvalidOid);
    };
    let oid = params
        .get("oid")
        .and_then(|raw| Oid::parse(raw).ok())
        .ok_or(LfsError::InvalidOid)?;

    req.extensions_mut().insert(oid);

    Ok(next.run(req).await)
}
