/*
 * Responsibility
 * - LfsError: every terminal failure a gate stage can produce
 * - IntoResponse with the Git LFS wire format (status / headers / JSON envelope)
 * - fail() / internal_server_error() helpers shared with downstream handlers
 */
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Media type of every JSON body the LFS API emits.
pub const CONTENT_TYPE: &str = "application/vnd.git-lfs+json";

pub const LFS_AUTHENTICATE: HeaderName = HeaderName::from_static("lfs-authenticate");

const BASIC_REALM: &str = r#"Basic realm="Git LFS""#;

pub const TWO_FACTOR_MESSAGE: &str =
    "Users with 2FA enabled are not allowed to authenticate via username and password.";

// Fallback if the envelope ever fails to serialize.
const INTERNAL_BODY: &[u8] = b"{\"message\":\"Internal server error\"}\n";

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

#[derive(Debug, Error)]
pub enum LfsError {
    #[error("credentials needed")]
    CredentialsNeeded,
    #[error("two-factor authentication forbids password login")]
    TwoFactorRequired,
    // Owner, repository and permission failures all collapse into this one.
    #[error("not found")]
    NotFound,
    #[error("invalid oid")]
    InvalidOid,
    #[error("{status}: {message}")]
    Fail { status: StatusCode, message: String },
    #[error("internal server error")]
    Internal,
}

impl LfsError {
    pub fn fail(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Fail {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for LfsError {
    fn into_response(self) -> Response {
        match self {
            LfsError::CredentialsNeeded => {
                let mut res = fail(StatusCode::UNAUTHORIZED, "Credentials needed");
                res.headers_mut()
                    .insert(LFS_AUTHENTICATE, HeaderValue::from_static(BASIC_REALM));
                res
            }
            // Plain body, no LFS content type and no challenge: the client must not
            // be re-prompted for a password.
            LfsError::TwoFactorRequired => {
                (StatusCode::BAD_REQUEST, Body::from(TWO_FACTOR_MESSAGE)).into_response()
            }
            LfsError::NotFound => StatusCode::NOT_FOUND.into_response(),
            LfsError::InvalidOid => fail(StatusCode::BAD_REQUEST, "Invalid oid"),
            LfsError::Fail { status, message } => fail(status, &message),
            LfsError::Internal => internal_server_error(),
        }
    }
}

/// Writes `{"message": <message>}` with the LFS content type.
pub fn fail(status: StatusCode, message: &str) -> Response {
    let body = match serde_json::to_vec(&ErrorBody { message }) {
        Ok(mut body) => {
            body.push(b'\n');
            body
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to encode lfs error body");
            return internal_server_error();
        }
    };

    lfs_json(status, body)
}

pub fn internal_server_error() -> Response {
    lfs_json(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_BODY.to_vec())
}

fn lfs_json(status: StatusCode, body: Vec<u8>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(CONTENT_TYPE))],
        Body::from(body),
    )
        .into_response()
}
