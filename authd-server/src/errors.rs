use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use identity::DirectoryError;
use serde_json::json;
use thiserror::Error;

/// Terminal failure classes for a call.
///
/// Every rejection the token service or the call interceptor produces falls
/// into one of these; the distinction between `Unauthenticated` (no valid
/// credential) and `InsufficientScope` (valid credential, missing capability)
/// is deliberate and surfaces as 401 vs 403.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed request or unparseable credential encoding.
    #[error("{0}")]
    InvalidArgument(String),

    /// No handler is registered for the requested grant type.
    #[error("unknown grant type {0:?}")]
    UnsupportedGrantType(String),

    /// Unknown principal, bad secret, or missing/expired credential.
    #[error("{0}")]
    Unauthenticated(String),

    /// A valid credential is bound but lacks a required scope.
    #[error("{0}")]
    InsufficientScope(String),

    /// Entropy failure or other internal inconsistency.
    #[error("{0}")]
    Internal(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl AuthError {
    /// OAuth-style error code carried in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::InvalidArgument(_) => "invalid_request",
            AuthError::UnsupportedGrantType(_) => "unsupported_grant_type",
            AuthError::Unauthenticated(_) => "unauthenticated",
            AuthError::InsufficientScope(_) => "insufficient_scope",
            AuthError::Internal(_) | AuthError::Directory(_) => "server_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidArgument(_) | AuthError::UnsupportedGrantType(_) => {
                StatusCode::BAD_REQUEST
            }
            AuthError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientScope(_) => StatusCode::FORBIDDEN,
            AuthError::Internal(_) | AuthError::Directory(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.code(),
            "error_description": self.to_string(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}
