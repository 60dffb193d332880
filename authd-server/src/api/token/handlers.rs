use super::models::{TokenRequest, TokenResponse};
use crate::context::CallContext;
use crate::credentials::basic_credentials;
use crate::errors::AuthError;
use crate::openapi::TOKEN_TAG;
use crate::state::AppState;
use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::{Extension, Form, Json};
use http::HeaderMap;

/// Create a bearer token.
///
/// The request body selects the grant; the interceptor has already bound any
/// bearer credential to the call context, which grants that require an
/// authenticated caller will consult.
#[utoipa::path(
    post,
    path = "/token",
    tag = TOKEN_TAG,
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Malformed request or unknown grant type"),
        (status = 401, description = "Credential rejected"),
        (status = 403, description = "Caller lacks a scope the grant requires")
    )
)]
pub async fn create_token(
    State(state): State<AppState>,
    Extension(ctx): Extension<CallContext>,
    headers: HeaderMap,
    request: TokenRequestExtractor,
) -> Result<Json<TokenResponse>, AuthError> {
    let basic = basic_credentials(&headers)?;
    let response = state
        .token_service
        .create_token(&ctx, basic.as_ref(), &request.0)
        .await?;
    Ok(Json(response))
}

/// Accepts the token request as either a form or a JSON body, keyed off the
/// Content-Type header.
pub struct TokenRequestExtractor(pub TokenRequest);

impl<S> FromRequest<S> for TokenRequestExtractor
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        if content_type.starts_with("application/json") {
            match Json::<TokenRequest>::from_request(req, state).await {
                Ok(Json(request)) => Ok(Self(request)),
                Err(_) => Err(AuthError::InvalidArgument(
                    "invalid JSON in request body".to_string(),
                )),
            }
        } else {
            match Form::<TokenRequest>::from_request(req, state).await {
                Ok(Form(request)) => Ok(Self(request)),
                Err(_) => Err(AuthError::InvalidArgument(
                    "invalid form data in request body".to_string(),
                )),
            }
        }
    }
}
