//! Demo user service.
//!
//! Handlers here contain no authorization logic at all: each route's
//! requirement is declared once in `method_policies` and enforced by the call
//! interceptor before the handler runs. `/ping` is deliberately undeclared to
//! exercise the implicit-public path.

use crate::context::CallContext;
use crate::errors::AuthError;
use crate::openapi::USERS_TAG;
use crate::policy::AuthorizationPolicy;
use crate::state::AppState;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use futures::stream::{self, Stream};
use identity::{Scope, ScopeSet, UserDirectory, UserRecord};
use log::info;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use utoipa::ToSchema;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/create", post(create_user))
        .route("/users/get", post(get_user))
        .route("/users/watch", get(watch_users))
        .route("/ping", post(ping))
}

pub fn method_policies() -> Vec<(&'static str, AuthorizationPolicy)> {
    vec![
        (
            "/users/create",
            AuthorizationPolicy::with_scopes([Scope::UserCreation]),
        ),
        (
            "/users/get",
            AuthorizationPolicy::with_scopes([Scope::UserProfile]),
        ),
        (
            "/users/watch",
            AuthorizationPolicy::with_scopes([Scope::UserAuthorize]),
        ),
    ]
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    /// Scope names granted to tokens issued on this user's behalf.
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateUserResponse {
    pub username: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GetUserRequest {
    pub username: String,
}

/// A user profile. The stored password hash is never echoed.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub username: String,
    pub scopes: Vec<String>,
}

fn parse_scope_names(names: &[String]) -> Result<ScopeSet, AuthError> {
    names
        .iter()
        .map(|name| name.parse::<Scope>())
        .collect::<Result<ScopeSet, _>>()
        .map_err(|err| AuthError::InvalidArgument(err.to_string()))
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/users/create",
    tag = USERS_TAG,
    request_body = CreateUserRequest,
    responses(
        (status = 200, description = "User registered", body = CreateUserResponse),
        (status = 400, description = "Empty username or unknown scope name"),
        (status = 401, description = "No valid token bound"),
        (status = 403, description = "Token lacks user_creation")
    )
)]
async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<Json<CreateUserResponse>, AuthError> {
    if request.username.is_empty() {
        return Err(AuthError::InvalidArgument(
            "username must not be empty".to_string(),
        ));
    }
    let scopes = parse_scope_names(&request.scopes)?;
    let password_hash = identity::hash_password(&request.password)
        .map_err(|err| AuthError::Internal(err.to_string()))?;

    state.users.register(
        &request.username,
        UserRecord {
            password_hash,
            scopes,
        },
    );
    info!("registered user {:?}", request.username);
    Ok(Json(CreateUserResponse {
        username: request.username,
    }))
}

/// Fetch a user profile.
#[utoipa::path(
    post,
    path = "/users/get",
    tag = USERS_TAG,
    request_body = GetUserRequest,
    responses(
        (status = 200, description = "User profile", body = UserProfile),
        (status = 400, description = "Unknown username"),
        (status = 401, description = "No valid token bound"),
        (status = 403, description = "Token lacks user_profile")
    )
)]
async fn get_user(
    State(state): State<AppState>,
    Json(request): Json<GetUserRequest>,
) -> Result<Json<UserProfile>, AuthError> {
    let record = state
        .users
        .get_user_info(&request.username)
        .await?
        .ok_or_else(|| {
            AuthError::InvalidArgument(format!("unknown user {:?}", request.username))
        })?;

    Ok(Json(UserProfile {
        username: request.username,
        scopes: record.scopes.iter().map(|scope| scope.to_string()).collect(),
    }))
}

/// Server-streaming feed of registered usernames.
///
/// Authorization happens once, before the stream is constructed; the bound
/// context holds for the stream's whole lifetime.
#[utoipa::path(
    get,
    path = "/users/watch",
    tag = USERS_TAG,
    responses(
        (status = 200, description = "Username event stream"),
        (status = 401, description = "No valid token bound"),
        (status = 403, description = "Token lacks user_authorize")
    )
)]
async fn watch_users(
    State(state): State<AppState>,
    Extension(ctx): Extension<CallContext>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let client_id = ctx
        .bound_token()
        .map(|token| token.client_id.clone())
        .unwrap_or_default();
    info!("user watch stream opened by client {client_id:?}");

    let usernames = state.users.usernames();
    let events = stream::iter(
        usernames
            .into_iter()
            .map(|name| Ok(Event::default().event("user").data(name))),
    );
    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Liveness echo. Declares no policy and is therefore public.
#[utoipa::path(
    post,
    path = "/ping",
    tag = USERS_TAG,
    responses((status = 200, description = "Pong"))
)]
async fn ping() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "pong" }))
}
