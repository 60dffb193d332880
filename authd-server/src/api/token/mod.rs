//! The token-creation endpoint.

pub mod handlers;
pub mod models;

use crate::state::AppState;
use axum::{routing::post, Router};

pub fn router() -> Router<AppState> {
    Router::new().route("/token", post(handlers::create_token))
}
