pub mod health;
pub mod token;
pub mod users;

use crate::interceptor::call_interceptor;
use crate::policy::AuthorizationPolicy;
use crate::state::AppState;
use axum::{middleware, Router};

/// Combines all API routes and layers the call interceptor over every one of
/// them, so unary and streaming methods pass through the same enforcement
/// point.
pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(token::router())
        .merge(users::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            call_interceptor,
        ))
}

/// Every declared authorization policy, keyed by route. Routes not listed
/// here carry no requirement. The token and health endpoints are reachable
/// anonymously by construction.
pub fn method_policies() -> Vec<(&'static str, AuthorizationPolicy)> {
    users::method_policies()
}
