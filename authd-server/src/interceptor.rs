//! The single enforcement choke point.
//!
//! Layered over every route — unary and streaming alike — so no method can be
//! reached without passing through it. The interceptor resolves the bearer
//! credential (if any), binds the per-call context, and enforces the method's
//! compiled policy. Handlers and stream bodies never re-check.

use crate::context::CallContext;
use crate::credentials::bearer_token;
use crate::errors::AuthError;
use crate::state::AppState;
use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use log::{debug, warn};

pub async fn call_interceptor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // Resolution is not enforcement: a missing or unresolvable token simply
    // leaves the context unauthenticated, and the policy decides.
    let token = bearer_token(request.headers())
        .and_then(|value| state.tokens.lookup_by_access(&value));
    let ctx = CallContext::new(token);
    request.extensions_mut().insert(ctx.clone());

    let method = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned());
    if let Some(authorizer) = method
        .as_deref()
        .and_then(|method| state.policies.authorizer(method))
    {
        if let Err(err) = authorizer.authorize(&ctx) {
            warn!(
                "rejected call to {}: {err}",
                method.as_deref().unwrap_or("<unmatched>")
            );
            return Err(err);
        }
        debug!("authorized call to {}", method.as_deref().unwrap_or("<unmatched>"));
    }

    Ok(next.run(request).await)
}
