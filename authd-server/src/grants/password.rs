use super::GrantHandler;
use crate::api::token::models::TokenRequest;
use crate::context::CallContext;
use crate::credentials::BasicCredentials;
use crate::errors::AuthError;
use crate::token::store::TokenStore;
use crate::token::{generate_token_value, AccessToken};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use identity::{Scope, UserDirectory};
use log::{debug, warn};
use std::sync::Arc;

/// Issues user tokens from a username/password pair.
///
/// A user grant is only served to an already-authenticated client holding
/// `user_authorize`; the resulting token inherits that client's id, carries
/// the user's registered scopes, and records a refresh value.
pub struct PasswordHandler {
    users: Arc<dyn UserDirectory>,
    tokens: Arc<TokenStore>,
    token_ttl: Duration,
}

impl PasswordHandler {
    pub fn new(users: Arc<dyn UserDirectory>, tokens: Arc<TokenStore>, token_ttl: Duration) -> Self {
        Self {
            users,
            tokens,
            token_ttl,
        }
    }

    fn presented<'a>(
        basic: Option<&'a BasicCredentials>,
        request: &'a TokenRequest,
    ) -> (&'a str, &'a str) {
        match basic {
            Some(creds) => (&creds.id, &creds.secret),
            None => (
                request.username.as_deref().unwrap_or(""),
                request.password.as_deref().unwrap_or(""),
            ),
        }
    }
}

#[async_trait]
impl GrantHandler for PasswordHandler {
    async fn issue(
        &self,
        ctx: &CallContext,
        basic: Option<&BasicCredentials>,
        request: &TokenRequest,
    ) -> Result<Arc<AccessToken>, AuthError> {
        // Client gate first: user credentials are not examined until the
        // calling client has proven both identity and authority.
        let client_token = ctx
            .bound_token()
            .filter(|token| !token.is_expired())
            .ok_or_else(|| AuthError::Unauthenticated("not authenticated".to_string()))?;
        if !client_token.has_scope(Scope::UserAuthorize) {
            return Err(AuthError::InsufficientScope(
                "insufficient scope".to_string(),
            ));
        }

        let (username, password) = Self::presented(basic, request);
        let record = match self.users.get_user_info(username).await? {
            Some(record) if identity::verify_password(&record.password_hash, password) => record,
            _ => {
                warn!("password grant rejected for user {username:?}");
                return Err(AuthError::Unauthenticated(
                    "incorrect username or password".to_string(),
                ));
            }
        };

        let now = Utc::now();
        let token = AccessToken {
            access: generate_token_value()?,
            refresh: Some(generate_token_value()?),
            client_id: client_token.client_id.clone(),
            user_id: Some(username.to_string()),
            scopes: record.scopes,
            issued_at: now,
            expires_at: now + self.token_ttl,
        };
        debug!(
            "issued user token for {username:?} via client {:?}",
            token.client_id
        );
        Ok(self.tokens.insert(token))
    }
}
