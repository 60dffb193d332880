use super::GrantHandler;
use crate::api::token::models::TokenRequest;
use crate::context::CallContext;
use crate::credentials::BasicCredentials;
use crate::errors::AuthError;
use crate::token::store::TokenStore;
use crate::token::{generate_token_value, AccessToken};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use identity::ClientDirectory;
use log::{debug, warn};
use std::sync::Arc;

/// Issues client-trust tokens from a registered client id/secret pair.
///
/// The issued scope set is fixed by the client's registration; a `scope`
/// field in the request neither narrows nor widens it. No refresh token is
/// issued, since a client can always re-present its credentials.
pub struct ClientCredentialsHandler {
    clients: Arc<dyn ClientDirectory>,
    tokens: Arc<TokenStore>,
    token_ttl: Duration,
}

impl ClientCredentialsHandler {
    pub fn new(
        clients: Arc<dyn ClientDirectory>,
        tokens: Arc<TokenStore>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            clients,
            tokens,
            token_ttl,
        }
    }

    /// Metadata-borne credentials supersede body fields.
    fn presented<'a>(
        basic: Option<&'a BasicCredentials>,
        request: &'a TokenRequest,
    ) -> (&'a str, &'a str) {
        match basic {
            Some(creds) => (&creds.id, &creds.secret),
            None => (
                request.client_id.as_deref().unwrap_or(""),
                request.client_secret.as_deref().unwrap_or(""),
            ),
        }
    }
}

#[async_trait]
impl GrantHandler for ClientCredentialsHandler {
    async fn issue(
        &self,
        _ctx: &CallContext,
        basic: Option<&BasicCredentials>,
        request: &TokenRequest,
    ) -> Result<Arc<AccessToken>, AuthError> {
        let (client_id, secret) = Self::presented(basic, request);

        let record = match self.clients.get_client_info(client_id).await? {
            // The unknown-id and wrong-secret cases are indistinguishable to
            // the caller.
            Some(record) if record.secret == secret => record,
            _ => {
                warn!("client credentials rejected for {client_id:?}");
                return Err(AuthError::Unauthenticated(
                    "incorrect client id or secret".to_string(),
                ));
            }
        };

        let now = Utc::now();
        let token = AccessToken {
            access: generate_token_value()?,
            refresh: None,
            client_id: client_id.to_string(),
            user_id: None,
            scopes: record.scopes,
            issued_at: now,
            expires_at: now + self.token_ttl,
        };
        debug!(
            "issued client token for {client_id:?} with {} scopes",
            token.scopes.len()
        );
        Ok(self.tokens.insert(token))
    }
}
