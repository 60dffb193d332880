//! Grant handling: pluggable strategies for exchanging credential
//! presentations for tokens, and the service that dispatches between them.

mod client_credentials;
mod password;

pub use client_credentials::ClientCredentialsHandler;
pub use password::PasswordHandler;

use crate::api::token::models::{TokenRequest, TokenResponse};
use crate::context::CallContext;
use crate::credentials::BasicCredentials;
use crate::errors::AuthError;
use crate::token::AccessToken;
use async_trait::async_trait;
use log::info;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

/// The grant types this service can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrantType {
    ClientCredentials,
    Password,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::ClientCredentials => "client_credentials",
            GrantType::Password => "password",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown grant type {0:?}")]
pub struct UnknownGrantType(String);

impl FromStr for GrantType {
    type Err = UnknownGrantType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client_credentials" => Ok(GrantType::ClientCredentials),
            "password" => Ok(GrantType::Password),
            other => Err(UnknownGrantType(other.to_string())),
        }
    }
}

/// A strategy that validates one kind of credential presentation and mints a
/// token for it.
///
/// Handlers receive the call's bound context (some grants require an
/// already-authenticated caller), any metadata-borne Basic credentials, and
/// the parsed request body. On success the returned token has already been
/// recorded in the token store.
#[async_trait]
pub trait GrantHandler: Send + Sync {
    async fn issue(
        &self,
        ctx: &CallContext,
        basic: Option<&BasicCredentials>,
        request: &TokenRequest,
    ) -> Result<Arc<AccessToken>, AuthError>;
}

/// Routes token-creation requests to the handler registered for their grant
/// type and shapes the wire response. The registry is fixed at startup.
#[derive(Default)]
pub struct TokenService {
    handlers: HashMap<GrantType, Box<dyn GrantHandler>>,
}

impl TokenService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, grant_type: GrantType, handler: impl GrantHandler + 'static) -> Self {
        self.handlers.insert(grant_type, Box::new(handler));
        self
    }

    /// Dispatch a token request. A grant type that does not parse, or parses
    /// but has no registered handler, is rejected before any credential is
    /// examined.
    pub async fn create_token(
        &self,
        ctx: &CallContext,
        basic: Option<&BasicCredentials>,
        request: &TokenRequest,
    ) -> Result<TokenResponse, AuthError> {
        let handler = request
            .grant_type
            .parse::<GrantType>()
            .ok()
            .and_then(|grant_type| self.handlers.get(&grant_type))
            .ok_or_else(|| AuthError::UnsupportedGrantType(request.grant_type.clone()))?;

        let token = handler.issue(ctx, basic, request).await?;
        info!(
            "issued {} token for client {:?}",
            request.grant_type, token.client_id
        );
        Ok(TokenResponse::from_token(&token))
    }
}
