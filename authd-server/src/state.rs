use crate::config::AuthdConfig;
use crate::grants::{ClientCredentialsHandler, GrantType, PasswordHandler, TokenService};
use crate::policy::PolicyIndex;
use crate::token::store::TokenStore;
use chrono::Duration;
use identity::{InMemoryClientDirectory, InMemoryUserDirectory};
use std::sync::Arc;

/// Application state shared across all handlers. Built once at startup;
/// cloning is cheap since every field is behind an Arc.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AuthdConfig>,
    pub tokens: Arc<TokenStore>,
    pub token_service: Arc<TokenService>,
    pub policies: Arc<PolicyIndex>,
    pub clients: Arc<InMemoryClientDirectory>,
    pub users: Arc<InMemoryUserDirectory>,
}

impl AppState {
    pub fn new(
        config: AuthdConfig,
        clients: Arc<InMemoryClientDirectory>,
        users: Arc<InMemoryUserDirectory>,
    ) -> Self {
        let tokens = Arc::new(TokenStore::new());
        let token_ttl = Duration::seconds(config.token_ttl_secs as i64);
        let token_service = TokenService::new()
            .register(
                GrantType::ClientCredentials,
                ClientCredentialsHandler::new(clients.clone(), Arc::clone(&tokens), token_ttl),
            )
            .register(
                GrantType::Password,
                PasswordHandler::new(users.clone(), Arc::clone(&tokens), token_ttl),
            );
        let policies = PolicyIndex::compile(crate::api::method_policies());

        Self {
            config: Arc::new(config),
            tokens,
            token_service: Arc::new(token_service),
            policies: Arc::new(policies),
            clients,
            users,
        }
    }
}
