use crate::token::AccessToken;
use identity::join_scopes;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Token creation request.
///
/// `grant_type` selects the handler; the remaining fields are grant-specific
/// and optional at the wire level. Credentials carried in the Authorization
/// header supersede their body counterparts.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct TokenRequest {
    pub grant_type: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Accepted for wire compatibility. The client-credentials grant assigns
    /// the registered scope set regardless of what is requested here.
    pub scope: Option<String>,
}

/// Token creation response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token_type: String,
    pub access_token: String,
    /// Granted scopes, space-joined.
    pub scope: String,
    /// Whole seconds until expiry, rounded up and computed at response time.
    pub expires_in: i64,
}

impl TokenResponse {
    pub fn from_token(token: &AccessToken) -> Self {
        Self {
            token_type: "bearer".to_string(),
            access_token: token.access.clone(),
            scope: join_scopes(&token.scopes),
            expires_in: token.expires_in(),
        }
    }
}
