//! Issued-token model and opaque value generation.

pub mod store;

use crate::errors::AuthError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use identity::{Scope, ScopeSet};
use rand::Rng;

/// Random bytes per generated token value.
const TOKEN_BYTES: usize = 32;

/// One issued bearer credential. Never mutated after issuance; renewal or
/// narrowing means issuing a new token.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// Opaque value presented on calls.
    pub access: String,
    /// Opaque renewal handle, recorded for grants that issue one.
    pub refresh: Option<String>,
    /// The client the token was issued to (or through, for user tokens).
    pub client_id: String,
    /// The resource owner, for tokens issued on a user's behalf.
    pub user_id: Option<String>,
    pub scopes: ScopeSet,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    /// Remaining lifetime in whole seconds, rounded up. Always computed
    /// against the current clock; response shaping must not cache the value
    /// captured at issuance.
    pub fn expires_in(&self) -> i64 {
        let remaining = self.expires_at - Utc::now();
        (remaining.num_milliseconds() as f64 / 1000.0).ceil() as i64
    }

    pub fn has_scope(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }
}

/// Scope membership over a possibly-absent token. An absent token never
/// satisfies a scope requirement; every token satisfies the empty set.
pub fn has_all_scopes<'a>(
    token: Option<&AccessToken>,
    required: impl IntoIterator<Item = &'a Scope>,
) -> bool {
    let mut required = required.into_iter().peekable();
    if required.peek().is_none() {
        return true;
    }
    match token {
        Some(token) => required.all(|scope| token.scopes.contains(scope)),
        None => false,
    }
}

/// Generate an opaque token value: 32 bytes of CSPRNG output, URL-safe base64
/// without padding.
pub fn generate_token_value() -> Result<String, AuthError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill(&mut bytes[..]);
    let value = URL_SAFE_NO_PAD.encode(bytes);
    if value.is_empty() {
        return Err(AuthError::Internal(
            "token generation produced no output".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Duration;
    use identity::scope_set;
    use std::collections::HashSet;

    pub(crate) fn token_with(scopes: ScopeSet, expires_at: DateTime<Utc>) -> AccessToken {
        AccessToken {
            access: generate_token_value().unwrap(),
            refresh: None,
            client_id: "client".to_string(),
            user_id: None,
            scopes,
            issued_at: Utc::now(),
            expires_at,
        }
    }

    #[test]
    fn generated_values_are_unique_and_urlsafe() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let value = generate_token_value().unwrap();
            assert!(value
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
            assert!(seen.insert(value), "token value repeated");
        }
    }

    #[test]
    fn expires_in_rounds_up_and_tracks_the_clock() {
        let token = token_with(ScopeSet::new(), Utc::now() + Duration::seconds(3600));
        let remaining = token.expires_in();
        assert!(remaining == 3600 || remaining == 3599, "got {remaining}");
        assert!(!token.is_expired());
    }

    #[test]
    fn past_expiry_is_expired() {
        let token = token_with(ScopeSet::new(), Utc::now() - Duration::seconds(1));
        assert!(token.is_expired());
        assert!(token.expires_in() <= 0);
    }

    #[test]
    fn absent_token_never_satisfies_a_scope() {
        let required = scope_set([Scope::UserProfile]);
        assert!(!has_all_scopes(None, &required));
        // ...but the empty requirement holds vacuously.
        assert!(has_all_scopes(None, &ScopeSet::new()));
    }

    #[test]
    fn superset_of_required_scopes_passes() {
        let token = token_with(
            scope_set([Scope::UserProfile, Scope::UserCreation]),
            Utc::now() + Duration::seconds(60),
        );
        assert!(has_all_scopes(Some(&token), &scope_set([Scope::UserProfile])));
        assert!(!has_all_scopes(
            Some(&token),
            &scope_set([Scope::UserProfile, Scope::UserAuthorize])
        ));
    }
}
