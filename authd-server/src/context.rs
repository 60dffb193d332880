use crate::token::AccessToken;
use std::sync::Arc;

/// Per-call authentication context.
///
/// Established exactly once by the call interceptor before the handler runs
/// and immutable afterwards, so every read during the call (including the
/// lifetime of a streaming response) observes the same binding.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: Option<Arc<AccessToken>>,
}

impl CallContext {
    pub fn new(token: Option<Arc<AccessToken>>) -> Self {
        Self { token }
    }

    /// The token bound to this call, if a valid one resolved.
    pub fn bound_token(&self) -> Option<&AccessToken> {
        self.token.as_deref()
    }
}
