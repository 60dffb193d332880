//! Declarative per-method authorization.
//!
//! Each method declares an `AuthorizationPolicy` once, next to its route
//! definition. At startup the declarations are compiled into a `PolicyIndex`
//! of per-method predicates; the call interceptor consults the index on every
//! call. Handlers never perform their own checks.

use crate::context::CallContext;
use crate::errors::AuthError;
use crate::token;
use identity::{Scope, ScopeSet};
use std::collections::HashMap;

/// What a method requires from a call. A method with no declared policy is
/// public.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy {
    pub authenticated: bool,
    pub scopes: ScopeSet,
}

impl AuthorizationPolicy {
    /// Requires a bound token but no particular scope.
    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
            scopes: ScopeSet::new(),
        }
    }

    /// Requires a bound token carrying every listed scope.
    pub fn with_scopes(scopes: impl IntoIterator<Item = Scope>) -> Self {
        Self {
            authenticated: true,
            scopes: scopes.into_iter().collect(),
        }
    }

    /// Compile the declaration into its runtime predicate.
    ///
    /// A scope requirement entails authentication even when `authenticated`
    /// was left false. Compilation is deterministic: the same declaration
    /// always yields an authorizer with the same behavior.
    pub fn compile(&self) -> RequestAuthorizer {
        RequestAuthorizer {
            require_authenticated: self.authenticated || !self.scopes.is_empty(),
            required_scopes: self.scopes.clone(),
        }
    }
}

/// Compiled per-method predicate evaluated by the call interceptor.
#[derive(Debug, Clone)]
pub struct RequestAuthorizer {
    require_authenticated: bool,
    required_scopes: ScopeSet,
}

impl RequestAuthorizer {
    /// Evaluate the predicate against a call's bound context. An expired
    /// token, should one ever reach here, counts as no token.
    pub fn authorize(&self, ctx: &CallContext) -> Result<(), AuthError> {
        let bound = ctx.bound_token().filter(|token| !token.is_expired());
        if self.require_authenticated && bound.is_none() {
            return Err(AuthError::Unauthenticated("not authenticated".to_string()));
        }
        if !token::has_all_scopes(bound, &self.required_scopes) {
            return Err(AuthError::InsufficientScope(
                "insufficient scope".to_string(),
            ));
        }
        Ok(())
    }
}

/// Dispatch table from method identity to compiled authorizer, built once at
/// startup. Methods absent from the table carry no requirement.
#[derive(Debug, Default)]
pub struct PolicyIndex {
    authorizers: HashMap<&'static str, RequestAuthorizer>,
}

impl PolicyIndex {
    pub fn compile(
        declarations: impl IntoIterator<Item = (&'static str, AuthorizationPolicy)>,
    ) -> Self {
        let authorizers = declarations
            .into_iter()
            .map(|(method, policy)| (method, policy.compile()))
            .collect();
        Self { authorizers }
    }

    pub fn authorizer(&self, method: &str) -> Option<&RequestAuthorizer> {
        self.authorizers.get(method)
    }
}
