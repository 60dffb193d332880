use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A capability tag a token may carry.
///
/// The set is closed: authorization checks are membership tests against
/// exactly these variants, and scope strings arriving on the wire that name
/// anything else fail to parse.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Permits registering new users.
    UserCreation,
    /// Permits a client to obtain tokens on behalf of users.
    UserAuthorize,
    /// Permits reading user profile data.
    UserProfile,
}

/// An unordered set of scopes. `BTreeSet` keeps the wire form deterministic.
pub type ScopeSet = BTreeSet<Scope>;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown scope: {0:?}")]
pub struct UnknownScope(pub String);

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::UserCreation => "user_creation",
            Scope::UserAuthorize => "user_authorize",
            Scope::UserProfile => "user_profile",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = UnknownScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user_creation" => Ok(Scope::UserCreation),
            "user_authorize" => Ok(Scope::UserAuthorize),
            "user_profile" => Ok(Scope::UserProfile),
            other => Err(UnknownScope(other.to_string())),
        }
    }
}

/// Parse a space-separated scope string into a set.
///
/// Repeated names collapse; empty input yields the empty set.
pub fn parse_scopes(input: &str) -> Result<ScopeSet, UnknownScope> {
    input.split_whitespace().map(Scope::from_str).collect()
}

/// Join a scope set into its space-separated wire form.
pub fn join_scopes(scopes: &ScopeSet) -> String {
    scopes
        .iter()
        .map(Scope::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build a `ScopeSet` from a list of scopes.
pub fn scope_set(scopes: impl IntoIterator<Item = Scope>) -> ScopeSet {
    scopes.into_iter().collect()
}
