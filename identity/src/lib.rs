//! Identity collaborators for the authd service: the closed scope model,
//! client and user directories, and password hashing.
//!
//! The server depends on the directory traits only; the in-memory
//! implementations back the seeded demo deployment and the test suites.

mod client;
mod error;
mod password;
mod scope;
mod user;

pub use client::{ClientDirectory, ClientRecord, InMemoryClientDirectory};
pub use error::DirectoryError;
pub use password::{hash_password, verify_password, HashError};
pub use scope::{join_scopes, parse_scopes, scope_set, Scope, ScopeSet, UnknownScope};
pub use user::{InMemoryUserDirectory, UserDirectory, UserRecord};
