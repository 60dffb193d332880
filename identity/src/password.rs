//! One-way password hashing for the user directory.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to hash password")]
pub struct HashError;

/// Hash a plaintext password with argon2id and a fresh random salt.
pub fn hash_password(plaintext: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| HashError)
}

/// Verify a plaintext password against a stored hash.
///
/// A malformed stored hash verifies as false rather than erroring, so a
/// corrupt record behaves like a wrong password.
pub fn verify_password(stored_hash: &str, plaintext: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
