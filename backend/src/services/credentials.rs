//! # Credential Hasher
//!
//! One-way password hashing with Argon2id. Hashes are stored as PHC
//! strings (`$argon2id$v=19$...`), which carry their own salt and
//! parameters, so verification needs nothing but the stored bytes.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

/// Errors from the hashing backend.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

/// Hash a plaintext password into PHC string bytes.
pub fn hash_password(password: &str) -> Result<Vec<u8>, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CredentialError::Hashing(e.to_string()))?;

    Ok(hash.to_string().into_bytes())
}

/// Verify `password` against a stored hash.
///
/// Never errors: a malformed hash is simply a mismatch.
pub fn verify_password(stored: &[u8], password: &str) -> bool {
    let Ok(encoded) = std::str::from_utf8(stored) else {
        return false;
    };
    let Ok(parsed) = PasswordHash::new(encoded) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
