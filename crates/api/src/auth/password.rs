//! Password storage for [`LocalAuthProvider`](super::local::LocalAuthProvider) accounts.
//!
//! Hashes are Argon2id PHC strings with a fresh `OsRng` salt, so parameters
//! travel with the hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    Error as HashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::Argon2;

use super::AuthError;

fn hashing_failed(err: HashError) -> AuthError {
    AuthError::Unavailable(format!("password hashing failed: {err}"))
}

/// Hash a sign-up password.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(hashing_failed)
}

/// Check a sign-in password against an account's stored hash.
///
/// A mismatch is `Ok(false)`. An unreadable stored hash is an error.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored).map_err(hashing_failed)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(hashing_failed(e)),
    }
}
