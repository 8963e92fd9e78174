/*
 * Responsibility
 * - Argon2id hashing of signup passwords and verification at login
 * - Hash output is a PHC string, stored as-is in users."passwordHash"
 */
use argon2::{
    Argon2, PasswordHash, PasswordVerifier,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use tracing::error;

use crate::error::AppError;

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "failed to hash password");
            AppError::Internal
        })
}

/// Check `password` against a stored PHC hash.
///
/// A mismatch and an unparseable stored hash both come back as
/// `InvalidCredentials`; the client never learns which.
pub fn verify_password(password: &str, hash: &str) -> Result<(), AppError> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "stored password hash is not a valid PHC string");
        AppError::InvalidCredentials
    })?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AppError::InvalidCredentials)
}
