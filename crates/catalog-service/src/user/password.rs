//! Argon2id hashing for user credentials.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher as ArgonHasher, SaltString, rand_core::OsRng},
};

use catalog_core::error::AppError;
use catalog_core::result::AppResult;

/// Hashes user passwords with Argon2id.
///
/// Each hash carries its own random salt, so hashing the same password
/// twice gives different strings. The user diff treats that as a change,
/// which is what a password reset is.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a hasher with default Argon2 parameters.
    pub fn new() -> Self {
        Self
    }

    /// Hash `password` with a fresh salt.
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))
    }
}
