//! Password hashing and generation
//!
//! Provides password hashing using Argon2id with a fresh random salt per hash, stored in
//! PHC string format, and random password generation for bootstrap accounts.

use argon2::{
    Algorithm, Argon2, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core},
};
use rand::Rng;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use super::config::HashParams;
use super::errors::AuthError;

/// Hash a password using Argon2id
///
/// # Returns
/// The Argon2 hash string (PHC format), which embeds the salt and cost parameters.
pub fn hash_password(password: impl AsRef<str>, params: HashParams) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut rand_core::OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params.to_argon2()?);

    let password_hash = argon2
        .hash_password(password.as_ref().as_bytes(), &salt)
        .map_err(|e| AuthError::HashingFailed {
            reason: e.to_string(),
        })?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against its hash
///
/// The comparison is constant-time and uses the parameters recorded in the hash.
///
/// # Returns
/// `Ok(())` if the password matches, `AuthenticationFailed` if it does not, and
/// `MalformedHash` if the stored hash cannot be parsed.
pub fn verify_password(
    password: impl AsRef<str>,
    password_hash: impl AsRef<str>,
) -> Result<(), AuthError> {
    let parsed_hash =
        PasswordHash::new(password_hash.as_ref()).map_err(|e| AuthError::MalformedHash {
            reason: e.to_string(),
        })?;

    Argon2::default()
        .verify_password(password.as_ref().as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::AuthenticationFailed)
}

/// Generate a random password of `length` characters drawn uniformly from `charset`.
pub fn generate_password(length: usize, charset: &str) -> Result<Zeroizing<String>, AuthError> {
    let chars: Vec<char> = charset.chars().collect();
    if chars.is_empty() {
        return Err(AuthError::InvalidConfig {
            reason: "password charset must not be empty".to_string(),
        });
    }

    let mut rng = OsRng;
    let password: String = (0..length)
        .map(|_| chars[rng.gen_range(0..chars.len())])
        .collect();
    Ok(Zeroizing::new(password))
}
