//! Login manager configuration

use serde::{Deserialize, Serialize};

use super::errors::AuthError;
use crate::constants::{
    ALPHANUMERIC, DEFAULT_ADMIN_NAME, DEFAULT_PASSWORD_LENGTH, MAX_TOKEN_TTL_SECS,
    MIN_PASSWORD_LENGTH, TOKEN_TTL_SECS,
};

/// Argon2id cost parameters used when hashing new passwords.
///
/// Verification always uses the parameters recorded in the stored hash, so changing these
/// only affects passwords hashed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes
    pub iterations: u32,
    /// Degree of parallelism
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: argon2::Params::DEFAULT_M_COST,
            iterations: argon2::Params::DEFAULT_T_COST,
            parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl HashParams {
    pub(crate) fn to_argon2(self) -> Result<argon2::Params, AuthError> {
        argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None).map_err(
            |e| AuthError::InvalidConfig {
                reason: format!("argon2 parameters: {e}"),
            },
        )
    }
}

/// Settings for [`LoginManager`](super::LoginManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginConfig {
    /// Name of the administrator created on an empty store
    pub admin_name: String,
    /// Length of the generated administrator password
    pub password_length: usize,
    /// Characters the generated password is drawn from
    pub password_charset: String,
    /// Session token lifetime in seconds
    pub token_ttl_secs: u64,
    /// Cost of hashing new passwords
    pub hash_params: HashParams,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            admin_name: DEFAULT_ADMIN_NAME.to_string(),
            password_length: DEFAULT_PASSWORD_LENGTH,
            password_charset: ALPHANUMERIC.to_string(),
            token_ttl_secs: TOKEN_TTL_SECS,
            hash_params: HashParams::default(),
        }
    }
}

impl LoginConfig {
    /// Rejects settings that would make bootstrap or hashing impossible.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.admin_name.is_empty() {
            return Err(AuthError::InvalidConfig {
                reason: "admin name must not be empty".to_string(),
            });
        }
        if self.password_length < MIN_PASSWORD_LENGTH {
            return Err(AuthError::InvalidConfig {
                reason: format!(
                    "generated password length must be at least {MIN_PASSWORD_LENGTH}"
                ),
            });
        }
        if self.password_charset.is_empty() {
            return Err(AuthError::InvalidConfig {
                reason: "password charset must not be empty".to_string(),
            });
        }
        if self.token_ttl_secs == 0 || self.token_ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(AuthError::InvalidConfig {
                reason: format!("token lifetime must be between 1 and {MAX_TOKEN_TTL_SECS} seconds"),
            });
        }
        self.hash_params.to_argon2()?;
        Ok(())
    }
}
