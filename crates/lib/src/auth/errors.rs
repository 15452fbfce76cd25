//! Authentication error types for the Tabkeep library.
//!
//! This module defines structured error types for login, account and session token
//! operations.

use thiserror::Error as ThisError;

use crate::Error;

/// Errors that can occur during authentication operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, ThisError)]
pub enum AuthError {
    /// Bad credentials, or a session token that is invalid, expired or whose subject is gone.
    ///
    /// Deliberately carries no detail: callers must not be able to tell an unknown user
    /// from a wrong password.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// An account with this name already exists.
    #[error("User already exists: {name}")]
    UserAlreadyExists {
        /// The conflicting account name
        name: String,
    },

    /// A new password is shorter than the minimum.
    #[error("Password too short (less than {min} characters)")]
    PasswordTooShort {
        /// Minimum length in characters
        min: usize,
    },

    /// An administrator tried to change their own admin flag.
    #[error("Cannot change your own admin status: {name}")]
    OwnAdminFlag {
        /// The acting administrator
        name: String,
    },

    /// The acting user may not perform this operation.
    #[error("Not permitted: {reason}")]
    PermissionDenied {
        /// What was refused
        reason: String,
    },

    /// Password hashing failed.
    #[error("Password hashing failed: {reason}")]
    HashingFailed {
        /// Description of the hashing failure
        reason: String,
    },

    /// A stored password hash could not be parsed.
    #[error("Stored password hash is malformed: {reason}")]
    MalformedHash {
        /// Description of the parse failure
        reason: String,
    },

    /// The login configuration is unusable.
    #[error("Invalid login configuration: {reason}")]
    InvalidConfig {
        /// Description of why the configuration is invalid
        reason: String,
    },

    /// A session token failed structural or signature checks.
    #[error("Invalid session token: {reason}")]
    InvalidToken {
        /// Description of the failed check
        reason: String,
    },

    /// A session token is past its expiry.
    #[error("Session token expired at {expired_at}")]
    TokenExpired {
        /// Expiry timestamp, seconds since Unix epoch
        expired_at: u64,
    },

    /// Encoding token claims failed.
    #[error("Failed to encode session token")]
    TokenEncoding {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },
}

impl AuthError {
    /// Check if this error is a rejected credential or session.
    pub fn is_authentication_failed(&self) -> bool {
        matches!(
            self,
            AuthError::AuthenticationFailed
                | AuthError::PermissionDenied { .. }
                | AuthError::InvalidToken { .. }
                | AuthError::TokenExpired { .. }
        )
    }

    /// Check if this error indicates a conflict (already exists).
    pub fn is_conflict(&self) -> bool {
        matches!(self, AuthError::UserAlreadyExists { .. })
    }

    /// Check if this error rejects malformed input or configuration.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidConfig { .. }
                | AuthError::PasswordTooShort { .. }
                | AuthError::OwnAdminFlag { .. }
        )
    }
}

impl From<AuthError> for Error {
    fn from(err: AuthError) -> Self {
        Error::Auth(err)
    }
}
