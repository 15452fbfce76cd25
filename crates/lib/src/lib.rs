//!
//! Tabkeep: an embedded store for user accounts and the tabs they own.
//!
//! ## Core Concepts
//!
//! * **Backends (`backend::Backend`)**: A pluggable ordered key-value engine. Every call is its own
//!   engine transaction. `InMemory` keeps a sorted map (optionally saved to JSON) and `Redb`
//!   persists to disk.
//! * **RecordStore (`store::RecordStore`)**: Namespaces `User` and `Tab` records under the
//!   `user_` and `tab_` key prefixes and maintains each user's denormalized list of owned tabs.
//! * **LoginManager (`auth::LoginManager`)**: Password verification and hashing (Argon2id),
//!   bootstrap of the first administrator, and issuing/verifying signed session tokens (EdDSA).
//!
//! Control flows `LoginManager` → `RecordStore` → `Backend`; the login manager never touches
//! the engine directly.

pub mod auth;
pub mod backend;
pub mod clock;
pub mod constants;
pub mod store;

pub use auth::{LoginConfig, LoginManager, SessionKey, SessionUser, TokenUser};
pub use clock::{Clock, FixedClock, SystemClock};
pub use store::{RecordStore, Tab, TabId, User};

/// Result type used throughout the Tabkeep library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Tabkeep library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structured authentication errors from the auth module
    #[error(transparent)]
    Auth(auth::AuthError),

    /// Structured engine errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured record errors from the store module
    #[error(transparent)]
    Store(store::StoreError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Auth(_) => "auth",
            Error::Backend(_) => "backend",
            Error::Store(_) => "store",
            Error::Io(_) => "io",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Backend(backend_err) => backend_err.is_not_found(),
            Error::Store(store_err) => store_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates bad credentials or an unusable session token.
    pub fn is_authentication_error(&self) -> bool {
        match self {
            Error::Auth(auth_err) => auth_err.is_authentication_failed(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict (already exists, or last administrator).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Auth(auth_err) => auth_err.is_conflict(),
            Error::Store(store_err) => store_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error comes from the storage engine or record (de)serialization.
    pub fn is_storage_error(&self) -> bool {
        match self {
            Error::Io(_) => true,
            Error::Backend(backend_err) => !backend_err.is_not_found(),
            Error::Store(store_err) => store_err.is_serialization_error(),
            _ => false,
        }
    }

    /// Check if this error is validation-related.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Store(store_err) => store_err.is_validation_error(),
            Error::Auth(auth_err) => auth_err.is_validation_error(),
            _ => false,
        }
    }
}
