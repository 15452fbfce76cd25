//! Engine error types for the Tabkeep backend.
//!
//! This module defines structured error types for key-value engine operations,
//! providing better error context and type safety compared to string-based errors.

use thiserror::Error;

/// Errors that can occur during engine operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// Key not present in the engine.
    #[error("Key not found: {key}")]
    KeyNotFound {
        /// The missing key, lossily decoded as UTF-8
        key: String,
    },

    /// The engine failed to read, write or commit.
    #[error("Storage failure: {reason}")]
    Storage {
        /// Description of the engine failure
        reason: String,
    },

    /// Serialization failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// Persisted data is not valid hex.
    #[error("Corrupt persisted data: {reason}")]
    CorruptData {
        /// Description of what failed to decode
        reason: String,
    },

    /// Persisted file uses a format version this build cannot read.
    #[error("Unsupported persistence version {found}; only version {supported} is supported")]
    UnsupportedVersion {
        /// Version found in the file
        found: u8,
        /// Version this build writes
        supported: u8,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl BackendError {
    /// Builds a `KeyNotFound` from raw key bytes.
    pub fn key_not_found(key: &[u8]) -> Self {
        BackendError::KeyNotFound {
            key: String::from_utf8_lossy(key).into_owned(),
        }
    }

    /// Wraps any displayable engine failure as `Storage`.
    pub fn storage(reason: impl std::fmt::Display) -> Self {
        BackendError::Storage {
            reason: reason.to_string(),
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::KeyNotFound { .. })
    }

    /// Check if this error is related to I/O operations.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            BackendError::FileIo { .. }
                | BackendError::Storage { .. }
                | BackendError::SerializationFailed { .. }
                | BackendError::DeserializationFailed { .. }
        )
    }
}

impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
