//! Record store error types.

use thiserror::Error;

use super::types::{Namespace, TabId};

/// Errors raised by the record store on top of engine failures.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record under this namespace and identifier.
    #[error("{namespace} not found: {id}")]
    NotFound {
        /// Namespace that was searched
        namespace: Namespace,
        /// Identifier that was missing
        id: String,
    },

    /// A tab identifier could not be parsed.
    #[error("Invalid tab id: {value}")]
    InvalidTabId {
        /// The rejected input
        value: String,
        /// The underlying parse error
        #[source]
        source: uuid::Error,
    },

    /// The record's own id disagrees with the key it is written under.
    #[error("Tab id mismatch: addressed {addressed}, record carries {carried}")]
    IdMismatch {
        /// Id used to address the write
        addressed: TabId,
        /// Id inside the record
        carried: TabId,
    },

    /// An update tried to move a tab to a different owner.
    #[error("Tab {id} is owned by {owner}, refusing to reassign to {attempted}")]
    OwnerMismatch {
        /// The tab being updated
        id: TabId,
        /// Current owner
        owner: String,
        /// Owner carried by the update
        attempted: String,
    },

    /// User names must not be empty.
    #[error("User name must not be empty")]
    EmptyUserName,

    /// The change would leave the store without an administrator.
    #[error("Refusing to remove the last administrator: {name}")]
    LastAdmin {
        /// The only remaining administrator
        name: String,
    },

    /// Encoding a record failed.
    #[error("Failed to serialize {namespace} record")]
    SerializationFailed {
        /// Namespace of the record
        namespace: Namespace,
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// A stored value could not be decoded as its record type.
    #[error("Failed to deserialize {namespace} record {id}")]
    DeserializationFailed {
        /// Namespace of the record
        namespace: Namespace,
        /// Identifier of the record
        id: String,
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Check if this error rejects malformed or inconsistent input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            StoreError::InvalidTabId { .. }
                | StoreError::EmptyUserName
                | StoreError::IdMismatch { .. }
                | StoreError::OwnerMismatch { .. }
        )
    }

    /// Check if this error refuses a change that conflicts with the current state.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::LastAdmin { .. })
    }

    /// Check if this error comes from record encoding or decoding.
    pub fn is_serialization_error(&self) -> bool {
        matches!(
            self,
            StoreError::SerializationFailed { .. } | StoreError::DeserializationFailed { .. }
        )
    }
}

impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store(err)
    }
}
