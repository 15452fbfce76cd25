//! Backend implementations for Tabkeep storage
//!
//! This module provides the core [`Backend`] trait and the engines that implement it
//! (see [`database`]).
//!
//! The `Backend` trait is an ordered byte-key store. The record store above it is independent
//! of the specific storage mechanism and only relies on the contract documented here.

use std::any::Any;

use crate::Result;

pub mod database;
mod errors;

pub use errors::BackendError;

/// A `(key, value)` pair returned by a prefix scan.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// Ordered key-value engine underneath the record store.
///
/// Every method is a single engine transaction: a `put` or `delete` is durable (to the extent the
/// engine is durable at all) once it returns, and a `scan_prefix` observes one consistent snapshot.
/// No method spans more than one call; callers that need multi-key sequences must tolerate
/// partial completion.
///
/// All implementations must be `Send` and `Sync` to allow sharing across threads,
/// and implement `Any` to allow for downcasting if needed.
pub trait Backend: Send + Sync + Any {
    /// Retrieves the value stored at `key`.
    ///
    /// # Returns
    /// The value, or `BackendError::KeyNotFound` if the key is absent.
    fn get(&self, key: &[u8]) -> Result<Vec<u8>>;

    /// Stores `value` at `key`, overwriting any previous value.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<()>;

    /// Removes `key`. Deleting an absent key succeeds.
    fn delete(&self, key: &[u8]) -> Result<()>;

    /// Returns every pair whose key starts with `prefix`, in ascending byte order of key.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KeyValue>>;

    /// Returns a reference to the backend as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}
