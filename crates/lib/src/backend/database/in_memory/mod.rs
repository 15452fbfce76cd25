//! In-memory backend implementation
//!
//! This module provides an in-memory implementation of the [`Backend`] trait,
//! suitable for testing, development, or scenarios where durability is
//! handled externally by saving the whole map to a file.

mod persistence;

use std::any::Any;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{PoisonError, RwLock};

use crate::Result;
use crate::backend::errors::BackendError;
use crate::backend::{Backend, KeyValue};

/// A simple in-memory engine using a `BTreeMap` for ordered storage.
///
/// It provides basic persistence capabilities via `save_to_file` and
/// `load_from_file`, serializing the map to JSON. Nothing is written to disk
/// between those calls, so a crash loses every write since the last save.
#[derive(Debug, Default)]
pub struct InMemory {
    /// Entries storage with read-write lock for concurrent access
    pub(crate) entries: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl InMemory {
    /// Creates a new, empty `InMemory` engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored, across all prefixes.
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether the engine holds no keys at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned<T>(_: PoisonError<T>) -> crate::Error {
    BackendError::storage("in-memory engine lock poisoned").into()
}

impl Backend for InMemory {
    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let entries = self.entries.read().map_err(poisoned)?;
        entries
            .get(key)
            .cloned()
            .ok_or_else(|| BackendError::key_not_found(key).into())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KeyValue>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .range::<[u8], _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
