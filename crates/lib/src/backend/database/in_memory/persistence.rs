//! Persistence operations for the InMemory engine
//!
//! This module handles serialization and file I/O for saving/loading
//! the in-memory engine state to/from JSON files. Keys and values are
//! stored hex-encoded so arbitrary bytes survive the round trip.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use super::InMemory;
use crate::Result;
use crate::backend::errors::BackendError;

/// The current persistence file format version.
/// v0 indicates this is an unstable format subject to breaking changes.
const PERSISTENCE_VERSION: u8 = 0;

/// Serializable version of the InMemory engine for persistence
#[derive(Serialize, Deserialize)]
struct SerializableEngine {
    /// File format version for compatibility checking
    #[serde(rename = "_v", default)]
    version: u8,
    /// hex(key) -> hex(value)
    entries: BTreeMap<String, String>,
}

impl InMemory {
    /// Saves the entire engine state to a specified file as JSON.
    ///
    /// The write goes to a sibling temporary file first and is then renamed over `path`,
    /// so a crash mid-save leaves the previous file intact.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let entries = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (hex::encode(k), hex::encode(v)))
            .collect();
        let serializable = SerializableEngine {
            version: PERSISTENCE_VERSION,
            entries,
        };

        let json = serde_json::to_string_pretty(&serializable)
            .map_err(|source| BackendError::SerializationFailed { source })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|source| BackendError::FileIo { source })?;
        fs::rename(&tmp, path).map_err(|source| BackendError::FileIo { source })?;
        tracing::debug!(path = %path.display(), "saved in-memory engine");
        Ok(())
    }

    /// Loads the engine state from a specified JSON file.
    ///
    /// If the file does not exist, a new, empty `InMemory` is returned.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }

        let json = fs::read_to_string(path).map_err(|source| BackendError::FileIo { source })?;
        let serializable: SerializableEngine = serde_json::from_str(&json)
            .map_err(|source| BackendError::DeserializationFailed { source })?;

        if serializable.version != PERSISTENCE_VERSION {
            return Err(BackendError::UnsupportedVersion {
                found: serializable.version,
                supported: PERSISTENCE_VERSION,
            }
            .into());
        }

        let mut entries = BTreeMap::new();
        for (key, value) in serializable.entries {
            let key = hex::decode(&key).map_err(|e| BackendError::CorruptData {
                reason: format!("key {key:?}: {e}"),
            })?;
            let value = hex::decode(&value).map_err(|e| BackendError::CorruptData {
                reason: format!("value for key {:?}: {e}", String::from_utf8_lossy(&key)),
            })?;
            entries.insert(key, value);
        }

        tracing::debug!(path = %path.display(), keys = entries.len(), "loaded in-memory engine");
        Ok(InMemory {
            entries: RwLock::new(entries),
        })
    }
}
