//! On-disk backend built on redb.
//!
//! All records live in one table keyed by the raw record key, so the user and tab
//! namespaces are separated only by their key prefixes. Each `put`/`delete` commits its
//! own write transaction; each `get`/`scan_prefix` runs inside one read transaction.

use std::any::Any;
use std::fmt::Display;
use std::path::Path;

use redb::{Database, ReadableTable, TableDefinition};

use crate::Result;
use crate::backend::errors::BackendError;
use crate::backend::{Backend, KeyValue};

const RECORDS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("records");

/// Durable engine stored in a single redb file.
///
/// The file is held open for the lifetime of the value and released on drop.
pub struct Redb {
    db: Database,
}

/// Converts redb's per-stage error types into `BackendError::Storage` with context.
trait RedbResultExt<T> {
    fn redb_context(self, context: &str) -> Result<T>;
}

impl<T, E: Display> RedbResultExt<T> for std::result::Result<T, E> {
    fn redb_context(self, context: &str) -> Result<T> {
        self.map_err(|e| BackendError::storage(format!("{context}: {e}")).into())
    }
}

impl Redb {
    /// Opens (or creates) the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let db = Database::create(path).redb_context("Failed to open redb database")?;

        // Create the table up front so read transactions never see it missing.
        let txn = db.begin_write().redb_context("Failed to begin write")?;
        txn.open_table(RECORDS)
            .redb_context("Failed to create records table")?;
        txn.commit().redb_context("Failed to commit")?;

        tracing::info!(path = %path.display(), "opened redb engine");
        Ok(Self { db })
    }
}

impl Backend for Redb {
    fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        let txn = self.db.begin_read().redb_context("Failed to begin read")?;
        let table = txn
            .open_table(RECORDS)
            .redb_context("Failed to open records table")?;
        let value = table.get(key).redb_context("Failed to read key")?;
        match value {
            Some(guard) => Ok(guard.value().to_vec()),
            None => Err(BackendError::key_not_found(key).into()),
        }
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<()> {
        let txn = self.db.begin_write().redb_context("Failed to begin write")?;
        {
            let mut table = txn
                .open_table(RECORDS)
                .redb_context("Failed to open records table")?;
            table.insert(key, value).redb_context("Failed to write key")?;
        }
        txn.commit().redb_context("Failed to commit")
    }

    fn delete(&self, key: &[u8]) -> Result<()> {
        let txn = self.db.begin_write().redb_context("Failed to begin write")?;
        {
            let mut table = txn
                .open_table(RECORDS)
                .redb_context("Failed to open records table")?;
            table.remove(key).redb_context("Failed to delete key")?;
        }
        txn.commit().redb_context("Failed to commit")
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<KeyValue>> {
        let txn = self.db.begin_read().redb_context("Failed to begin read")?;
        let table = txn
            .open_table(RECORDS)
            .redb_context("Failed to open records table")?;

        let mut out = Vec::new();
        for item in table.range(prefix..).redb_context("Failed to scan")? {
            let (key, value) = item.redb_context("Failed to read scanned entry")?;
            let key = key.value();
            if !key.starts_with(prefix) {
                break;
            }
            out.push((key.to_vec(), value.value().to_vec()));
        }
        Ok(out)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
