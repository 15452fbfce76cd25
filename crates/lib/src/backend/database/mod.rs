//! Database-style backend implementations
//!
//! These engines provide ordered key-value storage for the record store.

mod in_memory;
#[cfg(feature = "redb")]
mod redb_engine;

pub use in_memory::InMemory;
#[cfg(feature = "redb")]
pub use redb_engine::Redb;
