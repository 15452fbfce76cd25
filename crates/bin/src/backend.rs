//! Backend creation and utility functions.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tabkeep::{
    LoginConfig, LoginManager, RecordStore, SessionKey, SystemClock,
    backend::database::{InMemory, Redb},
};

use crate::cli::{Backend, StoreArgs};

const REDB_FILE: &str = "tabkeep.redb";
const JSON_FILE: &str = "tabkeep.json";

fn data_dir(args: &StoreArgs) -> PathBuf {
    args.data_dir.clone().unwrap_or_else(|| PathBuf::from("."))
}

/// Human-readable description of the configured backend
pub fn backend_label(args: &StoreArgs) -> String {
    let dir = data_dir(args);
    match args.backend {
        Backend::Redb => format!("redb ({})", dir.join(REDB_FILE).display()),
        Backend::Inmemory => format!("inmemory ({})", dir.join(JSON_FILE).display()),
    }
}

/// Create the appropriate backend based on configuration
pub fn create_backend(
    args: &StoreArgs,
) -> Result<Box<dyn tabkeep::backend::Backend>, Box<dyn std::error::Error>> {
    let data_dir = data_dir(args);

    // Ensure data directory exists
    std::fs::create_dir_all(&data_dir)?;

    match args.backend {
        Backend::Redb => {
            let db_path = data_dir.join(REDB_FILE);
            tracing::info!("Using redb backend at {}", db_path.display());
            Ok(Box::new(Redb::open(&db_path)?))
        }
        Backend::Inmemory => {
            let json_path = data_dir.join(JSON_FILE);
            tracing::info!(
                "Using in-memory backend with persistence at {}",
                json_path.display()
            );
            let backend = InMemory::load_from_file(&json_path)?;
            if !backend.is_empty() {
                tracing::info!("Loaded existing data from {}", json_path.display());
            }
            Ok(Box::new(backend))
        }
    }
}

/// Login settings from the defaults plus any command-line overrides
pub fn login_config(args: &StoreArgs) -> LoginConfig {
    let mut config = LoginConfig::default();
    if let Some(name) = &args.admin_name {
        config.admin_name = name.clone();
    }
    if let Some(length) = args.password_length {
        config.password_length = length;
    }
    config
}

/// Open the store and run bootstrap
pub fn open_manager(args: &StoreArgs) -> Result<LoginManager, Box<dyn std::error::Error>> {
    let store = RecordStore::new(create_backend(args)?);
    let manager = LoginManager::new(
        store,
        SessionKey::generate(),
        Arc::new(SystemClock),
        login_config(args),
    )?;
    Ok(manager)
}

/// Write the in-memory engine back to its JSON file. Other engines persist on every write.
pub fn save_backend(
    store: &RecordStore,
    args: &StoreArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(in_memory) = store.backend().as_any().downcast_ref::<InMemory>() {
        let json_path = data_dir(args).join(JSON_FILE);
        save_in_memory(in_memory, &json_path)?;
    }
    Ok(())
}

fn save_in_memory(backend: &InMemory, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    backend.save_to_file(path)?;
    tracing::debug!("Saved {} records to {}", backend.len(), path.display());
    Ok(())
}
