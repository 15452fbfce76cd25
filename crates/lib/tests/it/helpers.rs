use std::sync::Arc;

use tabkeep::{
    FixedClock, LoginConfig, LoginManager, RecordStore, SessionKey,
    auth::{HashParams, NewUser},
    backend::{Backend, database::InMemory},
};

/// Every available engine, each fresh, with the directory that must outlive it.
pub fn engines() -> Vec<(&'static str, Box<dyn Backend>, Option<tempfile::TempDir>)> {
    let mut engines: Vec<(&'static str, Box<dyn Backend>, Option<tempfile::TempDir>)> =
        vec![("inmemory", Box::new(InMemory::new()), None)];

    #[cfg(feature = "redb")]
    {
        let dir = tempfile::tempdir().unwrap();
        let redb = tabkeep::backend::database::Redb::open(dir.path().join("tabkeep.redb")).unwrap();
        engines.push(("redb", Box::new(redb), Some(dir)));
    }

    engines
}

/// A store over a fresh in-memory engine.
pub fn setup_store() -> RecordStore {
    RecordStore::new(Box::new(InMemory::new()))
}

/// Default settings with the cheapest Argon2 cost, so tests don't spend seconds hashing.
pub fn fast_config() -> LoginConfig {
    LoginConfig {
        hash_params: HashParams {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
        },
        ..LoginConfig::default()
    }
}

/// A login manager over `store` driven by a controllable clock.
pub fn setup_login_with(store: RecordStore) -> (LoginManager, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::default());
    let manager = LoginManager::new(store, SessionKey::generate(), clock.clone(), fast_config())
        .expect("Failed to create login manager");
    (manager, clock)
}

/// A login manager over a fresh in-memory store.
pub fn setup_login() -> (LoginManager, Arc<FixedClock>) {
    setup_login_with(setup_store())
}

/// Creates a non-admin user, asserting it did not exist before.
pub fn add_user(manager: &LoginManager, name: &str, password: &str) {
    let existed = manager
        .create_user(&NewUser::new(name, password, false))
        .expect("Failed to create user");
    assert!(!existed, "user {name} already existed");
}
