use std::sync::Arc;

use tabkeep::{FixedClock, LoginConfig, LoginManager, SessionKey};

use crate::helpers::{fast_config, setup_login, setup_login_with, setup_store};

#[test]
fn test_empty_store_gets_exactly_one_admin() {
    let (manager, _clock) = setup_login();
    let store = manager.store();

    assert_eq!(store.count_users().unwrap(), 1);
    assert_eq!(store.count_admin_users().unwrap(), 1);

    let admin = store.get_user("admin").unwrap();
    assert!(admin.admin);
    assert!(admin.tabs.is_empty());
    assert!(admin.password_hash.starts_with("$argon2id$"));
}

#[test]
fn test_bootstrap_uses_configured_name() {
    let config = LoginConfig {
        admin_name: "root".into(),
        password_length: 32,
        ..fast_config()
    };
    let manager = LoginManager::new(
        setup_store(),
        SessionKey::generate(),
        Arc::new(FixedClock::default()),
        config,
    )
    .unwrap();

    let users = manager.store().get_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].name, "root");
    assert!(users[0].admin);
}

#[test]
fn test_second_manager_does_not_bootstrap_again() {
    let store = setup_store();
    let (first, _) = setup_login_with(store.clone());
    let admin = first.store().get_user("admin").unwrap();

    let (_second, _) = setup_login_with(store.clone());
    assert_eq!(store.count_users().unwrap(), 1);
    // The original credentials are untouched.
    assert_eq!(store.get_user("admin").unwrap(), admin);
}

#[test]
fn test_empty_charset_is_rejected() {
    let config = LoginConfig {
        password_charset: String::new(),
        ..fast_config()
    };
    let err = LoginManager::new(
        setup_store(),
        SessionKey::generate(),
        Arc::new(FixedClock::default()),
        config,
    )
    .unwrap_err();
    assert!(err.is_validation_error());
}
