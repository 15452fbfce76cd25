use tabkeep::auth::NewUser;

use crate::helpers::{add_user, setup_login};

#[test]
fn test_create_then_log_in() {
    let (manager, _) = setup_login();
    add_user(&manager, "alice", "correct horse");
    let created = manager
        .create_user(&NewUser::new("bob", "battery staple", true))
        .unwrap();
    assert!(!created);

    let alice = manager.log_in("alice", "correct horse").unwrap();
    assert_eq!(alice.name, "alice");
    assert!(!alice.admin);

    let bob = manager.log_in("bob", "battery staple").unwrap();
    assert_eq!(bob.name, "bob");
    assert!(bob.admin);
}

#[test]
fn test_wrong_password_fails() {
    let (manager, _) = setup_login();
    add_user(&manager, "alice", "correct horse");

    let err = manager.log_in("alice", "Correct horse").unwrap_err();
    assert!(err.is_authentication_error());
    assert_eq!(err.module(), "auth");
}

#[test]
fn test_unknown_user_fails_like_wrong_password() {
    let (manager, _) = setup_login();
    add_user(&manager, "alice", "password1");

    let unknown = manager.log_in("mallory", "password1").unwrap_err();
    let wrong = manager.log_in("alice", "not password1").unwrap_err();
    assert!(unknown.is_authentication_error());
    assert!(!unknown.is_not_found());
    assert_eq!(unknown.to_string(), wrong.to_string());
}

#[test]
fn test_duplicate_create_keeps_original_password() {
    let (manager, _) = setup_login();
    add_user(&manager, "alice", "original");
    let before = manager.store().get_user("alice").unwrap();

    let existed = manager
        .create_user(&NewUser::new("alice", "replacement", true))
        .unwrap();
    assert!(existed);

    assert_eq!(manager.store().get_user("alice").unwrap(), before);
    assert!(manager.log_in("alice", "original").is_ok());
    assert!(manager.log_in("alice", "replacement").is_err());
}

#[test]
fn test_concurrent_create_same_name_has_one_winner() {
    let (manager, _) = setup_login();

    let outcomes: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let manager = &manager;
                scope.spawn(move || {
                    manager
                        .create_user(&NewUser::new("alice", format!("password{i}"), false))
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(outcomes.iter().filter(|existed| !**existed).count(), 1);
    assert_eq!(manager.store().count_users().unwrap(), 2);
}

#[test]
fn test_change_password_with_current_record() {
    let (manager, _) = setup_login();
    add_user(&manager, "alice", "old password");
    let tab = tabkeep::Tab::new("alice", false, "");
    manager.store().create_tab(&tab).unwrap();

    let current = manager.store().get_user("alice").unwrap();
    manager.change_password(&current, "new password").unwrap();

    assert!(manager.log_in("alice", "old password").unwrap_err().is_authentication_error());
    manager.log_in("alice", "new password").unwrap();
    assert_eq!(manager.store().get_user("alice").unwrap().tabs, vec![tab.id]);
}

#[test]
fn test_change_password_with_stale_record_drops_new_tabs() {
    let (manager, _) = setup_login();
    add_user(&manager, "alice", "old password");
    let stale = manager.store().get_user("alice").unwrap();
    manager
        .store()
        .create_tab(&tabkeep::Tab::new("alice", false, ""))
        .unwrap();

    manager.change_password(&stale, "new password").unwrap();

    assert!(manager.store().get_user("alice").unwrap().tabs.is_empty());
}

#[test]
fn test_set_admin_changes_login_descriptor() {
    let (manager, _) = setup_login();
    add_user(&manager, "alice", "password1");

    manager.set_admin("alice", true).unwrap();
    assert!(manager.log_in("alice", "password1").unwrap().admin);

    manager.set_admin("alice", false).unwrap();
    assert!(!manager.log_in("alice", "password1").unwrap().admin);

    assert!(manager.set_admin("ghost", true).unwrap_err().is_not_found());
}

#[test]
fn test_last_admin_survives_concurrent_removal() {
    let (manager, _) = setup_login();
    manager
        .create_user(&NewUser::new("root", "password1", true))
        .unwrap();

    let results: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = ["admin", "root"]
            .into_iter()
            .map(|name| {
                let manager = &manager;
                scope.spawn(move || match manager.remove_user(name) {
                    Ok(()) => true,
                    Err(e) if e.is_conflict() => false,
                    Err(e) => panic!("unexpected error: {e}"),
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(results.iter().filter(|removed| **removed).count(), 1);
    assert_eq!(manager.store().count_admin_users().unwrap(), 1);
}

#[test]
fn test_demoting_and_removing_admins_keeps_one() {
    let (manager, _) = setup_login();
    manager
        .create_user(&NewUser::new("root", "password1", true))
        .unwrap();

    std::thread::scope(|scope| {
        let manager = &manager;
        scope.spawn(move || {
            let _ = manager.set_admin("admin", false);
        });
        scope.spawn(move || {
            let _ = manager.remove_user("root");
        });
    });

    assert_eq!(manager.store().count_admin_users().unwrap(), 1);
}

#[test]
fn test_account_rules_on_registration() {
    let (manager, _) = setup_login();

    let empty = manager
        .register(&NewUser::new("", "password1", false))
        .unwrap_err();
    assert!(empty.is_validation_error());

    let short = manager
        .register(&NewUser::new("alice", "seven77", false))
        .unwrap_err();
    assert!(short.is_validation_error());

    assert_eq!(manager.store().count_users().unwrap(), 1);
    manager
        .register(&NewUser::new("alice", "eight888", false))
        .unwrap();
}
