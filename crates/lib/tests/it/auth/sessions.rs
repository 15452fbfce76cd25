use std::sync::Arc;

use base64ct::{Base64UrlUnpadded, Encoding};
use tabkeep::{Clock, LoginManager, SessionKey};

use crate::helpers::{add_user, fast_config, setup_login};

#[test]
fn test_token_round_trip() {
    let (manager, _) = setup_login();
    add_user(&manager, "alice", "password1");
    let session = manager.log_in("alice", "password1").unwrap();

    let token_user = manager.new_token_user(session.clone()).unwrap();
    assert_eq!(token_user.user, session);

    let user = manager.decode_assertion(&token_user.token).unwrap();
    assert_eq!(user.name, "alice");
    assert!(!user.admin);
}

#[test]
fn test_claims_carry_subject_and_lifetime() {
    let (manager, clock) = setup_login();
    add_user(&manager, "alice", "password1");
    let session = manager.log_in("alice", "password1").unwrap();
    let token = manager.new_assertion(&session).unwrap();

    let claims_b64 = token.split('.').nth(1).unwrap();
    let claims: serde_json::Value =
        serde_json::from_slice(&Base64UrlUnpadded::decode_vec(claims_b64).unwrap()).unwrap();
    let now = clock.now_secs();
    assert_eq!(claims["sub"], "alice");
    assert_eq!(claims["iat"], now);
    assert_eq!(claims["exp"], now + 30 * 24 * 60 * 60);
    assert_eq!(claims["user"]["name"], "alice");
    assert_eq!(claims["user"]["admin"], false);
}

#[test]
fn test_admin_granted_after_issue_is_honored() {
    let (manager, _) = setup_login();
    add_user(&manager, "alice", "password1");
    let session = manager.log_in("alice", "password1").unwrap();
    let token = manager.new_assertion(&session).unwrap();

    manager.set_admin("alice", true).unwrap();

    assert!(manager.decode_assertion(&token).unwrap().admin);
}

#[test]
fn test_admin_revoked_after_issue_is_honored() {
    let (manager, _) = setup_login();
    manager
        .create_user(&tabkeep::auth::NewUser::new("root", "password1", true))
        .unwrap();
    let admin = manager
        .store()
        .get_user("admin")
        .map(|u| tabkeep::SessionUser::from(&u))
        .unwrap();
    let token = manager.new_assertion(&admin).unwrap();

    manager.set_admin("admin", false).unwrap();

    assert!(!manager.decode_assertion(&token).unwrap().admin);
}

#[test]
fn test_token_expires() {
    let (manager, clock) = setup_login();
    add_user(&manager, "alice", "password1");
    let token = manager
        .new_assertion(&manager.log_in("alice", "password1").unwrap())
        .unwrap();

    clock.advance_secs(29 * 24 * 60 * 60);
    assert!(manager.decode_assertion(&token).is_ok());

    clock.advance_secs(24 * 60 * 60);
    let err = manager.decode_assertion(&token).unwrap_err();
    assert!(err.is_authentication_error());
}

#[test]
fn test_deleted_user_token_fails() {
    let (manager, _) = setup_login();
    add_user(&manager, "alice", "password1");
    let token = manager
        .new_assertion(&manager.log_in("alice", "password1").unwrap())
        .unwrap();

    manager.store().remove_user("alice").unwrap();

    let err = manager.decode_assertion(&token).unwrap_err();
    assert!(err.is_authentication_error());
    assert!(!err.is_not_found());
}

#[test]
fn test_new_key_invalidates_old_tokens() {
    let (manager, _) = setup_login();
    add_user(&manager, "alice", "password1");
    let token = manager
        .new_assertion(&manager.log_in("alice", "password1").unwrap())
        .unwrap();
    let store = manager.store().clone();
    drop(manager);

    // A restart generates a fresh key.
    let restarted = LoginManager::new(
        store,
        SessionKey::generate(),
        Arc::new(tabkeep::FixedClock::default()),
        fast_config(),
    )
    .unwrap();
    assert!(
        restarted
            .decode_assertion(&token)
            .unwrap_err()
            .is_authentication_error()
    );
}

#[test]
fn test_persisted_key_keeps_tokens_valid() {
    let (manager, _) = setup_login();
    add_user(&manager, "alice", "password1");
    let token = manager
        .new_assertion(&manager.log_in("alice", "password1").unwrap())
        .unwrap();

    let key = SessionKey::generate();
    let secret = key.to_bytes();
    let store = manager.store().clone();

    let signer = LoginManager::new(
        store.clone(),
        key,
        Arc::new(tabkeep::FixedClock::default()),
        fast_config(),
    )
    .unwrap();
    let token_from_signer = signer
        .new_assertion(&signer.log_in("alice", "password1").unwrap())
        .unwrap();
    drop(signer);

    let restored = LoginManager::new(
        store,
        SessionKey::from_bytes(&secret),
        Arc::new(tabkeep::FixedClock::default()),
        fast_config(),
    )
    .unwrap();
    assert_eq!(
        restored.decode_assertion(&token_from_signer).unwrap().name,
        "alice"
    );
    // Tokens from the first manager's key are still rejected.
    assert!(restored.decode_assertion(&token).is_err());
}

#[test]
fn test_tampered_token_fails() {
    let (manager, _) = setup_login();
    add_user(&manager, "alice", "password1");
    let token = manager
        .new_assertion(&manager.log_in("alice", "password1").unwrap())
        .unwrap();

    let mut forged = token.into_bytes();
    let last = forged.len() - 1;
    forged[last] = if forged[last] == b'A' { b'B' } else { b'A' };
    let forged = String::from_utf8(forged).unwrap();

    assert!(
        manager
            .decode_assertion(&forged)
            .unwrap_err()
            .is_authentication_error()
    );
    for garbage in ["", "a.b.c", "x"] {
        assert!(manager.decode_assertion(garbage).is_err());
    }
}
