//! The same contract checks run against every engine.

use tabkeep::backend::{Backend, database::InMemory};

use crate::helpers::engines;

#[test]
fn test_get_missing_key() {
    for (name, engine, _dir) in engines() {
        let err = engine.get(b"user_nobody").unwrap_err();
        assert!(err.is_not_found(), "{name}: {err}");
        assert_eq!(err.module(), "backend");
    }
}

#[test]
fn test_put_get_overwrite() {
    for (name, engine, _dir) in engines() {
        engine.put(b"user_alice", b"one").unwrap();
        assert_eq!(engine.get(b"user_alice").unwrap(), b"one", "{name}");

        engine.put(b"user_alice", b"two").unwrap();
        assert_eq!(engine.get(b"user_alice").unwrap(), b"two", "{name}");
    }
}

#[test]
fn test_delete_is_idempotent() {
    for (name, engine, _dir) in engines() {
        engine.put(b"tab_1", b"x").unwrap();
        engine.delete(b"tab_1").unwrap();
        assert!(engine.get(b"tab_1").unwrap_err().is_not_found(), "{name}");

        engine.delete(b"tab_1").unwrap();
        engine.delete(b"never_written").unwrap();
    }
}

#[test]
fn test_scan_prefix_is_ordered_and_bounded() {
    for (name, engine, _dir) in engines() {
        for key in ["user_carol", "tab_b", "user_alice", "tab_a", "users", "user_bob", "v"] {
            engine.put(key.as_bytes(), key.as_bytes()).unwrap();
        }

        let keys: Vec<Vec<u8>> = engine
            .scan_prefix(b"user_")
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            keys,
            vec![
                b"user_alice".to_vec(),
                b"user_bob".to_vec(),
                b"user_carol".to_vec()
            ],
            "{name}"
        );

        let tabs = engine.scan_prefix(b"tab_").unwrap();
        assert_eq!(tabs.len(), 2, "{name}");
        assert_eq!(tabs[0], (b"tab_a".to_vec(), b"tab_a".to_vec()));

        assert!(engine.scan_prefix(b"zzz").unwrap().is_empty(), "{name}");
    }
}

#[test]
fn test_empty_value_round_trips() {
    for (name, engine, _dir) in engines() {
        engine.put(b"tab_empty", b"").unwrap();
        assert!(engine.get(b"tab_empty").unwrap().is_empty(), "{name}");
    }
}

#[test]
fn test_downcast_to_concrete_engine() {
    let engine: Box<dyn Backend> = Box::new(InMemory::new());
    engine.put(b"k", b"v").unwrap();
    let in_memory = engine
        .as_any()
        .downcast_ref::<InMemory>()
        .expect("engine should be InMemory");
    assert_eq!(in_memory.len(), 1);
}
