use tabkeep::{Tab, TabId};

use super::helpers::{add_tab, add_user};
use crate::helpers::setup_store;

#[test]
fn test_create_tab_updates_owner_index() {
    let store = setup_store();
    add_user(&store, "alice");
    let first = add_tab(&store, "alice", false, "one");
    let second = add_tab(&store, "alice", true, "two");

    let alice = store.get_user("alice").unwrap();
    assert_eq!(alice.tabs, vec![first.id, second.id]);
    assert_eq!(store.get_user_tabs(&alice).unwrap(), vec![first, second]);
}

#[test]
fn test_create_tab_for_missing_owner_writes_nothing() {
    let store = setup_store();
    let tab = Tab::new("ghost", true, "x");

    assert!(store.create_tab(&tab).unwrap_err().is_not_found());
    assert!(store.get_tab(tab.id).unwrap_err().is_not_found());
    assert!(store.get_tabs().unwrap().is_empty());
}

#[test]
fn test_tab_contents_round_trip() {
    let store = setup_store();
    add_user(&store, "alice");
    let empty = add_tab(&store, "alice", false, "");
    let text = "e|0 2 2 0|\nB|0 3 2 0|\t\"quoted\" ünïcödé";
    let populated = add_tab(&store, "alice", true, text);

    assert_eq!(store.get_tab(empty.id).unwrap().contents, "");
    let loaded = store.get_tab(populated.id).unwrap();
    assert_eq!(loaded, populated);
    assert_eq!(loaded.contents, text);
}

#[test]
fn test_public_tabs_filter() {
    let store = setup_store();
    add_user(&store, "alice");
    add_user(&store, "bob");
    let public_a = add_tab(&store, "alice", true, "a");
    add_tab(&store, "alice", false, "hidden");
    let public_b = add_tab(&store, "bob", true, "b");

    let mut public = store.get_public_tabs().unwrap();
    public.sort_by_key(|tab| tab.id);
    let mut expected = vec![public_a, public_b];
    expected.sort_by_key(|tab| tab.id);
    assert_eq!(public, expected);
    assert_eq!(store.get_tabs().unwrap().len(), 3);
}

#[test]
fn test_set_tab_replaces_contents_and_visibility() {
    let store = setup_store();
    add_user(&store, "alice");
    let mut tab = add_tab(&store, "alice", false, "draft");

    tab.contents = "final".into();
    tab.public = true;
    store.set_tab(tab.id, &tab).unwrap();

    assert_eq!(store.get_tab(tab.id).unwrap(), tab);
    // The index is untouched by edits.
    assert_eq!(store.get_user("alice").unwrap().tabs, vec![tab.id]);
}

#[test]
fn test_set_tab_rejects_owner_change() {
    let store = setup_store();
    add_user(&store, "alice");
    add_user(&store, "bob");
    let tab = add_tab(&store, "alice", false, "mine");

    let mut stolen = tab.clone();
    stolen.owner = "bob".into();
    let err = store.set_tab(tab.id, &stolen).unwrap_err();
    assert!(err.is_validation_error());
    assert_eq!(store.get_tab(tab.id).unwrap(), tab);
}

#[test]
fn test_set_tab_rejects_id_mismatch_and_missing() {
    let store = setup_store();
    add_user(&store, "alice");
    let tab = add_tab(&store, "alice", false, "x");

    assert!(store.set_tab(TabId::new(), &tab).unwrap_err().is_validation_error());

    let unsaved = Tab::new("alice", false, "never created");
    assert!(store.set_tab(unsaved.id, &unsaved).unwrap_err().is_not_found());
}

#[test]
fn test_remove_tab_updates_owner_index() {
    let store = setup_store();
    add_user(&store, "alice");
    let keep = add_tab(&store, "alice", false, "keep");
    let gone = add_tab(&store, "alice", false, "gone");

    store.remove_tab(&gone).unwrap();

    assert!(store.get_tab(gone.id).unwrap_err().is_not_found());
    let alice = store.get_user("alice").unwrap();
    assert_eq!(alice.tabs, vec![keep.id]);
    assert_eq!(store.get_user_tabs(&alice).unwrap(), vec![keep]);
}

#[test]
fn test_user_tabs_skip_missing_records() {
    let store = setup_store();
    add_user(&store, "alice");
    let tab = add_tab(&store, "alice", false, "x");
    let ghost = TabId::new();
    store.add_tab_to_user("alice", ghost).unwrap();

    let alice = store.get_user("alice").unwrap();
    assert_eq!(alice.tabs.len(), 2);
    assert_eq!(store.get_user_tabs(&alice).unwrap(), vec![tab]);
}

#[test]
fn test_tab_id_parse() {
    let id = TabId::new();
    assert_eq!(TabId::parse(&id.to_string()).unwrap(), id);

    let err = TabId::parse("not-a-uuid").unwrap_err();
    assert!(tabkeep::Error::from(err).is_validation_error());
}
