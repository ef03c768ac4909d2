use super::*;
use crate::storage::MemoryStorage;

fn user(id: i64, name: &str) -> User {
    serde_json::from_value(serde_json::json!({ "id": id, "username": name })).unwrap()
}

fn storage_with(entries: &[(&str, &str)]) -> Arc<dyn Storage> {
    Arc::new(MemoryStorage::with_entries(entries.iter().copied()))
}

// =============================================================
// Hydration
// =============================================================

#[test]
fn restore_empty_storage_is_anonymous() {
    let session = Session::restore(storage_with(&[]));
    assert_eq!(session.snapshot(), SessionState::Anonymous);
    assert!(!session.is_authenticated());
    assert!(!session.is_loading());
}

#[test]
fn restore_token_and_user() {
    let session = Session::restore(storage_with(&[
        (TOKEN_KEY, "tok-1"),
        (USER_KEY, r#"{"id":4,"username":"dana"}"#),
    ]));
    assert!(session.is_authenticated());
    assert_eq!(session.token().as_deref(), Some("tok-1"));
    assert_eq!(session.user().map(|u| u.username), Some("dana".to_owned()));
}

#[test]
fn restore_corrupt_user_keeps_token() {
    let session = Session::restore(storage_with(&[(TOKEN_KEY, "tok-1"), (USER_KEY, "{not json")]));
    assert!(session.is_authenticated());
    assert_eq!(session.user(), None);
}

#[test]
fn restore_null_user_is_absent() {
    let session = Session::restore(storage_with(&[(TOKEN_KEY, "tok-1"), (USER_KEY, "null")]));
    assert_eq!(session.user(), None);
}

#[test]
fn restore_user_without_token_is_anonymous() {
    let session = Session::restore(storage_with(&[(USER_KEY, r#"{"id":4,"username":"dana"}"#)]));
    assert!(!session.is_authenticated());
    assert_eq!(session.user(), None);
}

#[test]
fn restore_empty_token_is_anonymous() {
    let session = Session::restore(storage_with(&[(TOKEN_KEY, "")]));
    assert!(!session.is_authenticated());
}

// =============================================================
// Transitions
// =============================================================

#[test]
fn establish_persists_both_entries() {
    let storage = storage_with(&[]);
    let session = Session::restore(storage.clone());
    session.establish(user(1, "erin"), "tok-9".to_owned());

    assert!(session.is_authenticated());
    assert_eq!(storage.get(TOKEN_KEY).as_deref(), Some("tok-9"));
    let stored: User = serde_json::from_str(&storage.get(USER_KEY).unwrap()).unwrap();
    assert_eq!(stored.username, "erin");
}

#[test]
fn invalidate_clears_memory_and_storage() {
    let storage = storage_with(&[(TOKEN_KEY, "tok-1"), (USER_KEY, r#"{"id":1,"username":"x"}"#)]);
    let session = Session::restore(storage.clone());
    session.invalidate();

    assert_eq!(session.snapshot(), SessionState::Anonymous);
    assert_eq!(storage.get(TOKEN_KEY), None);
    assert_eq!(storage.get(USER_KEY), None);
}

#[test]
fn begin_from_anonymous_is_loading_but_not_authenticated() {
    let session = Session::restore(storage_with(&[]));
    let _scope = session.begin(true);
    assert!(session.is_loading());
    assert!(!session.is_authenticated());
}

#[test]
fn begin_keeps_prior_identity_authenticated() {
    let session = Session::restore(storage_with(&[(TOKEN_KEY, "tok-1")]));
    let _scope = session.begin(false);
    assert!(session.is_loading());
    assert!(session.is_authenticated());
}

#[test]
fn dropping_scope_restores_prior_identity() {
    let session = Session::restore(storage_with(&[(TOKEN_KEY, "tok-1")]));
    drop(session.begin(false));
    assert!(!session.is_loading());
    assert_eq!(session.token().as_deref(), Some("tok-1"));
}

#[test]
fn dropping_scope_after_establish_keeps_new_identity() {
    let session = Session::restore(storage_with(&[]));
    {
        let _scope = session.begin(true);
        session.establish(user(2, "finn"), "tok-2".to_owned());
    }
    assert!(matches!(session.snapshot(), SessionState::Authenticated(ref i) if i.token == "tok-2"));
}

#[test]
fn invalidate_during_action_is_not_undone_by_scope() {
    let session = Session::restore(storage_with(&[(TOKEN_KEY, "tok-1")]));
    {
        let _scope = session.begin(false);
        session.invalidate();
    }
    assert_eq!(session.snapshot(), SessionState::Anonymous);
}

#[test]
fn replace_user_without_token_is_ignored() {
    let session = Session::restore(storage_with(&[]));
    assert!(!session.replace_user(user(1, "ghost")));
    assert_eq!(session.user(), None);
    assert!(session.storage().get(USER_KEY).is_none());
}

#[test]
fn replace_user_keeps_token() {
    let session = Session::restore(storage_with(&[(TOKEN_KEY, "tok-1")]));
    assert!(session.replace_user(user(3, "gwen")));
    assert_eq!(session.token().as_deref(), Some("tok-1"));
    assert_eq!(session.user().map(|u| u.id), Some(3));
}

#[test]
fn begin_with_clear_error_resets_error() {
    let session = Session::restore(storage_with(&[]));
    session.record_error("Login failed".to_owned());
    drop(session.begin(false));
    assert_eq!(session.error().as_deref(), Some("Login failed"));
    drop(session.begin(true));
    assert_eq!(session.error(), None);
}

#[test]
fn clones_share_state() {
    let session = Session::restore(storage_with(&[]));
    let other = session.clone();
    other.establish(user(1, "hal"), "tok".to_owned());
    assert!(session.is_authenticated());
}
