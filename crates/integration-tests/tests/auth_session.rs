//! Authentication session persisted through the file store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cohort_client::auth::{AuthSession, LoginError};
use cohort_client::storage::{FileStore, KeyValueStore, keys};
use cohort_core::User;
use cohort_integration_tests::StoreDir;

fn user() -> User {
    let mut user = User::new("42", "9998887777", "91");
    user.name = Some("Asha".to_string());
    user
}

fn counter(session: &AuthSession) -> (Arc<AtomicUsize>, cohort_client::notify::Subscription) {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let sub = session.subscribe(move || {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    (count, sub)
}

#[test]
fn test_login_persists_and_notifies_once() {
    let dir = StoreDir::new();
    let session = AuthSession::load(Arc::new(FileStore::new(dir.store_path())));
    let (count, _sub) = counter(&session);

    session.login("abc", user()).unwrap();

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(session.check_auth());
    assert_eq!(session.user().unwrap().display_name(), "Asha");

    let restarted = AuthSession::load(Arc::new(FileStore::new(dir.store_path())));
    assert!(restarted.is_authenticated());
    assert_eq!(restarted.token().unwrap().expose(), "abc");
    assert_eq!(restarted.user().unwrap(), user());
}

#[test]
fn test_blank_token_changes_nothing() {
    let dir = StoreDir::new();
    let store = Arc::new(FileStore::new(dir.store_path()));
    let session = AuthSession::load(store.clone());
    let (count, _sub) = counter(&session);

    assert!(matches!(session.login("   ", user()), Err(LoginError::EmptyToken)));

    assert_eq!(count.load(Ordering::SeqCst), 0);
    assert!(!session.check_auth());
    assert_eq!(store.read(keys::AUTH_USER), None);
}

#[test]
fn test_logout_removes_both_keys() {
    let dir = StoreDir::new();
    let store = Arc::new(FileStore::new(dir.store_path()));
    let session = AuthSession::load(store.clone());
    session.login("abc", user()).unwrap();
    let (count, _sub) = counter(&session);

    session.logout();

    assert_eq!(count.load(Ordering::SeqCst), 1);
    assert!(!session.check_auth());
    assert_eq!(store.read(keys::AUTH_TOKEN), None);
    assert_eq!(store.read(keys::AUTH_USER), None);

    let raw = std::fs::read_to_string(dir.store_path()).unwrap();
    assert!(!raw.contains("auth_"));
}

#[test]
fn test_token_without_user_is_discarded_on_load() {
    let dir = StoreDir::new();
    let store = Arc::new(FileStore::new(dir.store_path()));
    store.write(keys::AUTH_TOKEN, "orphan");

    let session = AuthSession::load(store.clone());

    assert!(!session.is_authenticated());
    assert!(!session.check_auth());
    assert_eq!(store.read(keys::AUTH_TOKEN), None);
}

#[test]
fn test_external_token_removal_is_seen() {
    let dir = StoreDir::new();
    let session = AuthSession::load(Arc::new(FileStore::new(dir.store_path())));
    session.login("abc", user()).unwrap();
    let (count, _sub) = counter(&session);

    // A second process signs out.
    AuthSession::load(Arc::new(FileStore::new(dir.store_path()))).logout();

    assert!(!session.check_auth());
    assert!(session.is_authenticated());

    session.reload();
    assert!(!session.is_authenticated());
    assert_eq!(count.load(Ordering::SeqCst), 1);
}
