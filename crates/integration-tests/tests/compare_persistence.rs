//! Comparison list persisted through the file store.

use std::sync::Arc;

use cohort_client::compare::{AddOutcome, CompareList};
use cohort_client::storage::{FileStore, KeyValueStore, keys};
use cohort_core::{ComparisonEntry, PropertyId};
use cohort_integration_tests::StoreDir;
use pretty_assertions::assert_eq;

fn entry(id: &str) -> ComparisonEntry {
    ComparisonEntry::new(id, format!("Tower {id}"), "₹ 95 L").with_location("Hinjewadi")
}

fn ids(list: &CompareList) -> Vec<String> {
    list.entries().into_iter().map(|e| e.id.into_inner()).collect()
}

#[test]
fn test_list_survives_restart() {
    let dir = StoreDir::new();
    {
        let list = CompareList::load(Arc::new(FileStore::new(dir.store_path())));
        assert_eq!(list.add(entry("a")), AddOutcome::Added);
        assert_eq!(list.add(entry("b")), AddOutcome::Added);
        assert_eq!(list.add(entry("c")), AddOutcome::Added);
        list.remove(&PropertyId::new("b"));
    }

    let list = CompareList::load(Arc::new(FileStore::new(dir.store_path())));
    assert_eq!(ids(&list), vec!["a", "c"]);
    assert_eq!(list.entries()[0], entry("a"));
}

#[test]
fn test_stored_json_shape() {
    let dir = StoreDir::new();
    let store = Arc::new(FileStore::new(dir.store_path()));
    let list = CompareList::load(store.clone());
    list.add(ComparisonEntry::new("12", "Palm Grove", "₹ 70 L"));

    let raw = store.read(keys::COMPARE_LIST).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{"id": "12", "title": "Palm Grove", "price": "₹ 70 L"}])
    );
}

#[test]
fn test_numeric_ids_from_older_writers() {
    let dir = StoreDir::new();
    let store = Arc::new(FileStore::new(dir.store_path()));
    store.write(
        keys::COMPARE_LIST,
        r#"[{"id": 7, "title": "Seven", "price": "1"}, {"id": "7", "title": "Dup", "price": "1"}]"#,
    );

    let list = CompareList::load(store);
    assert_eq!(ids(&list), vec!["7"]);
    assert!(list.contains(&PropertyId::from(7_i64)));
}

#[test]
fn test_oversized_stored_list_is_trimmed() {
    let dir = StoreDir::new();
    let store = Arc::new(FileStore::new(dir.store_path()));
    let six: Vec<ComparisonEntry> = ["a", "b", "c", "d", "e", "f"].into_iter().map(entry).collect();
    store.write(keys::COMPARE_LIST, &serde_json::to_string(&six).unwrap());

    let list = CompareList::load(store);
    assert_eq!(ids(&list), vec!["a", "b", "c", "d"]);
    assert_eq!(list.add(entry("g")), AddOutcome::Full);
}

#[test]
fn test_corrupt_file_starts_empty_and_recovers() {
    let dir = StoreDir::new();
    std::fs::write(dir.store_path(), "{ not json").unwrap();

    let store = Arc::new(FileStore::new(dir.store_path()));
    let list = CompareList::load(store);
    assert_eq!(list.count(), 0);

    assert_eq!(list.add(entry("a")), AddOutcome::Added);
    let reopened = CompareList::load(Arc::new(FileStore::new(dir.store_path())));
    assert_eq!(ids(&reopened), vec!["a"]);
}

#[test]
fn test_instances_diverge_until_reload() {
    let dir = StoreDir::new();
    let first = CompareList::load(Arc::new(FileStore::new(dir.store_path())));
    let second = CompareList::load(Arc::new(FileStore::new(dir.store_path())));

    first.add(entry("a"));
    assert_eq!(second.count(), 0);

    second.reload();
    assert_eq!(ids(&second), vec!["a"]);
}
