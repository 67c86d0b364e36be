use std::{fs, sync::Arc};

use sales_core::{encode_records, RecordStore, SaleForm, SalesBook, SystemClock, DEFAULT_STORE_KEY};
use sales_domain::SaleRecord;
use sales_storage_json::{JsonFileStore, StoragePaths};
use tempfile::tempdir;

fn records(count: usize) -> Vec<SaleRecord> {
    (0..count)
        .map(|idx| {
            SaleRecord::new(
                idx.to_string(),
                "Crystal",
                1.0,
                idx as f64,
                "05/09/2025",
            )
        })
        .collect()
}

#[test]
fn json_store_saves_and_loads_blob() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(StoragePaths::under(dir.path())).expect("create store");

    assert!(store.load(DEFAULT_STORE_KEY).unwrap().is_none());

    let blob = encode_records(&records(2)).unwrap();
    store.save(DEFAULT_STORE_KEY, &blob).expect("save blob");

    assert_eq!(store.load(DEFAULT_STORE_KEY).unwrap(), Some(blob));
    let path = store.blob_path(DEFAULT_STORE_KEY);
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn overwrites_rotate_previous_blob_into_backups() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::with_retention(StoragePaths::under(dir.path()), 2)
        .expect("create store");

    for count in 1..=4 {
        store
            .save(DEFAULT_STORE_KEY, &encode_records(&records(count)).unwrap())
            .expect("save blob");
    }

    let backups = store.list_backups(DEFAULT_STORE_KEY).expect("list backups");
    assert_eq!(backups.len(), 2, "retention should prune older backups");

    let sizes: Vec<usize> = backups
        .iter()
        .map(|backup| store.read_backup(backup).expect("read backup").len())
        .collect();
    assert_eq!(sizes, vec![3, 2]);
}

#[test]
fn back_to_back_saves_keep_every_backup() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(StoragePaths::under(dir.path())).expect("create store");

    for count in 1..=4 {
        store
            .save(DEFAULT_STORE_KEY, &encode_records(&records(count)).unwrap())
            .expect("save blob");
    }

    let backups = store.list_backups(DEFAULT_STORE_KEY).expect("list backups");
    let sizes: Vec<usize> = backups
        .iter()
        .map(|backup| store.read_backup(backup).expect("read backup").len())
        .collect();
    assert_eq!(sizes, vec![3, 2, 1]);
}

#[test]
fn restoring_a_backup_through_the_book_replaces_the_live_blob() {
    let dir = tempdir().expect("tempdir");
    let store = Arc::new(JsonFileStore::new(StoragePaths::under(dir.path())).unwrap());

    store
        .save(DEFAULT_STORE_KEY, &encode_records(&records(1)).unwrap())
        .unwrap();
    store.save(DEFAULT_STORE_KEY, "{corrupt").unwrap();

    let backups = store.list_backups(DEFAULT_STORE_KEY).unwrap();
    let restored = store.read_backup(&backups[0]).expect("read backup");

    let mut book = SalesBook::new(store.clone(), DEFAULT_STORE_KEY, Arc::new(SystemClock));
    assert!(book.reload().is_empty());
    assert_eq!(book.replace_all(restored).expect("restore").len(), 1);

    let live = store.load(DEFAULT_STORE_KEY).unwrap().unwrap();
    assert_eq!(sales_core::decode_records(&live).unwrap().len(), 1);
    assert_eq!(store.list_backups(DEFAULT_STORE_KEY).unwrap().len(), 2);
}

#[test]
fn sales_book_persists_through_json_store() {
    let dir = tempdir().expect("tempdir");
    let store = Arc::new(JsonFileStore::new(StoragePaths::under(dir.path())).unwrap());

    let mut book = SalesBook::new(store.clone(), DEFAULT_STORE_KEY, Arc::new(SystemClock));
    let created = book
        .submit(&SaleForm::new("Crystal", "3", "10,50", "05/09/2025"), None)
        .expect("submit");

    let mut reopened = SalesBook::new(store, DEFAULT_STORE_KEY, Arc::new(SystemClock));
    let loaded = reopened.reload();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0], created);
}

#[test]
fn corrupt_file_degrades_to_empty_book() {
    let dir = tempdir().expect("tempdir");
    let store = Arc::new(JsonFileStore::new(StoragePaths::under(dir.path())).unwrap());
    fs::write(store.blob_path(DEFAULT_STORE_KEY), "not json").unwrap();

    let mut book = SalesBook::new(store, DEFAULT_STORE_KEY, Arc::new(SystemClock));
    assert!(book.reload().is_empty());
}
