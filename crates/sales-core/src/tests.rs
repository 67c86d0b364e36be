use std::sync::Arc;

use chrono::{TimeZone, Utc};

use crate::{
    book::SalesBook,
    engine::{top_n_by_field, TOP_N},
    sale_service::SaleForm,
    storage::{decode_records, MemoryStore, RecordStore, DEFAULT_STORE_KEY},
    time::FixedClock,
};
use sales_domain::{Aggregate, Field};

fn book(store: Arc<MemoryStore>) -> SalesBook {
    let clock = FixedClock(Utc.timestamp_millis_opt(1_757_030_400_000).unwrap());
    SalesBook::new(store, DEFAULT_STORE_KEY, Arc::new(clock))
}

#[test]
fn create_then_edit_then_chart() {
    let store = Arc::new(MemoryStore::new());
    let mut book = book(Arc::clone(&store));

    let created = book
        .submit(&SaleForm::new("Crystal", "3", "10,50", "05/09/2025"), None)
        .expect("create sale");
    assert_eq!(book.records().len(), 1);
    assert_eq!(created.amount, 10.5);
    assert_eq!(created.quantity, 3.0);
    assert!(!created.edited);

    let mut form = SaleForm::from_record(&created);
    form.price = "12,00".into();
    let edited = book.submit(&form, Some(&created.id)).expect("edit sale");
    assert_eq!(edited.id, created.id);
    assert_eq!(edited.amount, 12.0);
    assert!(edited.edited);
    assert_eq!(book.records().len(), 1);

    let top = top_n_by_field(book.records(), Field::Amount, TOP_N);
    assert_eq!(
        top,
        vec![Aggregate {
            key: "Crystal".into(),
            value: 12.0
        }]
    );

    let stored = store.load(DEFAULT_STORE_KEY).unwrap().expect("blob saved");
    assert_eq!(decode_records(&stored).unwrap(), book.records());
}

#[test]
fn validation_failure_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let mut book = book(Arc::clone(&store));

    let err = book
        .submit(&SaleForm::new("Crystal", "three", "10", "05/09/2025"), None)
        .expect_err("invalid quantity");
    assert_eq!(err.to_string(), "Invalid number in field: quantity");
    assert!(book.records().is_empty());
    assert!(store.raw(DEFAULT_STORE_KEY).is_none());
}

#[test]
fn reload_reads_blobs_written_by_the_mobile_app() {
    let legacy = r#"[{"id":"1757000000000","agua":"Crystal","quantidade":3,"valor":10.5,"data":"05/09/2025"},{"id":"1757000000001","agua":"Crystal","quantidade":1,"valor":2,"data":"06/09/2025","isEdited":true}]"#;
    let store = Arc::new(MemoryStore::with_entry(DEFAULT_STORE_KEY, legacy));
    let mut book = book(store);

    let records = book.reload();
    assert_eq!(records.len(), 2);
    assert!(records[1].edited);
}
