use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use sales_core::{
    encode_records, filter_by_text, group_by_date, monthly_series, top_n_by_field, RecordStore,
    SaleForm, SalesBook, SummaryService, SystemClock, DEFAULT_STORE_KEY, TOP_N,
};
use sales_domain::{format_sale_date, Field, SaleRecord};
use sales_storage_json::{JsonFileStore, StoragePaths};
use tempfile::tempdir;

const ITEMS: [&str; 6] = ["Crystal", "Bonafont", "Minalba", "Indaiá", "São Lourenço", "Lindoya"];

fn build_sample_sales(count: usize) -> Vec<SaleRecord> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    (0..count)
        .map(|idx| {
            let day = start + Duration::days((idx % 365) as i64);
            SaleRecord::new(
                idx.to_string(),
                ITEMS[idx % ITEMS.len()],
                1.0 + (idx % 4) as f64,
                2.5 + (idx % 10) as f64,
                format_sale_date(day),
            )
        })
        .collect()
}

fn bench_engine(c: &mut Criterion) {
    let records = build_sample_sales(black_box(10_000));

    c.bench_function("group_by_date_10k", |b| {
        b.iter(|| black_box(group_by_date(&records)))
    });

    c.bench_function("filter_by_text_10k", |b| {
        b.iter(|| black_box(filter_by_text(&records, "bona")))
    });

    c.bench_function("top_n_by_amount_10k", |b| {
        b.iter(|| black_box(top_n_by_field(&records, Field::Amount, TOP_N)))
    });

    c.bench_function("monthly_series_10k", |b| {
        b.iter(|| black_box(monthly_series(&records)))
    });

    c.bench_function("charts_snapshot_10k", |b| {
        b.iter(|| black_box(SummaryService::charts(&records, TOP_N)))
    });
}

fn bench_submit(c: &mut Criterion) {
    let dir = tempdir().expect("tempdir");
    let store = Arc::new(JsonFileStore::new(StoragePaths::under(dir.path())).expect("store"));
    let seed = encode_records(&build_sample_sales(10_000)).expect("encode");

    c.bench_function("submit_into_10k_json", |b| {
        b.iter_batched(
            || {
                store.save(DEFAULT_STORE_KEY, &seed).expect("seed");
                SalesBook::new(store.clone(), DEFAULT_STORE_KEY, Arc::new(SystemClock))
            },
            |mut book| {
                let form = SaleForm::new("Crystal", "2", "7,50", "05/09/2025");
                black_box(book.submit(&form, None).expect("submit"));
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_engine, bench_submit);
criterion_main!(benches);
