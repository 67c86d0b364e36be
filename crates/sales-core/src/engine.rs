//! Pure aggregation over a list of sale records.
//!
//! Every function borrows its input and returns freshly allocated output; nothing here
//! performs I/O or keeps state, so calling a function twice with the same input yields
//! the same result.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use sales_domain::{
    compare_dates_desc, format_sale_date, Aggregate, ChartPoint, Field, MonthTotal, SaleRecord,
    MONTH_LABELS,
};

/// Number of items shown on each top-N bar chart.
pub const TOP_N: usize = 5;

/// Records sharing one exact date string, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateSection {
    pub date: String,
    pub items: Vec<SaleRecord>,
}

/// Partitions records into sections keyed by the exact `date` string, most recent first.
///
/// Sections whose dates parse to the same calendar day (`"1/9/2025"` vs `"01/09/2025"`)
/// stay separate and keep first-seen order.
pub fn group_by_date(records: &[SaleRecord]) -> Vec<DateSection> {
    let mut sections: Vec<DateSection> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in records {
        match positions.get(record.date.as_str()) {
            Some(&pos) => sections[pos].items.push(record.clone()),
            None => {
                positions.insert(record.date.as_str(), sections.len());
                sections.push(DateSection {
                    date: record.date.clone(),
                    items: vec![record.clone()],
                });
            }
        }
    }

    sections.sort_by(|a, b| compare_dates_desc(&a.date, &b.date));
    sections
}

/// Case-insensitive substring search on the item name, flattened and sorted most recent first.
///
/// A blank query matches everything.
pub fn filter_by_text(records: &[SaleRecord], query: &str) -> Vec<SaleRecord> {
    let needle = query.trim().to_lowercase();
    let mut matches: Vec<SaleRecord> = records
        .iter()
        .filter(|record| needle.is_empty() || record.item.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    matches.sort_by(|a, b| compare_dates_desc(&a.date, &b.date));
    matches
}

/// Records whose stored date equals `target` in canonical form, in original order.
pub fn filter_by_date(records: &[SaleRecord], target: NaiveDate) -> Vec<SaleRecord> {
    let wanted = format_sale_date(target);
    records
        .iter()
        .filter(|record| record.date == wanted)
        .cloned()
        .collect()
}

/// Sums `field` per item and returns the `n` largest sums.
///
/// Ties keep the order in which items were first encountered.
pub fn top_n_by_field(records: &[SaleRecord], field: Field, n: usize) -> Vec<Aggregate> {
    let mut totals: Vec<Aggregate> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let value = field.value_of(record);
        match positions.get(record.item.as_str()) {
            Some(&pos) => totals[pos].value += value,
            None => {
                positions.insert(record.item.as_str(), totals.len());
                totals.push(Aggregate {
                    key: record.item.clone(),
                    value,
                });
            }
        }
    }

    // slice::sort_by is stable
    totals.sort_by(|a, b| b.value.total_cmp(&a.value));
    totals.truncate(n);
    totals
}

/// Revenue per calendar month, always twelve buckets from January to December.
///
/// The month comes from the middle field of the stored date and must be a two-digit
/// code; records without one contribute nothing.
pub fn monthly_series(records: &[SaleRecord]) -> [MonthTotal; 12] {
    let mut sums = [0.0_f64; 12];
    for record in records {
        if let Some(slot) = record.month_code().and_then(month_slot) {
            sums[slot] += record.amount;
        }
    }
    std::array::from_fn(|idx| MonthTotal {
        month: MONTH_LABELS[idx],
        value: sums[idx],
    })
}

/// Sum of every record's amount.
pub fn total_amount(records: &[SaleRecord]) -> f64 {
    records.iter().map(|record| record.amount).sum()
}

pub fn bar_series(aggregates: &[Aggregate]) -> Vec<ChartPoint> {
    aggregates.iter().map(ChartPoint::from).collect()
}

pub fn line_series(months: &[MonthTotal; 12]) -> Vec<ChartPoint> {
    months.iter().map(ChartPoint::from).collect()
}

fn month_slot(code: &str) -> Option<usize> {
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match code.parse::<usize>() {
        Ok(month @ 1..=12) => Some(month - 1),
        _ => None,
    }
}
