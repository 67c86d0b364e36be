//! Helpers for the canonical `DD/MM/YYYY` sale date form.

use std::cmp::Ordering;

use chrono::NaiveDate;

/// chrono format string of the canonical stored date.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Formats a calendar date in the canonical `DD/MM/YYYY` form.
pub fn format_sale_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses user input into a calendar date.
///
/// Accepts unpadded day and month (`1/9/2025`); the result should be re-formatted
/// with [`format_sale_date`] before being stored.
pub fn parse_sale_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).ok()
}

/// Comparable `(year, month, day)` tuple for a stored date string.
///
/// Fields that are missing or not numeric count as zero so malformed strings still
/// order deterministically instead of failing.
pub fn date_sort_key(date: &str) -> (i64, i64, i64) {
    let mut parts = date.split('/').map(|part| part.trim().parse::<i64>().unwrap_or(0));
    let day = parts.next().unwrap_or(0);
    let month = parts.next().unwrap_or(0);
    let year = parts.next().unwrap_or(0);
    (year, month, day)
}

/// Orders two stored dates most recent first.
pub fn compare_dates_desc(a: &str, b: &str) -> Ordering {
    date_sort_key(b).cmp(&date_sort_key(a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_key_orders_by_year_then_month_then_day() {
        assert!(date_sort_key("15/09/2025") > date_sort_key("01/09/2025"));
        assert!(date_sort_key("01/01/2026") > date_sort_key("31/12/2025"));
    }

    #[test]
    fn unpadded_dates_share_a_sort_key() {
        assert_eq!(date_sort_key("1/9/2025"), date_sort_key("01/09/2025"));
    }

    #[test]
    fn malformed_dates_degrade_to_zero_fields() {
        assert_eq!(date_sort_key("garbage"), (0, 0, 0));
        assert_eq!(date_sort_key("10/xx/2025"), (2025, 0, 10));
    }

    #[test]
    fn parse_then_format_is_canonical() {
        let date = parse_sale_date("5/9/2025").expect("valid date");
        assert_eq!(format_sale_date(date), "05/09/2025");
        assert!(parse_sale_date("31/02/2025").is_none());
    }
}
