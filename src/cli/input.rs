//! Parsing helpers for shell arguments.

use chrono::NaiveDate;
use sales_core::SaleForm;
use sales_domain::{format_sale_date, parse_sale_date};

use crate::cli::shell_context::CommandError;

/// Parses a user-entered day into a date.
///
/// Accepts `today` and `DD/MM/YYYY` with or without zero padding.
pub fn parse_date_arg(raw: &str, today: NaiveDate) -> Result<NaiveDate, CommandError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    parse_sale_date(trimmed).ok_or_else(|| {
        CommandError::InvalidArguments(format!(
            "invalid date `{}` (expected DD/MM/YYYY)",
            trimmed
        ))
    })
}

/// Re-formats a user-entered day as `DD/MM/YYYY`. Empty input stays empty.
pub fn canonical_date(raw: &str, today: NaiveDate) -> Result<String, CommandError> {
    if raw.trim().is_empty() {
        return Ok(String::new());
    }
    parse_date_arg(raw, today).map(format_sale_date)
}

/// Applies `key=value` overrides to a form, e.g. `price=12,50`.
pub fn apply_assignments(
    form: &mut SaleForm,
    assignments: &[&str],
    today: NaiveDate,
) -> Result<(), CommandError> {
    for assignment in assignments {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            CommandError::InvalidArguments(format!(
                "expected key=value, got `{}`",
                assignment
            ))
        })?;
        match key.trim().to_lowercase().as_str() {
            "item" => form.item = value.to_string(),
            "quantity" | "qty" => form.quantity = value.to_string(),
            "price" | "amount" => form.price = value.to_string(),
            "date" => form.date = canonical_date(value, today)?,
            other => {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown field `{}` (use item, quantity, price or date)",
                    other
                )))
            }
        }
    }
    Ok(())
}

/// Renders a quantity without a trailing `.0` for whole numbers.
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 && quantity.abs() < 1e15 {
        format!("{}", quantity as i64)
    } else {
        quantity.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 5).unwrap()
    }

    #[test]
    fn dates_are_canonicalised() {
        assert_eq!(canonical_date("5/9/2025", today()).unwrap(), "05/09/2025");
        assert_eq!(canonical_date("today", today()).unwrap(), "05/09/2025");
        assert_eq!(canonical_date("  ", today()).unwrap(), "");
        assert!(canonical_date("2025-09-05", today()).is_err());
    }

    #[test]
    fn assignments_override_form_fields() {
        let mut form = SaleForm::new("Crystal", "3", "10", "05/09/2025");
        apply_assignments(&mut form, &["qty=4", "price=12,50", "date=1/10/2025"], today())
            .unwrap();

        assert_eq!(form.quantity, "4");
        assert_eq!(form.price, "12,50");
        assert_eq!(form.date, "01/10/2025");
        assert_eq!(form.item, "Crystal");
    }

    #[test]
    fn malformed_assignments_are_rejected() {
        let mut form = SaleForm::default();
        assert!(apply_assignments(&mut form, &["price"], today()).is_err());
        assert!(apply_assignments(&mut form, &["colour=blue"], today()).is_err());
    }

    #[test]
    fn whole_quantities_drop_the_fraction() {
        assert_eq!(format_quantity(3.0), "3");
        assert_eq!(format_quantity(2.5), "2.5");
    }
}
