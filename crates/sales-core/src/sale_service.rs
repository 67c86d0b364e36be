//! Business logic for creating and editing sale records.

use chrono::{DateTime, Utc};

use sales_domain::SaleRecord;

use crate::{Clock, FormField, ValidationError};

/// Raw text of the sale entry form, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleForm {
    pub item: String,
    pub quantity: String,
    pub price: String,
    pub date: String,
}

impl SaleForm {
    pub fn new(
        item: impl Into<String>,
        quantity: impl Into<String>,
        price: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            item: item.into(),
            quantity: quantity.into(),
            price: price.into(),
            date: date.into(),
        }
    }

    /// Pre-fills the form for editing an existing record.
    pub fn from_record(record: &SaleRecord) -> Self {
        Self {
            item: record.item.clone(),
            quantity: record.quantity.to_string(),
            price: record.amount.to_string(),
            date: record.date.clone(),
        }
    }

    fn validate(&self) -> Result<ValidSale, ValidationError> {
        let item = required(&self.item, FormField::Item)?;
        let quantity = required(&self.quantity, FormField::Quantity)?;
        let price = required(&self.price, FormField::Price)?;
        let date = required(&self.date, FormField::Date)?;

        let quantity = parse_decimal(quantity, FormField::Quantity)?;
        let amount = parse_decimal(price, FormField::Price)?;
        if quantity <= 0.0 {
            return Err(ValidationError::InvalidNumber(FormField::Quantity));
        }
        if amount < 0.0 {
            return Err(ValidationError::InvalidNumber(FormField::Price));
        }

        Ok(ValidSale {
            item: item.to_string(),
            quantity,
            amount,
            date: date.to_string(),
        })
    }
}

struct ValidSale {
    item: String,
    quantity: f64,
    amount: f64,
    date: String,
}

/// Validated create/edit helpers for the sale list.
pub struct SaleService;

impl SaleService {
    /// Applies a submitted form to `records` and returns the resulting list.
    ///
    /// With `editing_id` the matching record is updated in place and flagged as edited;
    /// otherwise a new record is appended with a fresh id. `records` itself is left
    /// untouched so the caller can commit only after the new list is persisted.
    pub fn create_or_update(
        records: &[SaleRecord],
        form: &SaleForm,
        editing_id: Option<&str>,
        clock: &dyn Clock,
    ) -> Result<Vec<SaleRecord>, ValidationError> {
        let sale = form.validate()?;
        let mut next = records.to_vec();

        match editing_id {
            Some(id) => {
                let record = next
                    .iter_mut()
                    .find(|record| record.id == id)
                    .ok_or_else(|| ValidationError::UnknownRecord(id.to_string()))?;
                record.apply_edit(sale.item, sale.quantity, sale.amount, sale.date);
                tracing::debug!(id, "sale edited");
            }
            None => {
                let id = next_record_id(&next, clock.now());
                tracing::debug!(id = %id, "sale created");
                next.push(SaleRecord::new(
                    id,
                    sale.item,
                    sale.quantity,
                    sale.amount,
                    sale.date,
                ));
            }
        }

        Ok(next)
    }

    /// Looks up a record by id.
    pub fn find<'a>(records: &'a [SaleRecord], id: &str) -> Option<&'a SaleRecord> {
        records.iter().find(|record| record.id == id)
    }
}

/// Canonical decimal text: trimmed, with `,` decimal separators turned into `.`.
pub fn normalize_decimal(raw: &str) -> String {
    raw.trim().replace(',', ".")
}

/// Creation-time id: Unix milliseconds, raised above every numeric id already in use.
pub fn next_record_id(records: &[SaleRecord], now: DateTime<Utc>) -> String {
    let stamp = u64::try_from(now.timestamp_millis()).unwrap_or(0);
    let floor = records
        .iter()
        .filter_map(SaleRecord::numeric_id)
        .max()
        .map_or(0, |max| max.saturating_add(1));
    stamp.max(floor).to_string()
}

fn required(value: &str, field: FormField) -> Result<&str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed)
    }
}

fn parse_decimal(raw: &str, field: FormField) -> Result<f64, ValidationError> {
    normalize_decimal(raw)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or(ValidationError::InvalidNumber(field))
}
