//! Domain model for a single recorded sale.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One logged sale: what was sold, how much of it, for how much, and when.
///
/// `date` is kept in its canonical `DD/MM/YYYY` string form because it doubles as the
/// section key for the date-grouped list. Field aliases accept blobs written by the
/// earlier mobile app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: String,
    #[serde(alias = "agua")]
    pub item: String,
    #[serde(alias = "quantidade")]
    pub quantity: f64,
    #[serde(alias = "valor")]
    pub amount: f64,
    #[serde(alias = "data")]
    pub date: String,
    #[serde(default, alias = "isEdited", skip_serializing_if = "is_false")]
    pub edited: bool,
}

impl SaleRecord {
    pub fn new(
        id: impl Into<String>,
        item: impl Into<String>,
        quantity: f64,
        amount: f64,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            item: item.into(),
            quantity,
            amount,
            date: date.into(),
            edited: false,
        }
    }

    /// Replaces the user-editable fields and flags the record as edited.
    ///
    /// The flag is one-way: once set it is never cleared.
    pub fn apply_edit(&mut self, item: String, quantity: f64, amount: f64, date: String) {
        self.item = item;
        self.quantity = quantity;
        self.amount = amount;
        self.date = date;
        self.edited = true;
    }

    /// Month code (`"01"`..`"12"`) taken from the middle field of the date, if present.
    pub fn month_code(&self) -> Option<&str> {
        self.date.split('/').nth(1)
    }

    /// Numeric form of the id when it was generated from a timestamp.
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.parse().ok()
    }
}

impl fmt::Display for SaleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x{} = {} on {}",
            self.item, self.quantity, self.amount, self.date
        )?;
        if self.edited {
            f.write_str(" (edited)")?;
        }
        Ok(())
    }
}

/// Numeric field of a record that can be summed per item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Quantity,
    Amount,
}

impl Field {
    pub fn value_of(self, record: &SaleRecord) -> f64 {
        match self {
            Field::Quantity => record.quantity,
            Field::Amount => record.amount,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Quantity => "quantity",
            Field::Amount => "amount",
        };
        f.write_str(label)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}
