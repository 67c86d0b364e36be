use std::fmt;

use thiserror::Error;

/// Input fields of the sale entry form, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Item,
    Quantity,
    Price,
    Date,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormField::Item => "item",
            FormField::Quantity => "quantity",
            FormField::Price => "price",
            FormField::Date => "date",
        };
        f.write_str(label)
    }
}

/// Rejections raised by the write path before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing field: {0}")]
    MissingField(FormField),
    #[error("Invalid number in field: {0}")]
    InvalidNumber(FormField),
    #[error("Sale not found: {0}")]
    UnknownRecord(String),
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Another save is still in progress")]
    WriteInProgress,
}

impl CoreError {
    /// Folds storage-level failures into [`CoreError::Persistence`].
    pub fn into_persistence(self) -> Self {
        match self {
            CoreError::Persistence(_) | CoreError::Validation(_) | CoreError::WriteInProgress => {
                self
            }
            other => CoreError::Persistence(other.to_string()),
        }
    }
}
