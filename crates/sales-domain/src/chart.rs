//! Chart-ready shapes produced by the aggregation engine.

use serde::{Deserialize, Serialize};

/// Fixed month labels of the monthly series, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Item name paired with the summed value of one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub key: String,
    pub value: f64,
}

/// One bucket of the monthly revenue series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month: &'static str,
    pub value: f64,
}

/// `{value, label}` point consumed directly by bar and line charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub value: f64,
    pub label: String,
}

impl From<&Aggregate> for ChartPoint {
    fn from(aggregate: &Aggregate) -> Self {
        Self {
            value: aggregate.value,
            label: aggregate.key.clone(),
        }
    }
}

impl From<&MonthTotal> for ChartPoint {
    fn from(total: &MonthTotal) -> Self {
        Self {
            value: total.value,
            label: total.month.to_string(),
        }
    }
}
