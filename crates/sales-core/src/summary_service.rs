use serde::Serialize;

use sales_domain::{ChartPoint, Field, SaleRecord};

use crate::{bar_series, line_series, monthly_series, top_n_by_field, total_amount};

/// Everything the charts screen renders, computed in one pass over the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartsSnapshot {
    pub total_amount: f64,
    pub top_by_quantity: Vec<ChartPoint>,
    pub top_by_revenue: Vec<ChartPoint>,
    pub monthly: Vec<ChartPoint>,
}

impl ChartsSnapshot {
    /// True when there is no sale to chart.
    pub fn is_empty(&self) -> bool {
        self.top_by_quantity.is_empty()
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn charts(records: &[SaleRecord], top_n: usize) -> ChartsSnapshot {
        ChartsSnapshot {
            total_amount: total_amount(records),
            top_by_quantity: bar_series(&top_n_by_field(records, Field::Quantity, top_n)),
            top_by_revenue: bar_series(&top_n_by_field(records, Field::Amount, top_n)),
            monthly: line_series(&monthly_series(records)),
        }
    }
}
