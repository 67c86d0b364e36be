//! Search and date-filter context shared by the list screens.

use chrono::NaiveDate;

use sales_domain::SaleRecord;

use crate::{filter_by_date, filter_by_text, group_by_date, DateSection};

/// Mutations accepted by [`ViewState::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewAction {
    /// Starts text search; any active date filter is dropped.
    OpenSearch,
    SetQuery(String),
    /// Leaves text search and forgets the query.
    CloseSearch,
    OpenDatePicker,
    DismissDatePicker,
    /// Filters by the picked day; any active text search is dropped.
    PickDate(NaiveDate),
    ClearFilters,
}

/// Filter context of the sale list.
///
/// Text search and date filtering are mutually exclusive: activating one always
/// clears the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    search_active: bool,
    search_query: String,
    date_filter_active: bool,
    show_date_picker: bool,
    selected_date: NaiveDate,
}

impl ViewState {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            search_active: false,
            search_query: String::new(),
            date_filter_active: false,
            show_date_picker: false,
            selected_date: today,
        }
    }

    pub fn dispatch(&mut self, action: ViewAction) {
        match action {
            ViewAction::OpenSearch => {
                self.search_active = true;
                self.date_filter_active = false;
                self.show_date_picker = false;
            }
            ViewAction::SetQuery(query) => {
                self.search_query = query;
            }
            ViewAction::CloseSearch => {
                self.search_active = false;
                self.search_query.clear();
            }
            ViewAction::OpenDatePicker => {
                self.show_date_picker = true;
            }
            ViewAction::DismissDatePicker => {
                self.show_date_picker = false;
            }
            ViewAction::PickDate(date) => {
                self.selected_date = date;
                self.date_filter_active = true;
                self.show_date_picker = false;
                self.search_active = false;
                self.search_query.clear();
            }
            ViewAction::ClearFilters => {
                self.search_active = false;
                self.search_query.clear();
                self.date_filter_active = false;
                self.show_date_picker = false;
            }
        }
        tracing::debug!(state = ?self, "view state updated");
    }

    pub fn search_active(&self) -> bool {
        self.search_active
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn date_filter_active(&self) -> bool {
        self.date_filter_active
    }

    pub fn show_date_picker(&self) -> bool {
        self.show_date_picker
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn is_filtering(&self) -> bool {
        self.search_active || self.date_filter_active
    }

    /// Derives what the list screen shows for `records` under the current filters.
    pub fn project(&self, records: &[SaleRecord]) -> ListView {
        if self.search_active {
            ListView::Flat(filter_by_text(records, &self.search_query))
        } else if self.date_filter_active {
            ListView::Flat(filter_by_date(records, self.selected_date))
        } else {
            ListView::Sections(group_by_date(records))
        }
    }
}

/// List screen content: date sections when unfiltered, a flat list otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum ListView {
    Sections(Vec<DateSection>),
    Flat(Vec<SaleRecord>),
}

impl ListView {
    /// Number of records shown.
    pub fn len(&self) -> usize {
        match self {
            ListView::Sections(sections) => sections.iter().map(|s| s.items.len()).sum(),
            ListView::Flat(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
