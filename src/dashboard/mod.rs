mod report;
mod session;

use crate::models::FilterDimension;
use serde::Serialize;

pub use report::DashboardReport;
pub use session::Dashboard;

/// A user interaction with the filter panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    SelectAll(FilterDimension),
    SelectNone(FilterDimension),
    SelectTopCountries,
    Select(FilterDimension, Vec<String>),
    Reset
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    pub dimension: FilterDimension,
    pub selected: usize,
    pub available: usize
}
