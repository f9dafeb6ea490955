use crate::catalog::DimensionCatalog;
use crate::dashboard::report::DashboardReport;
use crate::dashboard::{FilterAction, SelectionSummary};
use crate::config::AnalysisConfig;
use crate::export::{to_csv, to_xlsx, ExportError};
use crate::filter::{apply, FilterState, FilteredSet};
use crate::loader::{LoadOutcome, LoadedSource, SourceFailure};
use crate::models::{FilterDimension, RecordSet};
use tracing::{debug, info};

/// One interactive session over a loaded record set.
///
/// Owns the filter state. Every view handed out is filtered with the latest selection.
pub struct Dashboard {
    record_set: RecordSet,
    catalog: DimensionCatalog,
    filter: FilterState,
    loaded: Vec<LoadedSource>,
    failures: Vec<SourceFailure>
}

impl Dashboard {
    /// Opens a session with the default selection.
    pub fn new(outcome: LoadOutcome) -> Self {
        let catalog = DimensionCatalog::from_record_set(&outcome.record_set);

        let mut dashboard = Self {
            record_set: outcome.record_set,
            catalog,
            filter: FilterState::default(),
            loaded: outcome.loaded,
            failures: outcome.failures
        };

        dashboard.apply(FilterAction::Reset);
        dashboard
    }

    /// Applies a filter action.
    pub fn apply(&mut self, action: FilterAction) {
        debug!("Applying {action:?}");

        match action {
            FilterAction::SelectAll(dimension) => self.filter.select_all(dimension, &self.catalog),
            FilterAction::SelectNone(dimension) => self.filter.select_none(dimension),
            FilterAction::SelectTopCountries => self.filter.select_top_countries(&self.catalog),
            FilterAction::Select(dimension, values) => self.filter.select(dimension, values, &self.catalog),
            FilterAction::Reset => self.filter.reset(&self.catalog)
        }

        let filtered = self.filtered();

        if filtered.is_empty() {
            info!("Current selection matches none of the [{}] rows", self.record_set.len());
        } else {
            debug!("Filter matched [{}] of [{}] rows", filtered.len(), self.record_set.len());
        }
    }

    pub fn filtered(&self) -> FilteredSet<'_> {
        apply(&self.record_set, &self.filter)
    }

    pub fn record_set(&self) -> &RecordSet {
        &self.record_set
    }

    pub fn catalog(&self) -> &DimensionCatalog {
        &self.catalog
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn loaded(&self) -> &[LoadedSource] {
        &self.loaded
    }

    pub fn failures(&self) -> &[SourceFailure] {
        &self.failures
    }

    /// Selected vs available values per dimension. Dimensions without a domain are left out.
    pub fn selection_summary(&self) -> Vec<SelectionSummary> {
        FilterDimension::ALL.iter()
            .filter(|dimension| !self.catalog.domain(**dimension).is_empty())
            .map(|dimension| SelectionSummary {
                dimension: *dimension,
                selected: self.filter.selection(*dimension).len(),
                available: self.catalog.domain(*dimension).len()
            })
            .collect()
    }

    pub fn report(&self, config: &AnalysisConfig) -> DashboardReport {
        DashboardReport::build(self, config)
    }

    pub fn export_csv(&self) -> Result<Vec<u8>, ExportError> {
        to_csv(&self.filtered(), self.record_set.columns())
    }

    pub fn export_xlsx(&self) -> Result<Vec<u8>, ExportError> {
        to_xlsx(&self.filtered(), self.record_set.columns())
    }
}
