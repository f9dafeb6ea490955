use crate::catalog::DimensionCatalog;
use crate::models::FilterDimension;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::warn;

/// The user's current selection on each filter dimension.
///
/// An empty selection means "no restriction" on that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterState {
    pub countries: BTreeSet<String>,
    pub services: BTreeSet<String>,
    pub months: BTreeSet<String>,
    pub sources: BTreeSet<String>
}

impl FilterState {
    /// Top-10 countries, every service, every month, every source.
    pub fn defaults(catalog: &DimensionCatalog) -> Self {
        Self {
            countries: catalog.top_countries.iter().cloned().collect(),
            services: catalog.services.iter().cloned().collect(),
            months: catalog.months.iter().cloned().collect(),
            sources: catalog.sources.iter().cloned().collect()
        }
    }

    pub fn selection(&self, dimension: FilterDimension) -> &BTreeSet<String> {
        match dimension {
            FilterDimension::Country => &self.countries,
            FilterDimension::Service => &self.services,
            FilterDimension::Month => &self.months,
            FilterDimension::Source => &self.sources
        }
    }

    fn selection_mut(&mut self, dimension: FilterDimension) -> &mut BTreeSet<String> {
        match dimension {
            FilterDimension::Country => &mut self.countries,
            FilterDimension::Service => &mut self.services,
            FilterDimension::Month => &mut self.months,
            FilterDimension::Source => &mut self.sources
        }
    }

    pub fn select_all(&mut self, dimension: FilterDimension, catalog: &DimensionCatalog) {
        *self.selection_mut(dimension) = catalog.domain(dimension).iter().cloned().collect();
    }

    pub fn select_none(&mut self, dimension: FilterDimension) {
        self.selection_mut(dimension).clear();
    }

    pub fn select_top_countries(&mut self, catalog: &DimensionCatalog) {
        self.countries = catalog.top_countries.iter().cloned().collect();
    }

    /// Replaces a selection. Values outside the catalog domain are dropped.
    pub fn select<I, S>(&mut self, dimension: FilterDimension, values: I, catalog: &DimensionCatalog)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>
    {
        let domain = catalog.domain(dimension);
        let mut selection = BTreeSet::new();

        for value in values {
            let value = value.into();

            if domain.contains(&value) {
                selection.insert(value);
            } else {
                warn!("Dropping [{value}] from the {dimension:?} selection: not present in the data");
            }
        }

        *self.selection_mut(dimension) = selection;
    }

    pub fn reset(&mut self, catalog: &DimensionCatalog) {
        *self = Self::defaults(catalog);
    }
}
