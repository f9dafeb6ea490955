use crate::aggregation::top_keys;
use crate::filter::FilteredSet;
use crate::models::{FilterDimension, GroupBy, RecordSet};
use serde::Serialize;
use std::collections::BTreeSet;

/// Size of the default country preset.
pub const TOP_COUNTRY_PRESET: usize = 10;

/// Selectable values of every filter dimension, derived once per record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DimensionCatalog {
    pub countries: Vec<String>,
    pub services: Vec<String>,
    /// Empty when the data carries no month column.
    pub months: Vec<String>,
    /// Empty unless more than one source was loaded.
    pub sources: Vec<String>,
    /// The ten countries with the largest summed volume, best first.
    pub top_countries: Vec<String>
}

impl DimensionCatalog {
    pub fn from_record_set(record_set: &RecordSet) -> Self {
        let months = if record_set.capabilities().has_month {
            distinct(record_set, FilterDimension::Month)
        } else {
            Vec::new()
        };

        let sources = distinct(record_set, FilterDimension::Source);
        let sources = if sources.len() > 1 { sources } else { Vec::new() };

        Self {
            countries: distinct(record_set, FilterDimension::Country),
            services: distinct(record_set, FilterDimension::Service),
            months,
            sources,
            top_countries: top_keys(&FilteredSet::all(record_set), GroupBy::Country, TOP_COUNTRY_PRESET)
        }
    }

    pub fn domain(&self, dimension: FilterDimension) -> &[String] {
        match dimension {
            FilterDimension::Country => &self.countries,
            FilterDimension::Service => &self.services,
            FilterDimension::Month => &self.months,
            FilterDimension::Source => &self.sources
        }
    }
}

fn distinct(record_set: &RecordSet, dimension: FilterDimension) -> Vec<String> {
    record_set.records()
        .iter()
        .filter_map(|record| dimension.value_of(record))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
