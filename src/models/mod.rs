mod columns;
mod errors;
#[cfg(test)]
pub mod fixtures;
mod record;
mod record_set;

use serde::Serialize;
use std::str::FromStr;

pub use columns::ColumnMapping;
pub use errors::SourceError;
pub use record::TransactionRecord;
pub use record_set::{Capabilities, RecordSet, SourceTable};

/// Business keys a statistic can be grouped on. Provenance is deliberately absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    Country,
    ServiceType,
    TransactionMonth,
    CustomerCreatedMonth
}

impl GroupBy {
    /// Grouping key of a record. Blank months are not a period and never form a group.
    pub fn key_of<'a>(&self, record: &'a TransactionRecord) -> Option<&'a str> {
        match self {
            GroupBy::Country => Some(&record.country),
            GroupBy::ServiceType => Some(&record.service_type),
            GroupBy::TransactionMonth => non_blank(&record.transaction_month),
            GroupBy::CustomerCreatedMonth => non_blank(&record.customer_created_month)
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// The four independent filter selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Country,
    Service,
    Month,
    Source
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 4] = [
        FilterDimension::Country,
        FilterDimension::Service,
        FilterDimension::Month,
        FilterDimension::Source
    ];

    pub fn value_of<'a>(&self, record: &'a TransactionRecord) -> Option<&'a str> {
        match self {
            FilterDimension::Country => Some(&record.country),
            FilterDimension::Service => Some(&record.service_type),
            FilterDimension::Month => record.transaction_month.as_deref(),
            FilterDimension::Source => Some(&record.source_file)
        }
    }
}

impl FromStr for FilterDimension {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "country" => Ok(FilterDimension::Country),
            "service" => Ok(FilterDimension::Service),
            "month" => Ok(FilterDimension::Month),
            "source" => Ok(FilterDimension::Source),
            _ => Err(format!("Unknown filter dimension '{value}', expected country, service, month or source"))
        }
    }
}
