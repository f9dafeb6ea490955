use crate::aggregation::grouping::{group_totals, ranked, total_transactions, total_volume};
use crate::filter::FilteredSet;
use crate::models::GroupBy;
use crate::types::{is_clamped, TransactionCount, Volume, EMPTY_SENTINEL};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use tracing::warn;

/// Headline figures of the filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Kpis {
    pub total_volume: Volume,
    pub total_transactions: TransactionCount,
    pub average_volume_per_row: Volume,
    /// Zero when there are no transactions.
    pub average_volume_per_transaction: Volume,
    /// Zero when the data carries no customer column.
    pub distinct_customers: usize,
    /// Rendered as `-` when the set is empty.
    #[serde(serialize_with = "serialize_label")]
    pub top_country: Option<String>,
    #[serde(serialize_with = "serialize_label")]
    pub top_service: Option<String>,
    pub distinct_countries: usize
}

fn serialize_label<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.as_deref().unwrap_or(EMPTY_SENTINEL))
}

/// Row and key counts shown above the raw data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FilteredOverview {
    pub rows: usize,
    pub distinct_countries: usize,
    pub distinct_services: usize
}

pub fn kpis(filtered: &FilteredSet<'_>) -> Kpis {
    let records = filtered.records();
    let total_volume = total_volume(records);
    let total_transactions = total_transactions(records);

    if is_clamped(total_volume) {
        warn!("Total volume exceeds the representable range, reporting the clamped value [{total_volume}]");
    }

    let countries = group_totals(records, GroupBy::Country);
    let distinct_countries = countries.len();
    let top_country = ranked(countries).first().map(|(key, _)| key.to_string());
    let top_service = ranked(group_totals(records, GroupBy::ServiceType)).first().map(|(key, _)| key.to_string());

    Kpis {
        total_volume,
        total_transactions,
        average_volume_per_row: average(total_volume, records.len() as i64),
        average_volume_per_transaction: average(total_volume, total_transactions),
        distinct_customers: distinct_customers(filtered),
        top_country,
        top_service,
        distinct_countries
    }
}

pub fn overview(filtered: &FilteredSet<'_>) -> FilteredOverview {
    let records = filtered.records();

    FilteredOverview {
        rows: records.len(),
        distinct_countries: group_totals(records, GroupBy::Country).len(),
        distinct_services: group_totals(records, GroupBy::ServiceType).len()
    }
}

/// Distinct non-empty customer ids, zero when the data has no customer column.
pub fn distinct_customers(filtered: &FilteredSet<'_>) -> usize {
    if !filtered.capabilities().has_customer_id {
        return 0;
    }

    filtered.records()
        .iter()
        .filter_map(|record| record.customer_id.as_deref())
        .collect::<BTreeSet<_>>()
        .len()
}

fn average(total: Volume, count: i64) -> Volume {
    if count == 0 {
        return Decimal::ZERO;
    }

    total.checked_div(Decimal::from(count)).unwrap_or(Decimal::ZERO)
}
