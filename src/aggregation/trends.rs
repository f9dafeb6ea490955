use crate::aggregation::grouping::{group_totals, top_keys, GroupTotals};
use crate::filter::FilteredSet;
use crate::models::GroupBy;
use crate::types::{sum_volumes, TransactionCount, Volume};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub month: String,
    pub volume: Volume,
    pub transaction_count: TransactionCount
}

impl MonthlyTotals {
    fn new(month: &str, totals: GroupTotals) -> Self {
        Self {
            month: month.to_string(),
            volume: totals.volume,
            transaction_count: totals.transaction_count
        }
    }
}

/// Monthly series of one key, e.g. a country or a customer cohort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeySeries {
    pub key: String,
    pub total_volume: Volume,
    pub points: Vec<MonthlyTotals>
}

/// Volume and count per month in ascending month order, optionally only the last `last` months.
pub fn monthly_trend(filtered: &FilteredSet<'_>, last: Option<usize>) -> Vec<MonthlyTotals> {
    if !filtered.capabilities().has_month {
        return Vec::new();
    }

    let months: Vec<MonthlyTotals> = group_totals(filtered.records(), GroupBy::TransactionMonth)
        .into_iter()
        .map(|(month, totals)| MonthlyTotals::new(month, totals))
        .collect();

    match last {
        Some(last) => months[months.len().saturating_sub(last)..].to_vec(),
        None => months
    }
}

/// Monthly series for the `top_k` keys of `group_by` by volume, or for every key when `top_k`
/// is `None`. Series are ordered by rank.
pub fn key_series(filtered: &FilteredSet<'_>, group_by: GroupBy, top_k: Option<usize>) -> Vec<KeySeries> {
    if !filtered.capabilities().has_month {
        return Vec::new();
    }

    let keys = top_keys(filtered, group_by, top_k.unwrap_or(usize::MAX));
    let wanted: BTreeSet<&str> = keys.iter().map(String::as_str).collect();
    let mut series: BTreeMap<&str, BTreeMap<&str, GroupTotals>> = BTreeMap::new();

    for &record in filtered.records() {
        let (Some(key), Some(month)) = (group_by.key_of(record), GroupBy::TransactionMonth.key_of(record)) else {
            continue;
        };

        if wanted.contains(key) {
            series.entry(key).or_default().entry(month).or_default().add(record);
        }
    }

    keys.iter()
        .map(|key| {
            let points: Vec<MonthlyTotals> = series.get(key.as_str())
                .map(|months| months.iter().map(|(month, totals)| MonthlyTotals::new(month, *totals)).collect())
                .unwrap_or_default();

            KeySeries {
                key: key.clone(),
                total_volume: sum_volumes(points.iter().map(|point| point.volume)),
                points
            }
        })
        .collect()
}

/// Monthly series of the `top_k` customer-creation cohorts by volume.
///
/// Empty unless the data carries both a cohort month and a transaction month.
pub fn cohort_series(filtered: &FilteredSet<'_>, top_k: usize) -> Vec<KeySeries> {
    if !filtered.capabilities().has_cohort_month {
        return Vec::new();
    }

    key_series(filtered, GroupBy::CustomerCreatedMonth, Some(top_k))
}
