use crate::aggregation::grouping::{group_totals, total_transactions, total_volume};
use crate::aggregation::kpi::distinct_customers;
use crate::filter::FilteredSet;
use crate::models::GroupBy;
use crate::types::{percent_change, TransactionCount, Volume};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;

/// The last two distinct months present in a filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodWindow {
    pub previous: String,
    pub current: String
}

impl PeriodWindow {
    /// Sorts the distinct months ascending and takes the last two.
    pub fn latest(filtered: &FilteredSet<'_>) -> Option<Self> {
        if !filtered.capabilities().has_month {
            return None;
        }

        let months: BTreeSet<&str> = filtered.records()
            .iter()
            .filter_map(|record| GroupBy::TransactionMonth.key_of(record))
            .collect();

        let mut latest = months.into_iter().rev();
        let current = latest.next()?;
        let previous = latest.next()?;

        Some(Self {
            previous: previous.to_string(),
            current: current.to_string()
        })
    }

    pub fn split<'a>(&self, filtered: &FilteredSet<'a>) -> (FilteredSet<'a>, FilteredSet<'a>) {
        let previous = filtered.subset(|record| record.transaction_month.as_deref() == Some(self.previous.as_str()));
        let current = filtered.subset(|record| record.transaction_month.as_deref() == Some(self.current.as_str()));

        (previous, current)
    }
}

/// Month-over-month comparison of the headline figures.
///
/// Every percentage is `None` when the previous period's figure is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodComparison {
    pub window: PeriodWindow,
    pub previous_volume: Volume,
    pub current_volume: Volume,
    pub volume_change_pct: Option<Decimal>,
    pub previous_transactions: TransactionCount,
    pub current_transactions: TransactionCount,
    pub transaction_change_pct: Option<Decimal>,
    pub previous_customers: Option<usize>,
    pub current_customers: Option<usize>,
    pub customer_change_pct: Option<Decimal>
}

pub fn compare_periods(filtered: &FilteredSet<'_>) -> Option<PeriodComparison> {
    let window = PeriodWindow::latest(filtered)?;
    let (previous, current) = window.split(filtered);

    let previous_volume = total_volume(previous.records());
    let current_volume = total_volume(current.records());
    let previous_transactions = total_transactions(previous.records());
    let current_transactions = total_transactions(current.records());

    let (previous_customers, current_customers, customer_change_pct) = if filtered.capabilities().has_customer_id {
        let previous_customers = distinct_customers(&previous);
        let current_customers = distinct_customers(&current);
        let change = percent_change(Decimal::from(previous_customers), Decimal::from(current_customers));

        (Some(previous_customers), Some(current_customers), change)
    } else {
        (None, None, None)
    };

    Some(PeriodComparison {
        volume_change_pct: percent_change(previous_volume, current_volume),
        transaction_change_pct: percent_change(Decimal::from(previous_transactions), Decimal::from(current_transactions)),
        window,
        previous_volume,
        current_volume,
        previous_transactions,
        current_transactions,
        previous_customers,
        current_customers,
        customer_change_pct
    })
}

/// Growth of one key between the two latest months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrowthEntry {
    pub key: String,
    pub previous: Volume,
    pub current: Volume,
    pub growth_pct: Decimal
}

/// Keys present in both of the latest months, ranked by percentage growth.
///
/// Keys missing from either month are left out rather than counted as zero, as are keys
/// whose previous volume is zero.
pub fn growth_ranking(filtered: &FilteredSet<'_>, group_by: GroupBy, n: usize) -> Vec<GrowthEntry> {
    let Some(window) = PeriodWindow::latest(filtered) else {
        return Vec::new();
    };

    let (previous, current) = window.split(filtered);
    let previous = group_totals(previous.records(), group_by);
    let current = group_totals(current.records(), group_by);

    let mut growth: Vec<GrowthEntry> = previous.iter()
        .filter_map(|(key, before)| {
            let after = current.get(key)?;
            let growth_pct = percent_change(before.volume, after.volume)?;

            Some(GrowthEntry {
                key: key.to_string(),
                previous: before.volume,
                current: after.volume,
                growth_pct
            })
        })
        .collect();

    growth.sort_by(|left, right| right.growth_pct.cmp(&left.growth_pct));
    growth.truncate(n);
    growth
}

/// One key of an outer-joined month-over-month comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownEntry {
    pub key: String,
    pub previous: Volume,
    pub current: Volume,
    pub change: Volume,
    pub change_pct: Option<Decimal>
}

/// Every key seen in either of the latest months, with zero for the month it is absent from.
pub fn period_breakdown(filtered: &FilteredSet<'_>, group_by: GroupBy) -> Vec<BreakdownEntry> {
    let Some(window) = PeriodWindow::latest(filtered) else {
        return Vec::new();
    };

    let (previous, current) = window.split(filtered);
    let previous = group_totals(previous.records(), group_by);
    let current = group_totals(current.records(), group_by);

    let keys: BTreeSet<&str> = previous.keys().chain(current.keys()).copied().collect();

    keys.into_iter()
        .map(|key| {
            let before = previous.get(key).map(|totals| totals.volume).unwrap_or_default();
            let after = current.get(key).map(|totals| totals.volume).unwrap_or_default();

            BreakdownEntry {
                key: key.to_string(),
                previous: before,
                current: after,
                change: after.saturating_sub(before),
                change_pct: percent_change(before, after)
            }
        })
        .collect()
}
