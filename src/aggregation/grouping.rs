use crate::filter::FilteredSet;
use crate::models::{GroupBy, TransactionRecord};
use crate::types::{sum_counts, sum_volumes, TransactionCount, Volume};
use std::collections::BTreeMap;

/// Sums of one group. Both sums clamp at their type's bounds rather than overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupTotals {
    pub volume: Volume,
    pub transaction_count: TransactionCount
}

impl GroupTotals {
    pub fn add(&mut self, record: &TransactionRecord) {
        self.volume = self.volume.saturating_add(record.volume);
        self.transaction_count = self.transaction_count.saturating_add(record.transaction_count);
    }
}

/// Sums volume and count per key. Keys iterate in ascending order.
pub fn group_totals<'a>(records: &[&'a TransactionRecord], group_by: GroupBy) -> BTreeMap<&'a str, GroupTotals> {
    let mut groups: BTreeMap<&'a str, GroupTotals> = BTreeMap::new();

    for &record in records {
        if let Some(key) = group_by.key_of(record) {
            groups.entry(key).or_default().add(record);
        }
    }

    groups
}

/// Orders groups by descending volume. The sort is stable over the ascending key order of
/// the grouping, so equal volumes rank alphabetically.
pub fn ranked<'a>(groups: BTreeMap<&'a str, GroupTotals>) -> Vec<(&'a str, GroupTotals)> {
    let mut ranked: Vec<_> = groups.into_iter().collect();
    ranked.sort_by(|left, right| right.1.volume.cmp(&left.1.volume));
    ranked
}

/// The `k` keys with the largest summed volume, best first.
pub fn top_keys(filtered: &FilteredSet<'_>, group_by: GroupBy, k: usize) -> Vec<String> {
    ranked(group_totals(filtered.records(), group_by))
        .into_iter()
        .take(k)
        .map(|(key, _)| key.to_string())
        .collect()
}

/// Sum of a field over every record of the set.
pub fn total_volume(records: &[&TransactionRecord]) -> Volume {
    sum_volumes(records.iter().map(|record| record.volume))
}

pub fn total_transactions(records: &[&TransactionRecord]) -> TransactionCount {
    sum_counts(records.iter().map(|record| record.transaction_count))
}
