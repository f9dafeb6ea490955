use crate::aggregation::grouping::{group_totals, ranked};
use crate::filter::FilteredSet;
use crate::models::GroupBy;
use crate::types::{TransactionCount, Volume};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedGroup {
    pub key: String,
    pub volume: Volume,
    pub transaction_count: TransactionCount
}

/// Ranking of one dimension within a single value of another, e.g. countries per service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetRanking {
    pub facet: String,
    pub ranking: Vec<RankedGroup>
}

/// The `n` keys with the largest summed volume, with their summed counts.
pub fn top_n(filtered: &FilteredSet<'_>, group_by: GroupBy, n: usize) -> Vec<RankedGroup> {
    let groups = ranked(group_totals(filtered.records(), group_by))
        .into_iter()
        .map(|(key, totals)| RankedGroup {
            key: key.to_string(),
            volume: totals.volume,
            transaction_count: totals.transaction_count
        })
        .collect();

    rank(groups, n)
}

/// Orders by descending volume and keeps the first `n`. Stable, so applying it to its own
/// output changes nothing.
pub fn rank(mut groups: Vec<RankedGroup>, n: usize) -> Vec<RankedGroup> {
    groups.sort_by(|left, right| right.volume.cmp(&left.volume));
    groups.truncate(n);
    groups
}

/// For every value of `facet` (ascending), the top `n` keys of `group_by` inside it.
pub fn facet_top_n(filtered: &FilteredSet<'_>, facet: GroupBy, group_by: GroupBy, n: usize) -> Vec<FacetRanking> {
    let mut facets: BTreeMap<&str, Vec<_>> = BTreeMap::new();

    for record in filtered.records() {
        if let Some(key) = facet.key_of(record) {
            facets.entry(key).or_default().push(*record);
        }
    }

    facets.into_iter()
        .map(|(facet, records)| FacetRanking {
            facet: facet.to_string(),
            ranking: top_n(&FilteredSet::new(records, filtered.capabilities()), group_by, n)
        })
        .collect()
}
