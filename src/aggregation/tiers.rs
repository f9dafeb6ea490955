use crate::aggregation::grouping::{group_totals, ranked};
use crate::filter::FilteredSet;
use crate::models::GroupBy;
use crate::types::{percent_share, sum_volumes, Volume};
use rust_decimal::Decimal;
use serde::Serialize;

/// Magnitude bands relative to the largest group, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnitudeBand {
    Bottom,
    LowerMiddle,
    Middle,
    UpperMiddle,
    Top
}

impl MagnitudeBand {
    const ALL: [MagnitudeBand; 5] = [
        MagnitudeBand::Bottom,
        MagnitudeBand::LowerMiddle,
        MagnitudeBand::Middle,
        MagnitudeBand::UpperMiddle,
        MagnitudeBand::Top
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MagnitudeBand::Bottom => "하위",
            MagnitudeBand::LowerMiddle => "중하위",
            MagnitudeBand::Middle => "중위",
            MagnitudeBand::UpperMiddle => "중상위",
            MagnitudeBand::Top => "상위"
        }
    }

    /// Upper edge of the band as a fraction of the maximum group volume.
    fn upper_fraction(&self) -> Decimal {
        match self {
            MagnitudeBand::Bottom => Decimal::new(1, 2),
            MagnitudeBand::LowerMiddle => Decimal::new(5, 2),
            MagnitudeBand::Middle => Decimal::new(20, 2),
            MagnitudeBand::UpperMiddle => Decimal::new(50, 2),
            MagnitudeBand::Top => Decimal::new(110, 2)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MagnitudeBin {
    pub band: MagnitudeBand,
    pub label: &'static str,
    /// Members in descending volume order.
    pub members: Vec<String>,
    pub volume: Volume
}

/// Buckets every group by its volume relative to the largest group.
///
/// Band edges are 0%, 1%, 5%, 20%, 50% and 110% of the maximum. Intervals are closed on the
/// right and the lowest one is closed on both ends. Negative volumes fall outside every band.
/// Only non-empty bands are reported, lowest first.
pub fn magnitude_bins(filtered: &FilteredSet<'_>, group_by: GroupBy) -> Vec<MagnitudeBin> {
    let groups = ranked(group_totals(filtered.records(), group_by));

    let Some(maximum) = groups.first().map(|(_, totals)| totals.volume) else {
        return Vec::new();
    };

    let mut bins: Vec<MagnitudeBin> = MagnitudeBand::ALL.iter()
        .map(|band| MagnitudeBin {
            band: *band,
            label: band.label(),
            members: Vec::new(),
            volume: Decimal::ZERO
        })
        .collect();

    for (key, totals) in groups {
        if totals.volume < Decimal::ZERO {
            continue;
        }

        let band = MagnitudeBand::ALL.iter()
            .position(|band| totals.volume <= maximum.saturating_mul(band.upper_fraction()));

        if let Some(index) = band {
            bins[index].members.push(key.to_string());
            bins[index].volume = bins[index].volume.saturating_add(totals.volume);
        }
    }

    bins.retain(|bin| !bin.members.is_empty());
    bins
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PopulationTier {
    Tier1,
    Tier2,
    Tier3,
    Tier4
}

impl PopulationTier {
    /// Share of the group count that each sized tier takes, in percent. Tier 4 takes the rest.
    const SIZED: [(PopulationTier, usize); 3] = [
        (PopulationTier::Tier1, 10),
        (PopulationTier::Tier2, 25),
        (PopulationTier::Tier3, 35)
    ];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierSummary {
    pub tier: PopulationTier,
    pub count: usize,
    pub members: Vec<String>,
    pub volume: Volume,
    /// Percentage of the grand total volume, undefined when that total is zero.
    pub share_pct: Option<Decimal>
}

/// Splits the groups, ranked by volume, into tiers of 10%, 25%, 35% and the remaining 30% of
/// the group count.
///
/// Each sized tier holds `max(1, floor(count * pct))` groups, capped by what is left, so small
/// populations still cover every group exactly once.
pub fn population_tiers(filtered: &FilteredSet<'_>, group_by: GroupBy) -> Vec<TierSummary> {
    let groups = ranked(group_totals(filtered.records(), group_by));

    if groups.is_empty() {
        return Vec::new();
    }

    let total = groups.len();
    let grand_total = sum_volumes(groups.iter().map(|(_, totals)| totals.volume));

    let mut sizes = Vec::with_capacity(4);
    let mut remaining = total;

    for (tier, percent) in PopulationTier::SIZED {
        let size = (total * percent / 100).max(1).min(remaining);
        remaining -= size;
        sizes.push((tier, size));
    }

    sizes.push((PopulationTier::Tier4, remaining));

    let mut members = groups.into_iter();

    sizes.into_iter()
        .map(|(tier, size)| {
            let chunk: Vec<_> = members.by_ref().take(size).collect();
            let volume = sum_volumes(chunk.iter().map(|(_, totals)| totals.volume));

            TierSummary {
                tier,
                count: chunk.len(),
                members: chunk.into_iter().map(|(key, _)| key.to_string()).collect(),
                volume,
                share_pct: percent_share(volume, grand_total)
            }
        })
        .collect()
}
