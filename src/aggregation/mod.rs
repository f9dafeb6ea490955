mod grouping;
mod kpi;
mod period;
mod pivot;
mod ranking;
#[cfg(test)]
mod tests;
mod tiers;
mod trends;

pub use grouping::top_keys;
pub use kpi::{kpis, overview, FilteredOverview, Kpis};
pub use period::{compare_periods, growth_ranking, period_breakdown, BreakdownEntry, GrowthEntry, PeriodComparison};
pub use pivot::{hierarchy, pivot, HierarchyNode, PivotTable};
pub use ranking::{facet_top_n, top_n, FacetRanking, RankedGroup};
pub use tiers::{magnitude_bins, population_tiers, MagnitudeBin, TierSummary};
pub use trends::{cohort_series, key_series, monthly_trend, KeySeries, MonthlyTotals};
