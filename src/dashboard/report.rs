use crate::aggregation::{
    cohort_series, compare_periods, facet_top_n, growth_ranking, hierarchy, key_series, kpis, magnitude_bins,
    monthly_trend, overview, period_breakdown, pivot, population_tiers, top_n, BreakdownEntry, FacetRanking,
    FilteredOverview, GrowthEntry, HierarchyNode, KeySeries, Kpis, MagnitudeBin, MonthlyTotals, PeriodComparison,
    PivotTable, RankedGroup, TierSummary, top_keys
};
use crate::catalog::DimensionCatalog;
use crate::config::AnalysisConfig;
use crate::dashboard::{Dashboard, SelectionSummary};
use crate::filter::{FilterState, FilteredSet};
use crate::loader::{LoadedSource, SourceFailure};
use crate::models::{Capabilities, GroupBy};
use serde::Serialize;

/// Everything the presentation layer renders for the current filter state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub sources: Vec<LoadedSource>,
    pub failures: Vec<SourceFailure>,
    pub total_rows: usize,
    pub capabilities: Capabilities,
    /// Selectable values of every filter dimension.
    pub catalog: DimensionCatalog,
    pub filter: FilterState,
    pub selection: Vec<SelectionSummary>,
    pub overview: FilteredOverview,
    pub kpis: Kpis,
    pub period_comparison: Option<PeriodComparison>,
    pub top_countries: Vec<RankedGroup>,
    pub top_services: Vec<RankedGroup>,
    pub country_growth: Vec<GrowthEntry>,
    pub service_breakdown: Vec<BreakdownEntry>,
    pub magnitude_bins: Vec<MagnitudeBin>,
    pub population_tiers: Vec<TierSummary>,
    pub country_ranking: Vec<RankedGroup>,
    pub service_share: Vec<RankedGroup>,
    pub countries_by_service: Vec<FacetRanking>,
    pub country_service_pivot: PivotTable,
    pub country_service_stack: PivotTable,
    pub country_service_hierarchy: HierarchyNode,
    pub services_by_country: Vec<FacetRanking>,
    pub monthly_trend: Vec<MonthlyTotals>,
    pub recent_months: Vec<MonthlyTotals>,
    pub country_trends: Vec<KeySeries>,
    pub service_trends: Vec<KeySeries>,
    pub cohorts: Vec<KeySeries>
}

impl DashboardReport {
    pub fn build(dashboard: &Dashboard, config: &AnalysisConfig) -> Self {
        let filtered = dashboard.filtered();
        let record_set = dashboard.record_set();

        Self {
            sources: dashboard.loaded().to_vec(),
            failures: dashboard.failures().to_vec(),
            total_rows: record_set.len(),
            capabilities: record_set.capabilities(),
            catalog: dashboard.catalog().clone(),
            filter: dashboard.filter_state().clone(),
            selection: dashboard.selection_summary(),
            overview: overview(&filtered),
            kpis: kpis(&filtered),
            period_comparison: compare_periods(&filtered),
            top_countries: top_n(&filtered, GroupBy::Country, config.top_n),
            top_services: top_n(&filtered, GroupBy::ServiceType, config.top_n),
            country_growth: growth_ranking(&filtered, GroupBy::Country, config.growth_top_n),
            service_breakdown: period_breakdown(&filtered, GroupBy::ServiceType),
            magnitude_bins: magnitude_bins(&filtered, GroupBy::Country),
            population_tiers: population_tiers(&filtered, GroupBy::Country),
            country_ranking: top_n(&filtered, GroupBy::Country, config.chart_top_n),
            service_share: top_n(&filtered, GroupBy::ServiceType, usize::MAX),
            countries_by_service: facet_top_n(&filtered, GroupBy::ServiceType, GroupBy::Country, config.chart_top_n),
            country_service_pivot: pivot(&filtered, GroupBy::Country, GroupBy::ServiceType, config.pivot_top_k),
            country_service_stack: pivot(&filtered, GroupBy::Country, GroupBy::ServiceType, config.chart_top_n),
            country_service_hierarchy: hierarchy(&filtered, GroupBy::Country, GroupBy::ServiceType, config.pivot_top_k),
            services_by_country: top_country_facets(&filtered, config.small_multiples_top_k),
            monthly_trend: monthly_trend(&filtered, None),
            recent_months: monthly_trend(&filtered, Some(config.trend_months)),
            country_trends: key_series(&filtered, GroupBy::Country, Some(config.small_multiples_top_k)),
            service_trends: key_series(&filtered, GroupBy::ServiceType, None),
            cohorts: cohort_series(&filtered, config.cohort_top_k)
        }
    }
}

/// Service mix of each of the `k` largest countries, largest country first.
fn top_country_facets(filtered: &FilteredSet<'_>, k: usize) -> Vec<FacetRanking> {
    let countries = top_keys(filtered, GroupBy::Country, k);
    let mut facets = facet_top_n(filtered, GroupBy::Country, GroupBy::ServiceType, usize::MAX);

    facets.retain(|facet| countries.contains(&facet.facet));
    facets.sort_by_key(|facet| countries.iter().position(|country| *country == facet.facet));
    facets
}
