use super::*;
use super::grouping::{group_totals, total_volume};
use super::ranking::rank;
use super::tiers::{MagnitudeBand, PopulationTier};
use crate::filter::FilteredSet;
use crate::models::fixtures::{create_record, create_record_set, scenario_records, with_cohort, with_customer};
use crate::models::{GroupBy, RecordSet, TransactionRecord};
use anyhow::{anyhow, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

fn volume(value: i64) -> Decimal {
    Decimal::from(value)
}

fn with_volume(mut record: TransactionRecord, volume: &str) -> Result<TransactionRecord> {
    record.volume = Decimal::from_str(volume)?;
    Ok(record)
}

fn countries(pairs: &[(&str, i64)]) -> RecordSet {
    create_record_set(pairs.iter().map(|(country, amount)| create_record(country, "X", *amount, 1, Some("2024-01"))).collect())
}

#[test]
fn test_kpis_over_the_three_row_scenario() {
    let record_set = create_record_set(scenario_records());
    let kpis = kpis(&FilteredSet::all(&record_set));

    assert_eq!(kpis.total_volume, volume(350));
    assert_eq!(kpis.total_transactions, 7);
    assert_eq!(kpis.average_volume_per_transaction, volume(50));
    assert_eq!(kpis.average_volume_per_row.round_dp(2), Decimal::new(11667, 2));
    assert_eq!(kpis.top_country.as_deref(), Some("B"));
    assert_eq!(kpis.top_service.as_deref(), Some("X"));
    assert_eq!(kpis.distinct_countries, 2);
    assert_eq!(kpis.distinct_customers, 0);
}

#[test]
fn test_every_aggregation_is_defined_on_an_empty_set() {
    let record_set = create_record_set(scenario_records());
    let empty = FilteredSet::all(&record_set).subset(|_| false);

    let kpis = kpis(&empty);
    assert!(kpis.total_volume.is_zero());
    assert_eq!(kpis.total_transactions, 0);
    assert!(kpis.average_volume_per_row.is_zero());
    assert!(kpis.average_volume_per_transaction.is_zero());
    assert_eq!(kpis.top_country, None);
    assert_eq!(kpis.top_service, None);

    assert!(compare_periods(&empty).is_none());
    assert!(growth_ranking(&empty, GroupBy::Country, 5).is_empty());
    assert!(period_breakdown(&empty, GroupBy::ServiceType).is_empty());
    assert!(top_n(&empty, GroupBy::Country, 5).is_empty());
    assert!(magnitude_bins(&empty, GroupBy::Country).is_empty());
    assert!(population_tiers(&empty, GroupBy::Country).is_empty());
    assert!(pivot(&empty, GroupBy::Country, GroupBy::ServiceType, 15).rows.is_empty());
    assert!(hierarchy(&empty, GroupBy::Country, GroupBy::ServiceType, 15).children.is_empty());
    assert!(monthly_trend(&empty, None).is_empty());
    assert!(cohort_series(&empty, 5).is_empty());
}

#[test]
fn test_month_over_month_change_uses_the_last_two_months() -> Result<()> {
    let record_set = create_record_set(scenario_records());
    let comparison = compare_periods(&FilteredSet::all(&record_set)).ok_or_else(|| anyhow!("Comparison missing"))?;

    assert_eq!(comparison.window.previous, "2024-01");
    assert_eq!(comparison.window.current, "2024-02");
    assert_eq!(comparison.previous_volume, volume(100));
    assert_eq!(comparison.current_volume, volume(250));
    assert_eq!(comparison.volume_change_pct, Some(volume(150)));
    assert_eq!(comparison.transaction_change_pct, Some(volume(150)));
    assert_eq!(comparison.customer_change_pct, None);

    Ok(())
}

#[test]
fn test_period_comparison_needs_two_months() {
    let record_set = create_record_set(vec![create_record("A", "X", 10, 1, Some("2024-01"))]);

    assert!(compare_periods(&FilteredSet::all(&record_set)).is_none());

    let no_months = create_record_set(vec![create_record("A", "X", 10, 1, None)]);

    assert!(compare_periods(&FilteredSet::all(&no_months)).is_none());
}

#[test]
fn test_period_change_is_undefined_when_previous_is_zero() -> Result<()> {
    let record_set = create_record_set(vec![
        create_record("A", "X", 0, 0, Some("2024-01")),
        create_record("A", "X", 40, 2, Some("2024-02")),
    ]);

    let comparison = compare_periods(&FilteredSet::all(&record_set)).ok_or_else(|| anyhow!("Comparison missing"))?;

    assert_eq!(comparison.volume_change_pct, None);
    assert_eq!(comparison.transaction_change_pct, None);

    Ok(())
}

#[test]
fn test_customer_change_counts_distinct_ids_per_month() -> Result<()> {
    let record_set = create_record_set(vec![
        with_customer(create_record("A", "X", 10, 1, Some("2024-01")), "c1"),
        with_customer(create_record("A", "X", 10, 1, Some("2024-01")), "c2"),
        with_customer(create_record("A", "X", 10, 1, Some("2024-02")), "c1"),
        with_customer(create_record("A", "X", 10, 1, Some("2024-02")), "c2"),
        with_customer(create_record("A", "X", 10, 1, Some("2024-02")), "c3"),
    ]);
    let filtered = FilteredSet::all(&record_set);

    assert_eq!(kpis(&filtered).distinct_customers, 3);

    let comparison = compare_periods(&filtered).ok_or_else(|| anyhow!("Comparison missing"))?;

    assert_eq!(comparison.previous_customers, Some(2));
    assert_eq!(comparison.current_customers, Some(3));
    assert_eq!(comparison.customer_change_pct, Some(volume(50)));

    Ok(())
}

#[test]
fn test_grouping_never_loses_or_double_counts_volume() {
    let record_set = create_record_set(scenario_records());
    let filtered = FilteredSet::all(&record_set);
    let total = total_volume(filtered.records());

    for group_by in [GroupBy::Country, GroupBy::ServiceType, GroupBy::TransactionMonth] {
        let grouped: Decimal = group_totals(filtered.records(), group_by).values().map(|totals| totals.volume).sum();

        assert_eq!(grouped, total);
    }
}

#[test]
fn test_top_n_orders_by_volume_and_breaks_ties_alphabetically() {
    let record_set = countries(&[("C", 100), ("A", 100), ("B", 50), ("D", 300)]);
    let ranking = top_n(&FilteredSet::all(&record_set), GroupBy::Country, 3);
    let keys: Vec<&str> = ranking.iter().map(|group| group.key.as_str()).collect();

    assert_eq!(keys, ["D", "A", "C"]);
    assert_eq!(ranking[0].volume, volume(300));
    assert_eq!(ranking[0].transaction_count, 1);
}

#[test]
fn test_top_n_is_idempotent() {
    let record_set = countries(&[("C", 100), ("A", 100), ("B", 50), ("D", 300), ("E", 75)]);
    let ranking = top_n(&FilteredSet::all(&record_set), GroupBy::Country, 4);

    assert_eq!(rank(ranking.clone(), 4), ranking);
}

#[test]
fn test_facet_top_n_ranks_within_each_facet() {
    let record_set = create_record_set(vec![
        create_record("A", "X", 10, 1, None),
        create_record("B", "X", 30, 1, None),
        create_record("A", "Y", 70, 1, None),
    ]);

    let facets = facet_top_n(&FilteredSet::all(&record_set), GroupBy::ServiceType, GroupBy::Country, 10);

    assert_eq!(facets.len(), 2);
    assert_eq!(facets[0].facet, "X");
    assert_eq!(facets[0].ranking[0].key, "B");
    assert_eq!(facets[1].facet, "Y");
    assert_eq!(facets[1].ranking.len(), 1);
}

#[test]
fn test_growth_ranking_only_compares_keys_present_in_both_months() {
    let record_set = create_record_set(vec![
        create_record("A", "X", 100, 1, Some("2024-01")),
        create_record("A", "X", 150, 1, Some("2024-02")),
        create_record("B", "X", 100, 1, Some("2024-01")),
        create_record("B", "X", 300, 1, Some("2024-02")),
        create_record("C", "X", 100, 1, Some("2024-01")),
        create_record("D", "X", 900, 1, Some("2024-02")),
    ]);

    let growth = growth_ranking(&FilteredSet::all(&record_set), GroupBy::Country, 5);
    let keys: Vec<&str> = growth.iter().map(|entry| entry.key.as_str()).collect();

    assert_eq!(keys, ["B", "A"]);
    assert_eq!(growth[0].growth_pct, volume(200));
    assert_eq!(growth[1].growth_pct, volume(50));
}

#[test]
fn test_period_breakdown_outer_joins_both_months() {
    let record_set = create_record_set(scenario_records());
    let breakdown = period_breakdown(&FilteredSet::all(&record_set), GroupBy::ServiceType);

    assert_eq!(breakdown.len(), 2);
    assert_eq!(breakdown[0].key, "X");
    assert_eq!(breakdown[0].change, volume(100));
    assert_eq!(breakdown[0].change_pct, Some(volume(100)));
    assert_eq!(breakdown[1].key, "Y");
    assert!(breakdown[1].previous.is_zero());
    assert_eq!(breakdown[1].change_pct, None);
}

#[test]
fn test_magnitude_bins_relative_to_the_largest_group() {
    let record_set = countries(&[("A", 1000), ("B", 600), ("C", 300), ("D", 100), ("E", 20), ("F", 5), ("G", 0), ("H", 10), ("I", 50)]);
    let bins = magnitude_bins(&FilteredSet::all(&record_set), GroupBy::Country);

    let summary: Vec<(MagnitudeBand, Vec<&str>)> = bins.iter()
        .map(|bin| (bin.band, bin.members.iter().map(String::as_str).collect()))
        .collect();

    assert_eq!(summary, vec![
        (MagnitudeBand::Bottom, vec!["H", "F", "G"]),
        (MagnitudeBand::LowerMiddle, vec!["I", "E"]),
        (MagnitudeBand::Middle, vec!["D"]),
        (MagnitudeBand::UpperMiddle, vec!["C"]),
        (MagnitudeBand::Top, vec!["A", "B"]),
    ]);

    assert_eq!(bins[4].volume, volume(1600));
    assert_eq!(bins[0].label, "하위");
    assert_eq!(bins[4].label, "상위");
}

#[test]
fn test_magnitude_bins_skip_empty_bands() {
    let record_set = countries(&[("A", 100), ("B", 90)]);
    let bins = magnitude_bins(&FilteredSet::all(&record_set), GroupBy::Country);

    assert_eq!(bins.len(), 1);
    assert_eq!(bins[0].band, MagnitudeBand::Top);
}

#[test]
fn test_population_tiers_for_ten_groups() {
    let pairs: Vec<(String, i64)> = (1..=10).map(|index| (format!("C{index:02}"), (11 - index) * 100)).collect();
    let pairs: Vec<(&str, i64)> = pairs.iter().map(|(key, amount)| (key.as_str(), *amount)).collect();
    let record_set = countries(&pairs);

    let tiers = population_tiers(&FilteredSet::all(&record_set), GroupBy::Country);
    let counts: Vec<usize> = tiers.iter().map(|tier| tier.count).collect();

    assert_eq!(counts, [1, 2, 3, 4]);
    assert_eq!(tiers[0].tier, PopulationTier::Tier1);
    assert_eq!(tiers[0].members, ["C01"]);
    assert_eq!(tiers[1].volume, volume(1700));
    assert_eq!(tiers[3].volume, volume(1000));

    let shares: Decimal = tiers.iter().filter_map(|tier| tier.share_pct).sum();
    assert_eq!(shares.round_dp(6), volume(100));
}

#[test]
fn test_population_tiers_cover_every_group_exactly_once() {
    for total in 1..=40_i64 {
        let pairs: Vec<(String, i64)> = (0..total).map(|index| (format!("K{index:03}"), index * 7 + 1)).collect();
        let pairs: Vec<(&str, i64)> = pairs.iter().map(|(key, amount)| (key.as_str(), *amount)).collect();
        let record_set = countries(&pairs);

        let tiers = population_tiers(&FilteredSet::all(&record_set), GroupBy::Country);
        let mut members: Vec<&str> = tiers.iter().flat_map(|tier| tier.members.iter().map(String::as_str)).collect();

        assert_eq!(tiers.len(), 4);
        assert_eq!(tiers.iter().map(|tier| tier.count).sum::<usize>(), total as usize);

        members.sort();
        members.dedup();
        assert_eq!(members.len(), total as usize);
    }
}

#[test]
fn test_population_tiers_for_tiny_populations() {
    let record_set = countries(&[("A", 10), ("B", 5)]);
    let tiers = population_tiers(&FilteredSet::all(&record_set), GroupBy::Country);
    let counts: Vec<usize> = tiers.iter().map(|tier| tier.count).collect();

    assert_eq!(counts, [1, 1, 0, 0]);
}

#[test]
fn test_pivot_fills_missing_combinations_with_zero() -> Result<()> {
    let record_set = create_record_set(scenario_records());
    let table = pivot(&FilteredSet::all(&record_set), GroupBy::Country, GroupBy::ServiceType, 15);

    assert_eq!(table.rows, ["A", "B"]);
    assert_eq!(table.columns, ["X", "Y"]);
    assert_eq!(table.values, vec![vec![volume(100), volume(50)], vec![volume(200), volume(0)]]);
    assert_eq!(table.log_values[1][1], 0.0);
    assert!((table.log_values[0][0] - 101_f64.ln()).abs() < 1e-9);

    Ok(())
}

#[test]
fn test_pivot_keeps_only_the_top_k_rows() {
    let record_set = create_record_set(scenario_records());
    let table = pivot(&FilteredSet::all(&record_set), GroupBy::Country, GroupBy::ServiceType, 1);

    assert_eq!(table.rows, ["B"]);
    assert_eq!(table.columns, ["X"]);
}

#[test]
fn test_hierarchy_nests_services_under_top_countries() {
    let record_set = create_record_set(scenario_records());
    let root = hierarchy(&FilteredSet::all(&record_set), GroupBy::Country, GroupBy::ServiceType, 15);

    assert_eq!(root.volume, volume(350));
    assert_eq!(root.children[0].key, "B");
    assert_eq!(root.children[1].key, "A");
    assert_eq!(root.children[1].children[0].key, "X");
    assert_eq!(root.children[1].children[1].volume, volume(50));
}

#[test]
fn test_monthly_trend_and_key_series() {
    let record_set = create_record_set(scenario_records());
    let filtered = FilteredSet::all(&record_set);

    let trend = monthly_trend(&filtered, None);
    assert_eq!(trend.len(), 2);
    assert_eq!(trend[1].month, "2024-02");
    assert_eq!(trend[1].volume, volume(250));
    assert_eq!(trend[1].transaction_count, 5);

    let latest = monthly_trend(&filtered, Some(1));
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].month, "2024-02");

    let series = key_series(&filtered, GroupBy::Country, Some(9));
    assert_eq!(series[0].key, "B");
    assert_eq!(series[1].key, "A");
    assert_eq!(series[1].points.len(), 2);
    assert_eq!(series[1].total_volume, volume(150));
}

#[test]
fn test_cohort_series_keeps_only_the_top_cohorts() {
    let record_set = create_record_set(vec![
        with_cohort(create_record("A", "X", 100, 1, Some("2024-01")), "2023-12"),
        with_cohort(create_record("A", "X", 300, 1, Some("2024-02")), "2024-01"),
        with_cohort(create_record("B", "X", 50, 1, Some("2024-02")), "2023-12"),
        with_cohort(create_record("B", "X", 10, 1, Some("2024-02")), "2023-11"),
    ]);

    let cohorts = cohort_series(&FilteredSet::all(&record_set), 2);
    let keys: Vec<&str> = cohorts.iter().map(|series| series.key.as_str()).collect();

    assert_eq!(keys, ["2024-01", "2023-12"]);
    assert_eq!(cohorts[1].points.len(), 2);
    assert_eq!(cohorts[1].points[0].month, "2024-01");
    assert_eq!(cohorts[1].points[1].volume, volume(50));
}

#[test]
fn test_overview_counts_rows_and_keys() {
    let record_set = create_record_set(scenario_records());
    let overview = overview(&FilteredSet::all(&record_set));

    assert_eq!(overview.rows, 3);
    assert_eq!(overview.distinct_countries, 2);
    assert_eq!(overview.distinct_services, 2);
}

#[test]
fn test_volume_sums_clamp_instead_of_overflowing() -> Result<()> {
    let record_set = create_record_set(vec![
        with_volume(create_record("A", "X", 0, 1, Some("2024-01")), "50000000000000000000000000000")?,
        with_volume(create_record("B", "X", 0, 1, Some("2024-02")), "50000000000000000000000000000")?,
    ]);
    let filtered = FilteredSet::all(&record_set);

    let kpis = kpis(&filtered);
    assert_eq!(kpis.total_volume, Decimal::MAX);
    assert_eq!(kpis.top_service.as_deref(), Some("X"));

    assert_eq!(top_n(&filtered, GroupBy::ServiceType, 1)[0].volume, Decimal::MAX);
    assert_eq!(hierarchy(&filtered, GroupBy::ServiceType, GroupBy::Country, 15).volume, Decimal::MAX);
    assert_eq!(population_tiers(&filtered, GroupBy::ServiceType)[0].volume, Decimal::MAX);
    assert_eq!(monthly_trend(&filtered, None).len(), 2);

    let comparison = compare_periods(&filtered).ok_or_else(|| anyhow!("Comparison missing"))?;
    assert_eq!(comparison.volume_change_pct, Some(Decimal::ZERO));

    Ok(())
}

#[test]
fn test_magnitude_bins_handle_volumes_near_the_decimal_limit() -> Result<()> {
    let record_set = create_record_set(vec![
        with_volume(create_record("A", "X", 0, 1, None), "75000000000000000000000000000")?,
        create_record("B", "X", 10, 1, None),
    ]);

    let bins = magnitude_bins(&FilteredSet::all(&record_set), GroupBy::Country);

    assert_eq!(bins.len(), 2);
    assert_eq!(bins[0].band, MagnitudeBand::Bottom);
    assert_eq!(bins[1].band, MagnitudeBand::Top);
    assert_eq!(bins[1].members, ["A"]);

    Ok(())
}

#[test]
fn test_transaction_counts_clamp_instead_of_wrapping() {
    let record_set = create_record_set(vec![
        create_record("A", "X", 1, i64::MAX, Some("2024-01")),
        create_record("A", "X", 1, i64::MAX, Some("2024-01")),
    ]);
    let filtered = FilteredSet::all(&record_set);

    assert_eq!(kpis(&filtered).total_transactions, i64::MAX);
    assert_eq!(top_n(&filtered, GroupBy::Country, 1)[0].transaction_count, i64::MAX);
}
