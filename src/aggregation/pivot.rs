use crate::aggregation::grouping::{group_totals, ranked, top_keys};
use crate::filter::FilteredSet;
use crate::models::GroupBy;
use crate::types::{sum_volumes, Volume};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Summed volume of `rows` × `columns`, zero where a combination never occurs.
///
/// `log_values` holds `ln(1 + volume)` of the same cells for colour scaling; `values` stays
/// untouched for labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotTable {
    pub row_dimension: GroupBy,
    pub column_dimension: GroupBy,
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub values: Vec<Vec<Volume>>,
    pub log_values: Vec<Vec<f64>>
}

/// Cross-tabulates the `top_k` row keys by volume against every column key.
///
/// Row and column keys are listed in ascending order.
pub fn pivot(filtered: &FilteredSet<'_>, rows: GroupBy, columns: GroupBy, top_k: usize) -> PivotTable {
    let row_keys: BTreeSet<String> = top_keys(filtered, rows, top_k).into_iter().collect();
    let mut cells: BTreeMap<(&str, &str), Volume> = BTreeMap::new();
    let mut column_keys: BTreeSet<&str> = BTreeSet::new();

    for &record in filtered.records() {
        let (Some(row), Some(column)) = (rows.key_of(record), columns.key_of(record)) else {
            continue;
        };

        if !row_keys.contains(row) {
            continue;
        }

        column_keys.insert(column);
        let cell = cells.entry((row, column)).or_default();
        *cell = cell.saturating_add(record.volume);
    }

    let values: Vec<Vec<Volume>> = row_keys.iter()
        .map(|row| {
            column_keys.iter()
                .map(|column| cells.get(&(row.as_str(), *column)).copied().unwrap_or_default())
                .collect()
        })
        .collect();

    let log_values = values.iter()
        .map(|row| row.iter().map(|value| log_scale(*value)).collect())
        .collect();

    PivotTable {
        row_dimension: rows,
        column_dimension: columns,
        rows: row_keys.into_iter().collect(),
        columns: column_keys.into_iter().map(str::to_string).collect(),
        values,
        log_values
    }
}

/// `ln(1 + x)` for display scaling. Negative volumes scale as zero.
pub fn log_scale(value: Volume) -> f64 {
    value.max(Decimal::ZERO)
        .to_f64()
        .map(f64::ln_1p)
        .unwrap_or_default()
}

/// A node of the outer → inner → volume hierarchy used by treemaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyNode {
    pub key: String,
    pub volume: Volume,
    pub children: Vec<HierarchyNode>
}

/// Builds a three-level tree: a root, the `top_k` outer keys, and the inner keys under each.
///
/// Children at every level are ordered by descending volume.
pub fn hierarchy(filtered: &FilteredSet<'_>, outer: GroupBy, inner: GroupBy, top_k: usize) -> HierarchyNode {
    let outer_keys = top_keys(filtered, outer, top_k);

    let children: Vec<HierarchyNode> = outer_keys.into_iter()
        .map(|outer_key| {
            let members = filtered.subset(|record| outer.key_of(record) == Some(outer_key.as_str()));

            let leaves: Vec<HierarchyNode> = ranked(group_totals(members.records(), inner))
                .into_iter()
                .map(|(key, totals)| HierarchyNode {
                    key: key.to_string(),
                    volume: totals.volume,
                    children: Vec::new()
                })
                .collect();

            HierarchyNode {
                volume: sum_volumes(leaves.iter().map(|leaf| leaf.volume)),
                key: outer_key,
                children: leaves
            }
        })
        .collect();

    HierarchyNode {
        key: "total".to_string(),
        volume: sum_volumes(children.iter().map(|child| child.volume)),
        children
    }
}
