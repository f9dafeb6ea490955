use crate::filter::{FilterState, FilteredSet};
use crate::models::{FilterDimension, RecordSet, TransactionRecord};

/// Applies the filter state to the record set.
///
/// Dimensions combine with AND, values within a dimension with OR. An empty selection
/// places no restriction on its dimension.
pub fn apply<'a>(record_set: &'a RecordSet, state: &FilterState) -> FilteredSet<'a> {
    let records = record_set.records()
        .iter()
        .filter(|record| matches(record, state))
        .collect();

    FilteredSet::new(records, record_set.capabilities())
}

fn matches(record: &TransactionRecord, state: &FilterState) -> bool {
    FilterDimension::ALL.iter().all(|dimension| {
        let selection = state.selection(*dimension);

        if selection.is_empty() {
            return true;
        }

        match dimension.value_of(record) {
            Some(value) => selection.contains(value),
            None => true
        }
    })
}
