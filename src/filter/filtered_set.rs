use crate::models::{Capabilities, RecordSet, TransactionRecord};

/// Read-only view over the rows of a record set that match the current filter state.
#[derive(Debug, Clone)]
pub struct FilteredSet<'a> {
    records: Vec<&'a TransactionRecord>,
    capabilities: Capabilities
}

impl<'a> FilteredSet<'a> {
    pub fn new(records: Vec<&'a TransactionRecord>, capabilities: Capabilities) -> Self {
        Self { records, capabilities }
    }

    /// The unrestricted view over every row.
    pub fn all(record_set: &'a RecordSet) -> Self {
        Self::new(record_set.records().iter().collect(), record_set.capabilities())
    }

    pub fn records(&self) -> &[&'a TransactionRecord] {
        &self.records
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Narrows the view further, e.g. to a single month for period comparisons.
    pub fn subset<F>(&self, predicate: F) -> FilteredSet<'a>
    where
        F: Fn(&TransactionRecord) -> bool
    {
        let records = self.records.iter()
            .copied()
            .filter(|record| predicate(record))
            .collect();

        Self::new(records, self.capabilities)
    }
}
