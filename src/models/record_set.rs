use crate::models::{ColumnMapping, TransactionRecord};
use crate::types::PROVENANCE_COLUMN;
use serde::Serialize;

/// Optional columns the loaded data carries, computed once at load time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    pub has_month: bool,
    pub has_customer_id: bool,
    pub has_cohort_month: bool
}

/// A single successfully parsed source, before the union.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub name: String,
    pub columns: Vec<String>,
    pub records: Vec<TransactionRecord>
}

/// The row-wise union of every successfully parsed source.
///
/// Append-only while loading; a new upload replaces it wholesale.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    columns: Vec<String>,
    records: Vec<TransactionRecord>,
    capabilities: Capabilities
}

impl RecordSet {
    /// Unions the tables in the given order.
    ///
    /// Columns keep their first-seen order. When any source carries an optional column, rows
    /// from sources without it get an empty value so they still group and filter on it.
    pub fn union(tables: Vec<SourceTable>, mapping: &ColumnMapping) -> Self {
        let mut columns: Vec<String> = Vec::new();
        let mut records = Vec::new();

        for table in tables {
            for column in &table.columns {
                if column != PROVENANCE_COLUMN && !columns.contains(column) {
                    columns.push(column.clone());
                }
            }

            records.extend(table.records);
        }

        let has_column = |name: &str| columns.iter().any(|column| column == name);

        let capabilities = Capabilities {
            has_month: has_column(&mapping.transaction_month),
            has_customer_id: has_column(&mapping.customer_id),
            has_cohort_month: has_column(&mapping.customer_created_month)
        };

        for record in &mut records {
            if capabilities.has_month && record.transaction_month.is_none() {
                record.transaction_month = Some(String::new());
            }

            if capabilities.has_cohort_month && record.customer_created_month.is_none() {
                record.customer_created_month = Some(String::new());
            }
        }

        Self { columns, records, capabilities }
    }

    /// Export columns, provenance excluded.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}
