use crate::models::errors::SourceError;
use crate::models::ColumnMapping;
use crate::types::{parse_count, parse_volume, TransactionCount, Volume};
use std::collections::HashMap;

/// One row of the unified dataset.
///
/// The typed fields drive filtering and aggregation. `cells` keeps the raw text of
/// every column of the originating source so the row can be exported unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    pub country: String,
    pub service_type: String,
    pub volume: Volume,
    pub transaction_count: TransactionCount,
    pub customer_id: Option<String>,
    /// Kept as text so `2024-01` and `202401` both sort the way they read.
    pub transaction_month: Option<String>,
    pub customer_created_month: Option<String>,
    /// Provenance only. Never grouped on and never exported.
    pub source_file: String,
    pub cells: HashMap<String, String>
}

impl TransactionRecord {
    /// Builds a record from the header → text cells of a single row.
    ///
    /// # Errors
    /// Returns `SourceError::InvalidValue` if a non-empty volume or count cell is not numeric.
    pub fn from_cells(cells: HashMap<String, String>, mapping: &ColumnMapping, source_name: &str, row: usize) -> Result<Self, SourceError> {
        let text = |column: &str| cells.get(column).map(|value| value.trim().to_string());

        let volume = parse_volume(cells.get(&mapping.volume).map(String::as_str).unwrap_or_default())
            .map_err(|error| SourceError::invalid_value(source_name, row, &mapping.volume, error))?;

        let transaction_count = parse_count(cells.get(&mapping.transaction_count).map(String::as_str).unwrap_or_default())
            .map_err(|error| SourceError::invalid_value(source_name, row, &mapping.transaction_count, error))?;

        Ok(Self {
            country: text(&mapping.country).unwrap_or_default(),
            service_type: text(&mapping.service_type).unwrap_or_default(),
            volume,
            transaction_count,
            customer_id: text(&mapping.customer_id).filter(|value| !value.is_empty()),
            transaction_month: text(&mapping.transaction_month),
            customer_created_month: text(&mapping.customer_created_month),
            source_file: source_name.to_string(),
            cells
        })
    }
}
