use super::{ColumnMapping, RecordSet, SourceTable, TransactionRecord};
use std::collections::HashMap;

/// Builds a record the way the loader would for a row with the default headers.
pub fn create_record(country: &str, service: &str, volume: i64, transaction_count: i64, month: Option<&str>) -> TransactionRecord {
    let mapping = ColumnMapping::default();
    let mut cells = HashMap::from([
        (mapping.country.clone(), country.to_string()),
        (mapping.service_type.clone(), service.to_string()),
        (mapping.volume.clone(), volume.to_string()),
        (mapping.transaction_count.clone(), transaction_count.to_string())
    ]);

    if let Some(month) = month {
        cells.insert(mapping.transaction_month.clone(), month.to_string());
    }

    TransactionRecord {
        country: country.to_string(),
        service_type: service.to_string(),
        volume: volume.into(),
        transaction_count,
        customer_id: None,
        transaction_month: month.map(str::to_string),
        customer_created_month: None,
        source_file: "sample.csv".to_string(),
        cells
    }
}

pub fn with_customer(mut record: TransactionRecord, customer_id: &str) -> TransactionRecord {
    record.cells.insert(ColumnMapping::default().customer_id, customer_id.to_string());
    record.customer_id = Some(customer_id.to_string());
    record
}

pub fn with_cohort(mut record: TransactionRecord, cohort: &str) -> TransactionRecord {
    record.cells.insert(ColumnMapping::default().customer_created_month, cohort.to_string());
    record.customer_created_month = Some(cohort.to_string());
    record
}

pub fn with_source(mut record: TransactionRecord, source: &str) -> TransactionRecord {
    record.source_file = source.to_string();
    record
}

/// Wraps records into a record set, grouping them into one table per distinct source file.
pub fn create_record_set(records: Vec<TransactionRecord>) -> RecordSet {
    let mut tables: Vec<SourceTable> = Vec::new();

    for record in records {
        let mut columns: Vec<String> = record.cells.keys().cloned().collect();
        columns.sort();

        match tables.iter_mut().find(|table| table.name == record.source_file) {
            Some(table) => {
                for column in columns {
                    if !table.columns.contains(&column) {
                        table.columns.push(column);
                    }
                }
                table.records.push(record);
            }
            None => tables.push(SourceTable {
                name: record.source_file.clone(),
                columns,
                records: vec![record]
            })
        }
    }

    RecordSet::union(tables, &ColumnMapping::default())
}

/// The three-row scenario used across the aggregation tests.
pub fn scenario_records() -> Vec<TransactionRecord> {
    vec![
        create_record("A", "X", 100, 2, Some("2024-01")),
        create_record("A", "Y", 50, 1, Some("2024-02")),
        create_record("B", "X", 200, 4, Some("2024-02")),
    ]
}
