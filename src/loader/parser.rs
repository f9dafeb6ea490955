use crate::models::{ColumnMapping, SourceError, SourceTable, TransactionRecord};
use crate::types::{format_float_cell, PROVENANCE_COLUMN};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parses one source payload into a table, choosing the format from the file extension.
pub fn parse_source(name: &str, bytes: &[u8], mapping: &ColumnMapping) -> Result<SourceTable, SourceError> {
    let is_delimited = Path::new(name)
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("csv"));

    if is_delimited {
        parse_delimited(name, bytes, mapping)
    } else {
        parse_spreadsheet(name, bytes, mapping)
    }
}

fn parse_delimited(name: &str, bytes: &[u8], mapping: &ColumnMapping) -> Result<SourceTable, SourceError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()
        .map_err(|error| SourceError::unreadable(name, error))?
        .iter()
        .map(str::to_string)
        .collect();

    let rows = reader.into_records().map(|result| {
        result
            .map(|record| record.iter().map(str::to_string).collect())
            .map_err(|error| SourceError::unreadable(name, error))
    });

    build_table(name, headers, rows, mapping)
}

fn parse_spreadsheet(name: &str, bytes: &[u8], mapping: &ColumnMapping) -> Result<SourceTable, SourceError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|error| SourceError::unreadable(name, error))?;

    let range = workbook.worksheet_range_at(0)
        .ok_or_else(|| SourceError::unreadable(name, "workbook has no sheets"))?
        .map_err(|error| SourceError::unreadable(name, error))?;

    let mut rows = range.rows();

    let headers: Vec<String> = rows.next()
        .ok_or_else(|| SourceError::missing_header(name))?
        .iter()
        .map(cell_text)
        .collect();

    build_table(name, headers, rows.map(|row| Ok(row.iter().map(cell_text).collect())), mapping)
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::Float(value) => format_float_cell(*value),
        Data::Int(value) => value.to_string(),
        other => format!("{}", other)
    }
}

fn build_table<I>(name: &str, headers: Vec<String>, rows: I, mapping: &ColumnMapping) -> Result<SourceTable, SourceError>
where
    I: Iterator<Item = Result<Vec<String>, SourceError>>
{
    if headers.iter().all(|header| header.is_empty()) {
        return Err(SourceError::missing_header(name));
    }

    for column in mapping.required() {
        if !headers.iter().any(|header| header == column) {
            return Err(SourceError::missing_column(name, column));
        }
    }

    let columns: Vec<String> = headers.iter()
        .filter(|header| !header.is_empty() && header.as_str() != PROVENANCE_COLUMN)
        .cloned()
        .collect();

    let mut records = Vec::new();

    for (index, row) in rows.enumerate() {
        let row = row?;

        if row.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        let cells: HashMap<String, String> = headers.iter()
            .zip(row)
            .filter(|(header, _)| !header.is_empty() && header.as_str() != PROVENANCE_COLUMN)
            .map(|(header, cell)| (header.clone(), cell))
            .collect();

        records.push(TransactionRecord::from_cells(cells, mapping, name, index + 1)?);
    }

    Ok(SourceTable {
        name: name.to_string(),
        columns,
        records
    })
}
