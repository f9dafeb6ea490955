use crate::export::errors::ExportError;
use crate::filter::FilteredSet;
use crate::models::TransactionRecord;
use crate::types::PROVENANCE_COLUMN;
use csv::WriterBuilder;
use rust_xlsxwriter::Workbook;

/// Row ceiling of a single spreadsheet sheet.
pub const SPREADSHEET_ROW_LIMIT: usize = 1_048_576;

/// Digits an f64 cell keeps exactly.
const MAX_EXACT_DIGITS: usize = 15;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const SHEET_NAME: &str = "Data";

/// Serializes the filtered rows as comma-separated UTF-8 text with a leading byte-order mark.
pub fn to_csv(filtered: &FilteredSet<'_>, columns: &[String]) -> Result<Vec<u8>, ExportError> {
    let columns = export_columns(columns);
    let mut writer = WriterBuilder::new().from_writer(UTF8_BOM.to_vec());

    writer.write_record(&columns)?;

    for record in filtered.records() {
        writer.write_record(columns.iter().map(|column| cell(record, column)))?;
    }

    writer.into_inner().map_err(|error| ExportError::Io(error.into_error()))
}

/// Serializes the filtered rows as a single-sheet workbook.
///
/// # Errors
/// Returns `ExportError::CapacityExceeded` when the rows do not fit on one sheet.
pub fn to_xlsx(filtered: &FilteredSet<'_>, columns: &[String]) -> Result<Vec<u8>, ExportError> {
    check_spreadsheet_capacity(filtered.len())?;

    let columns = export_columns(columns);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (index, header) in columns.iter().enumerate() {
        worksheet.write_string(0, column_number(index, columns.len())?, *header)?;
    }

    for (row, record) in filtered.records().iter().enumerate() {
        let row = (row + 1) as u32;

        for (index, column) in columns.iter().enumerate() {
            let value = cell(record, column);
            let column = column_number(index, columns.len())?;

            if value.is_empty() {
                continue;
            }

            match as_number(value) {
                Some(number) => worksheet.write_number(row, column, number)?,
                None => worksheet.write_string(row, column, value)?
            };
        }
    }

    Ok(workbook.save_to_buffer()?)
}

pub fn check_spreadsheet_capacity(rows: usize) -> Result<(), ExportError> {
    if rows > SPREADSHEET_ROW_LIMIT {
        return Err(ExportError::CapacityExceeded { rows, limit: SPREADSHEET_ROW_LIMIT });
    }

    Ok(())
}

fn export_columns(columns: &[String]) -> Vec<&str> {
    columns.iter()
        .map(String::as_str)
        .filter(|column| *column != PROVENANCE_COLUMN)
        .collect()
}

fn cell<'a>(record: &'a TransactionRecord, column: &str) -> &'a str {
    record.cells.get(column).map(String::as_str).unwrap_or_default()
}

fn column_number(index: usize, columns: usize) -> Result<u16, ExportError> {
    u16::try_from(index).map_err(|_| ExportError::ColumnLimit { columns })
}

/// Numeric cells are written as numbers unless that would lose their text: leading zeros of an id,
/// digits beyond what a float holds, or exponent and special notations.
fn as_number(value: &str) -> Option<f64> {
    let unsigned = value.strip_prefix('-').unwrap_or(value);

    if unsigned.is_empty() || !unsigned.chars().all(|ch| ch.is_ascii_digit() || ch == '.') {
        return None;
    }

    let leading_zero = unsigned.len() > 1 && unsigned.starts_with('0') && !unsigned.starts_with("0.");
    let significant_digits = unsigned.chars()
        .filter(char::is_ascii_digit)
        .skip_while(|digit| *digit == '0')
        .count();

    if leading_zero || significant_digits > MAX_EXACT_DIGITS {
        return None;
    }

    value.parse().ok()
}
