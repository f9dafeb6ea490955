use rust_xlsxwriter::XlsxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Spreadsheet export refused: [{rows}] rows exceed the [{limit}] row limit, use the CSV export instead")]
    CapacityExceeded {
        rows: usize,
        limit: usize
    },
    #[error("Spreadsheet export refused: [{columns}] columns exceed the sheet width")]
    ColumnLimit {
        columns: usize
    },
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("Export failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Spreadsheet export failed: {0}")]
    Xlsx(#[from] XlsxError)
}
