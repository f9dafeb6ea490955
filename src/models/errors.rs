use crate::types::NumericError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source [{source_name}] could not be read: {reason}")]
    Unreadable {
        source_name: String,
        reason: String
    },
    #[error("Source [{source_name}] has no header row")]
    MissingHeader {
        source_name: String
    },
    #[error("Source [{source_name}] is missing required column [{column}]")]
    MissingColumn {
        source_name: String,
        column: String
    },
    #[error("Source [{source_name}] has an invalid [{column}] value on row [{row}]: {error}")]
    InvalidValue {
        source_name: String,
        row: usize,
        column: String,
        error: NumericError
    }
}

impl SourceError {
    pub fn unreadable(source_name: &str, reason: impl ToString) -> Self {
        Self::Unreadable {
            source_name: source_name.to_string(),
            reason: reason.to_string()
        }
    }

    pub fn missing_header(source_name: &str) -> Self {
        Self::MissingHeader { source_name: source_name.to_string() }
    }

    pub fn missing_column(source_name: &str, column: &str) -> Self {
        Self::MissingColumn {
            source_name: source_name.to_string(),
            column: column.to_string()
        }
    }

    pub fn invalid_value(source_name: &str, row: usize, column: &str, error: NumericError) -> Self {
        Self::InvalidValue {
            source_name: source_name.to_string(),
            row,
            column: column.to_string(),
            error
        }
    }
}
