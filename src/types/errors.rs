use rust_decimal::Error as DecimalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NumericError {
    #[error("Numeric error: {0}")]
    InvalidFormat(String),
    #[error("Numeric error: {0}")]
    Decimal(#[from] DecimalError),
    #[error("Numeric error: count [{0}] is not a whole number")]
    Fractional(String)
}
