mod errors;
mod numeric;

use rust_decimal::Decimal;

pub use errors::NumericError;
pub use numeric::{
    format_float_cell, is_clamped, parse_count, parse_volume, percent_change, percent_share, sum_counts, sum_volumes
};

pub type Volume = Decimal;
pub type TransactionCount = i64;

/// Header of the provenance column injected at load time.
pub const PROVENANCE_COLUMN: &str = "_source_file";

/// Display value for a statistic that has no answer on an empty set.
pub const EMPTY_SENTINEL: &str = "-";
