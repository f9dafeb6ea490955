mod errors;
mod exporter;

pub use errors::ExportError;
pub use exporter::{to_csv, to_xlsx};
