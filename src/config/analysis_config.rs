use crate::config::errors::ConfigError;
use crate::models::ColumnMapping;
use serde::Deserialize;
use std::path::Path;

/// Column names and ranking sizes used when building a report.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AnalysisConfig {
    pub columns: ColumnMapping,
    /// Length of the headline country and service rankings.
    pub top_n: usize,
    pub growth_top_n: usize,
    /// Length of the ranking charts and of the stacked country × service table.
    pub chart_top_n: usize,
    pub pivot_top_k: usize,
    pub small_multiples_top_k: usize,
    pub cohort_top_k: usize,
    pub trend_months: usize
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            top_n: 5,
            growth_top_n: 5,
            chart_top_n: 10,
            pivot_top_k: 15,
            small_multiples_top_k: 9,
            cohort_top_k: 5,
            trend_months: 6
        }
    }
}

impl AnalysisConfig {
    /// Reads a JSON configuration. Missing fields keep their defaults.
    pub async fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let display = path.display().to_string();

        let content = tokio::fs::read_to_string(path).await
            .map_err(|error| ConfigError::Read { path: display.clone(), error })?;

        Self::from_json(&content).map_err(|error| ConfigError::Parse { path: display, error })
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}
