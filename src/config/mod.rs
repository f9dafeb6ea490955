mod analysis_config;
mod errors;

pub use analysis_config::AnalysisConfig;
