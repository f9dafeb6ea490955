use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: could not read [{path}]: {error}")]
    Read {
        path: String,
        error: std::io::Error
    },
    #[error("Configuration error: [{path}] is not valid: {error}")]
    Parse {
        path: String,
        error: serde_json::Error
    }
}
