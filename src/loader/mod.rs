mod errors;
mod parser;
mod source_loader;

use crate::models::RecordSet;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

pub use source_loader::SourceLoader;

/// Raw bytes of one uploaded file together with the name it was uploaded under.
#[derive(Debug, Clone)]
pub struct SourcePayload {
    pub name: String,
    pub bytes: Arc<[u8]>
}

impl SourcePayload {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into()
        }
    }

    /// Reads a file from disk, naming the payload after the file name.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(name, bytes))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedSource {
    pub name: String,
    pub rows: usize
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailure {
    pub name: String,
    pub reason: String
}

/// Result of a load: the merged record set plus what happened to each source.
#[derive(Debug)]
pub struct LoadOutcome {
    pub record_set: RecordSet,
    pub loaded: Vec<LoadedSource>,
    pub failures: Vec<SourceFailure>
}
