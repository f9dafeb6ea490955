use crate::loader::errors::LoadError;
use crate::loader::parser::parse_source;
use crate::loader::{LoadOutcome, LoadedSource, SourceFailure, SourcePayload};
use crate::models::{ColumnMapping, RecordSet, SourceError, SourceTable};
use moka::future::Cache;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::spawn_blocking;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SourceKey {
    name: String,
    digest: u64
}

impl SourceKey {
    fn of(payload: &SourcePayload) -> Self {
        let mut hasher = DefaultHasher::new();
        payload.bytes.hash(&mut hasher);

        Self {
            name: payload.name.clone(),
            digest: hasher.finish()
        }
    }
}

/// Parses uploaded sources into a single record set.
///
/// Parsed tables are memoized by file name and content, so re-supplying an unchanged file
/// skips the parse. The cache is purely an optimization.
pub struct SourceLoader {
    mapping: Arc<ColumnMapping>,
    cache: Cache<SourceKey, Arc<SourceTable>>
}

impl SourceLoader {
    pub fn new(mapping: ColumnMapping) -> Self {
        Self {
            mapping: Arc::new(mapping),
            cache: Cache::new(64)
        }
    }

    /// Parses every payload independently and unions the ones that succeed.
    ///
    /// # Errors
    /// Returns `LoadError::NoUsableData` if not a single payload could be parsed. Individual
    /// parse failures are reported in `LoadOutcome::failures` instead.
    pub async fn load(&self, payloads: Vec<SourcePayload>) -> Result<LoadOutcome, LoadError> {
        let attempted = payloads.len();
        let mut tables = Vec::with_capacity(attempted);
        let mut loaded = Vec::with_capacity(attempted);
        let mut failures = Vec::new();

        for payload in payloads {
            let name = payload.name.clone();

            match self.parse_cached(payload).await {
                Ok(table) => {
                    debug!("Source [{name}] parsed with [{}] rows", table.records.len());
                    loaded.push(LoadedSource { name, rows: table.records.len() });
                    tables.push(SourceTable::clone(&table));
                }
                Err(error) => {
                    warn!("Skipping source: {error}");
                    failures.push(SourceFailure { name, reason: error.to_string() });
                }
            }
        }

        if tables.is_empty() {
            return Err(LoadError::NoUsableData { attempted });
        }

        let record_set = RecordSet::union(tables, &self.mapping);

        info!("Loaded [{}] rows from [{}] of [{attempted}] sources", record_set.len(), loaded.len());

        Ok(LoadOutcome { record_set, loaded, failures })
    }

    /// Reads the files from disk and loads them. Files that cannot be read are recorded as
    /// failures ahead of the sources that failed to parse.
    pub async fn load_paths(&self, paths: &[PathBuf]) -> Result<LoadOutcome, LoadError> {
        let mut payloads = Vec::with_capacity(paths.len());
        let mut unreadable = Vec::new();

        for path in paths {
            match SourcePayload::from_path(path).await {
                Ok(payload) => payloads.push(payload),
                Err(error) => {
                    warn!("Skipping source [{}]: {error}", path.display());
                    unreadable.push(SourceFailure { name: path.display().to_string(), reason: error.to_string() });
                }
            }
        }

        match self.load(payloads).await {
            Ok(mut outcome) => {
                unreadable.append(&mut outcome.failures);
                outcome.failures = unreadable;
                Ok(outcome)
            }
            Err(LoadError::NoUsableData { .. }) => Err(LoadError::NoUsableData { attempted: paths.len() })
        }
    }

    /// Number of parsed sources currently memoized.
    pub async fn cached_sources(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    async fn parse_cached(&self, payload: SourcePayload) -> Result<Arc<SourceTable>, Arc<SourceError>> {
        let key = SourceKey::of(&payload);
        let mapping = self.mapping.clone();

        self.cache.try_get_with(key, async move {
            let name = payload.name.clone();

            spawn_blocking(move || parse_source(&payload.name, &payload.bytes, &mapping))
                .await
                .map_err(|error| SourceError::unreadable(&name, error))
                .and_then(|result| result.map(Arc::new))
        }).await
    }
}
