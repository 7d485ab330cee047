use super::{TurnRecord, TurnStore};
use crate::error::TestmateError;
use std::path::{Path, PathBuf};

/// Persists each turn as `<id>.json` under a directory.
pub struct JsonFileTurnStore {
    base_dir: PathBuf,
}

impl JsonFileTurnStore {
    /// Create a store using the default directory (~/.testmate/turns/)
    pub fn new() -> Result<Self, TestmateError> {
        Self::with_dir(Self::default_dir()?)
    }

    /// Create a store rooted at a custom directory
    pub fn with_dir(base_dir: impl Into<PathBuf>) -> Result<Self, TestmateError> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir).map_err(|e| {
            TestmateError::StorageUnavailable(format!("Failed to create turns directory: {}", e))
        })?;

        Ok(Self { base_dir })
    }

    pub fn default_dir() -> Result<PathBuf, TestmateError> {
        let home = dirs::home_dir().ok_or_else(|| {
            TestmateError::Config("Could not determine home directory".to_string())
        })?;

        Ok(home.join(".testmate").join("turns"))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn record_path(&self, id: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", id))
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[async_trait::async_trait]
impl TurnStore for JsonFileTurnStore {
    async fn put(&self, record: &TurnRecord) -> Result<(), TestmateError> {
        if !is_valid_id(&record.id) {
            return Err(TestmateError::StorageUnavailable(format!(
                "Refusing to write record with id {:?}",
                record.id
            )));
        }

        let path = self.record_path(&record.id);
        let contents = serde_json::to_string_pretty(record)?;

        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, contents).await.map_err(|e| {
            TestmateError::StorageUnavailable(format!("Failed to write temporary turn file: {}", e))
        })?;

        tokio::fs::rename(&tmp_path, &path).await.map_err(|e| {
            TestmateError::StorageUnavailable(format!("Failed to rename turn file: {}", e))
        })?;

        Ok(())
    }

    async fn query_by_owner(&self, owner: &str) -> Result<Vec<TurnRecord>, TestmateError> {
        let mut entries = tokio::fs::read_dir(&self.base_dir).await.map_err(|e| {
            TestmateError::StorageUnavailable(format!("Failed to read turns directory: {}", e))
        })?;

        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(TestmateError::storage)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        // Directory iteration order is platform dependent.
        paths.sort();

        let mut records = Vec::new();
        for path in paths {
            let contents = match tokio::fs::read_to_string(&path).await {
                Ok(c) => c,
                Err(e) => {
                    tracing::warn!("Skipping unreadable turn file {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_str::<TurnRecord>(&contents) {
                Ok(record) if record.owner == owner => records.push(record),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Skipping corrupt turn file {}: {}", path.display(), e);
                }
            }
        }

        Ok(records)
    }
}
