// Usage records loaded from a static JSON file
use crate::application::record_repository::RecordRepository;
use crate::domain::error::Result;
use crate::domain::record::Record;
use async_trait::async_trait;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct JsonRecordRepository {
    path: PathBuf,
}

impl JsonRecordRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl RecordRepository for JsonRecordRepository {
    async fn load_records(&self) -> Result<Vec<Record>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            tracing::error!("Failed to read records from {}: {}", self.path.display(), e);
            e
        })?;
        let records: Vec<Record> = serde_json::from_str(&content)?;

        tracing::debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }
}
