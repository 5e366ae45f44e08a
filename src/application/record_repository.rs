// Repository trait for usage record access
use crate::domain::error::Result;
use crate::domain::record::Record;
use async_trait::async_trait;

#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Load the full record collection
    async fn load_records(&self) -> Result<Vec<Record>>;
}
