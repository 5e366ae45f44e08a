// Repository trait for the shared dashboard document
use crate::domain::dashboard::DashboardDocument;
use crate::domain::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Read every user's dashboard; an absent document reads as empty
    async fn read_document(&self) -> Result<DashboardDocument>;

    /// Replace the stored document in full
    async fn write_document(&self, document: &DashboardDocument) -> Result<()>;
}
