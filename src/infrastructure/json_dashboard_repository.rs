// Dashboard document persisted as one pretty-printed JSON file
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::dashboard::DashboardDocument;
use crate::domain::error::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone)]
pub struct JsonDashboardRepository {
    path: PathBuf,
}

impl JsonDashboardRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

#[async_trait]
impl DashboardRepository for JsonDashboardRepository {
    async fn read_document(&self) -> Result<DashboardDocument> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No dashboard document at {}, starting empty", self.path.display());
                return Ok(DashboardDocument::new());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&content)?)
    }

    /// Write to a sibling temp file, then rename over the target so a
    /// failed write never leaves a truncated document behind.
    async fn write_document(&self, document: &DashboardDocument) -> Result<()> {
        let content = serde_json::to_string_pretty(document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await?;
            file.write_all(content.as_bytes()).await?;
            file.sync_all().await?;
        }
        fs::rename(&temp_path, &self.path).await?;

        tracing::debug!(
            "Wrote dashboard document for {} users to {}",
            document.len(),
            self.path.display()
        );
        Ok(())
    }
}
