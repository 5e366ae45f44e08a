// Dashboard service - Use cases for reading and editing per-user dashboards
use crate::application::dashboard_repository::DashboardRepository;
use crate::domain::dashboard::{DashboardState, LayoutEntry, LayoutUpdate};
use crate::domain::error::{DashboardError, Result};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct DashboardService {
    repository: Arc<dyn DashboardRepository>,
    // Serializes read-modify-write cycles on the shared document
    write_lock: Arc<Mutex<()>>,
}

impl DashboardService {
    pub fn new(repository: Arc<dyn DashboardRepository>) -> Self {
        Self {
            repository,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Stored dashboard, or an empty one that is not persisted
    pub async fn get_dashboard(&self, user_id: &str) -> Result<DashboardState> {
        let mut document = self.repository.read_document().await?;
        Ok(document.remove(user_id).unwrap_or_default())
    }

    /// Rejects a layout without a usable id before touching the document
    pub async fn add_chart(&self, user_id: &str, layout: LayoutEntry, chart: Value) -> Result<()> {
        let chart_id = layout
            .chart_id()
            .ok_or_else(|| DashboardError::Parse("chart layout has no id".into()))?;
        tracing::debug!("Adding chart {} for user {}", chart_id, user_id);
        self.mutate(user_id, move |state| state.add_chart(layout, chart))
            .await
    }

    pub async fn delete_chart(&self, user_id: &str, chart_id: &str) -> Result<()> {
        tracing::debug!("Deleting chart {} for user {}", chart_id, user_id);
        self.mutate(user_id, |state| state.delete_chart(chart_id)).await
    }

    pub async fn update_chart(
        &self,
        user_id: &str,
        chart_id: &str,
        update: &LayoutUpdate,
        chart: Value,
    ) -> Result<()> {
        tracing::debug!("Updating chart {} for user {}", chart_id, user_id);
        self.mutate(user_id, move |state| state.update_chart(chart_id, update, chart))
            .await
    }

    /// Apply `edit` to the user's state and write the whole document back.
    /// A user without a dashboard gets an empty one persisted.
    async fn mutate<F>(&self, user_id: &str, edit: F) -> Result<()>
    where
        F: FnOnce(&mut DashboardState) + Send,
    {
        let _guard = self.write_lock.lock().await;

        let mut document = self.repository.read_document().await?;
        edit(document.entry(user_id.to_string()).or_default());

        if let Err(e) = self.repository.write_document(&document).await {
            tracing::error!("Failed to persist dashboard for user {}: {}", user_id, e);
            return Err(e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dashboard::DashboardDocument;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct InMemoryRepository {
        document: std::sync::Mutex<DashboardDocument>,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl DashboardRepository for InMemoryRepository {
        async fn read_document(&self) -> Result<DashboardDocument> {
            let document = self.document.lock().unwrap().clone();
            // Widen the window between read and write
            tokio::task::yield_now().await;
            Ok(document)
        }

        async fn write_document(&self, document: &DashboardDocument) -> Result<()> {
            *self.document.lock().unwrap() = document.clone();
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct ReadOnlyRepository;

    #[async_trait]
    impl DashboardRepository for ReadOnlyRepository {
        async fn read_document(&self) -> Result<DashboardDocument> {
            Ok(DashboardDocument::new())
        }

        async fn write_document(&self, _document: &DashboardDocument) -> Result<()> {
            Err(DashboardError::Storage("read-only filesystem".into()))
        }
    }

    fn layout(id: &str) -> LayoutEntry {
        serde_json::from_value(json!({"id": id, "x": 0, "y": 0, "width": 4, "height": 3})).unwrap()
    }

    fn setup() -> (Arc<InMemoryRepository>, DashboardService) {
        let repository = Arc::new(InMemoryRepository::default());
        let service = DashboardService::new(repository.clone());
        (repository, service)
    }

    #[tokio::test]
    async fn test_get_unknown_user_is_empty_and_not_persisted() {
        let (repository, service) = setup();

        let state = service.get_dashboard("alice").await.unwrap();

        assert_eq!(state, DashboardState::default());
        assert_eq!(repository.writes.load(Ordering::SeqCst), 0);
        assert!(repository.document.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let (_, service) = setup();

        service.add_chart("alice", layout("c1"), json!({"type": "bar"})).await.unwrap();
        service.add_chart("alice", layout("c2"), json!({"type": "pie"})).await.unwrap();

        let state = service.get_dashboard("alice").await.unwrap();
        let ids: Vec<String> = state
            .dashboard_order
            .iter()
            .filter_map(LayoutEntry::chart_id)
            .collect();
        assert_eq!(ids, vec!["c1", "c2"]);
        assert_eq!(state.charts["c2"], json!({"type": "pie"}));
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let (_, service) = setup();

        service.add_chart("alice", layout("c1"), json!({})).await.unwrap();
        service.add_chart("bob", layout("c9"), json!({})).await.unwrap();
        service.delete_chart("bob", "c1").await.unwrap();

        assert!(service.get_dashboard("alice").await.unwrap().charts.contains_key("c1"));
        assert!(service.get_dashboard("bob").await.unwrap().charts.contains_key("c9"));
    }

    #[tokio::test]
    async fn test_delete_on_unknown_user_persists_empty_state() {
        let (repository, service) = setup();

        service.delete_chart("carol", "nope").await.unwrap();

        let document = repository.document.lock().unwrap().clone();
        assert_eq!(document.get("carol"), Some(&DashboardState::default()));
        assert_eq!(repository.writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_update_twice_matches_once() {
        let (_, service) = setup();
        service.add_chart("alice", layout("c1"), json!({"type": "bar"})).await.unwrap();
        let update: LayoutUpdate =
            serde_json::from_value(json!({"x": 2, "y": 3, "width": 8, "height": 4})).unwrap();

        service
            .update_chart("alice", "c1", &update, json!({"type": "line"}))
            .await
            .unwrap();
        let once = service.get_dashboard("alice").await.unwrap();
        service
            .update_chart("alice", "c1", &update, json!({"type": "line"}))
            .await
            .unwrap();

        assert_eq!(service.get_dashboard("alice").await.unwrap(), once);
        let layout = serde_json::to_value(&once.dashboard_order[0]).unwrap();
        assert_eq!(layout["width"], json!(8));
    }

    #[tokio::test]
    async fn test_update_unknown_chart_still_writes() {
        let (repository, service) = setup();
        service.add_chart("alice", layout("c1"), json!({"type": "bar"})).await.unwrap();
        let before = service.get_dashboard("alice").await.unwrap();

        service
            .update_chart("alice", "ghost", &LayoutUpdate::default(), json!({}))
            .await
            .unwrap();

        assert_eq!(service.get_dashboard("alice").await.unwrap(), before);
        assert_eq!(repository.writes.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_adds_are_not_lost() {
        let (_, service) = setup();

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    service
                        .add_chart("alice", layout(&format!("c{}", i)), json!({"n": i}))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let state = service.get_dashboard("alice").await.unwrap();
        assert_eq!(state.charts.len(), 20);
        assert_eq!(state.dashboard_order.len(), 20);
    }

    #[tokio::test]
    async fn test_add_without_id_is_rejected_without_writing() {
        let (repository, service) = setup();
        let no_id: LayoutEntry = serde_json::from_value(json!({"x": 0, "y": 0})).unwrap();

        let err = service.add_chart("alice", no_id, json!({})).await.unwrap_err();

        assert!(matches!(err, DashboardError::Parse(_)));
        assert_eq!(repository.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_write_failure_surfaces() {
        let service = DashboardService::new(Arc::new(ReadOnlyRepository));

        let err = service.add_chart("alice", layout("c1"), json!({})).await.unwrap_err();

        assert!(matches!(err, DashboardError::Storage(_)));
    }
}
