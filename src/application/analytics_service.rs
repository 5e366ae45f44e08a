// Analytics service - Use case for filtering and aggregating usage records
use crate::application::record_repository::RecordRepository;
use crate::domain::aggregation::{filter_and_aggregate, AggregationGroup, AggregationQuery};
use crate::domain::error::Result;
use crate::domain::record::Record;
use std::sync::Arc;

#[derive(Clone)]
pub struct AnalyticsService {
    repository: Arc<dyn RecordRepository>,
}

impl AnalyticsService {
    pub fn new(repository: Arc<dyn RecordRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_records(&self) -> Result<Vec<Record>> {
        self.repository.load_records().await
    }

    pub async fn aggregate(&self, query: &AggregationQuery) -> Result<Vec<AggregationGroup>> {
        let records = self.repository.load_records().await?;
        let groups = filter_and_aggregate(&records, query)?;

        tracing::debug!(
            "Aggregated {} records into {} groups ({:?} by {:?})",
            records.len(),
            groups.len(),
            query.dimension,
            query.time_grouping
        );
        Ok(groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DashboardError;
    use async_trait::async_trait;
    use serde_json::json;

    struct StaticRecords(Vec<Record>);

    #[async_trait]
    impl RecordRepository for StaticRecords {
        async fn load_records(&self) -> Result<Vec<Record>> {
            Ok(self.0.clone())
        }
    }

    struct BrokenRecords;

    #[async_trait]
    impl RecordRepository for BrokenRecords {
        async fn load_records(&self) -> Result<Vec<Record>> {
            Err(DashboardError::Storage("records unavailable".into()))
        }
    }

    fn service() -> AnalyticsService {
        let records = serde_json::from_value(json!([
            {"date": "2024-01-05", "serviceName": "EC2", "providerName": "AWS", "consumption": 10},
            {"date": "2024-05-20", "serviceName": "S3", "providerName": "AWS", "consumption": 5},
            {"date": "2024-06-01", "serviceName": "EC2", "providerName": "AWS", "consumption": 7}
        ]))
        .unwrap();
        AnalyticsService::new(Arc::new(StaticRecords(records)))
    }

    #[tokio::test]
    async fn test_aggregate_by_service_and_quarter() {
        let query = AggregationQuery::parse("Service", "quarter", "2024-01-01", "2024-12-31", "all")
            .unwrap();

        let groups = service().aggregate(&query).await.unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "AWS-EC2");
        let periods: Vec<&str> = groups[0]
            .aggregated_values
            .iter()
            .map(|v| v.time_period.as_str())
            .collect();
        assert_eq!(periods, vec!["2024-Q1", "2024-Q2"]);
        assert_eq!(groups[1].key, "AWS-S3");
    }

    #[tokio::test]
    async fn test_list_records_returns_everything() {
        assert_eq!(service().list_records().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let service = AnalyticsService::new(Arc::new(BrokenRecords));
        let query =
            AggregationQuery::parse("Region", "year", "2024-01-01", "2024-12-31", "all").unwrap();

        let err = service.aggregate(&query).await.unwrap_err();

        assert!(matches!(err, DashboardError::Storage(_)));
    }
}
