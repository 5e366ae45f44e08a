// HTTP request handlers
use crate::domain::aggregation::{AggregationGroup, AggregationQuery};
use crate::domain::dashboard::{DashboardState, LayoutEntry, LayoutUpdate};
use crate::domain::error::DashboardError;
use crate::domain::record::Record;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterQuery {
    pub dimension: String,
    pub group_by: String,
    pub from: String,
    pub to: String,
    #[serde(default = "default_max_display")]
    pub max_display: String,
}

fn default_max_display() -> String {
    "all".to_string()
}

#[derive(Deserialize)]
pub struct AddChartRequest {
    pub layout: LayoutEntry,
    #[serde(default)]
    pub chart: Value,
}

#[derive(Deserialize)]
pub struct UpdateChartRequest {
    #[serde(default)]
    pub layout: LayoutUpdate,
    #[serde(default)]
    pub chart: Value,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Raw usage records
pub async fn list_records(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Record>>, DashboardError> {
    Ok(Json(state.analytics_service.list_records().await?))
}

/// Aggregated consumption for a dimension, time grouping and date range
pub async fn filter_data(
    Query(query): Query<FilterQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AggregationGroup>>, DashboardError> {
    let query = AggregationQuery::parse(
        &query.dimension,
        &query.group_by,
        &query.from,
        &query.to,
        &query.max_display,
    )?;
    Ok(Json(state.analytics_service.aggregate(&query).await?))
}

pub async fn get_dashboard(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardState>, DashboardError> {
    Ok(Json(state.dashboard_service.get_dashboard(&user_id).await?))
}

pub async fn add_chart(
    Path(user_id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<AddChartRequest>,
) -> Result<StatusCode, DashboardError> {
    state
        .dashboard_service
        .add_chart(&user_id, request.layout, request.chart)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_chart(
    Path((user_id, chart_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(request): Json<UpdateChartRequest>,
) -> Result<StatusCode, DashboardError> {
    state
        .dashboard_service
        .update_chart(&user_id, &chart_id, &request.layout, request.chart)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_chart(
    Path((user_id, chart_id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Result<StatusCode, DashboardError> {
    state
        .dashboard_service
        .delete_chart(&user_id, &chart_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
