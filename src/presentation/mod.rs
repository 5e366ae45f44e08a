// Presentation layer - HTTP routing
pub mod app_state;
pub mod handlers;

use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_chart, delete_chart, filter_data, get_dashboard, health_check, list_records, update_chart,
};
use anyhow::Context;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/data", get(list_records))
        .route("/api/data/filter", get(filter_data))
        .route("/api/charts/:user_id", get(get_dashboard).post(add_chart))
        .route(
            "/api/charts/:user_id/:chart_id",
            put(update_chart).delete(delete_chart),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// CORS policy for the dashboard frontend. Credentials are allowed, so
/// request headers are mirrored rather than wildcarded.
pub fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("invalid CORS origin '{}'", origin))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}
