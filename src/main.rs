// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::analytics_service::AnalyticsService;
use crate::application::dashboard_service::DashboardService;
use crate::infrastructure::config::load_app_config;
use crate::infrastructure::json_dashboard_repository::JsonDashboardRepository;
use crate::infrastructure::json_record_repository::JsonRecordRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::{cors_layer, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repositories (infrastructure layer)
    let records = Arc::new(JsonRecordRepository::new(config.storage.records_path.clone()));
    let dashboards = Arc::new(JsonDashboardRepository::new(config.storage.dashboards_path.clone()));

    // Create services (application layer)
    let state = Arc::new(AppState {
        analytics_service: AnalyticsService::new(records),
        dashboard_service: DashboardService::new(dashboards),
    });

    // Build router (presentation layer)
    let app = router(state).layer(cors_layer(&config.cors.allowed_origins)?);

    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.server.bind_address()))?;
    tracing::info!(
        "Starting cost-dashboard service on {} (records: {}, dashboards: {})",
        addr,
        config.storage.records_path.display(),
        config.storage.dashboards_path.display()
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
