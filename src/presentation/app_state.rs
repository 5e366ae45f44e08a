// Application state for HTTP handlers
use crate::application::analytics_service::AnalyticsService;
use crate::application::dashboard_service::DashboardService;

#[derive(Clone)]
pub struct AppState {
    pub analytics_service: AnalyticsService,
    pub dashboard_service: DashboardService,
}
