// HTTP response utilities - maps use case errors onto JSON error bodies
use crate::domain::error::DashboardError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

impl DashboardError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::Parse(_) => StatusCode::BAD_REQUEST,
            DashboardError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Rejected request: {}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
