// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod http_response;
pub mod json_dashboard_repository;
pub mod json_record_repository;
