// Application layer - Use cases and repository ports
pub mod analytics_service;
pub mod dashboard_repository;
pub mod dashboard_service;
pub mod record_repository;
