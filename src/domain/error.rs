use thiserror::Error;

/// Errors surfaced by the analytics and dashboard use cases
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Malformed date or integer input, local to one request
    #[error("parse error: {0}")]
    Parse(String),

    /// Backing blob unreadable, unwritable or undecodable
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<std::io::Error> for DashboardError {
    fn from(e: std::io::Error) -> Self {
        DashboardError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::Storage(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
