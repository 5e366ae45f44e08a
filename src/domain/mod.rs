// Domain layer - Core business types and pure logic
pub mod aggregation;
pub mod dashboard;
pub mod error;
pub mod record;
