//! Sparkify ETL library
//!
//! Loads song metadata and activity logs into a star-schema SQLite warehouse.

pub mod config;
pub mod ingestion;
pub mod pipeline;
pub mod records;
pub mod source;
pub mod sqlite_persistence;
pub mod transform;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use ingestion::{FailurePolicy, IngestionOrchestrator, IngestionReport, TransformMode};
pub use pipeline::{run_pipeline, PipelineSummary};
pub use warehouse::{SqliteWarehouse, Warehouse};
