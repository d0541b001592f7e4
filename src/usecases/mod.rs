//! Application use cases. Orchestrate domain logic via ports.

pub mod export_service;

pub use export_service::{ExportOutcome, ExportService, PreparedExport, schedule_file_name};
