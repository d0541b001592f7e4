//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{CalendarDocument, DomainError, ScheduleSnapshot};
use std::path::PathBuf;

/// Where schedule rows come from (saved page, CSV, JSON).
#[async_trait::async_trait]
pub trait ScheduleSourcePort: Send + Sync {
    /// Load all meeting rows in page-visual order.
    async fn load_schedule(&self) -> Result<ScheduleSnapshot, DomainError>;
}

/// Where the finished calendar goes.
#[async_trait::async_trait]
pub trait CalendarSinkPort: Send + Sync {
    /// Whether a delivery under `file_name` would replace something.
    async fn exists(&self, file_name: &str) -> bool;

    /// Store the document under `file_name`. Returns the final location.
    async fn deliver(
        &self,
        file_name: &str,
        document: &CalendarDocument,
    ) -> Result<PathBuf, DomainError>;
}
