//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: UI/CLI invokes application use cases.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Run one export: pick a source, compile, deliver, report the outcome.
    async fn run_export(&self) -> Result<(), DomainError>;
}
