//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Unparseable date/time text. The row is skipped; the export continues.
    #[error("Malformed schedule row: {0}")]
    MalformedScheduleRow(String),

    /// Row has meeting times but no recognisable day code. Skipped like a malformed row.
    #[error("No weekdays in day code {0:?}")]
    EmptyWeekdaySet(String),

    #[error("Schedule source error: {0}")]
    Source(String),

    #[error("Calendar sink error: {0}")]
    Sink(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("UI error: {0}")]
    Ui(String),
}

