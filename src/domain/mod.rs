//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod clock;
pub mod date;
pub mod document;
pub mod entities;
pub mod errors;
pub mod event;
pub mod occurrence;
pub mod schedule;
pub mod weekday;

pub use document::{CalendarDocument, CalendarHeader};
pub use entities::{
    CalendarDate, CompiledEvent, RawScheduleRow, RecurrenceWindow, ScheduleSnapshot, TimeOfDay,
    Timestamp, Weekday, WeekdaySet,
};
pub use errors::DomainError;
pub use event::{CompileOptions, RandomUid, UidSource};
pub use occurrence::AnchorStrategy;
pub use schedule::{ScheduleExport, SkippedRow, compile_schedule};
