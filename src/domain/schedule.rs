//! Whole-export compilation: rows in, calendar (or an explicit "nothing to export") out.

use super::document::{CalendarDocument, CalendarHeader, assemble_document};
use super::entities::{CompiledEvent, RawScheduleRow};
use super::errors::DomainError;
use super::event::{CompileOptions, UidSource, compile_row};
use chrono::{DateTime, Utc};

/// A row that had meeting times but could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Zero-based position in the input.
    pub index: usize,
    pub reason: DomainError,
}

/// Result of one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleExport {
    Calendar {
        document: CalendarDocument,
        events: Vec<CompiledEvent>,
        skipped: Vec<SkippedRow>,
    },
    /// No row produced an event. No document is built.
    NoQualifyingRows { skipped: Vec<SkippedRow> },
}

impl ScheduleExport {
    pub fn skipped(&self) -> &[SkippedRow] {
        match self {
            ScheduleExport::Calendar { skipped, .. } => skipped,
            ScheduleExport::NoQualifyingRows { skipped } => skipped,
        }
    }
}

/// Compile every row in encounter order and assemble the calendar.
///
/// Per-row failures are collected, never propagated.
pub fn compile_schedule(
    rows: &[RawScheduleRow],
    options: &CompileOptions,
    header: &CalendarHeader,
    uids: &mut dyn UidSource,
    stamp: DateTime<Utc>,
) -> ScheduleExport {
    let mut events = Vec::new();
    let mut skipped = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        match compile_row(row, options, uids) {
            Ok(Some(event)) => events.push(event),
            Ok(None) => {}
            Err(reason) => skipped.push(SkippedRow { index, reason }),
        }
    }

    match assemble_document(header, &events, stamp) {
        Some(document) => ScheduleExport::Calendar {
            document,
            events,
            skipped,
        },
        None => ScheduleExport::NoQualifyingRows { skipped },
    }
}
