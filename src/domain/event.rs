//! Per-row compilation: one [`RawScheduleRow`] → at most one [`CompiledEvent`].
//!
//! Pure: no logging, no counters. Callers decide what to do with skipped rows.

use super::clock::parse_clock_time;
use super::date::{DEFAULT_DATE_FORMAT, parse_date_range};
use super::entities::{CompiledEvent, RawScheduleRow, Timestamp};
use super::errors::DomainError;
use super::occurrence::{AnchorStrategy, recurrence_window};
use super::weekday::decode_weekday_code;
use regex::Regex;
use std::sync::LazyLock;
use uuid::Uuid;

/// Clock time inside the days/times text, with an optional AM/PM marker.
static RE_CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d\d?:\d\d(?:\s?(?i:[AP]M))?").expect("valid clock time regex")
});

/// Source of event UIDs. Must not repeat within one export.
pub trait UidSource {
    fn next_uid(&mut self) -> String;
}

/// Random v4 UUIDs with a fixed domain suffix.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomUid;

impl UidSource for RandomUid {
    fn next_uid(&mut self) -> String {
        format!("{}@quest-ics", Uuid::new_v4())
    }
}

/// Knobs that change how row text is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// chrono format of each date in the date-range text.
    pub date_format: String,
    pub anchor_strategy: AnchorStrategy,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            anchor_strategy: AnchorStrategy::default(),
        }
    }
}

/// Compile one row.
///
/// * `Ok(None)`: no clock time in the days/times text (TBA, online, ...). Not an error.
/// * `Err(MalformedScheduleRow | EmptyWeekdaySet)`: row has times but can't be scheduled.
pub fn compile_row(
    row: &RawScheduleRow,
    options: &CompileOptions,
    uids: &mut dyn UidSource,
) -> Result<Option<CompiledEvent>, DomainError> {
    let mut times = RE_CLOCK_TIME.find_iter(&row.days_times);
    let Some(first) = times.next() else {
        return Ok(None);
    };
    let second = times.next().ok_or_else(|| {
        DomainError::MalformedScheduleRow(format!("no end time in {:?}", row.days_times))
    })?;

    let start_time = parse_clock_time(first.as_str())?;
    let end_time = parse_clock_time(second.as_str())?;
    if end_time <= start_time {
        return Err(DomainError::MalformedScheduleRow(format!(
            "end time is not after start time in {:?}",
            row.days_times
        )));
    }

    let code = day_code(&row.days_times[..first.start()]);
    let weekdays = decode_weekday_code(code);
    if weekdays.is_empty() {
        return Err(DomainError::EmptyWeekdaySet(code.to_string()));
    }

    let (start, end) = parse_date_range(&row.start_end_date, &options.date_format)?;
    let recurrence = recurrence_window(start, end, weekdays, end_time, options.anchor_strategy)?;

    Ok(Some(CompiledEvent {
        uid: uids.next_uid(),
        start: Timestamp::new(recurrence.anchor, start_time),
        end: Timestamp::new(recurrence.anchor, end_time),
        recurrence,
        summary: summary(row),
        description: description(row),
        location: row.room.trim().to_string(),
    }))
}

/// First purely alphabetic word before the times, e.g. `MWF` in `MWF 1:00PM - 1:50PM`.
fn day_code(prefix: &str) -> &str {
    prefix
        .split_whitespace()
        .find(|word| word.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or("")
}

/// `CS 135-001 (LEC)`
fn summary(row: &RawScheduleRow) -> String {
    format!(
        "{}-{} ({})",
        row.course_code.trim(),
        row.section.trim(),
        row.component.trim()
    )
}

/// `5678-Designing Functional Programs - Jane Smith`
fn description(row: &RawScheduleRow) -> String {
    format!(
        "{}-{} - {}",
        row.class_number.trim(),
        row.course_name.trim(),
        row.instructor.trim()
    )
}
