//! Recurrence anchoring: first real meeting date and an UNTIL bound that never cuts the last one.

use super::entities::{CalendarDate, RecurrenceWindow, TimeOfDay, Timestamp, WeekdaySet};
use super::errors::DomainError;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// How DTSTART is placed relative to the first day of the term.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorStrategy {
    /// DTSTART on the first date ≥ start whose weekday is in the set.
    #[default]
    Advance,
    /// DTSTART one day before the start date, with that instant listed in EXDATE.
    Exclude,
}

impl FromStr for AnchorStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "advance" => Ok(AnchorStrategy::Advance),
            "exclude" => Ok(AnchorStrategy::Exclude),
            other => Err(DomainError::Config(format!(
                "unknown anchor strategy {:?} (expected advance or exclude)",
                other
            ))),
        }
    }
}

impl fmt::Display for AnchorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnchorStrategy::Advance => f.write_str("advance"),
            AnchorStrategy::Exclude => f.write_str("exclude"),
        }
    }
}

/// First date on or after `start` whose weekday is in `weekdays`.
///
/// Looks at most one week ahead; `None` for an empty set.
pub fn first_occurrence(start: CalendarDate, weekdays: WeekdaySet) -> Option<CalendarDate> {
    let mut date = start;
    for _ in 0..7 {
        if weekdays.contains(date.weekday()) {
            return Some(date);
        }
        date = date.succ()?;
    }
    None
}

/// `end + 1 day`. UNTIL is read as UTC and local time here is behind UTC, so the literal end
/// date could drop the last meeting; one extra day cannot admit a new one on a weekly cadence.
pub fn recurrence_boundary(end: CalendarDate) -> Result<CalendarDate, DomainError> {
    end.succ().ok_or_else(|| {
        DomainError::MalformedScheduleRow(format!("no calendar day after {}", end))
    })
}

/// Build the recurrence window for a meeting that runs `start..=end` on `weekdays`.
///
/// `end_time` is the UNTIL wall-clock time. Fails when the set is empty or no listed weekday
/// falls inside the range.
pub fn recurrence_window(
    start: CalendarDate,
    end: CalendarDate,
    weekdays: WeekdaySet,
    end_time: TimeOfDay,
    strategy: AnchorStrategy,
) -> Result<RecurrenceWindow, DomainError> {
    if weekdays.is_empty() {
        return Err(DomainError::EmptyWeekdaySet(String::new()));
    }
    let first = first_occurrence(start, weekdays)
        .filter(|first| *first <= end)
        .ok_or_else(|| {
            DomainError::MalformedScheduleRow(format!(
                "no {} between {} and {}",
                weekdays, start, end
            ))
        })?;
    let until = Timestamp::new(recurrence_boundary(end)?, end_time);

    let (anchor, excluded) = match strategy {
        AnchorStrategy::Advance => (first, None),
        AnchorStrategy::Exclude => {
            let before = start.pred().ok_or_else(|| {
                DomainError::MalformedScheduleRow(format!("no calendar day before {}", start))
            })?;
            (before, Some(before))
        }
    };

    Ok(RecurrenceWindow {
        anchor,
        weekdays,
        until,
        excluded,
    })
}
