//! Calendar date tokens and date-range parsing.

use super::entities::{CalendarDate, TimeOfDay, Timestamp};
use super::errors::DomainError;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Default rendering of each date in a range (`01/05/2015`).
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// Loose date-shaped token; the configured chrono format decides the field order.
static RE_DATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{1,4}[/.\-]\d{1,2}[/.\-]\d{1,4}").expect("valid date token regex")
});

/// `YYYYMMDD`.
pub fn format_date(date: CalendarDate) -> String {
    date.token()
}

/// `YYYYMMDDTHHMMSS`.
pub fn format_date_time(date: CalendarDate, time: TimeOfDay) -> String {
    Timestamp::new(date, time).token()
}

/// Parse `"<start> - <end>"` into two dates using `date_format` for each side.
///
/// Fails when fewer than two dates are present, either fails to parse, or end < start.
pub fn parse_date_range(
    text: &str,
    date_format: &str,
) -> Result<(CalendarDate, CalendarDate), DomainError> {
    let mut tokens = RE_DATE_TOKEN.find_iter(text).map(|m| m.as_str());
    let (Some(start), Some(end)) = (tokens.next(), tokens.next()) else {
        return Err(DomainError::MalformedScheduleRow(format!(
            "expected a start and end date in {:?}",
            text
        )));
    };
    let start = parse_date(start, date_format)?;
    let end = parse_date(end, date_format)?;
    if end < start {
        return Err(DomainError::MalformedScheduleRow(format!(
            "date range ends before it starts: {:?}",
            text
        )));
    }
    Ok((start, end))
}

fn parse_date(token: &str, date_format: &str) -> Result<CalendarDate, DomainError> {
    NaiveDate::parse_from_str(token, date_format)
        .map(CalendarDate::from)
        .map_err(|e| {
            DomainError::MalformedScheduleRow(format!(
                "date {:?} does not match {:?}: {}",
                token, date_format, e
            ))
        })
}
