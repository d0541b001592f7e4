//! 12-hour clock text (`4:30PM`, `10:05AM`, `13:15`) → 24-hour [`TimeOfDay`].

use super::entities::TimeOfDay;
use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// Parse a clock time with an optional AM/PM suffix. Bare times are taken as 24-hour.
///
/// * `12:xxAM` → `00:xx`
/// * `12:xxPM` → `12:xx` (noon is not shifted)
/// * `1..=11 PM` → hour + 12
pub fn parse_clock_time(text: &str) -> Result<TimeOfDay, DomainError> {
    let malformed = || DomainError::MalformedScheduleRow(format!("bad clock time {:?}", text));

    let upper = text.trim().to_ascii_uppercase();
    let (body, meridiem) = if let Some(body) = upper.strip_suffix("AM") {
        (body, Some(Meridiem::Am))
    } else if let Some(body) = upper.strip_suffix("PM") {
        (body, Some(Meridiem::Pm))
    } else {
        (upper.as_str(), None)
    };

    let (h, m) = body.trim().split_once(':').ok_or_else(malformed)?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return Err(malformed());
    }
    if !h.bytes().chain(m.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let hour: u8 = h.parse().map_err(|_| malformed())?;
    let minute: u8 = m.parse().map_err(|_| malformed())?;

    let hour = match meridiem {
        Some(Meridiem::Am) if hour == 12 => 0,
        Some(Meridiem::Pm) if (1..=11).contains(&hour) => hour + 12,
        _ => hour,
    };
    TimeOfDay::new(hour, minute).ok_or_else(malformed)
}

/// Clock text straight to its `HHMMSS` token.
pub fn format_clock_time(text: &str) -> Result<String, DomainError> {
    parse_clock_time(text).map(TimeOfDay::token)
}
