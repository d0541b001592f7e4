//! VCALENDAR assembly. Content lines are CRLF-terminated, TEXT values escaped, long lines folded.

use super::entities::CompiledEvent;
use chrono::{DateTime, Utc};
use std::fmt;

const CRLF: &str = "\r\n";
/// RFC 5545 §3.1: lines SHOULD NOT exceed 75 octets, excluding the line break.
const MAX_LINE_OCTETS: usize = 75;

pub const DEFAULT_PRODUCT_ID: &str = "-//quest-ics//Schedule Exporter//EN";
pub const DEFAULT_CALENDAR_NAME: &str = "UWQuest Export";

/// Zone of every DTSTART/DTEND/EXDATE. Fixed: UNTIL is the local end time on the day after the
/// last date, stamped `Z`, which only stays past the final meeting while local time is behind UTC.
pub const HOME_TIME_ZONE: &str = "America/Toronto";

/// VTIMEZONE for [`HOME_TIME_ZONE`], current North American DST rules (since 2007).
const HOME_TIME_ZONE_DEFINITION: &[(&str, &str)] = &[
    ("BEGIN", "VTIMEZONE"),
    ("TZID", HOME_TIME_ZONE),
    ("X-LIC-LOCATION", HOME_TIME_ZONE),
    ("BEGIN", "DAYLIGHT"),
    ("TZOFFSETFROM", "-0500"),
    ("TZOFFSETTO", "-0400"),
    ("TZNAME", "EDT"),
    ("DTSTART", "19700308T020000"),
    ("RRULE", "FREQ=YEARLY;BYMONTH=3;BYDAY=2SU"),
    ("END", "DAYLIGHT"),
    ("BEGIN", "STANDARD"),
    ("TZOFFSETFROM", "-0400"),
    ("TZOFFSETTO", "-0500"),
    ("TZNAME", "EST"),
    ("DTSTART", "19701101T020000"),
    ("RRULE", "FREQ=YEARLY;BYMONTH=11;BYDAY=1SU"),
    ("END", "STANDARD"),
    ("END", "VTIMEZONE"),
];

/// Configurable calendar-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarHeader {
    pub product_id: String,
    pub calendar_name: String,
}

impl Default for CalendarHeader {
    fn default() -> Self {
        Self {
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            calendar_name: DEFAULT_CALENDAR_NAME.to_string(),
        }
    }
}

/// Finished calendar text. Immutable once assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDocument {
    text: String,
    event_count: usize,
}

impl CalendarDocument {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn event_count(&self) -> usize {
        self.event_count
    }
}

impl fmt::Display for CalendarDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Wrap `events` (in the given order) between the calendar header and footer.
///
/// `stamp` fills DTSTAMP/CREATED/LAST-MODIFIED. Returns `None` when there is nothing to wrap:
/// a header-only calendar is never produced.
pub fn assemble_document(
    header: &CalendarHeader,
    events: &[CompiledEvent],
    stamp: DateTime<Utc>,
) -> Option<CalendarDocument> {
    if events.is_empty() {
        return None;
    }

    let mut lines = ContentLines::default();
    lines.raw("BEGIN", "VCALENDAR");
    lines.raw("METHOD", "PUBLISH");
    lines.text("PRODID", &header.product_id);
    lines.raw("VERSION", "2.0");
    lines.text("X-WR-CALNAME", &header.calendar_name);
    lines.text("X-WR-TIMEZONE", HOME_TIME_ZONE);
    for (name, value) in HOME_TIME_ZONE_DEFINITION {
        lines.raw(name, value);
    }

    let stamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();
    for event in events {
        write_event(&mut lines, event, &stamp);
    }

    lines.raw("END", "VCALENDAR");
    Some(CalendarDocument {
        text: lines.out,
        event_count: events.len(),
    })
}

fn write_event(lines: &mut ContentLines, event: &CompiledEvent, stamp: &str) {
    let tz_param = |name: &str| format!("{};TZID={}", name, HOME_TIME_ZONE);
    let recurrence = &event.recurrence;

    lines.raw("BEGIN", "VEVENT");
    lines.raw(&tz_param("DTSTART"), &event.start.token());
    lines.raw(&tz_param("DTEND"), &event.end.token());
    lines.raw(
        "RRULE",
        &format!(
            "FREQ=WEEKLY;UNTIL={}Z;BYDAY={}",
            recurrence.until.token(),
            recurrence.weekdays
        ),
    );
    if let Some(excluded) = recurrence.excluded {
        lines.raw(
            &tz_param("EXDATE"),
            &format!("{}T{}", excluded.token(), event.start.time.token()),
        );
    }
    lines.raw("DTSTAMP", stamp);
    lines.text("UID", &event.uid);
    lines.raw("CREATED", stamp);
    lines.text("DESCRIPTION", &event.description);
    lines.raw("LAST-MODIFIED", stamp);
    lines.text("LOCATION", &event.location);
    lines.raw("SEQUENCE", "0");
    lines.raw("STATUS", "CONFIRMED");
    lines.text("SUMMARY", &event.summary);
    lines.raw("TRANSP", "OPAQUE");
    lines.raw("END", "VEVENT");
}

#[derive(Default)]
struct ContentLines {
    out: String,
}

impl ContentLines {
    /// Value written as-is (dates, enumerations, recurrence rules).
    fn raw(&mut self, name: &str, value: &str) {
        self.fold(&format!("{}:{}", name, value));
    }

    /// Value of type TEXT.
    fn text(&mut self, name: &str, value: &str) {
        self.fold(&format!("{}:{}", name, escape_text(value)));
    }

    fn fold(&mut self, line: &str) {
        let mut octets = 0;
        for c in line.chars() {
            let width = c.len_utf8();
            if octets + width > MAX_LINE_OCTETS {
                self.out.push_str(CRLF);
                self.out.push(' ');
                octets = 1;
            }
            self.out.push(c);
            octets += width;
        }
        self.out.push_str(CRLF);
    }
}

/// Collapse whitespace runs within each line, then escape per RFC 5545 §3.3.11.
fn escape_text(value: &str) -> String {
    let collapsed = value
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n");
    let collapsed = collapsed.trim();

    let mut escaped = String::with_capacity(collapsed.len());
    for c in collapsed.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            ';' => escaped.push_str("\\;"),
            ',' => escaped.push_str("\\,"),
            '\n' => escaped.push_str("\\n"),
            _ => escaped.push(c),
        }
    }
    escaped
}
