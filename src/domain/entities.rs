//! Domain entities. Pure data structures for the core business.
//!
//! No page/IO types here; adapters map scraped or tabular input into these.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One meeting row exactly as rendered on the schedule page. All fields are plain text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawScheduleRow {
    /// Days and times, e.g. `MWF 1:00PM - 1:50PM`.
    pub days_times: String,
    /// Date range, e.g. `01/05/2015 - 04/10/2015`.
    pub start_end_date: String,
    pub room: String,
    pub instructor: String,
    pub course_code: String,
    pub course_name: String,
    pub section: String,
    pub component: String,
    pub class_number: String,
}

/// Day of the week. Declaration order is the canonical emission order (SU→SA).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Two-letter BYDAY token.
    pub fn token(self) -> &'static str {
        match self {
            Weekday::Sunday => "SU",
            Weekday::Monday => "MO",
            Weekday::Tuesday => "TU",
            Weekday::Wednesday => "WE",
            Weekday::Thursday => "TH",
            Weekday::Friday => "FR",
            Weekday::Saturday => "SA",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Weekday::ALL[day.num_days_from_sunday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Set of weekdays. Iterates and displays in SU→SA order; inserting twice is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.0 |= day.bit();
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & day.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        Weekday::ALL.into_iter().filter(move |d| self.contains(*d))
    }
}

impl FromIterator<Weekday> for WeekdaySet {
    fn from_iter<I: IntoIterator<Item = Weekday>>(iter: I) -> Self {
        let mut set = WeekdaySet::empty();
        for day in iter {
            set.insert(day);
        }
        set
    }
}

/// Comma-joined BYDAY list, e.g. `MO,WE,FR`.
impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, day) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(day.token())?;
        }
        Ok(())
    }
}

/// 24-hour wall-clock time. Always within `00:00:00..24:00:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeOfDay {
    /// Returns `None` when hour ≥ 24 or minute ≥ 60.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        (hour < 24 && minute < 60).then_some(Self {
            hour,
            minute,
            second: 0,
        })
    }

    /// Fixed-width `HHMMSS` token.
    pub fn token(self) -> String {
        format!("{:02}{:02}{:02}", self.hour, self.minute, self.second)
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

/// Calendar date without a time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Returns `None` for an invalid month/day combination.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn naive(self) -> NaiveDate {
        self.0
    }

    pub fn weekday(self) -> Weekday {
        self.0.weekday().into()
    }

    /// Next calendar day, `None` only at the end of chrono's supported range.
    pub fn succ(self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// Previous calendar day.
    pub fn pred(self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// Fixed-width `YYYYMMDD` token.
    pub fn token(self) -> String {
        format!("{:04}{:02}{:02}", self.0.year(), self.0.month(), self.0.day())
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

/// Date plus wall-clock time, rendered `YYYYMMDDTHHMMSS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub date: CalendarDate,
    pub time: TimeOfDay,
}

impl Timestamp {
    pub fn new(date: CalendarDate, time: TimeOfDay) -> Self {
        Self { date, time }
    }

    pub fn token(self) -> String {
        format!("{}T{}", self.date.token(), self.time.token())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

/// Weekly recurrence bounds for one compiled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceWindow {
    /// Date of DTSTART. With the advance strategy this is the first real meeting.
    pub anchor: CalendarDate,
    pub weekdays: WeekdaySet,
    /// UNTIL value, emitted with a `Z` suffix.
    pub until: Timestamp,
    /// Single EXDATE date (exclude strategy only); the time is the event's start time.
    pub excluded: Option<CalendarDate>,
}

/// Everything needed to emit one VEVENT. Built once per qualifying row, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledEvent {
    pub uid: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub recurrence: RecurrenceWindow,
    pub summary: String,
    pub description: String,
    pub location: String,
}

/// Everything a schedule source yields for one export: the rows plus the student's display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSnapshot {
    pub student_name: Option<String>,
    pub rows: Vec<RawScheduleRow>,
}
