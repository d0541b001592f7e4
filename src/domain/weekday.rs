//! Day-code decoding: `MTWThF` → {MO,TU,WE,TH,FR}.
//!
//! Single letters are ambiguous (`T`/`Th`, `S`/`Su`/`Sa`), so each weekday owns one predicate
//! evaluated independently against the whole code. A day is in the set iff its predicate holds.

use super::entities::{Weekday, WeekdaySet};

type Rule = (Weekday, fn(&str) -> bool);

/// Evaluated in SU→SA order; order does not affect the result, only readability.
static RULES: [Rule; 7] = [
    (Weekday::Sunday, sunday),
    (Weekday::Monday, monday),
    (Weekday::Tuesday, tuesday),
    (Weekday::Wednesday, wednesday),
    (Weekday::Thursday, thursday),
    (Weekday::Friday, friday),
    (Weekday::Saturday, saturday),
];

fn sunday(code: &str) -> bool {
    letter_not_followed_by(code, 'S', 'a')
}

fn monday(code: &str) -> bool {
    code.contains('M')
}

fn tuesday(code: &str) -> bool {
    letter_not_followed_by(code, 'T', 'h')
}

fn wednesday(code: &str) -> bool {
    code.contains('W')
}

fn thursday(code: &str) -> bool {
    code.contains("Th")
}

fn friday(code: &str) -> bool {
    code.contains('F')
}

fn saturday(code: &str) -> bool {
    letter_not_followed_by(code, 'S', 'u')
}

/// True if some `lead` is followed by anything other than `next` (end of code included).
fn letter_not_followed_by(code: &str, lead: char, next: char) -> bool {
    let mut chars = code.chars().peekable();
    while let Some(c) = chars.next() {
        if c == lead && chars.peek() != Some(&next) {
            return true;
        }
    }
    false
}

/// Decode a compact day code into a weekday set. No match yields an empty set.
pub fn decode_weekday_code(code: &str) -> WeekdaySet {
    RULES
        .iter()
        .filter(|(_, matches)| matches(code))
        .map(|(day, _)| *day)
        .collect()
}
