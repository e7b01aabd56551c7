//! Calendar date helpers
//!
//! Record dates are stored as `YYYY-MM-DD` strings. Validation uses a strict
//! parse; the aggregator uses a lenient three-part parse and rolls day
//! overflow forward (Feb 29 projected onto a common year becomes Mar 1).

use chrono::{Days, NaiveDate};

/// Strict `YYYY-MM-DD` parse
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Split a date string into numeric `(year, month, day)` parts.
///
/// Returns `None` unless there are exactly three dash-separated integer parts
/// with a month in `1..=12` and a day in `1..=31`.
pub fn date_parts(value: &str) -> Option<(i32, u32, u32)> {
    let parts: Vec<&str> = value.trim().split('-').collect();
    if parts.len() != 3 {
        return None;
    }

    let year = parts[0].trim().parse::<i32>().ok()?;
    let month = parts[1].trim().parse::<u32>().ok()?;
    let day = parts[2].trim().parse::<u32>().ok()?;

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    Some((year, month, day))
}

/// Build a date, letting days past the end of the month spill into the next one
pub fn date_with_overflow(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_days(Days::new(u64::from(day.saturating_sub(1))))
}

/// Whole years between two dates, counting a year only once its anniversary has passed
pub fn whole_years_between(start: NaiveDate, end: NaiveDate) -> i32 {
    use chrono::Datelike;

    let mut years = end.year() - start.year();
    if (end.month(), end.day()) < (start.month(), start.day()) {
        years -= 1;
    }
    years
}
