//! English calendar vocabulary and small date arithmetic helpers.

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};

/// Regex alternation for month names, full or abbreviated (no anchors).
pub(crate) const MONTH_ALT: &str = "jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?";

/// Regex alternation for full weekday names.
pub(crate) const WEEKDAY_ALT: &str =
    "monday|tuesday|wednesday|thursday|friday|saturday|sunday";

/// Convert month name to number (1-12)
pub(crate) fn month_from_name(name: &str) -> Option<u32> {
    let lower = name.trim().trim_end_matches('.').to_lowercase();
    let month = match lower.as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => return None,
    };
    Some(month)
}

/// Convert month number to its full name
pub(crate) fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}

pub(crate) fn weekday_from_name(name: &str) -> Option<Weekday> {
    let weekday = match name.trim().to_lowercase().as_str() {
        "monday" | "mon" => Weekday::Mon,
        "tuesday" | "tue" | "tues" => Weekday::Tue,
        "wednesday" | "wed" => Weekday::Wed,
        "thursday" | "thu" | "thur" | "thurs" => Weekday::Thu,
        "friday" | "fri" => Weekday::Fri,
        "saturday" | "sat" => Weekday::Sat,
        "sunday" | "sun" => Weekday::Sun,
        _ => return None,
    };
    Some(weekday)
}

/// Add (or subtract) whole days without panicking on overflow.
pub(crate) fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

/// Add (or subtract) calendar months, clamping to the end of the month.
pub(crate) fn add_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

/// Monday of the week containing `date`.
pub(crate) fn start_of_week(date: NaiveDate) -> Option<NaiveDate> {
    add_days(date, -i64::from(date.weekday().num_days_from_monday()))
}

/// First day of the quarter containing `date`.
pub(crate) fn start_of_quarter(date: NaiveDate) -> Option<NaiveDate> {
    let month = (date.month() - 1) / 3 * 3 + 1;
    NaiveDate::from_ymd_opt(date.year(), month, 1)
}

/// Last day of the month containing `date`.
pub(crate) fn end_of_month(date: NaiveDate) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?;
    add_days(add_months(first, 1)?, -1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_from_name("Sept"), Some(9));
        assert_eq!(month_from_name("DEC."), Some(12));
        assert_eq!(month_from_name("Decem"), None);
        assert_eq!(month_name(11), "November");
    }

    #[test]
    fn test_add_months_clamps() {
        assert_eq!(add_months(d(2024, 1, 31), 1), Some(d(2024, 2, 29)));
        assert_eq!(add_months(d(2024, 3, 31), -1), Some(d(2024, 2, 29)));
        assert_eq!(add_months(d(2024, 2, 29), 12), Some(d(2025, 2, 28)));
    }

    #[test]
    fn test_overflow_is_none() {
        assert_eq!(add_days(d(2024, 1, 1), i64::MAX), None);
        assert_eq!(add_months(d(2024, 1, 1), i64::MAX), None);
    }

    #[test]
    fn test_period_starts() {
        // 2024-11-07 is a Thursday
        assert_eq!(start_of_week(d(2024, 11, 7)), Some(d(2024, 11, 4)));
        assert_eq!(start_of_quarter(d(2024, 11, 7)), Some(d(2024, 10, 1)));
        assert_eq!(end_of_month(d(2024, 2, 10)), Some(d(2024, 2, 29)));
        assert_eq!(end_of_month(d(2024, 12, 10)), Some(d(2024, 12, 31)));
    }
}
