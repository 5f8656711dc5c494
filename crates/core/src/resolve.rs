//! Relative-phrase resolution.
//!
//! Turns a raw date-like substring into a calendar date, anchored on the
//! reference timestamp. Handles:
//! - Absolute dates: `2024-12-25`, `2024/12/25`, `12/25/2024`, `25/12/24`
//! - Written dates: `5th Nov 2024`, `November 5, 2024`, `the 5th of November`
//! - Partial dates: `25th Dec`, `dec 25`, `march`, `march 2025`
//! - Relative words: `today`, `tomorrow`, `yesterday`, `day after tomorrow`
//! - Relative periods: `next week`, `last month`, `this friday`, `next weekend`
//! - Relative offsets: `in 3 days`, `2 weeks ago`, `a month from now`
//! - Weekdays: `friday`
//! - Holidays: `christmas`, `new year's eve`, `halloween`
//! - Period boundaries: `end of month`, `eoy`, `start of the week`
//! - Quarters: `q3`, `q1 2025`
//!
//! Resolution never fails loudly. Anything that cannot be turned into a real
//! date yields `None`, which is the normal outcome for many loose matches
//! like `this is` or `next level`.

use std::sync::OnceLock;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use regex::Regex;

use crate::calendar::{
    add_days, add_months, end_of_month, month_from_name, month_name, start_of_quarter,
    start_of_week, weekday_from_name, MONTH_ALT,
};
use crate::reference::ReferenceTimestamp;
use crate::types::Provenance;

/// Result of resolving one phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub date: NaiveDate,
    pub provenance: Provenance,
    pub description: String,
}

impl Resolution {
    fn explicit(date: NaiveDate, description: String) -> Self {
        Self {
            date,
            provenance: Provenance::Explicit,
            description,
        }
    }

    fn synthesized(date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            date,
            provenance: Provenance::Synthesized,
            description: description.into(),
        }
    }
}

/// Regex patterns for resolution. Input is normalized to lowercase first.
fn patterns() -> &'static ResolverPatterns {
    static PATTERNS: OnceLock<ResolverPatterns> = OnceLock::new();
    PATTERNS.get_or_init(ResolverPatterns::new)
}

struct ResolverPatterns {
    // Absolute: 2024-12-25, 2024/12/25
    year_first: Regex,
    // Absolute: 12/25/2024, 25-12-24
    numeric: Regex,

    // Written: "5th nov 2024", "5 of november, 2024"
    day_month_year: Regex,
    // Written: "november 5, 2024", "nov 5th 2024"
    month_day_year: Regex,

    // Partial: "25th dec", "5th of november"
    day_month: Regex,
    // Partial: "dec 25", "march 15th"
    month_day: Regex,
    // Partial: "march", "march 2025"
    month_only: Regex,

    // "next week", "last friday", "this weekend"
    relative_period: Regex,

    // Relative offsets: "in 2 days", "3 weeks ago", "a month from now"
    in_n_units: Regex,
    n_units_ago: Regex,
    n_units_from_now: Regex,

    // "q3", "q1 2025"
    quarter: Regex,
}

const UNITS: &str = "days?|weeks?|fortnights?|months?|years?|hours?|minutes?";

impl ResolverPatterns {
    fn new() -> Self {
        Self {
            year_first: Regex::new(r"^(\d{4})[/-](\d{1,2})[/-](\d{1,2})$").unwrap(),
            numeric: Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{2}|\d{4})$").unwrap(),

            day_month_year: Regex::new(&format!(
                r"^(\d{{1,2}})(?:st|nd|rd|th)?(?:\s+of)?\s+({MONTH_ALT})\.?,?\s+(\d{{4}})$"
            ))
            .unwrap(),
            month_day_year: Regex::new(&format!(
                r"^({MONTH_ALT})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?,?\s+(\d{{4}})$"
            ))
            .unwrap(),

            day_month: Regex::new(&format!(
                r"^(\d{{1,2}})(?:st|nd|rd|th)?(?:\s+of)?\s+({MONTH_ALT})$"
            ))
            .unwrap(),
            month_day: Regex::new(&format!(
                r"^({MONTH_ALT})\.?\s+(\d{{1,2}})(?:st|nd|rd|th)?$"
            ))
            .unwrap(),
            month_only: Regex::new(&format!(r"^({MONTH_ALT})(?:\.?,?\s+(\d{{4}}))?$")).unwrap(),

            relative_period: Regex::new(r"^(this|next|last|coming|past)\s+([a-z]+)$").unwrap(),

            in_n_units: Regex::new(&format!(r"^in\s+(\d+|an?|one)\s+({UNITS})$")).unwrap(),
            n_units_ago: Regex::new(&format!(r"^(\d+|an?|one)\s+({UNITS})\s+ago$")).unwrap(),
            n_units_from_now: Regex::new(&format!(r"^(\d+|an?|one)\s+({UNITS})\s+from\s+now$"))
                .unwrap(),

            quarter: Regex::new(r"^q([1-4])(?:\s+(\d{4}))?$").unwrap(),
        }
    }
}

/// Resolve a raw phrase against the reference timestamp.
///
/// # Examples
///
/// ```
/// use datesift_core::{resolve, ReferenceTimestamp};
///
/// let reference = ReferenceTimestamp::parse("2024-11-05T00:00:00Z").unwrap();
/// let next_week = resolve::resolve("next week", &reference).unwrap();
/// assert_eq!(next_week.date.to_string(), "2024-11-12");
///
/// assert!(resolve::resolve("next level", &reference).is_none());
/// ```
#[must_use]
pub fn resolve(raw: &str, reference: &ReferenceTimestamp) -> Option<Resolution> {
    let input = normalize(raw)?;
    let input = input.as_str();

    // Try each parser in order of specificity
    parse_year_first(input)
        .or_else(|| parse_numeric(input))
        .or_else(|| parse_written(input))
        .or_else(|| parse_partial(input, reference))
        .or_else(|| parse_relative_word(input, reference))
        .or_else(|| parse_relative_period(input, reference))
        .or_else(|| parse_relative_offset(input, reference))
        .or_else(|| parse_weekday(input, reference))
        .or_else(|| parse_holiday(input, reference))
        .or_else(|| parse_period_boundary(input, reference))
        .or_else(|| parse_quarter(input, reference))
}

/// Lowercase, unify apostrophes, drop trailing punctuation and leading
/// filler words, collapse whitespace.
fn normalize(raw: &str) -> Option<String> {
    let lower = raw.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'");
    let trimmed = lower.trim_matches(|c: char| c.is_whitespace() || ",;:!?()\"".contains(c));
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);

    let mut words: Vec<&str> = trimmed.split_whitespace().collect();
    while let Some(first) = words.first() {
        if matches!(*first, "on" | "the" | "by" | "until" | "till") && words.len() > 1 {
            words.remove(0);
        } else {
            break;
        }
    }

    let joined = words.join(" ").replace(" of the ", " of ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// "2024-12-25" or "2024/12/25"
fn parse_year_first(input: &str) -> Option<Resolution> {
    let caps = patterns().year_first.captures(input)?;
    let year: i32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let day: u32 = caps[3].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(Resolution::explicit(
        date,
        format!("{} {}, {} (YYYY-MM-DD)", month_name(month), day, year),
    ))
}

/// Numeric dates: month first when possible, day first otherwise.
fn parse_numeric(input: &str) -> Option<Resolution> {
    let caps = patterns().numeric.captures(input)?;
    let a: u32 = caps[1].parse().ok()?;
    let b: u32 = caps[2].parse().ok()?;
    let year_str = &caps[3];
    let mut year: i32 = year_str.parse().ok()?;
    if year_str.len() == 2 {
        year += 2000;
    }

    // Try US format: MM/DD/YYYY (a = month, b = day)
    if let Some(date) = NaiveDate::from_ymd_opt(year, a, b) {
        return Some(Resolution::explicit(
            date,
            format!("{} {}, {} (MM/DD/YYYY)", month_name(a), b, year),
        ));
    }

    // Try EU format: DD/MM/YYYY (a = day, b = month)
    let date = NaiveDate::from_ymd_opt(year, b, a)?;
    Some(Resolution::explicit(
        date,
        format!("{} {}, {} (DD/MM/YYYY)", month_name(b), a, year),
    ))
}

/// "5th Nov 2024", "November 5, 2024"
fn parse_written(input: &str) -> Option<Resolution> {
    let patterns = patterns();

    let (day, month_str, year) = if let Some(caps) = patterns.day_month_year.captures(input) {
        (
            caps[1].parse::<u32>().ok()?,
            caps[2].to_string(),
            caps[3].parse::<i32>().ok()?,
        )
    } else if let Some(caps) = patterns.month_day_year.captures(input) {
        (
            caps[2].parse::<u32>().ok()?,
            caps[1].to_string(),
            caps[3].parse::<i32>().ok()?,
        )
    } else {
        return None;
    };

    let month = month_from_name(&month_str)?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(Resolution::explicit(
        date,
        format!("{} {}, {}", month_name(month), day, year),
    ))
}

/// Day + month or month alone; the year comes from the reference.
fn parse_partial(input: &str, reference: &ReferenceTimestamp) -> Option<Resolution> {
    let patterns = patterns();
    let year = reference.date().year();

    if let Some(caps) = patterns.month_only.captures(input) {
        let month = month_from_name(&caps[1])?;
        let year = match caps.get(2) {
            Some(y) => y.as_str().parse().ok()?,
            None => year,
        };
        let date = NaiveDate::from_ymd_opt(year, month, 1)?;
        return Some(Resolution::synthesized(
            date,
            format!("{} {} (first of month)", month_name(month), year),
        ));
    }

    let (day, month_str) = if let Some(caps) = patterns.day_month.captures(input) {
        (caps[1].parse::<u32>().ok()?, caps[2].to_string())
    } else if let Some(caps) = patterns.month_day.captures(input) {
        (caps[2].parse::<u32>().ok()?, caps[1].to_string())
    } else {
        return None;
    };

    let month = month_from_name(&month_str)?;
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(Resolution::synthesized(
        date,
        format!("{} {} (year {})", month_name(month), day, year),
    ))
}

/// Parse relative words: today, tomorrow, yesterday
fn parse_relative_word(input: &str, reference: &ReferenceTimestamp) -> Option<Resolution> {
    let today = reference.date();

    let (offset, desc) = match input {
        "today" | "tonight" => (0, "Today"),
        "tomorrow" => (1, "Tomorrow"),
        "yesterday" => (-1, "Yesterday"),
        "day after tomorrow" => (2, "Day after tomorrow"),
        "day before yesterday" => (-2, "Day before yesterday"),
        _ => return None,
    };

    Some(Resolution::synthesized(add_days(today, offset)?, desc))
}

/// Parse relative periods: next week, last month, this friday
fn parse_relative_period(input: &str, reference: &ReferenceTimestamp) -> Option<Resolution> {
    let caps = patterns().relative_period.captures(input)?;
    let today = reference.date();

    let direction: i64 = match &caps[1] {
        "next" | "coming" => 1,
        "last" | "past" => -1,
        _ => 0,
    };
    let noun = &caps[2];

    let date = match noun {
        "day" => add_days(today, direction)?,
        "week" => add_days(today, 7 * direction)?,
        "fortnight" => add_days(today, 14 * direction)?,
        "weekend" => {
            let saturday = add_days(start_of_week(today)?, 5)?;
            add_days(saturday, 7 * direction)?
        }
        "month" => add_months(today, direction)?,
        "quarter" => start_of_quarter(add_months(today, 3 * direction)?)?,
        "year" => add_months(today, 12 * direction)?,
        other => {
            let weekday = weekday_from_name(other)?;
            match direction {
                1 => next_weekday(today, weekday)?,
                -1 => previous_weekday(today, weekday)?,
                _ => add_days(
                    start_of_week(today)?,
                    i64::from(weekday.num_days_from_monday()),
                )?,
            }
        }
    };

    Some(Resolution::synthesized(date, capitalize(input)))
}

/// Parse relative offsets: "in 2 days", "3 weeks ago", "a month from now"
fn parse_relative_offset(input: &str, reference: &ReferenceTimestamp) -> Option<Resolution> {
    let patterns = patterns();

    let (count, unit, sign) = if let Some(caps) = patterns.in_n_units.captures(input) {
        (parse_count(&caps[1])?, caps[2].to_string(), 1)
    } else if let Some(caps) = patterns.n_units_from_now.captures(input) {
        (parse_count(&caps[1])?, caps[2].to_string(), 1)
    } else if let Some(caps) = patterns.n_units_ago.captures(input) {
        (parse_count(&caps[1])?, caps[2].to_string(), -1)
    } else {
        return None;
    };

    let date = offset_by_unit(reference, &unit, count.checked_mul(sign)?)?;
    Some(Resolution::synthesized(date, capitalize(input)))
}

fn parse_count(word: &str) -> Option<i64> {
    match word {
        "a" | "an" | "one" => Some(1),
        digits => digits.parse().ok(),
    }
}

/// Apply `n` units to the reference. Sub-day units move the full timestamp
/// and keep the resulting calendar day.
fn offset_by_unit(reference: &ReferenceTimestamp, unit: &str, n: i64) -> Option<NaiveDate> {
    let today = reference.date();
    let unit = unit.trim_end_matches('s');
    match unit {
        "day" => add_days(today, n),
        "week" => add_days(today, n.checked_mul(7)?),
        "fortnight" => add_days(today, n.checked_mul(14)?),
        "month" => add_months(today, n),
        "year" => add_months(today, n.checked_mul(12)?),
        "hour" => reference
            .datetime()
            .checked_add_signed(Duration::try_hours(n)?)
            .map(|dt| dt.date()),
        "minute" => reference
            .datetime()
            .checked_add_signed(Duration::try_minutes(n)?)
            .map(|dt| dt.date()),
        _ => None,
    }
}

/// Bare weekday: the next occurrence strictly after the reference date.
fn parse_weekday(input: &str, reference: &ReferenceTimestamp) -> Option<Resolution> {
    let weekday = weekday_from_name(input)?;
    let date = next_weekday(reference.date(), weekday)?;
    Some(Resolution::synthesized(
        date,
        format!("Next {}", capitalize(input)),
    ))
}

fn next_weekday(from: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let current = i64::from(from.weekday().num_days_from_monday());
    let target = i64::from(target.num_days_from_monday());
    let diff = target - current;
    add_days(from, if diff <= 0 { diff + 7 } else { diff })
}

fn previous_weekday(from: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let current = i64::from(from.weekday().num_days_from_monday());
    let target = i64::from(target.num_days_from_monday());
    let diff = target - current;
    add_days(from, if diff >= 0 { diff - 7 } else { diff })
}

/// Parse holidays within the reference year: christmas, halloween, etc.
fn parse_holiday(input: &str, reference: &ReferenceTimestamp) -> Option<Resolution> {
    let year = reference.date().year();

    let (month, day, name) = match input {
        "christmas" | "xmas" | "christmas day" => (12, 25, "Christmas"),
        "christmas eve" => (12, 24, "Christmas Eve"),
        "new year" | "new years" | "new year's" | "new years day" | "new year's day" => {
            (1, 1, "New Year's Day")
        }
        "new years eve" | "new year's eve" | "nye" => (12, 31, "New Year's Eve"),
        "halloween" => (10, 31, "Halloween"),
        "valentines" | "valentine's" | "valentines day" | "valentine's day" => {
            (2, 14, "Valentine's Day")
        }
        "independence day" => (7, 4, "Independence Day"),
        _ => return None,
    };

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(Resolution::synthesized(date, format!("{} {}", name, year)))
}

/// Parse period boundaries: end of month, start of year, etc.
fn parse_period_boundary(input: &str, reference: &ReferenceTimestamp) -> Option<Resolution> {
    let today = reference.date();

    let (date, desc) = match input {
        "end of month" | "eom" => (end_of_month(today)?, "End of month"),
        "start of month" | "beginning of month" | "som" => (
            NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?,
            "Start of month",
        ),
        "end of year" | "eoy" => (
            NaiveDate::from_ymd_opt(today.year(), 12, 31)?,
            "End of year",
        ),
        "start of year" | "beginning of year" | "soy" => (
            NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
            "Start of year",
        ),
        // End of week = Sunday
        "end of week" | "eow" => (add_days(start_of_week(today)?, 6)?, "End of week (Sunday)"),
        // Start of week = Monday
        "start of week" | "beginning of week" | "sow" => {
            (start_of_week(today)?, "Start of week (Monday)")
        }
        _ => return None,
    };

    Some(Resolution::synthesized(date, desc))
}

/// Parse quarters: q1, q3 2025
fn parse_quarter(input: &str, reference: &ReferenceTimestamp) -> Option<Resolution> {
    let caps = patterns().quarter.captures(input)?;
    let quarter: u32 = caps[1].parse().ok()?;
    let year = match caps.get(2) {
        Some(y) => y.as_str().parse().ok()?,
        None => reference.date().year(),
    };
    let date = NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1)?;
    Some(Resolution::synthesized(
        date,
        format!("Q{} {} (start of quarter)", quarter, year),
    ))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
