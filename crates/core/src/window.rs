//! Window filter.
//!
//! Keeps dates inside `[reference - 2 days, reference + 2 years + 2 days]`
//! (inclusive, calendar years) and drops the reference's own calendar date
//! unless the text stated it in full.

use chrono::{Duration, Months, NaiveDateTime, NaiveTime};

use crate::reference::ReferenceTimestamp;
use crate::types::{DateSet, ResolvedDate};

const LOOKBACK_DAYS: i64 = 2;
const LOOKAHEAD_YEARS: u32 = 2;
const LOOKAHEAD_SLACK_DAYS: i64 = 2;

/// Inclusive time range derived from a reference timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl FilterWindow {
    /// Window around `reference`; `None` if it falls off chrono's range.
    #[must_use]
    pub fn around(reference: &ReferenceTimestamp) -> Option<Self> {
        let at = reference.datetime();
        let start = at.checked_sub_signed(Duration::days(LOOKBACK_DAYS))?;
        let end = at
            .checked_add_months(Months::new(LOOKAHEAD_YEARS * 12))?
            .checked_add_signed(Duration::days(LOOKAHEAD_SLACK_DAYS))?;
        Some(Self { start, end })
    }

    /// A date is inside when its midnight is.
    #[must_use]
    pub fn contains(&self, date: &ResolvedDate) -> bool {
        let midnight = date.date().and_time(NaiveTime::MIN);
        self.start <= midnight && midnight <= self.end
    }
}

/// Filter an aggregated set against the reference.
///
/// Returns an empty list when there is no reference. Output is ascending.
///
/// # Examples
///
/// ```
/// use datesift_core::{window, DateSet, ReferenceTimestamp};
///
/// let set = DateSet::from_iso_strings(["2024-03-01", "2024-12-25", "2030-01-01"]);
/// let reference = ReferenceTimestamp::parse("2024-06-01T00:00:00Z").unwrap();
/// assert_eq!(window::filter(&set, Some(&reference)), vec!["2024-12-25"]);
/// assert!(window::filter(&set, None).is_empty());
/// ```
#[must_use]
pub fn filter(dates: &DateSet, reference: Option<&ReferenceTimestamp>) -> Vec<String> {
    let Some(reference) = reference else {
        tracing::debug!("No reference timestamp; window filter returns nothing");
        return vec![];
    };
    let Some(window) = FilterWindow::around(reference) else {
        tracing::warn!("Filter window around {} is out of range", reference);
        return vec![];
    };
    let reference_date = reference.date();

    dates
        .iter()
        .filter(|(date, _)| window.contains(date))
        .filter(|(date, provenance)| {
            let keep = date.date() != reference_date || provenance.is_explicit();
            if !keep {
                tracing::debug!("Dropping {} (reference date, not stated in text)", date);
            }
            keep
        })
        .map(|(date, _)| date.to_iso())
        .collect()
}
