//! Reference timestamp handling.
//!
//! Every relative phrase and the filter window are anchored to a single
//! reference point. Timezone-aware inputs are normalized by dropping the
//! offset and keeping the wall-clock time, so `2024-11-05T23:30:00-05:00`
//! is treated as `2024-11-05T23:30:00`.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use crate::error::{Error, Result};

/// Epoch values above this are treated as milliseconds (year ~5138 in seconds).
const MAX_EPOCH_SECONDS: i64 = 99_999_999_999;

/// Shorter digit runs are calendar forms (`2024`, `20241105`), never epochs.
const MIN_EPOCH_DIGITS: usize = 9;

/// Offset-carrying layouts tried after RFC 3339.
const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
    "%Y%m%dT%H%M%S%z",
];

/// Naive layouts, most specific first.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
    "%Y%m%dT%H%M",
];

/// A timezone-naive point in time that anchors one extraction call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReferenceTimestamp(NaiveDateTime);

impl ReferenceTimestamp {
    #[must_use]
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    /// Parse an ISO-8601 / RFC 3339 timestamp (extended or basic format), a
    /// bare date or year, or Unix epoch seconds (milliseconds for 12+ digit
    /// values). Digit runs shorter than nine are never read as epochs.
    ///
    /// # Examples
    ///
    /// ```
    /// use datesift_core::ReferenceTimestamp;
    ///
    /// let r = ReferenceTimestamp::parse("2024-11-05T00:00:00Z").unwrap();
    /// assert_eq!(r.to_string(), "2024-11-05T00:00:00");
    ///
    /// assert!(ReferenceTimestamp::parse("").is_err());
    /// assert!(ReferenceTimestamp::parse("next tuesday").is_err());
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::MissingReference);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(dt.naive_local()));
        }

        for fmt in AWARE_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
                return Ok(Self(dt.naive_local()));
            }
        }

        // "...Z" and "... UTC" carry a zero offset, which normalizes to the
        // same wall-clock time.
        let naive_part = trimmed
            .strip_suffix('Z')
            .or_else(|| trimmed.strip_suffix('z'))
            .or_else(|| trimmed.strip_suffix(" UTC"))
            .unwrap_or(trimmed)
            .trim_end();

        for fmt in NAIVE_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(naive_part, fmt) {
                return Ok(Self(dt));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(naive_part, "%Y-%m-%d") {
            return Ok(Self(date.and_time(NaiveTime::MIN)));
        }

        if !naive_part.is_empty() && naive_part.bytes().all(|b| b.is_ascii_digit()) {
            if let Some(dt) = Self::from_digits(naive_part) {
                return Ok(dt);
            }
        }

        Err(Error::InvalidReference(trimmed.to_string()))
    }

    /// `YYYY`, `YYYYMMDD`, or epoch seconds/milliseconds.
    fn from_digits(digits: &str) -> Option<Self> {
        let date = match digits.len() {
            4 => NaiveDate::from_ymd_opt(digits.parse().ok()?, 1, 1)?,
            8 => NaiveDate::from_ymd_opt(
                digits[..4].parse().ok()?,
                digits[4..6].parse().ok()?,
                digits[6..].parse().ok()?,
            )?,
            n if n >= MIN_EPOCH_DIGITS => return Self::from_epoch(digits),
            _ => return None,
        };
        Some(Self(date.and_time(NaiveTime::MIN)))
    }

    fn from_epoch(digits: &str) -> Option<Self> {
        let value: i64 = digits.parse().ok()?;
        let dt = if value > MAX_EPOCH_SECONDS {
            DateTime::from_timestamp_millis(value)?
        } else {
            DateTime::from_timestamp(value, 0)?
        };
        Some(Self(dt.naive_utc()))
    }

    #[must_use]
    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Calendar date of the reference.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }
}

impl fmt::Display for ReferenceTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

impl From<NaiveDateTime> for ReferenceTimestamp {
    fn from(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }
}

/// Anything that can stand in for a reference timestamp.
///
/// Implemented for strings (parsed with [`ReferenceTimestamp::parse`]),
/// chrono values, and `Option<T>` where `None` means "missing".
pub trait AsReference {
    fn to_reference(&self) -> Result<ReferenceTimestamp>;
}

impl AsReference for ReferenceTimestamp {
    fn to_reference(&self) -> Result<ReferenceTimestamp> {
        Ok(*self)
    }
}

impl AsReference for str {
    fn to_reference(&self) -> Result<ReferenceTimestamp> {
        ReferenceTimestamp::parse(self)
    }
}

impl AsReference for String {
    fn to_reference(&self) -> Result<ReferenceTimestamp> {
        ReferenceTimestamp::parse(self)
    }
}

impl AsReference for NaiveDateTime {
    fn to_reference(&self) -> Result<ReferenceTimestamp> {
        Ok(ReferenceTimestamp(*self))
    }
}

impl AsReference for NaiveDate {
    fn to_reference(&self) -> Result<ReferenceTimestamp> {
        Ok(ReferenceTimestamp(self.and_time(NaiveTime::MIN)))
    }
}

impl<Tz: TimeZone> AsReference for DateTime<Tz> {
    fn to_reference(&self) -> Result<ReferenceTimestamp> {
        Ok(ReferenceTimestamp(self.naive_local()))
    }
}

impl<T: AsReference> AsReference for Option<T> {
    fn to_reference(&self) -> Result<ReferenceTimestamp> {
        match self {
            Some(inner) => inner.to_reference(),
            None => Err(Error::MissingReference),
        }
    }
}

impl<T: AsReference + ?Sized> AsReference for &T {
    fn to_reference(&self) -> Result<ReferenceTimestamp> {
        (**self).to_reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn expect(input: &str) -> String {
        ReferenceTimestamp::parse(input)
            .unwrap_or_else(|e| panic!("{input}: {e}"))
            .to_string()
    }

    #[test]
    fn test_parse_rfc3339_keeps_wall_clock() {
        assert_eq!(expect("2024-11-05T00:00:00Z"), "2024-11-05T00:00:00");
        assert_eq!(expect("2024-11-05T23:30:00-05:00"), "2024-11-05T23:30:00");
        assert_eq!(expect("2024-11-05T10:15:30.123+02:00"), "2024-11-05T10:15:30");
    }

    #[test]
    fn test_parse_naive_variants() {
        assert_eq!(expect("2024-11-05T08:00:00"), "2024-11-05T08:00:00");
        assert_eq!(expect("2024-11-05 08:00:00"), "2024-11-05T08:00:00");
        assert_eq!(expect("2024-11-05 08:00"), "2024-11-05T08:00:00");
        assert_eq!(expect("2024-11-05 08:00 UTC"), "2024-11-05T08:00:00");
        assert_eq!(expect("2024-11-05"), "2024-11-05T00:00:00");
    }

    #[test]
    fn test_parse_epoch() {
        assert_eq!(expect("1730905200"), "2024-11-06T15:00:00");
        assert_eq!(expect("1730905200000"), "2024-11-06T15:00:00");
    }

    #[test]
    fn test_parse_basic_format_is_not_epoch() {
        assert_eq!(expect("20241105"), "2024-11-05T00:00:00");
        assert_eq!(expect("20241105T083000"), "2024-11-05T08:30:00");
        assert_eq!(expect("20241105T083000Z"), "2024-11-05T08:30:00");
        assert_eq!(expect("20241105T083000+0200"), "2024-11-05T08:30:00");
        assert_eq!(expect("2024"), "2024-01-01T00:00:00");
        assert_eq!(expect("173090520"), "1975-06-27T08:42:00");

        assert!(ReferenceTimestamp::parse("20241345").is_err());
        assert!(ReferenceTimestamp::parse("12345").is_err());
    }

    #[test]
    fn test_parse_offset_without_seconds() {
        assert_eq!(expect("2024-11-05T00:00+02:00"), "2024-11-05T00:00:00");
        assert_eq!(expect("2024-11-05 18:45-05:00"), "2024-11-05T18:45:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            ReferenceTimestamp::parse("   "),
            Err(Error::MissingReference)
        ));
        assert!(matches!(
            ReferenceTimestamp::parse("yesterday-ish"),
            Err(Error::InvalidReference(_))
        ));
        assert!(ReferenceTimestamp::parse("2024-13-45").is_err());
    }

    #[test]
    fn test_as_reference_impls() {
        let aware = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .unwrap();
        assert_eq!(
            aware.to_reference().unwrap().to_string(),
            "2024-06-01T12:00:00"
        );

        let utc = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(utc.to_reference().unwrap().date().to_string(), "2024-06-01");

        let none: Option<&str> = None;
        assert!(matches!(none.to_reference(), Err(Error::MissingReference)));
        assert!(Some("2024-06-01").to_reference().is_ok());
    }
}
