//! Core types for datesift.
//!
//! These types carry a message through the pipeline: raw candidates from the
//! producers, resolved calendar dates, and the aggregated set that the window
//! filter consumes.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

/// Which extraction strategy proposed a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Fixed table of textual date patterns.
    Pattern,
    /// Spans labeled as dates by an entity recognizer.
    Entity,
    /// "first of the month" synthesized from a bare month name.
    MonthInference,
}

impl Strategy {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pattern => "pattern",
            Self::Entity => "entity",
            Self::MonthInference => "month-inference",
        }
    }

    /// Candidates from this strategy never count as textually present dates.
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::MonthInference)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A substring of the input that looks like a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDateCandidate {
    /// Text handed to the resolver. For month inference this is the
    /// synthesized phrase, not the matched month name.
    pub text: String,
    /// Byte offset of the source span in the input.
    pub start: usize,
    /// Byte offset one past the source span.
    pub end: usize,
    pub strategy: Strategy,
}

impl RawDateCandidate {
    pub fn new(text: impl Into<String>, start: usize, end: usize, strategy: Strategy) -> Self {
        Self {
            text: text.into(),
            start,
            end,
            strategy,
        }
    }
}

/// How much of a resolved date was actually written in the text.
///
/// Ordered so that merging two provenances keeps the stronger one.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Some component came from the reference timestamp or a default
    /// (relative phrase, missing year, month inference).
    #[default]
    Synthesized,
    /// Year, month and day were all stated in the text.
    Explicit,
}

impl Provenance {
    #[must_use]
    pub fn is_explicit(&self) -> bool {
        matches!(self, Self::Explicit)
    }
}

/// A calendar date without a time component.
///
/// The canonical form is `YYYY-MM-DD`; ordering matches the lexicographic
/// ordering of that string for all four-digit years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResolvedDate(NaiveDate);

impl ResolvedDate {
    #[must_use]
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse a canonical `YYYY-MM-DD` string.
    pub fn parse_iso(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok().map(Self)
    }

    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Canonical ISO-8601 string.
    #[must_use]
    pub fn to_iso(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for ResolvedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for ResolvedDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for ResolvedDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A candidate after it went through the resolver.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedCandidate {
    #[serde(flatten)]
    pub candidate: RawDateCandidate,
    /// `None` when the resolver could not make sense of the text.
    pub resolved: Option<ResolvedDate>,
    pub provenance: Provenance,
    /// Human-readable explanation of how the date was derived.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Deduplicated set of resolved dates, iterated in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateSet {
    dates: BTreeMap<ResolvedDate, Provenance>,
}

impl DateSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from canonical date strings that were extracted earlier.
    ///
    /// Unparseable entries are skipped. Every accepted entry counts as
    /// textually present.
    pub fn from_iso_strings<I, S>(dates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for raw in dates {
            match ResolvedDate::parse_iso(raw.as_ref()) {
                Some(date) => set.insert(date, Provenance::Explicit),
                None => tracing::debug!("Skipping unparseable date '{}'", raw.as_ref()),
            }
        }
        set
    }

    /// Insert a date, keeping the stronger provenance on collision.
    pub fn insert(&mut self, date: ResolvedDate, provenance: Provenance) {
        self.dates
            .entry(date)
            .and_modify(|p| *p = (*p).max(provenance))
            .or_insert(provenance);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    #[must_use]
    pub fn provenance(&self, date: &ResolvedDate) -> Option<Provenance> {
        self.dates.get(date).copied()
    }

    /// Dates with their provenance, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (ResolvedDate, Provenance)> + '_ {
        self.dates.iter().map(|(d, p)| (*d, *p))
    }

    /// Canonical strings, ascending.
    #[must_use]
    pub fn to_iso_strings(&self) -> Vec<String> {
        self.dates.keys().map(ResolvedDate::to_iso).collect()
    }
}

impl Serialize for DateSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.dates.keys())
    }
}

/// Full trace of one extraction call.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// Normalized reference timestamp (`YYYY-MM-DDTHH:MM:SS`).
    pub reference: String,
    /// Every candidate from every enabled producer, in producer order.
    pub candidates: Vec<ResolvedCandidate>,
    /// Deduplicated, sorted dates before window filtering.
    pub aggregated: DateSet,
    /// Final result after the window filter.
    pub dates: Vec<String>,
}

/// Extraction settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Producer ids or aliases to skip (e.g. `["month"]`).
    pub disabled: Vec<String>,
}

impl ExtractionConfig {
    /// Check if a producer is disabled by its id or one of its aliases.
    #[must_use]
    pub fn is_strategy_disabled(&self, id: &str, aliases: &[&str]) -> bool {
        self.disabled.iter().any(|name| {
            let name = name.trim();
            name.eq_ignore_ascii_case(id) || aliases.iter().any(|a| name.eq_ignore_ascii_case(a))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> ResolvedDate {
        ResolvedDate::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_insert_keeps_explicit_provenance() {
        let mut set = DateSet::new();
        set.insert(date(2024, 11, 5), Provenance::Explicit);
        set.insert(date(2024, 11, 5), Provenance::Synthesized);
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.provenance(&date(2024, 11, 5)),
            Some(Provenance::Explicit)
        );

        let mut set = DateSet::new();
        set.insert(date(2024, 11, 5), Provenance::Synthesized);
        set.insert(date(2024, 11, 5), Provenance::Explicit);
        assert_eq!(
            set.provenance(&date(2024, 11, 5)),
            Some(Provenance::Explicit)
        );
    }

    #[test]
    fn test_iteration_is_chronological() {
        let mut set = DateSet::new();
        set.insert(date(2025, 1, 2), Provenance::Synthesized);
        set.insert(date(2024, 12, 31), Provenance::Synthesized);
        set.insert(date(2024, 2, 29), Provenance::Synthesized);
        assert_eq!(
            set.to_iso_strings(),
            vec!["2024-02-29", "2024-12-31", "2025-01-02"]
        );
    }

    #[test]
    fn test_from_iso_strings_skips_garbage() {
        let set = DateSet::from_iso_strings(["2024-11-05", "not a date", "2024-02-30", ""]);
        assert_eq!(set.to_iso_strings(), vec!["2024-11-05"]);
    }

    #[test]
    fn test_strategy_disabled_by_alias() {
        let config = ExtractionConfig {
            disabled: vec!["MONTH".to_string()],
        };
        assert!(config.is_strategy_disabled("month-inference", &["month"]));
        assert!(!config.is_strategy_disabled("pattern", &["regex"]));
    }

    #[test]
    fn test_resolved_date_serializes_as_string() {
        let json = serde_json::to_string(&date(2024, 3, 1)).unwrap();
        assert_eq!(json, "\"2024-03-01\"");
    }
}
