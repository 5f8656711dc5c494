//! Pattern matcher: a fixed, ordered table of date-shaped regexes.

use std::sync::OnceLock;

use regex::Regex;

use super::is_admissible;
use crate::calendar::MONTH_ALT;
use crate::producer::{CandidateProducer, ProducerInfo};
use crate::reference::ReferenceTimestamp;
use crate::types::{RawDateCandidate, Strategy};

/// Abbreviated month stems; the table allows any letters after them.
const MONTH_STEM: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec";
const MONTH_FULL: &str =
    "january|february|march|april|may|june|july|august|september|october|november|december";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PatternKind {
    /// Digits and separators only.
    Numeric,
    /// Day, month name and year.
    FullDate,
    /// Day and month name without a year.
    Partial,
    /// Keyword phrases resolved against the reference.
    Relative,
}

/// One row of the pattern table.
pub struct DatePattern {
    pub name: &'static str,
    pub example: &'static str,
    pub(crate) kind: PatternKind,
    pub(crate) regex: Regex,
}

impl DatePattern {
    fn new(name: &'static str, example: &'static str, kind: PatternKind, pattern: &str) -> Self {
        Self {
            name,
            example,
            kind,
            regex: Regex::new(pattern).unwrap(),
        }
    }
}

/// The ordered pattern table.
pub(crate) fn table() -> &'static [DatePattern] {
    static TABLE: OnceLock<Vec<DatePattern>> = OnceLock::new();
    TABLE.get_or_init(|| {
        use PatternKind::*;
        vec![
            DatePattern::new(
                "numeric",
                "12/25/2024",
                Numeric,
                r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b",
            ),
            DatePattern::new(
                "numeric-year-first",
                "2024/12/25",
                Numeric,
                r"\b\d{4}[/-]\d{1,2}[/-]\d{1,2}\b",
            ),
            DatePattern::new(
                "day-month-year",
                "5th Nov, 2024",
                FullDate,
                &format!(
                    r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:{MONTH_STEM})[a-z]*[.,]?\s+\d{{4}}\b"
                ),
            ),
            DatePattern::new(
                "month-day-year",
                "Nov 5th, 2024",
                FullDate,
                &format!(
                    r"(?i)\b(?:{MONTH_STEM})[a-z]*\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}\b"
                ),
            ),
            DatePattern::new("iso", "2024-12-25", Numeric, r"\b\d{4}-\d{2}-\d{2}\b"),
            DatePattern::new(
                "day-month",
                "25th Dec",
                Partial,
                &format!(r"(?i)\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:{MONTH_ALT})\b"),
            ),
            DatePattern::new(
                "month-day",
                "Dec 25th",
                Partial,
                &format!(r"(?i)\b(?:{MONTH_ALT})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?\b"),
            ),
            DatePattern::new(
                "full-month-day-year",
                "December 25, 2024",
                FullDate,
                &format!(r"(?i)\b(?:{MONTH_FULL})\s+\d{{1,2}},?\s+\d{{4}}\b"),
            ),
            DatePattern::new(
                "relative",
                "next week",
                Relative,
                r"(?i)\b(?:today|tomorrow|yesterday|this\s+\w+|next\s+\w+|last\s+\w+|in\s+\d+\s+\w+)\b",
            ),
        ]
    })
}

/// Byte spans of every match of the given kinds.
pub(crate) fn spans_of(text: &str, kinds: &[PatternKind]) -> Vec<(usize, usize)> {
    table()
        .iter()
        .filter(|p| kinds.contains(&p.kind))
        .flat_map(|p| p.regex.find_iter(text).map(|m| (m.start(), m.end())))
        .collect()
}

pub(crate) fn is_within(spans: &[(usize, usize)], start: usize, end: usize) -> bool {
    spans.iter().any(|&(s, e)| s <= start && end <= e)
}

/// Applies the pattern table to raw text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternMatcher;

impl PatternMatcher {
    /// The pattern table, for help output.
    #[must_use]
    pub fn patterns() -> &'static [DatePattern] {
        table()
    }
}

impl CandidateProducer for PatternMatcher {
    fn id(&self) -> &'static str {
        "pattern"
    }

    fn name(&self) -> &'static str {
        "Pattern Matcher"
    }

    fn strategy(&self) -> Strategy {
        Strategy::Pattern
    }

    fn info(&self) -> ProducerInfo {
        ProducerInfo {
            id: self.id(),
            name: self.name(),
            description: "Numeric, written and ISO dates plus relative keywords",
            examples: &["12/25/2024", "5th Nov 2024", "2024-12-25", "next week", "in 3 days"],
            aliases: self.aliases(),
        }
    }

    fn produce(&self, text: &str, _reference: &ReferenceTimestamp) -> Vec<RawDateCandidate> {
        // A yearless match inside a full date would resolve to the wrong year.
        let full_dates = spans_of(text, &[PatternKind::FullDate]);

        let mut candidates = Vec::new();
        for pattern in table() {
            for m in pattern.regex.find_iter(text) {
                if pattern.kind == PatternKind::Partial
                    && is_within(&full_dates, m.start(), m.end())
                {
                    continue;
                }
                if !is_admissible(m.as_str()) {
                    continue;
                }
                candidates.push(RawDateCandidate::new(
                    m.as_str(),
                    m.start(),
                    m.end(),
                    self.strategy(),
                ));
            }
        }
        candidates
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["regex", "patterns"]
    }
}
