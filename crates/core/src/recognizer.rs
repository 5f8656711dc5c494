//! Entity recognition boundary.
//!
//! The entity-based producer does not find dates itself. It asks an
//! [`EntityRecognizer`] for labeled spans and keeps the ones labeled as dates.
//! The recognizer is loaded once and shared across calls, so it must be
//! `Send + Sync`. Recognizers that need `&mut self` go through
//! [`Serialized`], which puts them behind a mutex.
//!
//! [`ContextRecognizer`] is the built-in rule-based recognizer. It looks for
//! the contextual phrases a pattern table does not cover well: weekdays,
//! "the 5th of November", holidays, "end of the month", quarters.

use std::sync::{Mutex, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::calendar::WEEKDAY_ALT;

/// Label attached to a recognized span.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityLabel {
    Date,
    Time,
    Other(String),
}

impl EntityLabel {
    #[must_use]
    pub fn is_date(&self) -> bool {
        matches!(self, Self::Date)
    }
}

/// A labeled span of the input text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySpan {
    pub text: String,
    pub label: EntityLabel,
    /// Byte offset into the annotated text.
    pub start: usize,
    pub end: usize,
}

impl EntitySpan {
    pub fn new(text: impl Into<String>, label: EntityLabel, start: usize, end: usize) -> Self {
        Self {
            text: text.into(),
            label,
            start,
            end,
        }
    }
}

/// A reentrant text annotator.
pub trait EntityRecognizer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str {
        "custom"
    }

    /// Annotate `text`, returning spans in any order.
    fn annotate(&self, text: &str) -> Vec<EntitySpan>;
}

/// An annotator that needs exclusive access while it runs.
pub trait StatefulRecognizer: Send {
    fn annotate(&mut self, text: &str) -> Vec<EntitySpan>;
}

/// Serializes access to a [`StatefulRecognizer`] so it can be shared.
pub struct Serialized<R> {
    inner: Mutex<R>,
}

impl<R: StatefulRecognizer> Serialized<R> {
    pub fn new(recognizer: R) -> Self {
        Self {
            inner: Mutex::new(recognizer),
        }
    }
}

impl<R: StatefulRecognizer> EntityRecognizer for Serialized<R> {
    fn name(&self) -> &'static str {
        "serialized"
    }

    fn annotate(&self, text: &str) -> Vec<EntitySpan> {
        // A panic in a previous call leaves the recognizer usable for reads.
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.annotate(text)
    }
}

/// Recognizer that never finds anything. Disables the entity strategy
/// without removing it from the producer list.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRecognizer;

impl EntityRecognizer for NullRecognizer {
    fn name(&self) -> &'static str {
        "none"
    }

    fn annotate(&self, _text: &str) -> Vec<EntitySpan> {
        vec![]
    }
}

/// Built-in rule-based contextual recognizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextRecognizer;

/// Capitalized month names. Lowercase "may" and "march" are usually verbs.
const MONTH_CAP: &str = "Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?";
const MONTH_FULL_CAP: &str =
    "January|February|March|April|May|June|July|August|September|October|November|December";
const OFFSET_UNITS: &str = "days?|weeks?|fortnights?|months?|years?";

/// Rules in priority order; earlier rules claim overlapping text first.
fn rules() -> &'static [(Regex, EntityLabel)] {
    static RULES: OnceLock<Vec<(Regex, EntityLabel)>> = OnceLock::new();
    RULES.get_or_init(|| {
        let date = |pattern: String| (Regex::new(&pattern).unwrap(), EntityLabel::Date);
        vec![
            // "the day after tomorrow"
            date(r"(?i)\b(?:the\s+)?day\s+(?:after\s+tomorrow|before\s+yesterday)\b".to_string()),
            // "next friday", "this weekend", "last quarter"
            date(format!(
                r"(?i)\b(?:this|next|last|coming)\s+(?:weekend|week|fortnight|month|quarter|year|{WEEKDAY_ALT})\b"
            )),
            // "the 5th of November", "5th of Nov, 2024"
            date(format!(
                r"\b(?:the\s+)?\d{{1,2}}(?:st|nd|rd|th)\s+of\s+(?:{MONTH_CAP})(?:,?\s+\d{{4}})?\b"
            )),
            // "November 5", "Nov 5th, 2024"
            date(format!(
                r"\b(?:{MONTH_CAP})\.?\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?\b"
            )),
            // "March 2025"
            date(format!(r"\b(?:{MONTH_CAP})\s+\d{{4}}\b")),
            // "3 days ago", "a week from now"
            date(format!(
                r"(?i)\b(?:\d+|an?|one)\s+(?:{OFFSET_UNITS})\s+(?:ago|from\s+now)\b"
            )),
            // "in 2 weeks", "in a month"
            date(format!(r"(?i)\bin\s+(?:\d+|an?|one)\s+(?:{OFFSET_UNITS})\b")),
            date(r"(?i)\b(?:today|tonight|tomorrow|yesterday)\b".to_string()),
            date(format!(r"(?i)\b(?:{WEEKDAY_ALT})\b")),
            // Holidays
            date(
                r"(?i)\b(?:christmas(?:\s+(?:eve|day))?|xmas|new\s+year(?:'|’)?s?(?:\s+(?:day|eve))?|nye|halloween|valentine(?:'|’)?s(?:\s+day)?|independence\s+day)\b"
                    .to_string(),
            ),
            // "end of the month", "eoy"
            date(
                r"(?i)\b(?:(?:the\s+)?(?:end|start|beginning)\s+of\s+(?:the\s+)?(?:week|month|year)|eow|eom|eoy)\b"
                    .to_string(),
            ),
            date(r"(?i)\bQ[1-4](?:\s+\d{4})?\b".to_string()),
            // Bare month names, capitalized and spelled out
            date(format!(r"\b(?:{MONTH_FULL_CAP})\b")),
            (
                Regex::new(r"(?i)\b\d{1,2}(?::\d{2})?\s*(?:am|pm)\b").unwrap(),
                EntityLabel::Time,
            ),
        ]
    })
}

fn overlaps(spans: &[EntitySpan], start: usize, end: usize) -> bool {
    spans.iter().any(|s| start < s.end && end > s.start)
}

impl EntityRecognizer for ContextRecognizer {
    fn name(&self) -> &'static str {
        "context"
    }

    fn annotate(&self, text: &str) -> Vec<EntitySpan> {
        let mut spans: Vec<EntitySpan> = Vec::new();
        for (rule, label) in rules() {
            for m in rule.find_iter(text) {
                if !overlaps(&spans, m.start(), m.end()) {
                    spans.push(EntitySpan::new(m.as_str(), label.clone(), m.start(), m.end()));
                }
            }
        }
        spans.sort_by_key(|s| s.start);
        spans
    }
}
