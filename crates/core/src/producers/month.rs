//! Month-inference fallback: "in November" counts as a November event.

use std::sync::OnceLock;

use chrono::Datelike;
use regex::Regex;

use super::is_admissible;
use super::pattern::{is_within, spans_of, PatternKind};
use crate::producer::{CandidateProducer, ProducerInfo};
use crate::reference::ReferenceTimestamp;
use crate::types::{RawDateCandidate, Strategy};

fn month_name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec)\b",
        )
        .unwrap()
    })
}

/// Synthesizes the first day of every mentioned month in the reference year.
///
/// Deliberately coarse: the day is always 1 and duplicates are left for the
/// aggregator. Month names that already belong to a day+month date are
/// skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthInference;

impl CandidateProducer for MonthInference {
    fn id(&self) -> &'static str {
        "month-inference"
    }

    fn name(&self) -> &'static str {
        "Month Inference"
    }

    fn strategy(&self) -> Strategy {
        Strategy::MonthInference
    }

    fn info(&self) -> ProducerInfo {
        ProducerInfo {
            id: self.id(),
            name: self.name(),
            description: "Bare month names become the first of that month",
            examples: &["in November", "Token launch in March", "Q4 (Oct)"],
            aliases: self.aliases(),
        }
    }

    fn produce(&self, text: &str, reference: &ReferenceTimestamp) -> Vec<RawDateCandidate> {
        let dated = spans_of(text, &[PatternKind::FullDate, PatternKind::Partial]);
        let year = reference.date().year();

        month_name_regex()
            .find_iter(text)
            .filter(|m| !is_within(&dated, m.start(), m.end()))
            .filter(|m| is_admissible(m.as_str()))
            .map(|m| {
                RawDateCandidate::new(
                    format!("1 {} {}", m.as_str(), year),
                    m.start(),
                    m.end(),
                    self.strategy(),
                )
            })
            .collect()
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["month", "months"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn produce(text: &str, reference: &str) -> Vec<String> {
        let reference = ReferenceTimestamp::parse(reference).unwrap();
        MonthInference
            .produce(text, &reference)
            .into_iter()
            .map(|c| c.text)
            .collect()
    }

    #[test]
    fn test_synthesizes_first_of_month_in_reference_year() {
        assert_eq!(
            produce("Token launch in March.", "2024-06-01T00:00:00Z"),
            vec!["1 March 2024"]
        );
        assert_eq!(
            produce("Airdrop in nov or Dec", "2023-01-15"),
            vec!["1 nov 2023", "1 Dec 2023"]
        );
    }

    #[test]
    fn test_skips_months_inside_full_dates() {
        assert!(produce("Vote on November 5, 2024", "2024-11-05").is_empty());
        assert!(produce("see you 25th Dec", "2024-11-05").is_empty());
        assert_eq!(
            produce("25th Dec and then January", "2024-11-05"),
            vec!["1 January 2024"]
        );
    }

    #[test]
    fn test_ignores_words_containing_month_names() {
        assert!(produce("Decentralized marketing is mayhem", "2024-11-05").is_empty());
    }
}
