//! Candidate producer trait definition.

use crate::reference::ReferenceTimestamp;
use crate::types::{RawDateCandidate, Strategy};

/// Metadata about a producer for help/documentation.
#[derive(Debug, Clone)]
pub struct ProducerInfo {
    /// Unique identifier (e.g., "pattern")
    pub id: &'static str,
    /// Human-readable name (e.g., "Pattern Matcher")
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
    /// Example phrases this producer picks up
    pub examples: &'static [&'static str],
    /// Short aliases accepted by `--disable` and the config file
    pub aliases: &'static [&'static str],
}

/// An independent extraction strategy.
///
/// Producers scan text and propose raw date-like substrings. They never
/// resolve or deduplicate; the engine does that uniformly for all of them,
/// so adding a strategy needs no change to aggregation or filtering.
pub trait CandidateProducer: Send + Sync {
    /// Unique identifier for this producer (e.g., "pattern", "entity").
    fn id(&self) -> &'static str;

    /// Human-readable name (e.g., "Pattern Matcher").
    fn name(&self) -> &'static str;

    /// Strategy tag attached to every candidate from this producer.
    fn strategy(&self) -> Strategy;

    /// Get producer metadata for help/documentation.
    fn info(&self) -> ProducerInfo {
        ProducerInfo {
            id: self.id(),
            name: self.name(),
            description: "",
            examples: &[],
            aliases: self.aliases(),
        }
    }

    /// Propose candidates for `text`.
    fn produce(&self, text: &str, reference: &ReferenceTimestamp) -> Vec<RawDateCandidate>;

    /// Short aliases for this producer (e.g., "ner" for "entity").
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Check if the given name matches this producer's id or any alias,
    /// ignoring case and surrounding whitespace.
    fn matches_name(&self, name: &str) -> bool {
        let name = name.trim();
        name.eq_ignore_ascii_case(self.id())
            || self.aliases().iter().any(|a| name.eq_ignore_ascii_case(a))
    }
}
