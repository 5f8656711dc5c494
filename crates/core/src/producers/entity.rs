//! Entity-based extractor: date spans from an [`EntityRecognizer`].

use std::sync::Arc;

use super::is_admissible;
use crate::producer::{CandidateProducer, ProducerInfo};
use crate::recognizer::{EntityRecognizer, EntitySpan};
use crate::reference::ReferenceTimestamp;
use crate::resolve::{resolve, Resolution};
use crate::types::{RawDateCandidate, Strategy};

/// Wraps a shared recognizer handle and keeps its date-labeled spans.
pub struct EntityExtractor {
    recognizer: Arc<dyn EntityRecognizer>,
}

impl EntityExtractor {
    pub fn new(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self { recognizer }
    }

    /// Date spans paired with their resolution, in text order.
    ///
    /// Platform timestamp tokens are left out entirely.
    #[must_use]
    pub fn annotate(
        &self,
        text: &str,
        reference: &ReferenceTimestamp,
    ) -> Vec<(EntitySpan, Option<Resolution>)> {
        self.date_spans(text)
            .into_iter()
            .map(|span| {
                let resolved = resolve(&span.text, reference);
                (span, resolved)
            })
            .collect()
    }

    fn date_spans(&self, text: &str) -> Vec<EntitySpan> {
        let mut spans: Vec<EntitySpan> = self
            .recognizer
            .annotate(text)
            .into_iter()
            .filter(|span| span.label.is_date() && is_admissible(&span.text))
            .collect();
        spans.sort_by_key(|s| s.start);
        spans
    }
}

impl CandidateProducer for EntityExtractor {
    fn id(&self) -> &'static str {
        "entity"
    }

    fn name(&self) -> &'static str {
        "Entity Extractor"
    }

    fn strategy(&self) -> Strategy {
        Strategy::Entity
    }

    fn info(&self) -> ProducerInfo {
        ProducerInfo {
            id: self.id(),
            name: self.name(),
            description: "Date spans labeled by the entity recognizer",
            examples: &["next Friday", "the 5th of November", "end of the month", "Q3"],
            aliases: self.aliases(),
        }
    }

    fn produce(&self, text: &str, _reference: &ReferenceTimestamp) -> Vec<RawDateCandidate> {
        let spans = self.date_spans(text);
        tracing::trace!(
            "{} recognizer returned {} date span(s)",
            self.recognizer.name(),
            spans.len()
        );
        spans
            .into_iter()
            .map(|span| RawDateCandidate::new(span.text, span.start, span.end, self.strategy()))
            .collect()
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["ner", "entities"]
    }
}
