//! Datesift Core
//!
//! Extracts the dates a short social-media message talks about, anchored on
//! the time the message was posted. Several independent strategies propose
//! candidates, a resolver turns each into a calendar date, and a window
//! filter keeps the ones that plausibly describe an upcoming or very recent
//! event.
//!
//! # Quick Start
//!
//! ```
//! use datesift_core::DateSift;
//!
//! let sift = DateSift::new();
//!
//! let dates = sift.extract_dates("Let's meet on 12/25/2024 to discuss.", "2024-11-01T00:00:00Z");
//! assert_eq!(dates, vec!["2024-12-25"]);
//!
//! let dates = sift.extract_dates("See you next week!", "2024-11-05T00:00:00Z");
//! assert!(dates.contains(&"2024-11-12".to_string()));
//! ```
//!
//! # Inspecting Candidates
//!
//! ```
//! use datesift_core::{DateSift, ReferenceTimestamp, Strategy};
//!
//! let sift = DateSift::new();
//! let reference = ReferenceTimestamp::parse("2024-06-01T00:00:00Z").unwrap();
//! let extraction = sift.extract("Token launch in March.", &reference);
//!
//! // March 1st is found, but it lies before the window
//! assert!(extraction.aggregated.to_iso_strings().contains(&"2024-03-01".to_string()));
//! assert!(extraction.dates.is_empty());
//! assert!(extraction
//!     .candidates
//!     .iter()
//!     .any(|c| c.candidate.strategy == Strategy::MonthInference));
//! ```

pub mod aggregate;
mod calendar;
pub mod error;
pub mod producer;
pub mod producers;
pub mod recognizer;
pub mod reference;
pub mod resolve;
pub mod signal;
pub mod types;
pub mod window;

pub use error::{Error, Result};
pub use producer::{CandidateProducer, ProducerInfo};
pub use recognizer::{
    ContextRecognizer, EntityLabel, EntityRecognizer, EntitySpan, NullRecognizer, Serialized,
    StatefulRecognizer,
};
pub use reference::{AsReference, ReferenceTimestamp};
pub use resolve::Resolution;
pub use signal::{analyze, Signal};
pub use types::*;
pub use window::FilterWindow;

use std::sync::Arc;

use producers::{EntityExtractor, MonthInference, PatternMatcher};

/// Main entry point - a configured extraction pipeline.
///
/// Cheap to share: the regex tables are process-wide and the recognizer is
/// behind an `Arc`.
pub struct DateSift {
    producers: Vec<Box<dyn CandidateProducer>>,
    config: Option<ExtractionConfig>,
}

impl DateSift {
    /// Create a pipeline with all built-in producers and the rule-based
    /// [`ContextRecognizer`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_recognizer(Arc::new(ContextRecognizer))
    }

    /// Create a pipeline whose entity strategy uses `recognizer`.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use datesift_core::{DateSift, NullRecognizer};
    ///
    /// let sift = DateSift::with_recognizer(Arc::new(NullRecognizer));
    /// // The pattern table still sees numeric dates
    /// assert_eq!(
    ///     sift.extract_dates("Mint on 2024-12-01", "2024-11-05"),
    ///     vec!["2024-12-01"]
    /// );
    /// ```
    #[must_use]
    pub fn with_recognizer(recognizer: Arc<dyn EntityRecognizer>) -> Self {
        Self {
            producers: Self::create_producer_list(recognizer),
            config: None,
        }
    }

    /// Create a pipeline with custom configuration.
    #[must_use]
    pub fn with_config(config: ExtractionConfig) -> Self {
        Self::new().set_config(config)
    }

    /// Set the configuration.
    #[must_use]
    pub fn set_config(mut self, config: ExtractionConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Get the current configuration (if any).
    #[must_use]
    pub fn config(&self) -> Option<&ExtractionConfig> {
        self.config.as_ref()
    }

    fn create_producer_list(recognizer: Arc<dyn EntityRecognizer>) -> Vec<Box<dyn CandidateProducer>> {
        vec![
            Box::new(PatternMatcher),
            Box::new(EntityExtractor::new(recognizer)),
            Box::new(MonthInference),
        ]
    }

    fn enabled_producers(&self) -> impl Iterator<Item = &dyn CandidateProducer> + '_ {
        self.producers
            .iter()
            .map(|p| p.as_ref())
            .filter(move |p| match &self.config {
                Some(config) => !config.is_strategy_disabled(p.id(), p.aliases()),
                None => true,
            })
    }

    /// Raw candidates from every enabled producer, in producer order.
    #[must_use]
    pub fn candidates(&self, text: &str, reference: &ReferenceTimestamp) -> Vec<RawDateCandidate> {
        self.enabled_producers()
            .flat_map(|producer| {
                let found = producer.produce(text, reference);
                tracing::trace!("{} produced {} candidate(s)", producer.id(), found.len());
                found
            })
            .collect()
    }

    /// Candidates paired with their resolution.
    #[must_use]
    pub fn resolve_candidates(
        &self,
        text: &str,
        reference: &ReferenceTimestamp,
    ) -> Vec<ResolvedCandidate> {
        self.candidates(text, reference)
            .into_iter()
            .map(|candidate| match resolve::resolve(&candidate.text, reference) {
                Some(resolution) => {
                    let provenance = if candidate.strategy.is_synthetic() {
                        Provenance::Synthesized
                    } else {
                        resolution.provenance
                    };
                    ResolvedCandidate {
                        candidate,
                        resolved: Some(resolution.date.into()),
                        provenance,
                        description: Some(resolution.description),
                    }
                }
                None => {
                    tracing::debug!(
                        "Dropping unresolvable {} candidate '{}'",
                        candidate.strategy,
                        candidate.text
                    );
                    ResolvedCandidate {
                        candidate,
                        resolved: None,
                        provenance: Provenance::Synthesized,
                        description: None,
                    }
                }
            })
            .collect()
    }

    /// All resolved dates before window filtering.
    #[must_use]
    pub fn aggregate(&self, text: &str, reference: &ReferenceTimestamp) -> DateSet {
        aggregate::aggregate(&self.resolve_candidates(text, reference))
    }

    /// Run the full pipeline and keep every intermediate step.
    #[must_use]
    pub fn extract(&self, text: &str, reference: &ReferenceTimestamp) -> Extraction {
        let candidates = self.resolve_candidates(text, reference);
        let aggregated = aggregate::aggregate(&candidates);
        let dates = window::filter(&aggregated, Some(reference));
        Extraction {
            reference: reference.to_string(),
            candidates,
            aggregated,
            dates,
        }
    }

    /// Filtered dates as canonical `YYYY-MM-DD` strings, ascending.
    ///
    /// Never fails: a missing or malformed reference yields an empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use datesift_core::DateSift;
    ///
    /// let sift = DateSift::new();
    /// assert!(sift.extract_dates("<t:1730905200>", "2024-11-05T00:00:00Z").is_empty());
    /// assert!(sift.extract_dates("tomorrow", "not a timestamp").is_empty());
    /// ```
    #[must_use]
    pub fn extract_dates<R: AsReference + ?Sized>(&self, text: &str, reference: &R) -> Vec<String> {
        match self.try_extract_dates(text, reference) {
            Ok(dates) => dates,
            Err(e) => {
                tracing::warn!("{}", e);
                vec![]
            }
        }
    }

    /// Like [`extract_dates`](Self::extract_dates) but reports a bad
    /// reference instead of swallowing it.
    pub fn try_extract_dates<R: AsReference + ?Sized>(
        &self,
        text: &str,
        reference: &R,
    ) -> Result<Vec<String>> {
        let reference = reference.to_reference()?;
        if FilterWindow::around(&reference).is_none() {
            return Err(Error::ReferenceOutOfRange(reference.to_string()));
        }
        Ok(self.extract(text, &reference).dates)
    }

    /// Get info about all registered producers (for help/documentation).
    #[must_use]
    pub fn producer_infos(&self) -> Vec<ProducerInfo> {
        self.producers.iter().map(|p| p.info()).collect()
    }

    /// Check if a strategy name (id or alias) is valid.
    #[must_use]
    pub fn is_valid_strategy(&self, name: &str) -> bool {
        self.producers.iter().any(|p| p.matches_name(name))
    }

    /// Get a list of all producer ids (not aliases).
    #[must_use]
    pub fn producer_ids(&self) -> Vec<&'static str> {
        self.producers.iter().map(|p| p.id()).collect()
    }
}

impl Default for DateSift {
    fn default() -> Self {
        Self::new()
    }
}
