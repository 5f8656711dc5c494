//! Built-in candidate producers.

mod entity;
mod month;
mod pattern;

pub use entity::EntityExtractor;
pub use month::MonthInference;
pub use pattern::{DatePattern, PatternMatcher};

/// Literal marker of a platform timestamp token such as `<t:1730905200>`.
const PLATFORM_TOKEN_MARKER: &str = "<t:";

/// Whether a candidate may be handed to the resolver.
///
/// Platform timestamp tokens are excluded by policy in every strategy.
pub(crate) fn is_admissible(candidate: &str) -> bool {
    if candidate.contains(PLATFORM_TOKEN_MARKER) {
        tracing::debug!("Excluding platform timestamp token '{}'", candidate);
        return false;
    }
    true
}
