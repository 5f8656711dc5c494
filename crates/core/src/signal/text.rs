//! Title generation.

use unicode_segmentation::UnicodeSegmentation;

/// First sentence of `text`, trimmed. Falls back to the whole text when no
/// sentence boundary yields anything.
///
/// # Examples
///
/// ```
/// use datesift_core::signal::generate_title;
///
/// assert_eq!(
///     generate_title("Mint goes live tomorrow. Whitelist closes tonight!"),
///     "Mint goes live tomorrow."
/// );
/// ```
#[must_use]
pub fn generate_title(text: &str) -> String {
    text.split_sentence_bounds()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or(text)
        .to_string()
}
