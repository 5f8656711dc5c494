//! Message signal: the structured record extracted from one chat message or
//! tweet.
//!
//! [`analyze`] runs the whole message pipeline: clean the raw text, pull the
//! URLs out of it, then hand the URL-free text to the date pipeline, the
//! title generator and the ticker scanner.

mod clean;
mod links;
mod text;

pub use clean::clean_content;
pub use links::{clean_urls, extract_tickers, extract_urls, remove_urls};
pub use text::generate_title;

use serde::{Deserialize, Serialize};

use crate::reference::AsReference;
use crate::DateSift;

/// Structured signal of one message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    /// Dates in the filter window, `YYYY-MM-DD`, ascending.
    pub filtered_dates: Vec<String>,
    pub title: String,
    pub urls: Vec<String>,
    /// Space-separated uppercase tickers, empty when there are none.
    pub ticker: String,
}

/// Extract the signal of `raw_text` posted at `reference`.
///
/// A missing or malformed reference only empties `filtered_dates`.
///
/// # Examples
///
/// ```
/// use datesift_core::{signal, DateSift};
///
/// let sift = DateSift::new();
/// let signal = signal::analyze(
///     &sift,
///     "**$MEOW** mint opens 12/25/2024! Details: https://meow.xyz/mint",
///     "2024-11-05T10:00:00Z",
/// );
/// assert_eq!(signal.filtered_dates, vec!["2024-12-25"]);
/// assert_eq!(signal.urls, vec!["https://meow.xyz/mint"]);
/// assert_eq!(signal.ticker, "$MEOW");
/// assert_eq!(signal.title, "$MEOW mint opens 12/25/2024!");
/// ```
#[must_use]
pub fn analyze<R: AsReference + ?Sized>(engine: &DateSift, raw_text: &str, reference: &R) -> Signal {
    let with_urls = clean_content(raw_text);
    let cleaned = remove_urls(&with_urls);

    let urls = clean_urls(&extract_urls(&with_urls));
    let filtered_dates = engine.extract_dates(&cleaned, reference);
    let title = generate_title(&cleaned);
    let ticker = extract_tickers(&cleaned);

    tracing::debug!(
        "Signal: {} date(s), {} url(s), tickers '{}'",
        filtered_dates.len(),
        urls.len(),
        ticker
    );

    Signal {
        filtered_dates,
        title,
        urls,
        ticker,
    }
}
