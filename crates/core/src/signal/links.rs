//! URL and ticker extraction.

use std::collections::{BTreeSet, HashSet};
use std::sync::OnceLock;

use regex::Regex;

/// Full and bare URLs: `https://x.com/a`, `www.site.io`, `mint.xyz/drop`.
fn url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:https?://)?(?:www\.)?[a-z0-9.-]+\.[a-z]{2,10}(?:/\S*)?").unwrap()
    })
}

fn ticker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$[a-zA-Z]+\w*").unwrap())
}

fn trailing_brackets() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[)\]>]+$").unwrap())
}

fn whitespace() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

/// Remove every URL and normalize the whitespace left behind.
#[must_use]
pub fn remove_urls(text: &str) -> String {
    let stripped = url_regex().replace_all(text, "");
    whitespace().replace_all(&stripped, " ").trim().to_string()
}

/// Unique URLs in first-seen order.
///
/// # Examples
///
/// ```
/// use datesift_core::signal::extract_urls;
///
/// assert_eq!(
///     extract_urls("Mint at https://mint.xyz/drop or mint.xyz/drop, docs: www.docs.io"),
///     vec!["https://mint.xyz/drop", "mint.xyz/drop,", "www.docs.io"]
/// );
/// ```
#[must_use]
pub fn extract_urls(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    url_regex()
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|url| seen.insert(*url))
        .map(str::to_string)
        .collect()
}

/// Strip trailing `)`, `]` and `>` left over from markdown or angle links.
#[must_use]
pub fn clean_urls<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    urls.iter()
        .map(|url| trailing_brackets().replace(url.as_ref(), "").into_owned())
        .collect()
}

/// Unique `$TICKER` symbols, uppercased, sorted and space-joined.
///
/// Pure numbers such as `$100` are not tickers.
#[must_use]
pub fn extract_tickers(text: &str) -> String {
    let tickers: BTreeSet<String> = ticker_regex()
        .find_iter(text)
        .map(|m| m.as_str().to_uppercase())
        .collect();
    tickers.into_iter().collect::<Vec<_>>().join(" ")
}
