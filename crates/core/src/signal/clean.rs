//! Message cleanup for chat and tweet text.
//!
//! Order matters: encoding is repaired before emoji removal (a mis-decoded
//! `é` looks like `Ã©`, and `©` is a pictograph), and platform timestamps
//! are expanded before asterisks and underscores are touched.

use std::sync::OnceLock;

use chrono::DateTime;
use regex::{Captures, Regex};

/// Mis-decoded UTF-8 sequences that survive the latin-1 round trip.
/// Applied in order; the bare `â€` prefix must come after its longer forms.
const MOJIBAKE: &[(&str, &str)] = &[
    ("â€™", "\u{2019}"),
    ("Â·", "\u{00B7}"),
    ("â€“", "\u{2013}"),
    ("â€”", "\u{2014}"),
    ("â€œ", "\u{201C}"),
    ("â€", "\u{201D}"),
    ("Â", ""),
];

struct CleanPatterns {
    custom_emoji: Regex,
    emoji: Regex,
    mention: Regex,
    channel: Regex,
    timestamp: Regex,
    bracket_mention: Regex,
    footnote: Regex,
    underscores: Regex,
    whitespace: Regex,
}

fn patterns() -> &'static CleanPatterns {
    static PATTERNS: OnceLock<CleanPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| CleanPatterns {
        custom_emoji: Regex::new(r"<a?:\w+:\d+>").unwrap(),
        // Keycaps, pictographs, flags, skin tones and the joiners between them
        emoji: Regex::new(
            r"[0-9#*]\x{FE0F}?\x{20E3}|[\p{Extended_Pictographic}\x{1F1E6}-\x{1F1FF}\x{1F3FB}-\x{1F3FF}\x{FE0F}\x{200D}\x{20E3}]+",
        )
        .unwrap(),
        mention: Regex::new(r"<@&?\d+>|@everyone|@here").unwrap(),
        channel: Regex::new(r"<#\d+>").unwrap(),
        timestamp: Regex::new(r"<t:(\d+)(?::[a-zA-Z])?>").unwrap(),
        bracket_mention: Regex::new(r"\[@\w+\]").unwrap(),
        footnote: Regex::new(r"\[\[\d+\]\]").unwrap(),
        underscores: Regex::new(r"_+").unwrap(),
        whitespace: Regex::new(r"\s+").unwrap(),
    })
}

/// Clean and normalize raw message text.
///
/// # Examples
///
/// ```
/// use datesift_core::signal::clean_content;
///
/// assert_eq!(
///     clean_content("**Mint** <t:1730905200:F> <@123> 🚀🚀"),
///     "Mint 2024-11-06 15:00 UTC"
/// );
/// ```
#[must_use]
pub fn clean_content(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    let p = patterns();

    let text = fix_encoding(text);
    let text = p.custom_emoji.replace_all(&text, "");
    let text = p.emoji.replace_all(&text, "");
    let text = p.mention.replace_all(&text, "");
    let text = p.channel.replace_all(&text, "[CHANNEL]");
    let text = p.timestamp.replace_all(&text, |caps: &Captures| {
        expand_timestamp(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });
    let text = p.bracket_mention.replace_all(&text, "");
    let text = p.footnote.replace_all(&text, "");
    let text = text.replace('*', "");
    let text = remove_standalone_underscores(&text);
    p.whitespace.replace_all(&text, " ").trim().to_string()
}

/// Undo UTF-8 text that was decoded as latin-1, then patch the leftovers.
fn fix_encoding(text: &str) -> String {
    let mut fixed = latin1_round_trip(text).unwrap_or_else(|| text.to_string());
    for (bad, good) in MOJIBAKE {
        if fixed.contains(bad) {
            fixed = fixed.replace(bad, good);
        }
    }
    fixed
}

/// `None` if the text is not representable in latin-1 or the bytes are not UTF-8.
fn latin1_round_trip(text: &str) -> Option<String> {
    let bytes = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).ok())
        .collect::<Option<Vec<u8>>>()?;
    String::from_utf8(bytes).ok()
}

fn expand_timestamp(digits: &str) -> Option<String> {
    let secs: i64 = digits.parse().ok()?;
    let dt = DateTime::from_timestamp(secs, 0)?;
    Some(dt.format("%Y-%m-%d %H:%M UTC").to_string())
}

/// Underscore runs not touching a word character become a space.
/// `snake_case` and `__init__`-style runs next to letters are kept.
fn remove_standalone_underscores(text: &str) -> String {
    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in patterns().underscores.find_iter(text) {
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        if !is_word(before) && !is_word(after) {
            out.push_str(&text[last..m.start()]);
            out.push(' ');
            last = m.end();
        }
    }
    out.push_str(&text[last..]);
    out
}
