//! Human-readable reports for signals and extraction traces.
//!
//! Colors:
//! - Dates that survived: green
//! - Strategy ids: yellow
//! - Unresolved or filtered: red / dimmed
//! - Labels: blue

use std::fmt::Write;

use colored::{Color, Colorize};
use datesift_core::{Extraction, ResolvedCandidate, Signal};
use unicode_width::UnicodeWidthStr;

/// Configuration for pretty printing.
#[derive(Debug, Clone, Copy)]
pub struct PrettyConfig {
    /// Enable colored output.
    pub color: bool,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

fn colorize(s: &str, color: Color, enabled: bool) -> String {
    if enabled {
        s.color(color).to_string()
    } else {
        s.to_string()
    }
}

fn label(name: &str, config: &PrettyConfig) -> String {
    let padded = format!("{:<8}", name);
    if config.color {
        padded.blue().bold().to_string()
    } else {
        padded
    }
}

/// Pad `s` to `width` display columns (wide glyphs count double).
fn pad(s: &str, width: usize) -> String {
    let gap = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(gap))
}

fn none(config: &PrettyConfig) -> String {
    if config.color {
        "(none)".dimmed().to_string()
    } else {
        "(none)".to_string()
    }
}

/// Render a signal as a labeled block.
pub fn signal_report(signal: &Signal, config: &PrettyConfig) -> String {
    let mut out = String::new();

    let title = if signal.title.is_empty() {
        none(config)
    } else {
        signal.title.clone()
    };
    let _ = writeln!(out, "{} {}", label("Title", config), title);

    let dates = if signal.filtered_dates.is_empty() {
        none(config)
    } else {
        signal
            .filtered_dates
            .iter()
            .map(|d| colorize(d, Color::Green, config.color))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let _ = writeln!(out, "{} {}", label("Dates", config), dates);

    if signal.urls.is_empty() {
        let _ = writeln!(out, "{} {}", label("URLs", config), none(config));
    } else {
        for (i, url) in signal.urls.iter().enumerate() {
            let name = if i == 0 { "URLs" } else { "" };
            let _ = writeln!(
                out,
                "{} {}",
                label(name, config),
                colorize(url, Color::Cyan, config.color)
            );
        }
    }

    let ticker = if signal.ticker.is_empty() {
        none(config)
    } else {
        colorize(&signal.ticker, Color::Yellow, config.color)
    };
    let _ = writeln!(out, "{} {}", label("Ticker", config), ticker);

    out
}

/// Render the candidate trace of one extraction.
pub fn explain_report(extraction: &Extraction, config: &PrettyConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} {}",
        label("Ref", config),
        extraction.reference
    );

    if extraction.candidates.is_empty() {
        let _ = writeln!(out, "{} {}", label("Found", config), none(config));
    } else {
        let _ = writeln!(out, "{}", label("Found", config));
        let text_width = extraction
            .candidates
            .iter()
            .map(|c| c.candidate.text.width() + 2)
            .max()
            .unwrap_or(0);
        for candidate in &extraction.candidates {
            let _ = writeln!(out, "  {}", candidate_line(candidate, text_width, extraction, config));
        }
    }

    let aggregated = extraction.aggregated.to_iso_strings();
    let aggregated = if aggregated.is_empty() {
        none(config)
    } else {
        aggregated.join(", ")
    };
    let _ = writeln!(out, "{} {}", label("Merged", config), aggregated);

    let kept = if extraction.dates.is_empty() {
        none(config)
    } else {
        extraction
            .dates
            .iter()
            .map(|d| colorize(d, Color::Green, config.color))
            .collect::<Vec<_>>()
            .join(", ")
    };
    let _ = writeln!(out, "{} {}", label("Kept", config), kept);

    out
}

fn candidate_line(
    candidate: &ResolvedCandidate,
    text_width: usize,
    extraction: &Extraction,
    config: &PrettyConfig,
) -> String {
    let strategy = colorize(
        &format!("{:<16}", candidate.candidate.strategy.as_str()),
        Color::Yellow,
        config.color,
    );
    let text = pad(&format!("\"{}\"", candidate.candidate.text), text_width);

    let Some(date) = candidate.resolved else {
        return format!(
            "{} {} {}",
            strategy,
            text,
            colorize("✗ unresolved", Color::Red, config.color)
        );
    };

    let iso = date.to_iso();
    let kept = extraction.dates.contains(&iso);
    let arrow = if kept {
        colorize("→", Color::Green, config.color)
    } else {
        colorize("⇢", Color::Red, config.color)
    };
    let iso = if kept {
        colorize(&iso, Color::Green, config.color)
    } else {
        iso
    };

    let mut line = format!(
        "{} {} {} {} {:<11}",
        strategy,
        text,
        arrow,
        iso,
        format!("{:?}", candidate.provenance).to_lowercase()
    );
    if let Some(description) = &candidate.description {
        let description = if config.color {
            description.dimmed().to_string()
        } else {
            description.clone()
        };
        line.push_str(&description);
    }
    line.trim_end().to_string()
}
