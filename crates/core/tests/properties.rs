//! Property checks over a fixed corpus of messages and references.
//!
//! Every (message, reference) pair must produce output that is sorted,
//! duplicate-free, inside the filter window, and stable across calls.

use chrono::NaiveDate;
use datesift_core::{DateSift, FilterWindow, ReferenceTimestamp, ResolvedDate};
use pretty_assertions::assert_eq;

const MESSAGES: &[&str] = &[
    "Let's meet on 12/25/2024 to discuss.",
    "See you next week!",
    "Token launch in March.",
    "<t:1730905200>",
    "Mint 12/25/2024, WL closes tomorrow, reveal next Friday, raffle in 3 days",
    "Q1 2025 roadmap: staking in January, bridge by end of the month",
    "Vote on November 5, 2024 or the day after tomorrow",
    "Snapshot was 2 weeks ago, airdrop a month from now",
    "christmas eve, new year's eve and halloween parties",
    "Dates 01/02/03 04/05/06 2024-02-30 13/13/2024 99/99/99",
    "this is next level, last one in 5 minutes",
    "Nov Dec Jan Feb Mar Apr May Jun Jul Aug Sep Oct",
    "$MEOW $meow https://meow.xyz <@123> <#456> **bold** __under__",
    "🚀🚀🚀 gm 🇺🇸 👨‍👩‍👧",
    "",
    "   ",
    "31st of February 2024, 0th Jan 2024, 32 Dec 2024",
    "in 99999999999 years, 99999999999 days ago",
    "Ünïcödé ñ 日本語 2024年11月5日 — 5 ноября",
];

const REFERENCES: &[&str] = &[
    "2024-11-05T00:00:00Z",
    "2024-02-29T23:59:59",
    "2023-12-31 12:00:00+14:00",
    "2000-01-01",
    "1730905200",
];

fn for_each_case(mut check: impl FnMut(&DateSift, &str, &ReferenceTimestamp, Vec<String>)) {
    let sift = DateSift::new();
    for reference in REFERENCES {
        let parsed = ReferenceTimestamp::parse(reference).unwrap();
        for text in MESSAGES {
            let dates = sift.extract_dates(text, *reference);
            check(&sift, text, &parsed, dates);
        }
    }
}

#[test]
fn test_output_is_strictly_ascending() {
    for_each_case(|_, text, reference, dates| {
        for pair in dates.windows(2) {
            assert!(
                pair[0] < pair[1],
                "'{}' @ {}: not strictly ascending: {:?}",
                text,
                reference,
                dates
            );
        }
    });
}

#[test]
fn test_output_is_canonical_and_inside_window() {
    for_each_case(|_, text, reference, dates| {
        let window = FilterWindow::around(reference).unwrap();
        for date in &dates {
            let parsed = ResolvedDate::parse_iso(date)
                .unwrap_or_else(|| panic!("'{}' @ {}: non-canonical {}", text, reference, date));
            assert_eq!(&parsed.to_iso(), date);
            assert!(
                window.contains(&parsed),
                "'{}' @ {}: {} outside window",
                text,
                reference,
                date
            );
        }
    });
}

#[test]
fn test_extraction_is_idempotent() {
    for_each_case(|sift, text, reference, dates| {
        assert_eq!(sift.extract_dates(text, reference), dates);
    });
}

#[test]
fn test_synthesized_reference_date_never_survives() {
    for_each_case(|sift, text, reference, dates| {
        let extraction = sift.extract(text, reference);
        let today = reference.date().format("%Y-%m-%d").to_string();
        if dates.contains(&today) {
            let explicit = extraction.candidates.iter().any(|c| {
                c.resolved.map(|d| d.date()) == Some(reference.date()) && c.provenance.is_explicit()
            });
            assert!(explicit, "'{}' @ {}: synthesized reference date kept", text, reference);
        }
    });
}

#[test]
fn test_window_invariant_holds_for_extreme_references() {
    for (y, m, d) in [(1, 1, 1), (1970, 1, 1), (2024, 2, 29), (9999, 12, 31)] {
        let date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let reference = ReferenceTimestamp::from(date.and_hms_opt(12, 0, 0).unwrap());
        if let Some(window) = FilterWindow::around(&reference) {
            assert!(window.start <= reference.datetime());
            assert!(reference.datetime() <= window.end);
        }
    }
}

#[test]
fn test_garbage_never_panics() {
    let sift = DateSift::new();
    let mut text = String::new();
    for c in (0u32..0x3000).step_by(7).filter_map(char::from_u32) {
        text.push(c);
        if text.len() % 13 == 0 {
            text.push_str(" next 12/ 31st of Q5 in -3 days ");
        }
    }
    let _ = sift.extract_dates(&text, "2024-11-05");
    let _ = datesift_core::signal::analyze(&sift, &text, "2024-11-05");
}
