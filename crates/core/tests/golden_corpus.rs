//! Golden corpus tests for date extraction.
//!
//! Each case pairs a message with the timestamp it was posted at and checks
//! the filtered output. The goal is to catch regressions where one strategy
//! starts leaking dates the window should drop, or stops finding dates the
//! other strategies rely on it for.

use datesift_core::DateSift;

/// Election day 2024, a Tuesday. Most cases anchor here.
const REF: &str = "2024-11-05T00:00:00Z";

/// A golden test case: message, reference, and the expected output.
struct GoldenCase {
    text: &'static str,
    reference: &'static str,
    description: &'static str,
    /// Dates that must appear in the output
    expected: &'static [&'static str],
    /// Dates that must not appear in the output
    absent: &'static [&'static str],
    /// If true, the output must equal `expected` exactly
    exact: bool,
}

impl GoldenCase {
    const fn exact(
        text: &'static str,
        expected: &'static [&'static str],
        desc: &'static str,
    ) -> Self {
        Self {
            text,
            reference: REF,
            description: desc,
            expected,
            absent: &[],
            exact: true,
        }
    }

    const fn contains(
        text: &'static str,
        expected: &'static [&'static str],
        desc: &'static str,
    ) -> Self {
        Self {
            text,
            reference: REF,
            description: desc,
            expected,
            absent: &[],
            exact: false,
        }
    }

    const fn absent(
        text: &'static str,
        absent: &'static [&'static str],
        desc: &'static str,
    ) -> Self {
        Self {
            text,
            reference: REF,
            description: desc,
            expected: &[],
            absent,
            exact: false,
        }
    }

    const fn at(mut self, reference: &'static str) -> Self {
        self.reference = reference;
        self
    }
}

// =============================================================================
// Golden Corpus: Scenarios
// =============================================================================

const SCENARIO_CASES: &[GoldenCase] = &[
    GoldenCase::contains(
        "Let's meet on 12/25/2024 to discuss.",
        &["2024-12-25"],
        "US numeric date",
    )
    .at("2024-11-01T00:00:00Z"),
    GoldenCase::contains("See you next week!", &["2024-11-12"], "next week = +7 days"),
    GoldenCase::absent(
        "Token launch in March.",
        &["2024-03-01"],
        "bare month before the window",
    )
    .at("2024-06-01T00:00:00Z"),
    GoldenCase::exact("<t:1730905200>", &[], "platform token alone"),
    GoldenCase::exact("gm frens, wagmi", &[], "no date-like text"),
    GoldenCase::exact("", &[], "empty message"),
];

// =============================================================================
// Golden Corpus: Absolute dates
// =============================================================================

const ABSOLUTE_CASES: &[GoldenCase] = &[
    GoldenCase::exact("Deadline 31/12/24", &["2024-12-31"], "day-first fallback, 2-digit year"),
    GoldenCase::exact(
        "12/25/2024 12/25/2024 2024-12-25",
        &["2024-12-25"],
        "same date three times",
    ),
    GoldenCase::exact("Launch 5th Nov 2024", &["2024-11-05"], "ordinal day-month-year"),
    GoldenCase::exact("Mint 2025/01/15 at noon", &["2025-01-15"], "year-first slashes"),
    GoldenCase::contains(
        "Mint on the 5th of December",
        &["2024-12-05"],
        "ordinal with 'of', year from reference",
    ),
];

// =============================================================================
// Golden Corpus: Relative phrases
// =============================================================================

const RELATIVE_CASES: &[GoldenCase] = &[
    GoldenCase::exact("Snapshot tomorrow", &["2024-11-06"], "tomorrow"),
    GoldenCase::exact("AMA this Friday", &["2024-11-08"], "this <weekday> within the week"),
    GoldenCase::exact(
        "Party next Friday or last Friday",
        &["2024-11-08"],
        "last Friday falls before the window",
    ),
    GoldenCase::exact("Claim closes in 3 days", &["2024-11-08"], "in N days"),
    GoldenCase::exact("Whitelist opened 2 weeks ago", &[], "N weeks ago is too old"),
    GoldenCase::exact("IRL meetup next weekend", &["2024-11-16"], "next weekend = Saturday"),
    GoldenCase::exact("Season 2 next month", &["2024-12-05"], "next month, same day"),
    GoldenCase::exact(
        "Raffle ends end of the month",
        &["2024-11-30"],
        "period boundary",
    ),
    GoldenCase::exact("Christmas party!", &["2024-12-25"], "holiday in reference year"),
    GoldenCase::exact("Roadmap: Q1 2025", &["2025-01-01"], "quarter with year"),
];

// =============================================================================
// Golden Corpus: Window boundaries
// =============================================================================

const BOUNDARY_CASES: &[GoldenCase] = &[
    GoldenCase::exact(
        "Recap of 11/02/2024 and 11/03/2024",
        &["2024-11-03"],
        "lower bound is reference - 2 days",
    ),
    GoldenCase::exact(
        "See you 11/07/2026 or 11/08/2026",
        &["2026-11-07"],
        "upper bound is reference + 2 years + 2 days",
    ),
    GoldenCase::exact("Mint is live today", &[], "synthesized reference date is dropped"),
    GoldenCase::exact(
        "Vote on November 5, 2024",
        &["2024-11-05"],
        "explicit reference date is kept",
    ),
    GoldenCase::exact(
        "Mint Nov 5th",
        &[],
        "yearless reference date is synthesized and dropped",
    ),
    GoldenCase::exact(
        "Mint Nov 5th, 2024",
        &["2024-11-05"],
        "same date with the year written out is kept",
    ),
    GoldenCase::exact(
        "Airdrop in nov or Dec",
        &["2024-12-01"],
        "month inference on the reference day is dropped",
    )
    .at("2024-11-01T00:00:00Z"),
];

// =============================================================================
// Golden Corpus: Reference formats
// =============================================================================

const REFERENCE_CASES: &[GoldenCase] = &[
    GoldenCase::exact("tomorrow", &["2024-11-06"], "space separated").at("2024-11-05 00:00:00"),
    GoldenCase::exact("tomorrow", &["2024-11-06"], "epoch seconds").at("1730764800"),
    GoldenCase::exact("tomorrow", &["2024-11-06"], "offset dropped, wall clock kept")
        .at("2024-11-05T23:30:00-05:00"),
    GoldenCase::exact("tomorrow", &["2024-11-06"], "date only").at("2024-11-05"),
    GoldenCase::exact("tomorrow", &["2024-11-06"], "basic format date").at("20241105"),
    GoldenCase::exact("tomorrow", &["2024-11-06"], "basic format with time")
        .at("20241105T000000Z"),
    GoldenCase::exact("tomorrow", &["2024-11-06"], "offset without seconds")
        .at("2024-11-05T00:00+02:00"),
    GoldenCase::exact("tomorrow", &["2024-01-02"], "bare year").at("2024"),
    GoldenCase::exact("tomorrow", &[], "malformed reference").at("last tuesday"),
    GoldenCase::exact("tomorrow", &[], "empty reference").at(""),
];

// =============================================================================
// Test Runner
// =============================================================================

fn run_golden_tests(cases: &[GoldenCase], category: &str) {
    let sift = DateSift::new();
    let mut failures = Vec::new();

    for case in cases {
        let dates = sift.extract_dates(case.text, case.reference);

        if case.exact && dates != case.expected {
            failures.push(format!(
                "[{}] '{}' @ {} ({}): expected {:?}, got {:?}",
                category, case.text, case.reference, case.description, case.expected, dates
            ));
            continue;
        }

        for expected in case.expected {
            if !dates.iter().any(|d| d == expected) {
                failures.push(format!(
                    "[{}] '{}' @ {} ({}): missing {}. Got: {:?}",
                    category, case.text, case.reference, case.description, expected, dates
                ));
            }
        }

        for absent in case.absent {
            if dates.iter().any(|d| d == absent) {
                failures.push(format!(
                    "[{}] '{}' @ {} ({}): {} should have been filtered. Got: {:?}",
                    category, case.text, case.reference, case.description, absent, dates
                ));
            }
        }
    }

    if !failures.is_empty() {
        panic!(
            "\n{} golden corpus failures:\n\n{}\n",
            failures.len(),
            failures.join("\n\n")
        );
    }
}

// =============================================================================
// Individual Test Functions
// =============================================================================

#[test]
fn test_golden_scenarios() {
    run_golden_tests(SCENARIO_CASES, "Scenarios");
}

#[test]
fn test_golden_absolute() {
    run_golden_tests(ABSOLUTE_CASES, "Absolute");
}

#[test]
fn test_golden_relative() {
    run_golden_tests(RELATIVE_CASES, "Relative");
}

#[test]
fn test_golden_boundaries() {
    run_golden_tests(BOUNDARY_CASES, "Boundaries");
}

#[test]
fn test_golden_references() {
    run_golden_tests(REFERENCE_CASES, "References");
}

// =============================================================================
// Summary Test (runs all and reports)
// =============================================================================

#[test]
fn test_golden_corpus_summary() {
    let all_cases: &[(&str, &[GoldenCase])] = &[
        ("Scenarios", SCENARIO_CASES),
        ("Absolute", ABSOLUTE_CASES),
        ("Relative", RELATIVE_CASES),
        ("Boundaries", BOUNDARY_CASES),
        ("References", REFERENCE_CASES),
    ];

    let total: usize = all_cases.iter().map(|(_, cases)| cases.len()).sum();
    eprintln!(
        "\nGolden corpus: {} test cases across {} categories",
        total,
        all_cases.len()
    );
}
