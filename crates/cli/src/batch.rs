//! Batch mode for processing JSON lines from stdin.
//!
//! Each input line is an object with `text` and `timestamp`. Each output line
//! is either the message signal or an object with a single `error` field, so
//! output line N always answers input line N. Blank lines are skipped.

use std::io::{self, BufRead, Write};

use datesift_core::{signal, DateSift, ReferenceTimestamp, Signal};
use serde::{Deserialize, Serialize};

/// Error text for a record that lacks either field.
pub const MISSING_FIELDS: &str = "Both 'text' and 'timestamp' are required";

/// One input record. Both fields are optional so a missing one can be
/// reported instead of failing the whole line.
#[derive(Debug, Deserialize)]
struct BatchRecord {
    #[serde(default)]
    text: Option<String>,
    /// String timestamp or bare epoch seconds.
    #[serde(default)]
    timestamp: Option<serde_json::Value>,
}

/// One output line.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchOutput {
    Signal(Signal),
    Error { error: String },
}

impl BatchOutput {
    fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }
}

/// Run batch mode, processing stdin line by line.
pub fn run_batch_mode(sift: &DateSift) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let handle = stdin.lock();
    let mut out = stdout.lock();

    for (number, line_result) in handle.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }
        let output = process_line(sift, &line);
        if let BatchOutput::Error { error } = &output {
            tracing::debug!("Line {}: {}", number + 1, error);
        }
        let json = serde_json::to_string(&output).map_err(io::Error::other)?;
        writeln!(out, "{}", json)?;
    }

    Ok(())
}

/// Process a single JSON line.
pub fn process_line(sift: &DateSift, line: &str) -> BatchOutput {
    let record: BatchRecord = match serde_json::from_str(line) {
        Ok(record) => record,
        Err(e) => return BatchOutput::error(format!("Invalid JSON: {}", e)),
    };

    let text = record.text.filter(|t| !t.is_empty());
    let timestamp = record.timestamp.and_then(|value| match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    });
    let (Some(text), Some(timestamp)) = (text, timestamp) else {
        return BatchOutput::error(MISSING_FIELDS);
    };

    match ReferenceTimestamp::parse(&timestamp) {
        Ok(reference) => BatchOutput::Signal(signal::analyze(sift, &text, &reference)),
        Err(e) => BatchOutput::error(e.to_string()),
    }
}
