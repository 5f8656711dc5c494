//! Error types for datesift.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No reference timestamp was supplied (empty string, `None`).
    #[error("Missing reference timestamp")]
    MissingReference,

    /// A reference timestamp was supplied but could not be parsed.
    #[error("Invalid reference timestamp: {0}")]
    InvalidReference(String),

    /// The reference is valid but the filter window around it overflows
    /// the supported calendar range.
    #[error("Reference timestamp out of range: {0}")]
    ReferenceOutOfRange(String),
}

pub type Result<T> = std::result::Result<T, Error>;
