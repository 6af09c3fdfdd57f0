//! Typed errors for the calendar core.
//!
//! The grid, highlight, label and layout computations either return a complete
//! value or one of these errors; nothing is retried and nothing is partially
//! returned. Outer layers (data sources, storage, rendering, CLI) wrap these in
//! `anyhow::Error` with extra context.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalplotError {
    /// Locale unavailable or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Caller-detectable bad input: empty facet set, `today` outside the grid
    /// year, negative or non-finite quantities, negative gaps.
    #[error("precondition failed: {0}")]
    Precondition(String),
    /// Input records that cannot be aggregated as numbers.
    #[error("inconsistent data: {0}")]
    DataConsistency(String),
}

pub type Result<T> = std::result::Result<T, CalplotError>;
