use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Dataset errors – conditions that fail a whole load
// ---------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("duplicate name '{name}' in row {row} (first seen in row {first_row})")]
    DuplicateName {
        name: String,
        first_row: usize,
        row: usize,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
}

// ---------------------------------------------------------------------------
// Parse warnings – a cell was coerced instead of failing the load
// ---------------------------------------------------------------------------

/// Why a cell was coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionKind {
    /// Column absent from the row; the default was used.
    Missing,
    /// Value could not be read as a non-negative number; 0 was used.
    NotANumber,
    /// Value was a negative number; clamped to 0.
    Negative,
    /// `Total` unusable; the sum of the stats was used instead.
    TotalFromStats,
    /// Value above the largest accepted count; capped to it.
    Capped,
}

impl fmt::Display for CoercionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionKind::Missing => write!(f, "missing"),
            CoercionKind::NotANumber => write!(f, "not a number"),
            CoercionKind::Negative => write!(f, "negative"),
            CoercionKind::TotalFromStats => write!(f, "replaced by stat sum"),
            CoercionKind::Capped => write!(f, "capped at maximum count"),
        }
    }
}

/// One coerced cell. Collected per load so data-quality problems stay visible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("row {row}, column '{column}': {kind} (raw value '{raw}')")]
pub struct ParseWarning {
    pub row: usize,
    pub column: String,
    pub raw: String,
    pub kind: CoercionKind,
}
