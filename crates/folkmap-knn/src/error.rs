//! Error types for the nearest-neighbor engine.

use thiserror::Error;

/// Errors that can occur while ranking or comparing items.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnnError {
    /// The referenced item code does not exist in the store.
    #[error("item not found: {0}")]
    NotFound(String),

    /// Two vectors (or a vector and its auxiliary table) have different lengths.
    ///
    /// Signals a data-loading defect rather than a bad request.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A neighbor count that is negative and not the `-1` "all" sentinel.
    #[error("invalid neighbor count {0}: must be -1 (all) or >= 0")]
    InvalidCount(i64),
}

impl KnnError {
    /// `true` for errors caused by the caller (bad code, bad count).
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, KnnError::DimensionMismatch { .. })
    }
}
