use thiserror::Error;

/// Errors raised while building or addressing a [`Grid`](crate::Grid).
///
/// Both kinds are raised synchronously, before any cell is replaced, so a
/// failed call never leaves a half-mutated grid behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Malformed dimensions, non-rectangular data or an illegal cell encoding.
    #[error("invalid grid: {reason}")]
    Validation { reason: String },
    /// A cell index outside `0..len`.
    #[error("cell index {index} out of range for grid of {len} cells")]
    Index { index: usize, len: usize },
}

impl GridError {
    pub(crate) fn validation<S: Into<String>>(reason: S) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }
}
