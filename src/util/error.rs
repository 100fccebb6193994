//! Error types for inkmatch.

use thiserror::Error;

/// Result alias for inkmatch operations.
pub type InkMatchResult<T> = std::result::Result<T, InkMatchError>;

/// Errors that can occur while building masks, scoring, or ranking.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InkMatchError {
    /// A grid or mask was requested with a zero (or overflowing) dimension.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The backing buffer is shorter than `width * height`.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Two masks compared by a distance metric differ in size.
    #[error("mask size mismatch: {left_width}x{left_height} vs {right_width}x{right_height}")]
    SizeMismatch {
        left_width: usize,
        left_height: usize,
        right_width: usize,
        right_height: usize,
    },
    /// A tolerance, result count, or similar parameter is out of range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    /// The mask scored against the reference carries no ink cells.
    #[error("mask has no ink cells ({context})")]
    EmptyMask { context: &'static str },
    /// A mask cannot be used by the selected metric.
    #[error("degenerate mask: {reason}")]
    DegenerateMask { reason: &'static str },
    /// A candidate could not be compared with the query rescaled to its size.
    #[error("candidate cannot be scored: {source}")]
    Unscorable { source: Box<InkMatchError> },
    /// No candidates were supplied to a ranking run.
    #[error("dataset contains no candidates")]
    EmptyDataset,
    /// A candidate or query image could not be decoded.
    #[error("failed to decode `{path}`: {reason}")]
    Decode { path: String, reason: String },
    /// The dataset directory could not be listed.
    #[error("failed to list dataset `{path}`: {reason}")]
    Dataset { path: String, reason: String },
    /// The ranking run was cancelled before every candidate was scored.
    #[error("ranking cancelled")]
    Cancelled,
}

impl InkMatchError {
    /// Returns true for faults confined to a single candidate.
    ///
    /// These are subject to the ranking fault policy; every other error
    /// aborts the run.
    pub fn is_candidate_fault(&self) -> bool {
        matches!(
            self,
            InkMatchError::Decode { .. }
                | InkMatchError::InvalidDimensions { .. }
                | InkMatchError::BufferTooSmall { .. }
                | InkMatchError::Unscorable { .. }
        )
    }

    pub(crate) fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        InkMatchError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
