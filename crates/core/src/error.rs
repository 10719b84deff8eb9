//! Error types for the layering engine.

use thiserror::Error;

/// Errors that can abort a layering run.
///
/// Degenerate inputs (empty rings, empty shape lists) are not errors: they
/// simply produce empty results at the stage where they occur.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Geometry that cannot be processed (non-finite coordinates, zero-width extents).
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Configuration values that make the run meaningless.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The polygon boolean-operations primitive rejected its input.
    #[error("Boolean operation failed: {0}")]
    BooleanOp(String),

    /// Internal invariant violation.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using the layering [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
