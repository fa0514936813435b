//! Error types for document tree operations.

use std::io;

/// Result type for document tree operations.
pub type DomResult<T> = Result<T, DomError>;

/// Errors that can occur while building, querying or mutating a
/// [`DocumentTree`](super::DocumentTree).
#[derive(Debug, thiserror::Error)]
pub enum DomError {
  /// `wrap_range` was given nodes that are empty, not siblings, or not
  /// adjacent. Correct grouping logic never produces this.
  #[error("Invalid node range: {0}")]
  InvalidRange(String),

  #[error("Failed to parse HTML: {0}")]
  ParseFailure(String),

  #[error("Invalid selector '{0}'")]
  InvalidSelector(String),

  #[error("Failed to serialize document: {0}")]
  Serialize(#[from] io::Error),
}
