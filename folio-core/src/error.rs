//! Crate-level error type.
use crate::{dom::DomError, markdown::RenderError, syntax::SyntaxError};

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Any failure that aborts a pipeline run.
///
/// Highlighting failures on individual code nodes are not in here; those are
/// logged and the node is left as it was.
#[derive(Debug, thiserror::Error)]
pub enum Error {
  #[error(transparent)]
  Dom(#[from] DomError),

  #[error(transparent)]
  Render(#[from] RenderError),

  #[error("Syntax highlighting error: {0}")]
  Syntax(#[from] SyntaxError),
}
