//! Page templates.
//!
//! A template is any HTML file that contains the placeholder marker once;
//! the rendered document replaces the first occurrence.
use std::{borrow::Cow, fs, io, path::Path};

use crate::error::TemplateError;

/// Marker the rendered content replaces.
pub const DEFAULT_PLACEHOLDER: &str = "<div id=main_container></div>";

/// Template used when none is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/default.html");

/// Put `body` in place of the first `placeholder` in `template`.
///
/// The body is surrounded by single spaces. Anything after the first
/// placeholder, including further placeholders, is kept as is.
///
/// # Errors
///
/// Returns [`TemplateError::MissingPlaceholder`] when `template` does not
/// contain `placeholder`, and [`TemplateError::EmptyPlaceholder`] for an
/// empty marker.
pub fn splice(
  template: &str,
  placeholder: &str,
  body: &str,
) -> Result<String, TemplateError> {
  if placeholder.is_empty() {
    return Err(TemplateError::EmptyPlaceholder);
  }

  let (before, after) = template
    .split_once(placeholder)
    .ok_or_else(|| TemplateError::MissingPlaceholder(placeholder.to_string()))?;

  Ok(format!("{before} {body} {after}"))
}

/// Read the template at `path`, or fall back to [`DEFAULT_TEMPLATE`].
///
/// # Errors
///
/// Returns an I/O error if `path` is given but cannot be read.
pub fn load(path: Option<&Path>) -> io::Result<Cow<'static, str>> {
  match path {
    Some(path) => {
      log::debug!("Using template: {}", path.display());
      fs::read_to_string(path).map(Cow::Owned)
    },
    None => Ok(Cow::Borrowed(DEFAULT_TEMPLATE)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_splice() {
    let page = splice(
      "<body><div id=main_container></div></body>",
      DEFAULT_PLACEHOLDER,
      "<p>hi</p>",
    )
    .unwrap();
    assert_eq!(page, "<body> <p>hi</p> </body>");
  }

  #[test]
  fn test_splice_uses_first_placeholder() {
    let page = splice("a[X]b[X]c", "[X]", "body").unwrap();
    assert_eq!(page, "a body b[X]c");
  }

  #[test]
  fn test_splice_missing_placeholder() {
    assert!(matches!(
      splice("<body></body>", DEFAULT_PLACEHOLDER, "x"),
      Err(TemplateError::MissingPlaceholder(_))
    ));
    assert!(matches!(
      splice("<body></body>", "", "x"),
      Err(TemplateError::EmptyPlaceholder)
    ));
  }

  #[test]
  fn test_default_template_has_placeholder() {
    assert_eq!(DEFAULT_TEMPLATE.matches(DEFAULT_PLACEHOLDER).count(), 1);
    assert!(DEFAULT_TEMPLATE.contains("page-break-inside: avoid"));
    assert!(matches!(load(None).unwrap(), Cow::Borrowed(_)));
  }
}
