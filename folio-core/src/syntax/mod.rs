//! Syntax highlighting for code nodes.
//!
//! A [`SyntaxHighlighter`] is a pluggable backend; [`SyntaxManager`] wraps one
//! with alias resolution and fallback policy and implements the
//! [`HighlightService`] the pipeline consumes.
//!
//! Currently supported backends:
//! - **Syntect** - Uses Sublime Text syntax definitions, with two-face added
//!   for extended syntax definitions and themes

pub mod error;
pub mod types;

pub use error::{SyntaxError, SyntaxResult};
pub use types::{
  HighlightService,
  PLAIN_TEXT,
  SyntaxConfig,
  SyntaxHighlighter,
  SyntaxManager,
};

#[cfg(feature = "syntect")] mod syntect;
#[cfg(feature = "syntect")] pub use self::syntect::*;

/// Create the default syntax manager based on available features.
///
/// # Errors
///
/// Returns [`SyntaxError::NoBackendAvailable`] when the crate was built
/// without a highlighting backend.
pub fn create_default_manager(
  config: SyntaxConfig,
) -> SyntaxResult<SyntaxManager> {
  #[cfg(feature = "syntect")]
  {
    create_syntect_manager(config)
  }

  #[cfg(not(feature = "syntect"))]
  {
    let _ = config;
    Err(SyntaxError::NoBackendAvailable)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntect_highlighter() {
    let highlighter = SyntectHighlighter;
    assert_eq!(highlighter.name(), "Syntect");
    assert!(highlighter.supports_language("rust"));
    assert!(highlighter.supports_language(PLAIN_TEXT));
    assert!(highlighter.has_theme("Nord"));
    assert!(highlighter.has_theme(DEFAULT_THEME));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntect_highlight_is_class_based() {
    let html = SyntectHighlighter
      .highlight("fn main() {}\n", "rust")
      .expect("Failed to highlight code");
    assert!(html.contains("<span class=\"hl-"));
    assert!(html.contains("main"));
    assert!(!html.contains("<pre"));
    assert!(!html.contains("style="));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntect_rejects_unknown_language() {
    let result = SyntectHighlighter.highlight("x", "not-a-language");
    assert!(matches!(result, Err(SyntaxError::UnsupportedLanguage(_))));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_syntect_detects_shebang() {
    let detected = SyntectHighlighter.detect_language("#!/usr/bin/env python3");
    assert_eq!(detected.as_deref(), Some("python"));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_theme_css() {
    let manager = create_default_manager(SyntaxConfig::default())
      .expect("Failed to create default syntax manager");
    let css = manager.theme_css(None).expect("default theme should exist");
    assert!(css.contains(".hl-"));

    let nord = manager.theme_css(Some("nord")).expect("Nord should exist");
    assert!(!nord.is_empty());

    assert!(matches!(
      manager.theme_css(Some("NoSuchTheme")),
      Err(SyntaxError::ThemeNotFound(_))
    ));
  }

  #[cfg(feature = "syntect")]
  #[test]
  fn test_language_resolution() {
    let manager = create_default_manager(SyntaxConfig::default())
      .expect("Failed to create default syntax manager");

    assert_eq!(manager.resolve_language("js"), "javascript");
    assert_eq!(manager.resolve_language("py"), "python");
    assert_eq!(manager.resolve_language("rust"), "rust");

    assert!(manager.highlight_code("print(1)", Some("py")).is_ok());
    assert!(manager.highlight_code("plain words", Some("text")).is_ok());
  }

  #[cfg(not(feature = "syntect"))]
  #[test]
  fn test_no_backend() {
    assert!(matches!(
      create_default_manager(SyntaxConfig::default()),
      Err(SyntaxError::NoBackendAvailable)
    ));
  }
}
