//! Core types and traits for syntax highlighting.

use std::collections::HashMap;

use super::error::{SyntaxError, SyntaxResult};

/// Language token every backend must accept for unstyled text.
pub const PLAIN_TEXT: &str = "txt";

/// Trait for syntax highlighting backends.
///
/// Implementations produce class-based HTML markup suitable for use as the
/// inner content of a `<code>` element, with no wrapping `<pre>`.
pub trait SyntaxHighlighter: Send + Sync {
  /// Get the name of this highlighter backend
  fn name(&self) -> &'static str;

  /// Get a list of supported languages
  fn supported_languages(&self) -> Vec<String>;

  /// Get a list of available themes
  fn available_themes(&self) -> Vec<String>;

  /// Check if a language is supported
  fn supports_language(&self, language: &str) -> bool {
    self
      .supported_languages()
      .iter()
      .any(|lang| lang.eq_ignore_ascii_case(language))
  }

  /// Check if a theme is available
  fn has_theme(&self, theme: &str) -> bool {
    self
      .available_themes()
      .iter()
      .any(|t| t.eq_ignore_ascii_case(theme))
  }

  /// Highlight code as the given language.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] for unknown languages and
  /// [`SyntaxError::HighlightingFailed`] if the backend cannot tokenize the
  /// input.
  fn highlight(&self, code: &str, language: &str) -> SyntaxResult<String>;

  /// Guess the language of a snippet, `None` if nothing matches.
  fn detect_language(&self, code: &str) -> Option<String>;

  /// Stylesheet that colours this backend's markup using `theme`.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::ThemeNotFound`] for unknown theme names.
  fn theme_css(&self, theme: &str) -> SyntaxResult<String>;

  /// Detect language from a file extension
  fn language_from_extension(&self, extension: &str) -> Option<String>;
}

/// The highlighting capability the pipeline consumes.
///
/// `language_hint` is the language declared on the code node; `None` asks the
/// service to detect the language itself.
pub trait HighlightService {
  /// Produce marked-up HTML for `code`.
  ///
  /// # Errors
  ///
  /// Any [`SyntaxError`]; callers in the pipeline treat it as non-fatal.
  fn highlight(
    &self,
    code: &str,
    language_hint: Option<&str>,
  ) -> SyntaxResult<String>;
}

/// Configuration for syntax highlighting
#[derive(Debug, Clone)]
pub struct SyntaxConfig {
  /// Theme used for stylesheet generation when none is given
  pub default_theme: Option<String>,

  /// Language aliases for mapping common names to supported languages
  pub language_aliases: HashMap<String, String>,

  /// Whether to highlight unknown declared languages as plain text instead
  /// of failing
  pub fallback_to_plain: bool,
}

impl Default for SyntaxConfig {
  fn default() -> Self {
    let language_aliases = [
      ("js", "javascript"),
      ("ts", "typescript"),
      ("py", "python"),
      ("python3", "python"),
      ("rb", "ruby"),
      ("sh", "bash"),
      ("shell", "bash"),
      ("console", "bash"),
      ("yml", "yaml"),
      ("md", "markdown"),
      ("text", PLAIN_TEXT),
      ("plain", PLAIN_TEXT),
      ("plaintext", PLAIN_TEXT),
    ]
    .into_iter()
    .map(|(alias, language)| (alias.to_string(), language.to_string()))
    .collect();

    Self {
      default_theme: None,
      language_aliases,
      fallback_to_plain: false,
    }
  }
}

/// High-level syntax highlighting manager.
///
/// Wraps a backend with alias resolution, language detection and the
/// plain-text fallback policy. This is the [`HighlightService`] the pipeline
/// uses by default.
pub struct SyntaxManager {
  highlighter: Box<dyn SyntaxHighlighter>,
  config:      SyntaxConfig,
}

impl SyntaxManager {
  /// Create a new syntax manager with the given highlighter and config
  #[must_use]
  pub fn new(
    highlighter: Box<dyn SyntaxHighlighter>,
    config: SyntaxConfig,
  ) -> Self {
    Self {
      highlighter,
      config,
    }
  }

  /// Create a new syntax manager with the default configuration
  #[must_use]
  pub fn with_highlighter(highlighter: Box<dyn SyntaxHighlighter>) -> Self {
    Self::new(highlighter, SyntaxConfig::default())
  }

  /// Get the underlying highlighter
  #[must_use]
  pub fn highlighter(&self) -> &dyn SyntaxHighlighter {
    self.highlighter.as_ref()
  }

  /// Get the configuration
  #[must_use]
  pub const fn config(&self) -> &SyntaxConfig {
    &self.config
  }

  /// Update the configuration
  pub fn set_config(&mut self, config: SyntaxConfig) {
    self.config = config;
  }

  /// Resolve a language name using aliases
  #[must_use]
  pub fn resolve_language(&self, language: &str) -> String {
    let language = language.to_ascii_lowercase();
    self
      .config
      .language_aliases
      .get(&language)
      .cloned()
      .unwrap_or(language)
  }

  /// Highlight code with alias resolution, detection and fallback.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::UnsupportedLanguage`] when the declared language
  /// is unknown and plain-text fallback is disabled, or any backend error.
  pub fn highlight_code(
    &self,
    code: &str,
    language: Option<&str>,
  ) -> SyntaxResult<String> {
    let Some(language) = language else {
      let first_line = code.lines().next().unwrap_or_default();
      let detected = self
        .highlighter
        .detect_language(first_line)
        .unwrap_or_else(|| PLAIN_TEXT.to_string());
      return self.highlighter.highlight(code, &detected);
    };

    let resolved_language = self.resolve_language(language);
    if self.highlighter.supports_language(&resolved_language) {
      return self.highlighter.highlight(code, &resolved_language);
    }

    if self.config.fallback_to_plain {
      return self.highlighter.highlight(code, PLAIN_TEXT);
    }

    Err(SyntaxError::UnsupportedLanguage(resolved_language))
  }

  /// Highlight code, picking the language from a filename
  ///
  /// # Errors
  ///
  /// Same as [`highlight_code`](Self::highlight_code).
  pub fn highlight_from_filename(
    &self,
    code: &str,
    filename: &str,
  ) -> SyntaxResult<String> {
    let language = std::path::Path::new(filename)
      .extension()
      .and_then(|ext| ext.to_str())
      .and_then(|ext| self.highlighter.language_from_extension(ext));
    self.highlight_code(code, Some(language.as_deref().unwrap_or(PLAIN_TEXT)))
  }

  /// Stylesheet for `theme`, or for the configured default theme.
  ///
  /// # Errors
  ///
  /// Returns [`SyntaxError::ThemeNotFound`] if no theme is given or
  /// configured, or the backend does not know it.
  pub fn theme_css(&self, theme: Option<&str>) -> SyntaxResult<String> {
    let theme = theme
      .or(self.config.default_theme.as_deref())
      .ok_or_else(|| SyntaxError::ThemeNotFound(String::new()))?;
    self.highlighter.theme_css(theme)
  }
}

impl HighlightService for SyntaxManager {
  fn highlight(
    &self,
    code: &str,
    language_hint: Option<&str>,
  ) -> SyntaxResult<String> {
    self.highlight_code(code, language_hint)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Backend that knows `rust` and plain text and tags its output.
  struct TaggingHighlighter;

  impl SyntaxHighlighter for TaggingHighlighter {
    fn name(&self) -> &'static str {
      "Tagging"
    }

    fn supported_languages(&self) -> Vec<String> {
      vec!["rust".to_string(), PLAIN_TEXT.to_string()]
    }

    fn available_themes(&self) -> Vec<String> {
      vec!["mono".to_string()]
    }

    fn highlight(&self, code: &str, language: &str) -> SyntaxResult<String> {
      Ok(format!("<span class=\"{language}\">{code}</span>"))
    }

    fn detect_language(&self, code: &str) -> Option<String> {
      code.starts_with("fn ").then(|| "rust".to_string())
    }

    fn theme_css(&self, theme: &str) -> SyntaxResult<String> {
      if self.has_theme(theme) {
        Ok(format!("/* {theme} */"))
      } else {
        Err(SyntaxError::ThemeNotFound(theme.to_string()))
      }
    }

    fn language_from_extension(&self, extension: &str) -> Option<String> {
      (extension == "rs").then(|| "rust".to_string())
    }
  }

  fn manager(fallback_to_plain: bool) -> SyntaxManager {
    SyntaxManager::new(Box::new(TaggingHighlighter), SyntaxConfig {
      fallback_to_plain,
      ..Default::default()
    })
  }

  #[test]
  fn test_syntax_config_default() {
    let config = SyntaxConfig::default();
    assert!(!config.fallback_to_plain);
    assert_eq!(config.language_aliases["js"], "javascript");
    assert_eq!(config.language_aliases["text"], PLAIN_TEXT);
  }

  #[test]
  fn test_resolve_language_is_case_insensitive() {
    let manager = manager(false);
    assert_eq!(manager.resolve_language("JS"), "javascript");
    assert_eq!(manager.resolve_language("Rust"), "rust");
  }

  #[test]
  fn test_declared_language_is_used() {
    let html = manager(false).highlight_code("let x;", Some("rust")).unwrap();
    assert_eq!(html, "<span class=\"rust\">let x;</span>");
  }

  #[test]
  fn test_missing_hint_detects_language() {
    let manager = manager(false);
    assert_eq!(
      manager.highlight_code("fn main() {}", None).unwrap(),
      "<span class=\"rust\">fn main() {}</span>"
    );
    assert_eq!(
      manager.highlight_code("hello", None).unwrap(),
      "<span class=\"txt\">hello</span>"
    );
  }

  #[test]
  fn test_unknown_language_fails_without_fallback() {
    let result = manager(false).highlight_code("x", Some("brainfuck"));
    assert!(matches!(result, Err(SyntaxError::UnsupportedLanguage(l)) if l == "brainfuck"));
  }

  #[test]
  fn test_unknown_language_falls_back_to_plain() {
    let html = manager(true).highlight_code("x", Some("brainfuck")).unwrap();
    assert_eq!(html, "<span class=\"txt\">x</span>");
  }

  #[test]
  fn test_text_alias_maps_to_plain() {
    let html = manager(false).highlight_code("x", Some("text")).unwrap();
    assert_eq!(html, "<span class=\"txt\">x</span>");
  }

  #[test]
  fn test_highlight_from_filename() {
    let manager = manager(false);
    assert_eq!(
      manager.highlight_from_filename("x", "main.rs").unwrap(),
      "<span class=\"rust\">x</span>"
    );
    assert_eq!(
      manager.highlight_from_filename("x", "notes").unwrap(),
      "<span class=\"txt\">x</span>"
    );
  }

  #[test]
  fn test_theme_css_uses_default_theme() {
    let mut manager = manager(false);
    assert!(matches!(
      manager.theme_css(None),
      Err(SyntaxError::ThemeNotFound(_))
    ));

    manager.set_config(SyntaxConfig {
      default_theme: Some("mono".to_string()),
      ..Default::default()
    });
    assert_eq!(manager.theme_css(None).unwrap(), "/* mono */");
    assert!(manager.theme_css(Some("neon")).is_err());
  }
}
