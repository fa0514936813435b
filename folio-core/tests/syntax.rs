//! Integration tests for syntax highlighting through the pipeline.
#![cfg(feature = "syntect")]

use folio_core::{
  PipelineRunner,
  SyntaxConfig,
  SyntaxError,
  syntax::{
    DEFAULT_THEME,
    SyntaxHighlighter,
    SyntectHighlighter,
    create_default_manager,
  },
};

#[test]
fn test_fenced_blocks_are_highlighted() {
  let markdown = r#"
# Test Document

Here's some Rust code:

```rust
fn main() {
    println!("Hello, world!");
}
```

And some JavaScript:

```js
function greet(name) {
    console.log(`Hello, ${name}!`);
}
```
"#;

  let html = PipelineRunner::default().render(markdown).unwrap();

  assert!(html.contains("<span class=\"hl-"));
  assert!(html.contains("println"));
  assert!(html.contains("greet"));
  // Highlighting never introduces a nested <pre>
  assert_eq!(html.matches("<pre").count(), 2);
  // Leading indentation survives highlighting
  assert!(html.contains("    "));
}

#[test]
fn test_unknown_language_is_left_alone() {
  let markdown = "```klingon\nnuqneH\n```\n";
  let html = PipelineRunner::default().render(markdown).unwrap();

  assert_eq!(
    html,
    "<pre><code class=\"language-klingon\">nuqneH\n</code></pre>\n"
  );
}

#[test]
fn test_fallback_highlights_unknown_language_as_text() {
  let manager = create_default_manager(SyntaxConfig {
    fallback_to_plain: true,
    ..Default::default()
  })
  .unwrap();

  let html = manager.highlight_code("nuqneH", Some("klingon")).unwrap();
  assert!(html.contains("nuqneH"));
  assert!(html.contains("<span class=\"hl-"));
}

#[test]
fn test_default_theme_css() {
  let manager = create_default_manager(SyntaxConfig::default()).unwrap();
  assert_eq!(manager.config().default_theme.as_deref(), Some(DEFAULT_THEME));

  let css = manager.theme_css(None).unwrap();
  assert!(css.contains(".hl-"));

  assert!(matches!(
    manager.theme_css(Some("does-not-exist")),
    Err(SyntaxError::ThemeNotFound(_))
  ));
}

#[test]
fn test_supports_language_by_name_or_extension() {
  let highlighter = SyntectHighlighter;

  for token in ["rust", "Rust", "rs", "RS", "js", "python"] {
    assert!(highlighter.supports_language(token), "{token} not supported");
  }
  assert!(!highlighter.supports_language("klingon"));

  let listed = highlighter.supported_languages();
  assert!(listed.iter().any(|lang| lang == "rust"));
  assert!(!listed.iter().any(|lang| lang == "klingon"));
}
