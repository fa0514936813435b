//! Syntax highlighting of `code` elements.
use log::{trace, warn};

use crate::{
  dom::{DocumentTree, DomResult, NodeExt, Selector},
  syntax::HighlightService,
};

/// Outcome of a highlighting pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightStats {
  /// Code nodes whose content was replaced.
  pub highlighted: usize,

  /// Code nodes the service refused; they keep their original content.
  pub failed: usize,

  /// Inline code nodes passed over because inline highlighting is off.
  pub skipped: usize,
}

/// Language declared on a code node through a `language-xxx` or `lang-xxx`
/// class.
#[must_use]
pub fn language_hint(class: &str) -> Option<&str> {
  class
    .split_whitespace()
    .find_map(|c| {
      c.strip_prefix("language-")
        .or_else(|| c.strip_prefix("lang-"))
    })
    .filter(|lang| !lang.is_empty())
}

/// Replace the content of every `code` element with the service's markup.
///
/// With `inline` unset only `code` elements directly inside a `pre` are
/// touched. A service failure is logged and leaves that node as it was.
///
/// # Errors
///
/// Returns [`DomError::ParseFailure`](crate::dom::DomError::ParseFailure) if
/// the service's markup cannot be parsed back into nodes.
pub fn highlight_code(
  tree: &DocumentTree,
  service: &dyn HighlightService,
  inline: bool,
) -> DomResult<HighlightStats> {
  let mut stats = HighlightStats::default();

  for code in tree.query(&Selector::tag("code")) {
    let in_block = code.parent().is_some_and(|parent| parent.is_tag("pre"));
    if !inline && !in_block {
      stats.skipped += 1;
      continue;
    }

    let class = code.attribute("class").unwrap_or_default();
    let language = language_hint(&class);
    let source = code.text_contents();

    match service.highlight(&source, language) {
      Ok(markup) => {
        trace!(
          "Highlighted code block as {}",
          language.unwrap_or("<detected>")
        );
        code.set_inner_html(&markup)?;
        stats.highlighted += 1;
      },
      Err(e) => {
        warn!(
          "Leaving code block unhighlighted ({}): {e}",
          language.unwrap_or("no language")
        );
        stats.failed += 1;
      },
    }
  }

  Ok(stats)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::syntax::{SyntaxError, SyntaxResult};

  /// Knows `rust` only and wraps the code in a marker span.
  struct RustOnly;

  impl HighlightService for RustOnly {
    fn highlight(
      &self,
      code: &str,
      language_hint: Option<&str>,
    ) -> SyntaxResult<String> {
      match language_hint {
        Some("rust") | None => {
          Ok(format!(
            "<span class=\"hl\">{}</span>",
            html_escape::encode_text(code)
          ))
        },
        Some(other) => Err(SyntaxError::UnsupportedLanguage(other.to_string())),
      }
    }
  }

  #[test]
  fn test_language_hint() {
    assert_eq!(language_hint("language-rust"), Some("rust"));
    assert_eq!(language_hint("numbered lang-nix"), Some("nix"));
    assert_eq!(language_hint("language-"), None);
    assert_eq!(language_hint("highlight"), None);
    assert_eq!(language_hint(""), None);
  }

  #[test]
  fn test_block_is_highlighted() {
    let tree = DocumentTree::parse(
      "<pre><code class=\"language-rust\">let a = 1 &lt; 2;\n</code></pre>",
    )
    .unwrap();

    let stats = highlight_code(&tree, &RustOnly, true).unwrap();
    assert_eq!(stats, HighlightStats {
      highlighted: 1,
      failed:      0,
      skipped:     0,
    });
    assert_eq!(
      tree.serialize().unwrap(),
      "<pre><code class=\"language-rust\"><span class=\"hl\">let a = 1 &lt; \
       2;\n</span></code></pre>"
    );
  }

  #[test]
  fn test_failure_leaves_content_untouched() {
    let html = "<p>before</p><pre><code class=\"language-cobol\">  MOVE A TO \
                B.\n</code></pre><p>after</p>";
    let tree = DocumentTree::parse(html).unwrap();

    let stats = highlight_code(&tree, &RustOnly, true).unwrap();
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.highlighted, 0);
    assert_eq!(tree.serialize().unwrap(), html);
  }

  #[test]
  fn test_failure_does_not_stop_later_nodes() {
    let tree = DocumentTree::parse(
      "<pre><code class=\"language-cobol\">x</code></pre><pre><code \
       class=\"language-rust\">y</code></pre>",
    )
    .unwrap();

    let stats = highlight_code(&tree, &RustOnly, true).unwrap();
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.highlighted, 1);
    assert!(tree.serialize().unwrap().contains("<span class=\"hl\">y</span>"));
  }

  #[test]
  fn test_inline_code_can_be_skipped() {
    let html = "<p>Call <code>main</code> first.</p><pre><code>fn \
                main() {}</code></pre>";

    let tree = DocumentTree::parse(html).unwrap();
    let stats = highlight_code(&tree, &RustOnly, false).unwrap();
    assert_eq!(stats.highlighted, 1);
    assert_eq!(stats.skipped, 1);
    assert!(tree.serialize().unwrap().contains("<code>main</code>"));

    let tree = DocumentTree::parse(html).unwrap();
    let stats = highlight_code(&tree, &RustOnly, true).unwrap();
    assert_eq!(stats.highlighted, 2);
    assert_eq!(stats.skipped, 0);
  }
}
