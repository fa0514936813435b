//! Markdown to HTML conversion.
//!
//! [`MarkdownRenderer`] is the capability the pipeline consumes;
//! [`ComrakRenderer`] is the default implementation. Besides plain
//! conversion it gives every heading an `id` so that the anchor pass has a
//! target to link to.
use std::{
  collections::HashSet,
  panic::{AssertUnwindSafe, catch_unwind},
  sync::LazyLock,
};

use comrak::options::Options;
use kuchikikiki::NodeRef;
use regex::Regex;

use crate::{
  dom::{DocumentTree, DomError, NodeExt, Selector},
  utils,
};

/// Errors produced by a [`MarkdownRenderer`].
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
  #[error("Markdown rendering failed: {0}")]
  Failed(String),

  #[error(transparent)]
  Dom(#[from] DomError),
}

/// Converts Markdown text to HTML.
pub trait MarkdownRenderer {
  /// Render `markdown` to an HTML fragment.
  ///
  /// # Errors
  ///
  /// Returns a [`RenderError`] if conversion fails; the pipeline treats this
  /// as fatal.
  fn render(&self, markdown: &str) -> Result<String, RenderError>;
}

/// Markdown renderer backed by comrak.
#[derive(Debug, Clone, Copy)]
pub struct ComrakRenderer {
  gfm:         bool,
  heading_ids: bool,
}

impl Default for ComrakRenderer {
  fn default() -> Self {
    Self {
      gfm:         true,
      heading_ids: true,
    }
  }
}

impl ComrakRenderer {
  /// Create a renderer, optionally with GitHub Flavored Markdown extensions.
  #[must_use]
  pub const fn new(gfm: bool) -> Self {
    Self {
      gfm,
      heading_ids: true,
    }
  }

  /// Enable or disable `id` generation for headings.
  #[must_use]
  pub const fn with_heading_ids(mut self, enabled: bool) -> Self {
    self.heading_ids = enabled;
    self
  }

  /// Build comrak options from the renderer settings.
  fn comrak_options(&self) -> Options<'_> {
    let mut options = Options::default();
    if self.gfm {
      options.extension.table = true;
      options.extension.footnotes = true;
      options.extension.strikethrough = true;
      options.extension.tasklist = true;
      options.extension.autolink = true;
    }
    options.render.r#unsafe = true;
    // Ids go on the heading element itself, see `assign_heading_ids`
    options.extension.header_id_prefix = None;
    options
  }
}

impl MarkdownRenderer for ComrakRenderer {
  fn render(&self, markdown: &str) -> Result<String, RenderError> {
    let options = self.comrak_options();
    let html = catch_unwind(AssertUnwindSafe(|| {
      comrak::markdown_to_html(markdown, &options)
    }))
    .map_err(|panic_err| {
      let reason = panic_err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic_err.downcast_ref::<&str>().map(|s| (*s).to_string()))
        .unwrap_or_else(|| "unknown panic in comrak".to_string());
      RenderError::Failed(reason)
    })?;

    if !self.heading_ids {
      return Ok(html);
    }

    let tree = DocumentTree::parse(&html)?;
    let assigned = assign_heading_ids(&tree);
    log::trace!("Assigned {assigned} heading id(s)");
    Ok(tree.serialize()?)
  }
}

/// Give every heading in `tree` a unique `id` and return how many headings
/// carry one afterwards.
///
/// Explicit ids come first: an `id` attribute already on the element, or a
/// trailing `{#custom-id}` in the heading text, which is removed from the
/// text. All explicit ids are reserved before any slug is issued, so a
/// generated id never takes a name the author chose. Remaining headings get
/// the slug of their text. Any duplicate gets a `-1`, `-2`, ... suffix.
/// Headings whose text slugifies to nothing are left without an id.
pub fn assign_heading_ids(tree: &DocumentTree) -> usize {
  let mut used = HashSet::new();
  let mut assigned = 0;
  let mut unnamed = Vec::new();

  for heading in tree.query(&Selector::Heading) {
    let Some(id) = explicit_id(&heading) else {
      unnamed.push(heading);
      continue;
    };

    let unique = unique_id(&mut used, &id);
    if unique != id {
      log::warn!("Duplicate heading id '{id}', renamed to '{unique}'");
    }
    heading.set_attribute("id", &unique);
    assigned += 1;
  }

  for heading in unnamed {
    let id = unique_id(&mut used, &utils::slugify(&heading.text_contents()));
    if !id.is_empty() {
      heading.set_attribute("id", &id);
      assigned += 1;
    }
  }

  assigned
}

/// Id chosen in the markup, if any. A `{#id}` marker is stripped from the
/// heading's last text node.
fn explicit_id(heading: &NodeRef) -> Option<String> {
  static EXPLICIT_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\{#([A-Za-z0-9_-]+)\}\s*$").unwrap_or_else(|e| {
      log::error!("Failed to compile EXPLICIT_ID_RE regex: {e}");
      utils::never_matching_regex()
    })
  });

  if let Some(id) = heading.attribute("id").filter(|id| !id.is_empty()) {
    return Some(id);
  }

  let text_node = heading
    .descendants()
    .rev()
    .find(|node| node.as_text().is_some())?;
  let text = text_node.as_text()?;

  let (id, emptied) = {
    let mut content = text.borrow_mut();
    let (id, start) = {
      let caps = EXPLICIT_ID_RE.captures(&content)?;
      let start = caps.get(0).map_or(content.len(), |m| m.start());
      (caps[1].to_string(), start)
    };
    content.truncate(start);
    (id, content.is_empty())
  };

  if emptied {
    text_node.detach();
  }
  Some(id)
}

fn unique_id(used: &mut HashSet<String>, base: &str) -> String {
  if base.is_empty() {
    return String::new();
  }

  let mut candidate = base.to_string();
  let mut suffix = 1;
  while used.contains(&candidate) {
    candidate = format!("{base}-{suffix}");
    suffix += 1;
  }
  used.insert(candidate.clone());
  candidate
}

#[cfg(test)]
mod tests {
  use super::*;

  fn render(markdown: &str) -> String {
    ComrakRenderer::default().render(markdown).unwrap()
  }

  #[test]
  fn test_heading_gets_slug_id() {
    let html = render("## Intro\n\ntext\n");
    assert!(html.contains("<h2 id=\"intro\">Intro</h2>"));
    assert!(html.contains("<p>text</p>"));
  }

  #[test]
  fn test_heading_id_uses_plain_text() {
    let html = render("# The `main` *function* &amp; you\n");
    assert!(
      html.contains("<h1 id=\"the-main-function-you\">"),
      "unexpected html: {html}"
    );
    assert!(html.contains("<code>main</code>"));
  }

  #[test]
  fn test_duplicate_headings_get_unique_ids() {
    let html = render("## Part\n\n## Part\n\n## Part\n");
    assert!(html.contains("<h2 id=\"part\">"));
    assert!(html.contains("<h2 id=\"part-1\">"));
    assert!(html.contains("<h2 id=\"part-2\">"));
  }

  #[test]
  fn test_explicit_heading_id() {
    let html = render("## Getting started {#start}\n");
    assert!(html.contains("<h2 id=\"start\">Getting started</h2>"));
  }

  #[test]
  fn test_explicit_id_after_inline_markup() {
    let html = render("## Call `main` {#entry}\n");
    assert!(
      html.contains("<h2 id=\"entry\">Call <code>main</code></h2>"),
      "unexpected html: {html}"
    );
  }

  #[test]
  fn test_explicit_id_is_reserved_before_slugs() {
    let html = render("## Start\n\n## Other {#start}\n");
    assert!(html.contains("<h2 id=\"start-1\">Start</h2>"));
    assert!(html.contains("<h2 id=\"start\">Other</h2>"));
  }

  #[test]
  fn test_repeated_explicit_id_is_renamed() {
    let html = render("## One {#same}\n\n## Two {#same}\n");
    assert!(html.contains("<h2 id=\"same\">One</h2>"));
    assert!(html.contains("<h2 id=\"same-1\">Two</h2>"));
  }

  #[test]
  fn test_raw_html_heading_gets_id() {
    let html = render("<h2 class=\"x\">Raw</h2>\n");
    assert!(
      html.contains("<h2 class=\"x\" id=\"raw\">Raw</h2>"),
      "unexpected html: {html}"
    );
  }

  #[test]
  fn test_raw_html_heading_keeps_its_id() {
    let html = render("<h2 id=\"mine\">Raw</h2>\n\n## Mine\n");
    assert!(html.contains("<h2 id=\"mine\">Raw</h2>"));
    assert!(html.contains("<h2 id=\"mine-1\">Mine</h2>"));
  }

  #[test]
  fn test_heading_without_text_has_no_id() {
    let tree = DocumentTree::parse("<h3>!!!</h3>").unwrap();
    assert_eq!(assign_heading_ids(&tree), 0);
    assert_eq!(tree.serialize().unwrap(), "<h3>!!!</h3>");
  }

  #[test]
  fn test_assign_heading_ids_counts_headings() {
    let tree =
      DocumentTree::parse("<h1>A</h1><p>x</p><h2>B</h2><h3></h3>").unwrap();
    assert_eq!(assign_heading_ids(&tree), 2);
  }

  #[test]
  fn test_heading_ids_can_be_disabled() {
    let html = ComrakRenderer::default()
      .with_heading_ids(false)
      .render("## Intro\n")
      .unwrap();
    assert!(html.contains("<h2>Intro</h2>"));
  }

  #[test]
  fn test_fenced_code_keeps_language_class() {
    let html = render("```rust\nfn main() {}\n```\n");
    assert!(html.contains("<pre><code class=\"language-rust\">"));
  }

  #[test]
  fn test_gfm_tables() {
    let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
    assert!(html.contains("<table>"));

    let plain = ComrakRenderer::new(false)
      .render("| a | b |\n|---|---|\n| 1 | 2 |\n")
      .unwrap();
    assert!(!plain.contains("<table>"));
  }
}
