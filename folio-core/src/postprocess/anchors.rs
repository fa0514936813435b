//! Permalink anchors for second-level headings.
use log::trace;

use crate::dom::{DocumentTree, DomResult, NodeExt, Selector};

/// Markup that replaces an `h2`'s content: a `#` link to `id`, then the
/// heading's original text.
#[must_use]
pub fn anchor_markup(id: &str, text: &str) -> String {
  let id = html_escape::encode_double_quoted_attribute(id);
  format!(
    "<a href=\"#{id}\" name=\"{id}\">#</a>{}",
    html_escape::encode_text(text)
  )
}

/// Prepend a permalink to every `h2` in the tree, in document order.
///
/// A heading without an `id` links to `#`. Running this twice adds a second
/// link, because the first link's `#` becomes part of the heading text.
///
/// Returns the number of headings annotated.
///
/// # Errors
///
/// Returns [`DomError::ParseFailure`](crate::dom::DomError::ParseFailure) if
/// the generated markup cannot be parsed back into nodes.
pub fn annotate_anchors(tree: &DocumentTree) -> DomResult<usize> {
  let headings = tree.query(&Selector::tag("h2"));

  for heading in &headings {
    let id = heading.attribute("id").unwrap_or_default();
    let text = heading.text_contents();
    trace!("Anchoring heading '{text}' to #{id}");
    heading.set_inner_html(&anchor_markup(&id, &text))?;
  }

  Ok(headings.len())
}
