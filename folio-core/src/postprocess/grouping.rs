//! Print-friendly section grouping.
//!
//! Every heading is wrapped, together with some of the content that follows
//! it, in a container the stylesheet marks as `page-break-inside: avoid`. How
//! much content goes along is decided by comparing two runs of following
//! siblings:
//!
//! - *until pre*: everything before the next `pre`
//! - *until h2*: everything before the next `h2`
//!
//! If the first run is shorter, or the heading is an `h1`, the heading keeps
//! that run plus the node after it (normally the `pre` itself). Otherwise it
//! keeps everything up to the next `h2`.
//!
//! Headings are collected before anything is moved, then visited in document
//! order. A heading that an earlier group swallowed is grouped again among
//! its new siblings, so groups can nest.
use log::{debug, trace};

use crate::dom::{DocumentTree, DomResult, NodeExt, Selector};

/// Tag of the container created for each section.
pub const SECTION_TAG: &str = "div";

/// Number of following siblings a heading takes into its group.
///
/// `until_pre` and `until_h2` are the positions of the next `pre` and `h2`
/// among the `available` following siblings (`available` when absent).
#[must_use]
pub fn section_extent(
  until_pre: usize,
  until_h2: usize,
  is_h1: bool,
  available: usize,
) -> usize {
  if until_pre < until_h2 || is_h1 {
    (until_pre + 1).min(available)
  } else {
    until_h2
  }
}

/// Wrap every heading and its section in a [`SECTION_TAG`] container.
///
/// Returns the number of groups created, which equals the number of headings
/// in the tree.
///
/// # Errors
///
/// Propagates [`DomError::InvalidRange`](crate::dom::DomError::InvalidRange)
/// from [`DocumentTree::wrap_range`]; a correct extent never triggers it.
pub fn group_sections(tree: &DocumentTree) -> DomResult<usize> {
  let headings = tree.query(&Selector::Heading);

  for heading in &headings {
    let siblings = heading.element_siblings_after();
    let position_of = |tag: &str| {
      siblings
        .iter()
        .position(|node| node.is_tag(tag))
        .unwrap_or(siblings.len())
    };

    let until_pre = position_of("pre");
    let until_h2 = position_of("h2");
    let extent = section_extent(
      until_pre,
      until_h2,
      heading.heading_level() == Some(1),
      siblings.len(),
    );

    trace!(
      "Grouping {} with {extent} sibling(s) (until pre: {until_pre}, until \
       h2: {until_h2})",
      heading.tag_name().unwrap_or_default()
    );

    let mut run = Vec::with_capacity(extent + 1);
    run.push(heading.clone());
    run.extend_from_slice(&siblings[..extent]);
    tree.wrap_range(&run, SECTION_TAG)?;
  }

  debug!("Created {} section group(s)", headings.len());
  Ok(headings.len())
}
