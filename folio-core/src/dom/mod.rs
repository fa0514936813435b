//! In-memory HTML document tree.
//!
//! [`DocumentTree`] owns one parsed document and exposes the small set of
//! operations the post-processing passes need: typed queries, attribute and
//! inner-content access, wrapping a run of siblings in a container, and
//! serialization of the content root (`<body>`).
//!
//! Nodes are [`kuchikikiki::NodeRef`] handles. Per-node helpers live on the
//! [`NodeExt`] extension trait so passes can work with plain node handles.
pub mod error;
pub mod selector;

use kuchikikiki::{Attribute, ExpandedName, NodeRef};
use markup5ever::{LocalName, QualName, ns};
use tendril::TendrilSink;

pub use self::{
  error::{DomError, DomResult},
  selector::Selector,
};

/// A node in a [`DocumentTree`].
pub type Node = NodeRef;

/// A parsed HTML document with a designated content root.
pub struct DocumentTree {
  document: NodeRef,
  root:     NodeRef,
}

impl DocumentTree {
  /// Parse `html` into a new tree.
  ///
  /// Fragments are accepted and placed in an implied `<body>`, which becomes
  /// the content root.
  ///
  /// # Errors
  ///
  /// Returns [`DomError::ParseFailure`] if the parsed document has no
  /// `<body>` to act as content root (e.g. a `<frameset>` document).
  pub fn parse(html: &str) -> DomResult<Self> {
    let document = kuchikikiki::parse_html().one(html);
    let root = document
      .select_first("body")
      .map_err(|()| {
        DomError::ParseFailure("document has no <body> element".to_string())
      })?
      .as_node()
      .clone();

    Ok(Self { document, root })
  }

  /// The whole document, including `<html>` and `<head>`.
  #[must_use]
  pub const fn document(&self) -> &NodeRef {
    &self.document
  }

  /// The content root (`<body>`).
  #[must_use]
  pub const fn root(&self) -> &NodeRef {
    &self.root
  }

  /// All elements under the content root matched by `selector`, in document
  /// order. Never fails; no match yields an empty vector.
  #[must_use]
  pub fn query(&self, selector: &Selector) -> Vec<NodeRef> {
    self
      .root
      .descendants()
      .filter(|node| selector.matches(node))
      .collect()
  }

  /// Like [`query`](Self::query) but parses the selector from a string.
  ///
  /// # Errors
  ///
  /// Returns [`DomError::InvalidSelector`] for unsupported selector syntax.
  pub fn select(&self, selector: &str) -> DomResult<Vec<NodeRef>> {
    Ok(self.query(&selector.parse()?))
  }

  /// Move a contiguous run of sibling elements into a new container element
  /// placed where the run used to start, and return the container.
  ///
  /// Adjacency is judged between elements: text and comment nodes lying
  /// between two wrapped elements move into the container with them, so
  /// document order is preserved.
  ///
  /// # Errors
  ///
  /// Returns [`DomError::InvalidRange`] if `nodes` is empty, contains
  /// non-element nodes, does not belong to this tree, or is not a run of
  /// adjacent siblings.
  pub fn wrap_range(
    &self,
    nodes: &[NodeRef],
    container_tag: &str,
  ) -> DomResult<NodeRef> {
    let (Some(first), Some(last)) = (nodes.first(), nodes.last()) else {
      return Err(DomError::InvalidRange("empty node range".to_string()));
    };

    if container_tag.is_empty() {
      return Err(DomError::InvalidRange(
        "container tag must not be empty".to_string(),
      ));
    }

    if nodes.iter().any(|node| node.as_element().is_none()) {
      return Err(DomError::InvalidRange(
        "only element nodes can be wrapped".to_string(),
      ));
    }

    let attached = first.ancestors().any(|a| a == self.document);
    if first.parent().is_none() || !attached {
      return Err(DomError::InvalidRange(
        "range does not belong to this document".to_string(),
      ));
    }

    for pair in nodes.windows(2) {
      if pair[0].next_element_sibling().as_ref() != Some(&pair[1]) {
        return Err(DomError::InvalidRange(
          "nodes are not adjacent siblings".to_string(),
        ));
      }
    }

    // Everything between first and last, including interleaved text.
    let mut span = vec![first.clone()];
    let mut cursor = first.clone();
    while cursor != *last {
      cursor = cursor.next_sibling().ok_or_else(|| {
        DomError::InvalidRange("range ended before its last node".to_string())
      })?;
      span.push(cursor.clone());
    }

    let container = new_element(container_tag);
    first.insert_before(container.clone());
    for node in span {
      container.append(node);
    }

    Ok(container)
  }

  /// Serialize the content root's children back to HTML.
  ///
  /// # Errors
  ///
  /// Returns [`DomError::Serialize`] if the serializer fails.
  pub fn serialize(&self) -> DomResult<String> {
    self.root.inner_html()
  }

  /// Serialize the full document, `<html>` element included.
  ///
  /// # Errors
  ///
  /// Returns [`DomError::Serialize`] if the serializer fails.
  pub fn serialize_document(&self) -> DomResult<String> {
    let mut out = Vec::new();
    self.document.serialize(&mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
  }
}

/// Node-level helpers used by the post-processing passes.
pub trait NodeExt {
  /// Uppercase tag name, `None` for non-element nodes.
  fn tag_name(&self) -> Option<String>;

  /// Whether this is an element named `name` (case-insensitive).
  fn is_tag(&self, name: &str) -> bool;

  /// Level of a heading element (`1..=6`), `None` for anything else.
  fn heading_level(&self) -> Option<u8>;

  /// Value of an attribute, `None` when absent or not an element.
  fn attribute(&self, name: &str) -> Option<String>;

  /// Set an attribute. No-op on non-element nodes.
  fn set_attribute(&self, name: &str, value: &str);

  /// The next sibling that is an element, skipping text and comments.
  fn next_element_sibling(&self) -> Option<NodeRef>;

  /// All following sibling elements, in order.
  fn element_siblings_after(&self) -> Vec<NodeRef>;

  /// Serialized children of this node.
  ///
  /// # Errors
  ///
  /// Returns [`DomError::Serialize`] if the serializer fails.
  fn inner_html(&self) -> DomResult<String>;

  /// Replace all children with the nodes parsed from `html`.
  ///
  /// # Errors
  ///
  /// Returns [`DomError::ParseFailure`] if `html` cannot be parsed as a body
  /// fragment.
  fn set_inner_html(&self, html: &str) -> DomResult<()>;
}

impl NodeExt for NodeRef {
  fn tag_name(&self) -> Option<String> {
    self.as_element().map(|element| {
      let local: &str = element.name.local.as_ref();
      local.to_ascii_uppercase()
    })
  }

  fn is_tag(&self, name: &str) -> bool {
    self.as_element().is_some_and(|element| {
      let local: &str = element.name.local.as_ref();
      local.eq_ignore_ascii_case(name)
    })
  }

  fn heading_level(&self) -> Option<u8> {
    let element = self.as_element()?;
    let local: &str = element.name.local.as_ref();
    match local.to_ascii_lowercase().as_str() {
      "h1" => Some(1),
      "h2" => Some(2),
      "h3" => Some(3),
      "h4" => Some(4),
      "h5" => Some(5),
      "h6" => Some(6),
      _ => None,
    }
  }

  fn attribute(&self, name: &str) -> Option<String> {
    self.as_element().and_then(|element| {
      element
        .attributes
        .borrow()
        .get(name)
        .map(std::string::ToString::to_string)
    })
  }

  fn set_attribute(&self, name: &str, value: &str) {
    if let Some(element) = self.as_element() {
      element
        .attributes
        .borrow_mut()
        .insert(LocalName::from(name), value.to_string());
    }
  }

  fn next_element_sibling(&self) -> Option<NodeRef> {
    let mut cursor = self.next_sibling();
    while let Some(node) = cursor {
      if node.as_element().is_some() {
        return Some(node);
      }
      cursor = node.next_sibling();
    }
    None
  }

  fn element_siblings_after(&self) -> Vec<NodeRef> {
    let mut siblings = Vec::new();
    let mut cursor = self.next_element_sibling();
    while let Some(node) = cursor {
      cursor = node.next_element_sibling();
      siblings.push(node);
    }
    siblings
  }

  fn inner_html(&self) -> DomResult<String> {
    let mut out = Vec::new();
    for child in self.children() {
      child.serialize(&mut out)?;
    }
    Ok(String::from_utf8_lossy(&out).into_owned())
  }

  fn set_inner_html(&self, html: &str) -> DomResult<()> {
    let fragment = parse_fragment(html)?;

    let old_children: Vec<NodeRef> = self.children().collect();
    for child in old_children {
      child.detach();
    }
    for node in fragment {
      self.append(node);
    }

    Ok(())
  }
}

/// Parse an HTML fragment in body context and return its top-level nodes.
///
/// The explicit `<body>` start tag keeps leading whitespace, which matters for
/// code, from being dropped by the tree builder's pre-body insertion modes.
fn parse_fragment(html: &str) -> DomResult<Vec<NodeRef>> {
  let wrapped = format!("<body>{html}");
  let document = kuchikikiki::parse_html().one(wrapped.as_str());
  let body = document.select_first("body").map_err(|()| {
    DomError::ParseFailure("fragment did not produce a <body>".to_string())
  })?;

  Ok(body.as_node().children().collect())
}

fn new_element(tag: &str) -> NodeRef {
  NodeRef::new_element(
    QualName::new(None, ns!(html), LocalName::from(tag.to_ascii_lowercase())),
    Vec::<(ExpandedName, Attribute)>::new(),
  )
}
