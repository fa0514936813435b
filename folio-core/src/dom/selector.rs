//! Typed node selectors.
//!
//! The pipeline only ever needs tag-name queries plus the occasional
//! attribute match, so rather than carrying a full CSS selector engine the
//! supported forms are spelled out here:
//!
//! | Syntax          | Matches                                       |
//! |-----------------|-----------------------------------------------|
//! | `h2`            | elements named `h2` (case-insensitive)        |
//! | `:header`       | any of `h1` through `h6`                      |
//! | `[id]`          | any element with an `id` attribute            |
//! | `a[name]`       | `a` elements with a `name` attribute          |
//! | `a[name=intro]` | `a` elements whose `name` is exactly `intro`  |
use std::str::FromStr;

use kuchikikiki::NodeRef;

use super::{DomError, NodeExt};

/// A node selector understood by
/// [`DocumentTree::query`](super::DocumentTree::query).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
  /// Elements with the given tag name.
  Tag(String),

  /// Heading elements of any level.
  Heading,

  /// Elements carrying an attribute, optionally restricted by tag name and
  /// attribute value.
  Attribute {
    tag:   Option<String>,
    name:  String,
    value: Option<String>,
  },
}

impl Selector {
  /// Selector for a single tag name.
  #[must_use]
  pub fn tag(name: &str) -> Self {
    Self::Tag(name.to_ascii_lowercase())
  }

  /// Whether `node` is an element matched by this selector.
  #[must_use]
  pub fn matches(&self, node: &NodeRef) -> bool {
    match self {
      Self::Tag(tag) => node.is_tag(tag),
      Self::Heading => node.heading_level().is_some(),
      Self::Attribute { tag, name, value } => {
        if let Some(tag) = tag
          && !node.is_tag(tag)
        {
          return false;
        }
        match (node.attribute(name), value) {
          (Some(actual), Some(expected)) => actual == *expected,
          (Some(_), None) => true,
          (None, _) => false,
        }
      },
    }
  }
}

impl FromStr for Selector {
  type Err = DomError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let input = s.trim();
    let invalid = || DomError::InvalidSelector(s.to_string());

    if input.eq_ignore_ascii_case(":header") {
      return Ok(Self::Heading);
    }

    let Some(open) = input.find('[') else {
      return if is_valid_name(input) {
        Ok(Self::tag(input))
      } else {
        Err(invalid())
      };
    };

    let tag = &input[..open];
    let inner = input[open + 1..].strip_suffix(']').ok_or_else(invalid)?;
    let (name, value) = match inner.split_once('=') {
      Some((name, value)) => {
        let value = value.trim();
        let unquoted = value
          .strip_prefix('"')
          .and_then(|v| v.strip_suffix('"'))
          .or_else(|| {
            value.strip_prefix('\'').and_then(|v| v.strip_suffix('\''))
          })
          .unwrap_or(value);
        (name.trim(), Some(unquoted.to_string()))
      },
      None => (inner.trim(), None),
    };

    if !is_valid_name(name) || !(tag.is_empty() || is_valid_name(tag)) {
      return Err(invalid());
    }

    Ok(Self::Attribute {
      tag: (!tag.is_empty()).then(|| tag.to_ascii_lowercase()),
      name: name.to_ascii_lowercase(),
      value,
    })
  }
}

fn is_valid_name(name: &str) -> bool {
  let mut chars = name.chars();
  chars.next().is_some_and(|c| c.is_ascii_alphabetic())
    && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
