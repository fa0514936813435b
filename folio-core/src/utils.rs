//! Small helpers shared by the renderer and the post-processing passes.
use regex::Regex;

/// Slugify a string for use as an anchor ID.
///
/// Lowercases, turns every run of characters other than alphanumerics and `_`
/// into a single dash, and trims leading/trailing dashes.
#[must_use]
pub fn slugify(text: &str) -> String {
  let mut slug = String::with_capacity(text.len());
  for c in text.chars().flat_map(char::to_lowercase) {
    if c.is_alphanumeric() || c == '_' {
      slug.push(c);
    } else if !slug.ends_with('-') {
      slug.push('-');
    }
  }
  slug.trim_matches('-').to_string()
}

/// A regex that matches nothing, used when a static pattern fails to compile.
#[must_use]
pub fn never_matching_regex() -> Regex {
  #[allow(
    clippy::expect_used,
    reason = "This pattern is guaranteed to be valid"
  )]
  Regex::new(r"[^\s\S]").expect("regex pattern [^\\s\\S] should always compile")
}
