//! DOM post-processing passes.
//!
//! Each pass takes the [`DocumentTree`](crate::dom::DocumentTree) by
//! reference, mutates it in place and returns how much work it did. The
//! passes are independent of each other; the fixed order they run in is
//! owned by [`PipelineRunner`](crate::pipeline::PipelineRunner).
pub mod anchors;
pub mod grouping;
pub mod highlight;

pub use self::{
  anchors::{annotate_anchors, anchor_markup},
  grouping::{SECTION_TAG, group_sections, section_extent},
  highlight::{HighlightStats, highlight_code, language_hint},
};
