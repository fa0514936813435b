//! Turn rendered Markdown into a navigable, print-friendly HTML page.
//!
//! The heart of this crate is a DOM post-processing pipeline run over the
//! HTML a Markdown renderer produced:
//!
//! - every `h2` gets a `#` permalink to its own `id`
//! - every `code` element is syntax highlighted
//! - every heading is wrapped, with the content that belongs to it, in a
//!   container that print stylesheets keep on one page
//!
//! # Examples
//!
//! ```
//! use folio_core::{PipelineOptions, PipelineRunner};
//!
//! let runner = PipelineRunner::new(PipelineOptions::default());
//! let html = runner.render("## Intro\n\nSome text.\n")?;
//!
//! assert!(html.starts_with("<div><h2 id=\"intro\">"));
//! assert!(html.contains(r##"<a href="#intro" name="intro">#</a>Intro"##));
//! # Ok::<(), folio_core::Error>(())
//! ```
//!
//! The passes can also be used on their own:
//!
//! ```
//! use folio_core::{dom::DocumentTree, postprocess::group_sections};
//!
//! let tree = DocumentTree::parse("<h2>A</h2><p>x</p><h2>B</h2>")?;
//! assert_eq!(group_sections(&tree)?, 2);
//! assert_eq!(
//!   tree.serialize()?,
//!   "<div><h2>A</h2><p>x</p></div><div><h2>B</h2></div>"
//! );
//! # Ok::<(), folio_core::dom::DomError>(())
//! ```
pub mod dom;
pub mod error;
pub mod markdown;
pub mod pipeline;
pub mod postprocess;
pub mod syntax;
pub mod utils;

pub use crate::{
  dom::{DocumentTree, DomError, NodeExt, Selector},
  error::{Error, Result},
  markdown::{ComrakRenderer, MarkdownRenderer, RenderError},
  pipeline::{
    PipelineOptions,
    PipelineOptionsBuilder,
    PipelineReport,
    PipelineRunner,
  },
  syntax::{HighlightService, SyntaxConfig, SyntaxError, SyntaxManager},
};
