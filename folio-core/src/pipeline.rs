//! The post-processing pipeline.
//!
//! [`PipelineRunner::run`] parses rendered HTML into a
//! [`DocumentTree`], applies the enabled passes in a fixed order and
//! serializes the content root:
//!
//! 1. [`annotate_anchors`]
//! 2. [`highlight_code`]
//! 3. [`group_sections`]
//!
//! Grouping comes last because it restructures sibling chains; the earlier
//! passes only need their nodes to exist.
use log::debug;

use crate::{
  dom::DocumentTree,
  error::Result,
  markdown::{ComrakRenderer, MarkdownRenderer},
  postprocess::{
    HighlightStats,
    annotate_anchors,
    group_sections,
    highlight_code,
  },
  syntax::{HighlightService, SyntaxConfig, create_default_manager},
};

/// Which passes a [`PipelineRunner`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "One switch per pipeline pass"
)]
pub struct PipelineOptions {
  /// Prepend permalinks to `h2` headings.
  pub annotate_anchors: bool,

  /// Highlight code nodes.
  pub highlight_code: bool,

  /// Also highlight `code` outside of `pre`.
  pub highlight_inline: bool,

  /// Wrap headings and their sections in print-safe groups.
  pub group_sections: bool,
}

impl Default for PipelineOptions {
  fn default() -> Self {
    Self {
      annotate_anchors: true,
      highlight_code:   true,
      highlight_inline: true,
      group_sections:   true,
    }
  }
}

/// Builder for [`PipelineOptions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptionsBuilder {
  options: PipelineOptions,
}

impl PipelineOptionsBuilder {
  /// Create a new builder with every pass enabled.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  #[must_use]
  pub const fn annotate_anchors(mut self, enabled: bool) -> Self {
    self.options.annotate_anchors = enabled;
    self
  }

  #[must_use]
  pub const fn highlight_code(mut self, enabled: bool) -> Self {
    self.options.highlight_code = enabled;
    self
  }

  #[must_use]
  pub const fn highlight_inline(mut self, enabled: bool) -> Self {
    self.options.highlight_inline = enabled;
    self
  }

  #[must_use]
  pub const fn group_sections(mut self, enabled: bool) -> Self {
    self.options.group_sections = enabled;
    self
  }

  /// Build the final `PipelineOptions`.
  #[must_use]
  pub const fn build(self) -> PipelineOptions {
    self.options
  }
}

/// What a pipeline run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineReport {
  /// Headings that received a permalink.
  pub anchors: usize,

  /// Highlighting outcome.
  pub highlight: HighlightStats,

  /// Section groups created.
  pub groups: usize,
}

/// Runs the post-processing passes over rendered HTML.
pub struct PipelineRunner {
  options:     PipelineOptions,
  highlighter: Option<Box<dyn HighlightService>>,
  renderer:    Box<dyn MarkdownRenderer>,
}

impl PipelineRunner {
  /// Create a runner using the default highlighting backend and
  /// [`ComrakRenderer`].
  ///
  /// If no highlighting backend is compiled in, code nodes are left alone.
  #[must_use]
  pub fn new(options: PipelineOptions) -> Self {
    let highlighter = match create_default_manager(SyntaxConfig::default()) {
      Ok(manager) => Some(Box::new(manager) as Box<dyn HighlightService>),
      Err(e) => {
        debug!("Syntax highlighting unavailable: {e}");
        None
      },
    };

    Self {
      options,
      highlighter,
      renderer: Box::new(ComrakRenderer::default()),
    }
  }

  /// Use `highlighter` for code nodes.
  #[must_use]
  pub fn with_highlighter(
    mut self,
    highlighter: Box<dyn HighlightService>,
  ) -> Self {
    self.highlighter = Some(highlighter);
    self
  }

  /// Drop the highlighting service; code nodes are left alone.
  #[must_use]
  pub fn without_highlighter(mut self) -> Self {
    self.highlighter = None;
    self
  }

  /// Use `renderer` for [`render`](Self::render).
  #[must_use]
  pub fn with_renderer(mut self, renderer: Box<dyn MarkdownRenderer>) -> Self {
    self.renderer = renderer;
    self
  }

  /// Get the options.
  #[must_use]
  pub const fn options(&self) -> &PipelineOptions {
    &self.options
  }

  /// Post-process `html` and return the serialized content root.
  ///
  /// # Errors
  ///
  /// Returns an error if `html` cannot be parsed or a pass fails
  /// structurally. Highlighting failures on single nodes are not errors.
  pub fn run(&self, html: &str) -> Result<String> {
    self.run_with_report(html).map(|(output, _)| output)
  }

  /// Like [`run`](Self::run), also returning what each pass did.
  ///
  /// # Errors
  ///
  /// Same as [`run`](Self::run).
  pub fn run_with_report(
    &self,
    html: &str,
  ) -> Result<(String, PipelineReport)> {
    let tree = DocumentTree::parse(html)?;
    let mut report = PipelineReport::default();

    if self.options.annotate_anchors {
      report.anchors = annotate_anchors(&tree)?;
      debug!("Annotated {} heading(s)", report.anchors);
    }

    if self.options.highlight_code {
      if let Some(highlighter) = &self.highlighter {
        report.highlight = highlight_code(
          &tree,
          highlighter.as_ref(),
          self.options.highlight_inline,
        )?;
        debug!(
          "Highlighted {} code node(s), {} failed, {} skipped",
          report.highlight.highlighted,
          report.highlight.failed,
          report.highlight.skipped
        );
      } else {
        debug!("No highlighter configured, skipping code highlighting");
      }
    }

    if self.options.group_sections {
      report.groups = group_sections(&tree)?;
    }

    Ok((tree.serialize()?, report))
  }

  /// Render `markdown` to HTML, then [`run`](Self::run) the passes on it.
  ///
  /// # Errors
  ///
  /// Returns [`Error::Render`](crate::Error::Render) if the renderer fails,
  /// otherwise the same as [`run`](Self::run).
  pub fn render(&self, markdown: &str) -> Result<String> {
    self.render_with_report(markdown).map(|(output, _)| output)
  }

  /// Like [`render`](Self::render), also returning what each pass did.
  ///
  /// # Errors
  ///
  /// Same as [`render`](Self::render).
  pub fn render_with_report(
    &self,
    markdown: &str,
  ) -> Result<(String, PipelineReport)> {
    let html = self.renderer.render(markdown)?;
    self.run_with_report(&html)
  }
}

impl Default for PipelineRunner {
  fn default() -> Self {
    Self::new(PipelineOptions::default())
  }
}
