//! Rendering a document to a page on disk.
use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result};
use folio_core::{PipelineRunner, syntax::create_default_manager};
use log::{info, warn};

use crate::{config::Config, postprocess::process_html, template};

/// Build a pipeline runner for `config`.
///
/// A missing highlighting backend is not fatal; code is left as it is.
#[must_use]
pub fn build_runner(config: &Config) -> PipelineRunner {
  let runner = PipelineRunner::new(config.pipeline_options());
  if !config.highlight_code {
    return runner.without_highlighter();
  }

  match create_default_manager(config.syntax_config()) {
    Ok(manager) => runner.with_highlighter(Box::new(manager)),
    Err(e) => {
      warn!("Syntax highlighting disabled: {e}");
      runner.without_highlighter()
    },
  }
}

/// Render `markdown` into a complete page using the configured template.
///
/// # Errors
///
/// Returns an error if the pipeline fails, the template cannot be read or
/// lacks the placeholder.
pub fn render_document(markdown: &str, config: &Config) -> Result<String> {
  let runner = build_runner(config);
  let (body, report) = runner
    .render_with_report(markdown)
    .wrap_err("Failed to render document")?;

  log::debug!(
    "Pipeline: {} anchor(s), {} highlighted, {} unhighlighted, {} group(s)",
    report.anchors,
    report.highlight.highlighted,
    report.highlight.failed,
    report.groups
  );

  let template_source =
    template::load(config.template.as_deref()).wrap_err_with(|| {
      format!(
        "Failed to read template: {}",
        config
          .template
          .as_deref()
          .unwrap_or_else(|| Path::new("<built-in>"))
          .display()
      )
    })?;

  let page = template::splice(&template_source, &config.placeholder, &body)?;
  process_html(&page, config)
}

/// Stylesheet for `theme`, or the configured theme, or the backend's
/// default.
///
/// # Errors
///
/// Returns an error if no highlighting backend is available or the theme is
/// unknown.
pub fn theme_css(config: &Config, theme: Option<&str>) -> Result<String> {
  let manager = create_default_manager(config.syntax_config())?;
  Ok(manager.theme_css(theme)?)
}

/// Read the configured input, render it and write the page, plus the
/// highlighting stylesheet when one is configured.
///
/// # Errors
///
/// Returns an error if reading, rendering or writing fails.
pub fn render_page(config: &Config) -> Result<()> {
  let markdown = fs::read_to_string(&config.input).wrap_err_with(|| {
    format!("Failed to read input file: {}", config.input.display())
  })?;

  let page = render_document(&markdown, config)?;
  write_file(&config.output, &page)?;
  info!("Wrote {}", config.output.display());

  if config.highlight_code
    && let Some(path) = config.stylesheet_path()
  {
    match theme_css(config, None) {
      Ok(css) => {
        write_file(&path, &css)?;
        info!("Wrote {}", path.display());
      },
      Err(e) => warn!("Skipping stylesheet {}: {e}", path.display()),
    }
  }

  Ok(())
}

/// Write `content` to `path`, creating parent directories as needed.
fn write_file(path: &Path, content: &str) -> Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
  }

  fs::write(path, content)
    .wrap_err_with(|| format!("Failed to write file: {}", path.display()))
}
