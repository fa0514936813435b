use color_eyre::Result;

use crate::config::Config;

/// Apply HTML minification if enabled
///
/// # Arguments
///
/// * `content` - HTML content to process
/// * `config` - Configuration controlling minification behavior
///
/// # Returns
///
/// Returns the original content unchanged if `config.minify_html` is `false`,
/// otherwise returns minified HTML.
///
/// # Errors
///
/// This function does not currently return errors, but uses `Result` so
/// callers do not change when a fallible minifier is plugged in.
#[allow(
  clippy::unnecessary_wraps,
  reason = "Minification may become fallible"
)]
pub fn process_html(content: &str, config: &Config) -> Result<String> {
  if !config.minify_html {
    return Ok(content.to_string());
  }

  let cfg = minify_html::Cfg {
    keep_comments: false,
    ..minify_html::Cfg::default()
  };

  let minified = minify_html::minify(content.as_bytes(), &cfg);
  Ok(String::from_utf8_lossy(&minified).into_owned())
}
