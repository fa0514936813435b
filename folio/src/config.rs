//! Configuration for folio.
//!
//! Settings come from, in increasing priority:
//!
//! 1. built-in defaults
//! 2. configuration files (`-c`, or a discovered `folio.toml`/`folio.json`),
//!    merged key by key in the order given
//! 3. `--config KEY=VALUE` overrides
//! 4. per-command flags such as `render --no-group`
use std::{
  collections::BTreeMap,
  fs,
  path::{Path, PathBuf},
};

use folio_core::{PipelineOptions, PipelineOptionsBuilder, SyntaxConfig};
use serde::{Deserialize, Serialize};

use crate::{cli::Commands, error::ConfigError, template::DEFAULT_PLACEHOLDER};

/// Names probed in the working directory when no `-c` is given.
const CONFIG_FILE_NAMES: &[&str] = &["folio.toml", "folio.json", ".folio.toml"];

/// Configuration options for folio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(
  clippy::struct_excessive_bools,
  reason = "Config struct with related boolean flags"
)]
pub struct Config {
  /// Markdown file to render
  pub input: PathBuf,

  /// Where the rendered page is written
  pub output: PathBuf,

  /// Page template; the built-in template is used when unset
  #[serde(skip_serializing_if = "Option::is_none")]
  pub template: Option<PathBuf>,

  /// Marker in the template that is replaced by the rendered content
  pub placeholder: String,

  /// Prepend `#` permalinks to second-level headings
  pub annotate_anchors: bool,

  /// Syntax highlight code
  pub highlight_code: bool,

  /// Also highlight inline `code`, not only code blocks
  pub highlight_inline: bool,

  /// Highlighting theme used for the generated stylesheet
  #[serde(skip_serializing_if = "Option::is_none")]
  pub highlight_theme: Option<String>,

  /// Highlight code in unknown languages as plain text instead of leaving
  /// it untouched
  pub fallback_to_plain: bool,

  /// Wrap each heading and its content in a print-safe group
  pub group_sections: bool,

  /// Minify the generated page
  pub minify_html: bool,

  /// Highlighting stylesheet, relative to the output's directory. Not
  /// written when unset.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub stylesheet: Option<PathBuf>,

  /// Extra language aliases, e.g. `nix-repl = "nix"`
  pub language_aliases: BTreeMap<String, String>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      input:             PathBuf::from("README.md"),
      output:            PathBuf::from("index.html"),
      template:          None,
      placeholder:       DEFAULT_PLACEHOLDER.to_string(),
      annotate_anchors:  true,
      highlight_code:    true,
      highlight_inline:  true,
      highlight_theme:   None,
      fallback_to_plain: false,
      group_sections:    true,
      minify_html:       false,
      stylesheet:        Some(PathBuf::from("highlight.css")),
      language_aliases:  BTreeMap::new(),
    }
  }
}

impl Config {
  /// Create a new configuration from a file.
  /// Only TOML and JSON are supported for the time being.
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read, has an unsupported
  /// extension, or does not describe a valid configuration.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    Ok(toml::Value::Table(read_table(path.as_ref())?).try_into()?)
  }

  /// Load configuration from `files` (merged in order) and apply
  /// `overrides`.
  ///
  /// Without files a config file in the working directory is used if one
  /// exists, otherwise the defaults.
  ///
  /// # Errors
  ///
  /// Returns an error if any file cannot be loaded or an override is
  /// invalid.
  pub fn load(
    files: &[PathBuf],
    overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let discovered;
    let files = if files.is_empty() {
      discovered = Self::find_config_file();
      if let Some(path) = &discovered {
        log::info!("Using discovered config file: {}", path.display());
      }
      discovered.as_slice()
    } else {
      files
    };

    let mut merged = toml::Table::new();
    for path in files {
      log::debug!("Loading config file: {}", path.display());
      merge_tables(&mut merged, read_table(path)?);
    }

    let mut config: Self = toml::Value::Table(merged).try_into()?;
    config.apply_overrides(overrides)?;
    Ok(config)
  }

  /// Look for a config file in the working directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    CONFIG_FILE_NAMES
      .iter()
      .map(PathBuf::from)
      .find(|path| path.is_file())
  }

  /// Apply `KEY=VALUE` overrides in order.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::Config`] for malformed overrides, unknown keys
  /// and unparseable values.
  pub fn apply_overrides(
    &mut self,
    overrides: &[String],
  ) -> Result<(), ConfigError> {
    for override_str in overrides {
      let (key, value) = override_str.split_once('=').ok_or_else(|| {
        ConfigError::Config(format!(
          "Invalid config override format: '{override_str}'. Expected \
           KEY=VALUE"
        ))
      })?;

      self.apply_override(key.trim(), value.trim())?;
    }

    Ok(())
  }

  /// Apply a configuration override by key.
  ///
  /// Optional settings are cleared by an empty value.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::Config`] for unknown keys and unparseable
  /// values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    let optional_path = || (!value.is_empty()).then(|| PathBuf::from(value));

    match key {
      "input" => self.input = PathBuf::from(value),
      "output" => self.output = PathBuf::from(value),
      "template" => self.template = optional_path(),
      "stylesheet" => self.stylesheet = optional_path(),
      "placeholder" => self.placeholder = value.to_string(),
      "highlight_theme" => {
        self.highlight_theme = (!value.is_empty()).then(|| value.to_string());
      },
      "annotate_anchors" => self.annotate_anchors = parse_bool(key, value)?,
      "highlight_code" => self.highlight_code = parse_bool(key, value)?,
      "highlight_inline" => self.highlight_inline = parse_bool(key, value)?,
      "fallback_to_plain" => self.fallback_to_plain = parse_bool(key, value)?,
      "group_sections" => self.group_sections = parse_bool(key, value)?,
      "minify_html" => self.minify_html = parse_bool(key, value)?,
      _ => {
        if let Some(alias) = key.strip_prefix("language_aliases.") {
          self
            .language_aliases
            .insert(alias.to_string(), value.to_string());
        } else {
          return Err(ConfigError::Config(format!(
            "Unknown configuration key: '{key}'. See documentation for \
             supported keys.",
          )));
        }
      },
    }

    Ok(())
  }

  /// Merge flags of the `render` subcommand into this config, prioritizing
  /// CLI values when present.
  pub fn merge_with_cli(&mut self, command: &Commands) {
    if let Commands::Render {
      input,
      output,
      template,
      no_highlight,
      no_group,
      minify,
    } = command
    {
      if let Some(input) = input {
        self.input.clone_from(input);
      }
      if let Some(output) = output {
        self.output.clone_from(output);
      }
      if template.is_some() {
        self.template.clone_from(template);
      }
      if *no_highlight {
        self.highlight_code = false;
      }
      if *no_group {
        self.group_sections = false;
      }
      if *minify {
        self.minify_html = true;
      }
    }
  }

  /// Pipeline passes selected by this config.
  #[must_use]
  pub fn pipeline_options(&self) -> PipelineOptions {
    PipelineOptionsBuilder::new()
      .annotate_anchors(self.annotate_anchors)
      .highlight_code(self.highlight_code)
      .highlight_inline(self.highlight_inline)
      .group_sections(self.group_sections)
      .build()
  }

  /// Highlighting settings, with configured aliases layered over the
  /// built-in ones.
  #[must_use]
  pub fn syntax_config(&self) -> SyntaxConfig {
    let mut syntax = SyntaxConfig {
      default_theme: self.highlight_theme.clone(),
      fallback_to_plain: self.fallback_to_plain,
      ..SyntaxConfig::default()
    };
    syntax.language_aliases.extend(
      self
        .language_aliases
        .iter()
        .map(|(alias, language)| (alias.to_lowercase(), language.clone())),
    );
    syntax
  }

  /// Where the highlighting stylesheet goes, if anywhere. An empty path
  /// disables it.
  #[must_use]
  pub fn stylesheet_path(&self) -> Option<PathBuf> {
    let stylesheet = self
      .stylesheet
      .as_ref()
      .filter(|path| !path.as_os_str().is_empty())?;
    let dir = self.output.parent().unwrap_or_else(|| Path::new(""));
    Some(dir.join(stylesheet))
  }

  /// Where `folio init` writes a config of `format` when no path is given.
  #[must_use]
  pub fn default_config_path(format: &str) -> PathBuf {
    PathBuf::from(format!("folio.{format}"))
  }

  /// Write the default configuration to `path` as `toml` or `json`.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown formats or if the file cannot be written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let defaults = Self::default();
    let content = match format {
      "toml" => toml::to_string_pretty(&defaults)?,
      "json" => serde_json::to_string_pretty(&defaults)?,
      other => {
        return Err(ConfigError::Config(format!(
          "Unsupported config format: '{other}'. Expected toml or json"
        )));
      },
    };

    fs::write(path, content)?;
    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}

/// Read a TOML or JSON config file into a table, chosen by extension.
fn read_table(path: &Path) -> Result<toml::Table, ConfigError> {
  let content = fs::read_to_string(path).map_err(|e| {
    ConfigError::Config(format!(
      "Failed to read config file {}: {e}",
      path.display()
    ))
  })?;

  let extension = path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(str::to_lowercase);

  match extension.as_deref() {
    Some("toml") => Ok(toml::from_str(&content)?),
    Some("json") => {
      let mut value: serde_json::Value = serde_json::from_str(&content)?;
      drop_nulls(&mut value);
      Ok(serde_json::from_value(value)?)
    },
    _ => {
      Err(ConfigError::Config(format!(
        "Unsupported config file format: {}",
        path.display()
      )))
    },
  }
}

/// Remove `null` members from JSON objects. TOML has no null, and a key set
/// to `null` is treated as if it were not there.
fn drop_nulls(value: &mut serde_json::Value) {
  match value {
    serde_json::Value::Object(map) => {
      map.retain(|_, member| !member.is_null());
      map.values_mut().for_each(drop_nulls);
    },
    serde_json::Value::Array(items) => items.iter_mut().for_each(drop_nulls),
    _ => {},
  }
}

/// Merge `other` into `base`, recursing into tables so that later files only
/// replace the keys they set.
fn merge_tables(base: &mut toml::Table, other: toml::Table) {
  for (key, value) in other {
    if let toml::Value::Table(incoming) = value {
      if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
        merge_tables(existing, incoming);
      } else {
        base.insert(key, toml::Value::Table(incoming));
      }
    } else {
      base.insert(key, value);
    }
  }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
  match value.to_lowercase().as_str() {
    "true" | "yes" | "1" => Ok(true),
    "false" | "no" | "0" => Ok(false),
    _ => {
      Err(ConfigError::Config(format!(
        "Invalid boolean value for '{key}': '{value}'. Expected true/false, \
         yes/no, or 1/0"
      )))
    },
  }
}
