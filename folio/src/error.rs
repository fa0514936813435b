use std::io;

use thiserror::Error;

/// Errors raised while loading or writing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Serde error: {0}")]
  Serde(#[from] serde_json::Error),

  #[error("TOML error: {0}")]
  Toml(#[from] toml::de::Error),

  #[error("TOML serialization error: {0}")]
  TomlSerialize(#[from] toml::ser::Error),
}

/// Errors raised while splicing rendered content into a page template.
#[derive(Debug, Error)]
pub enum TemplateError {
  #[error("Template has no '{0}' placeholder")]
  MissingPlaceholder(String),

  #[error("Placeholder must not be empty")]
  EmptyPlaceholder,
}
