use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for folio
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "folio: render a Markdown document into a print-friendly page"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times). Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the folio CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Render a Markdown file into an HTML page.
  Render {
    /// Markdown file to render.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Where to write the page.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Page template containing the content placeholder.
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Leave code blocks unhighlighted.
    #[arg(long)]
    no_highlight: bool,

    /// Do not wrap sections in print-safe groups.
    #[arg(long)]
    no_group: bool,

    /// Minify the generated page.
    #[arg(long)]
    minify: bool,
  },

  /// Initialize a new folio configuration file
  Init {
    /// Path to create the configuration file at [default: folio.toml or
    /// folio.json, following --format]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Print or write the stylesheet for a highlighting theme.
  Css {
    /// Theme name, defaults to the configured theme.
    #[arg(long)]
    theme: Option<String>,

    /// Write the stylesheet here instead of standard output.
    #[arg(short, long)]
    output: Option<PathBuf>,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  #[test]
  fn test_cli_is_well_formed() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_render_flags() {
    let cli = Cli::try_parse_from([
      "folio",
      "-c",
      "a.toml",
      "-c",
      "b.json",
      "--config",
      "minify_html=true",
      "render",
      "-i",
      "NOTES.md",
      "--no-group",
    ])
    .unwrap();

    assert_eq!(cli.config_files, [
      PathBuf::from("a.toml"),
      PathBuf::from("b.json")
    ]);
    assert_eq!(cli.config_overrides, ["minify_html=true"]);
    match cli.command {
      Commands::Render {
        input,
        no_group,
        no_highlight,
        ..
      } => {
        assert_eq!(input, Some(PathBuf::from("NOTES.md")));
        assert!(no_group);
        assert!(!no_highlight);
      },
      other => panic!("unexpected command: {other:?}"),
    }
  }

  #[test]
  fn test_init_output_is_optional() {
    let cli = Cli::try_parse_from(["folio", "init", "-F", "json"]).unwrap();
    match cli.command {
      Commands::Init { output, format, .. } => {
        assert_eq!(output, None);
        assert_eq!(format, "json");
      },
      other => panic!("unexpected command: {other:?}"),
    }
  }

  #[test]
  fn test_init_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["folio", "init", "-F", "yaml"]).is_err());
  }
}
