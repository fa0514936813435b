use std::{
  fs,
  io::{self, Write},
};

use color_eyre::eyre::{Context, Result, bail};
use folio::{
  cli::{Cli, Commands},
  config::Config,
  render,
};
use log::{LevelFilter, info, warn};

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => {
      let output = output
        .clone()
        .unwrap_or_else(|| Config::default_config_path(format));
      let extension = output.extension().and_then(|ext| ext.to_str());
      if extension != Some(format.as_str()) {
        warn!(
          "{} does not have a .{format} extension and will not be read as \
           {format}",
          output.display()
        );
      }

      // Check if file already exists and that we're not forcing overwrite
      if output.exists() && !force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
      {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("Failed to create directory: {}", parent.display())
        })?;
        info!("Created directory: {}", parent.display());
      }

      Config::generate_default_config(format, &output).wrap_err_with(|| {
        format!("Failed to generate configuration file: {}", output.display())
      })?;
    },

    Commands::Css { theme, output } => {
      let config = Config::load(&cli.config_files, &cli.config_overrides)?;
      let css = render::theme_css(&config, theme.as_deref())?;

      if let Some(path) = output {
        fs::write(path, css).wrap_err_with(|| {
          format!("Failed to write stylesheet: {}", path.display())
        })?;
        info!("Wrote {}", path.display());
      } else {
        io::stdout().lock().write_all(css.as_bytes())?;
      }
    },

    Commands::Render { .. } => {
      let mut config = Config::load(&cli.config_files, &cli.config_overrides)?;
      config.merge_with_cli(&cli.command);
      render::render_page(&config)?;
    },
  }

  Ok(())
}
