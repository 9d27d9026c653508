use std::fs::{self, File};

use color_eyre::eyre::{Context, Result, bail};
use epubpro::{
  cli::{Cli, Commands},
  pipeline::{self, InteractTarget},
};
use epubpro_config::Config;
use log::{LevelFilter, info, warn};

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  init_logging(&cli)?;

  match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => {
      // Check if file already exists and that we're not forcing overwrite
      if output.exists() && !force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      // Create parent directories if needed
      if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
          fs::create_dir_all(parent).wrap_err_with(|| {
            format!("Failed to create directory: {}", parent.display())
          })?;
          info!("Created directory: {}", parent.display());
        }
      }

      Config::generate_default_config(format, output).wrap_err_with(|| {
        format!("Failed to generate configuration file: {}", output.display())
      })?;

      info!(
        "Configuration file created successfully. Edit it to customize the \
         processing pipeline."
      );
      Ok(())
    },

    Commands::Process {
      input,
      output,
      enable_url_linker,
    } => {
      let mut config = Config::load(&cli.config_files, &cli.config_overrides)?;
      if *enable_url_linker {
        config.enable_url_linker = true;
      }

      let report = pipeline::process_epub(input, output, &config)?;
      if report.audit_passed == Some(false) {
        warn!("Audit reported missing elements; check the log above");
      }
      info!(
        "Done: {} exercise(s) in {} file(s)",
        report.interactivity.bound, report.interactivity.changed
      );
      Ok(())
    },

    Commands::Interact {
      files,
      in_place,
      output_dir,
    } => {
      let config = Config::load(&cli.config_files, &cli.config_overrides)?;
      let target = match (in_place, output_dir) {
        (true, _) => InteractTarget::InPlace,
        (false, Some(dir)) => InteractTarget::Directory(dir.clone()),
        (false, None) => {
          info!("No --in-place or --output-dir given; reporting only");
          InteractTarget::DryRun
        },
      };

      let changed = pipeline::interact_files(files, &target, &config)?;
      info!("{changed} of {} file(s) changed", files.len());
      Ok(())
    },
  }
}

/// Log to stderr, or to `--log-file` when given, at `Info` (or `Debug` with
/// `--verbose`).
fn init_logging(cli: &Cli) -> Result<()> {
  let mut builder = env_logger::Builder::new();
  builder.filter_level(if cli.verbose {
    LevelFilter::Debug
  } else {
    LevelFilter::Info
  });

  if let Some(path) = &cli.log_file {
    let file = File::create(path)
      .wrap_err_with(|| format!("Failed to create log file {}", path.display()))?;
    builder
      .target(env_logger::Target::Pipe(Box::new(file)))
      .write_style(env_logger::WriteStyle::Never);
  } else {
    builder.write_style(env_logger::WriteStyle::Always);
  }

  builder.init();
  Ok(())
}
