use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for epubpro
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about = "EpubPro: interactive exercises for EPUB textbooks"
)]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long, global = true)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order, with later files overriding
  /// earlier ones
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append, global = true)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append, global = true)]
  pub config_overrides: Vec<String>,

  /// Write the log to this file instead of stderr
  #[arg(long = "log-file", global = true)]
  pub log_file: Option<PathBuf>,
}

/// All supported subcommands for the epubpro CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Run the full pipeline over an EPUB and write the processed book.
  Process {
    /// EPUB to read.
    input: PathBuf,

    /// Where to write the processed EPUB.
    output: PathBuf,

    /// Wrap bare URLs in body text with links.
    #[arg(long)]
    enable_url_linker: bool,
  },

  /// Inject exercises into loose XHTML files, without unpacking an EPUB.
  Interact {
    /// XHTML files to process.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Overwrite the input files.
    #[arg(short, long, conflicts_with = "output_dir")]
    in_place: bool,

    /// Write processed files into this directory, keeping their names.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
  },

  /// Initialize a new epubpro configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "epubpro.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
