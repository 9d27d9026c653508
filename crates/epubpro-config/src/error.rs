use std::io;

use thiserror::Error;

/// Error type for loading and validating an EpubPro configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Unsupported config format: {0}")]
  UnsupportedFormat(String),

  #[error("Invalid cleaner pattern '{pattern}': {source}")]
  Pattern {
    pattern: String,
    #[source]
    source:  regex::Error,
  },

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("JSON error: {0}")]
  Serde(#[from] serde_json::Error),

  #[error("TOML error: {0}")]
  Toml(#[from] toml::de::Error),
}
