use std::{
  fs,
  path::{Path, PathBuf},
  sync::OnceLock,
};

use serde::{Deserialize, Serialize};

use crate::{
  cleaner::CleanerConfig,
  error::ConfigError,
  interactivity::InteractivityConfig,
  overrides,
};

/// Configuration for the EpubPro post-processor.
///
/// [`Config`] selects the optional pipeline stages and carries the settings
/// of the cleaner and the exercise injection. Fields are typically loaded
/// from a TOML or JSON config file, then adjusted from the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Whether bare `http(s)://` URLs in body text become links.
  pub enable_url_linker: bool,

  /// Directory with `.ttf`/`.otf`/`.woff`/`.woff2` files to embed. Font
  /// injection is skipped when unset or missing.
  pub fonts_dir: Option<PathBuf>,

  /// Whether element counts are compared before and after processing.
  pub audit: bool,

  /// Whether the NCX table of contents is regenerated from the spine.
  pub generate_ncx: bool,

  /// Markup cleaning.
  pub cleaner: CleanerConfig,

  /// Exercise injection.
  pub interactivity: InteractivityConfig,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      enable_url_linker: false,
      fonts_dir:         None,
      audit:             true,
      generate_ncx:      true,
      cleaner:           CleanerConfig::default(),
      interactivity:     InteractivityConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from a file (TOML or JSON).
  ///
  /// # Errors
  ///
  /// Returns an error if the file cannot be read or parsed, or if the format
  /// is unsupported.
  pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to read config file: {}: {e}",
        path.display()
      ))
    })?;

    let extension = path
      .extension()
      .and_then(|ext| ext.to_str())
      .map(str::to_lowercase);

    match extension.as_deref() {
      Some("json") => {
        serde_json::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse JSON config from {}: {e}",
            path.display()
          ))
        })
      },
      Some("toml") => {
        toml::from_str(&content).map_err(|e| {
          ConfigError::Config(format!(
            "Failed to parse TOML config from {}: {e}",
            path.display()
          ))
        })
      },
      Some(_) => {
        Err(ConfigError::Config(format!(
          "Unsupported config file format: {}",
          path.display()
        )))
      },
      None => {
        Err(ConfigError::Config(format!(
          "Config file has no extension: {}",
          path.display()
        )))
      },
    }
  }

  /// Load configuration from the given files, or a discovered one, then
  /// apply `KEY=VALUE` overrides.
  ///
  /// Files are merged in order, later files taking precedence. Without any
  /// file, [`Self::find_config_file`] is consulted before falling back to
  /// defaults.
  ///
  /// # Errors
  ///
  /// Returns an error if a file cannot be loaded, an override is malformed,
  /// or a cleaner pattern does not compile.
  pub fn load(
    config_files: &[PathBuf],
    config_overrides: &[String],
  ) -> Result<Self, ConfigError> {
    let mut config = if let Some((first, rest)) = config_files.split_first() {
      let mut merged = Self::from_file(first)?;
      for path in rest {
        merged.merge(Self::from_file(path)?);
      }
      if !rest.is_empty() {
        log::info!("Loaded and merged {} config files", config_files.len());
      }
      merged
    } else if let Some(discovered) = Self::find_config_file() {
      log::info!("Using discovered config file: {}", discovered.display());
      Self::from_file(&discovered)?
    } else {
      Self::default()
    };

    if !config_overrides.is_empty() {
      config.apply_overrides(config_overrides)?;
    }

    config.cleaner.compile_patterns()?;

    Ok(config)
  }

  /// Apply configuration overrides from KEY=VALUE strings.
  ///
  /// Nested sections are addressed with dots, e.g.
  /// `interactivity.labels.reveal=Check the answer`. List values are
  /// comma-separated.
  ///
  /// # Errors
  ///
  /// Returns an error if:
  ///
  /// - An override string is not in KEY=VALUE format
  /// - A key is not recognized
  /// - A value cannot be parsed as the expected type
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

  /// Apply a single override by key.
  ///
  /// # Errors
  ///
  /// Returns an error for unknown keys or unparsable values.
  pub fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    if let Some(rest) = key.strip_prefix("cleaner.") {
      return self.cleaner.apply_override(rest, value);
    }
    if let Some(rest) = key.strip_prefix("interactivity.") {
      return self.interactivity.apply_override(rest, value);
    }

    match key {
      "enable_url_linker" => {
        self.enable_url_linker = overrides::parse_bool(key, value)?;
      },
      "fonts_dir" => self.fonts_dir = overrides::parse_optional_path(value),
      "audit" => self.audit = overrides::parse_bool(key, value)?,
      "generate_ncx" => self.generate_ncx = overrides::parse_bool(key, value)?,
      _ => return Err(overrides::unknown_key(key)),
    }
    Ok(())
  }

  /// Merge another config into this one, with the other config's values
  /// taking precedence.
  ///
  /// # Merge Rules
  ///
  /// - [`Option<T>`] fields: Other's [`Some`] value replaces this config's
  ///   value
  /// - List fields: Other's entries are appended when not already present
  /// - Plain fields: Other's value always replaces
  pub fn merge(&mut self, other: Self) {
    self.enable_url_linker = other.enable_url_linker;
    if other.fonts_dir.is_some() {
      self.fonts_dir = other.fonts_dir;
    }
    self.audit = other.audit;
    self.generate_ncx = other.generate_ncx;
    self.cleaner.merge(other.cleaner);
    self.interactivity = other.interactivity;
  }

  /// Search for config files in the working directory.
  #[must_use]
  pub fn find_config_file() -> Option<PathBuf> {
    static RESULT: OnceLock<Option<PathBuf>> = OnceLock::new();
    RESULT
      .get_or_init(|| {
        let current_dir = std::env::current_dir().ok()?;
        Self::find_config_file_in(&current_dir)
      })
      .clone()
  }

  /// First of `epubpro.toml`, `epubpro.json`, `.epubpro.toml`,
  /// `.epubpro.json` present in `dir`.
  #[must_use]
  pub fn find_config_file_in(dir: &Path) -> Option<PathBuf> {
    [
      "epubpro.toml",
      "epubpro.json",
      ".epubpro.toml",
      ".epubpro.json",
    ]
    .iter()
    .map(|filename| dir.join(filename))
    .find(|path| path.exists())
  }

  /// Fonts directory to inject from, if configured and present.
  #[must_use]
  pub fn existing_fonts_dir(&self) -> Option<&Path> {
    self.fonts_dir.as_deref().filter(|dir| dir.is_dir())
  }

  /// Write a default configuration file with commented explanations.
  ///
  /// # Errors
  ///
  /// Returns an error if the format is unknown or the file cannot be
  /// written.
  pub fn generate_default_config(
    format: &str,
    path: &Path,
  ) -> Result<(), ConfigError> {
    let config_content = crate::templates::get_template(format)?;

    fs::write(path, config_content).map_err(|e| {
      ConfigError::Config(format!(
        "Failed to write default config to {}: {e}",
        path.display()
      ))
    })?;

    log::info!("Created default configuration file: {}", path.display());
    Ok(())
  }
}
