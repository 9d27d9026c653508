//! Typed parsing of `--config KEY=VALUE` values.
use std::path::PathBuf;

use crate::error::ConfigError;

pub fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
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

/// An empty value clears the path.
pub fn parse_optional_path(value: &str) -> Option<PathBuf> {
  if value.is_empty() {
    None
  } else {
    Some(PathBuf::from(value))
  }
}

/// Comma-separated list. Entries are trimmed, empty entries dropped.
pub fn parse_list(value: &str) -> Vec<String> {
  value
    .split(',')
    .map(str::trim)
    .filter(|entry| !entry.is_empty())
    .map(str::to_owned)
    .collect()
}

pub fn unknown_key(key: &str) -> ConfigError {
  ConfigError::Config(format!(
    "Unknown configuration key: '{key}'. Run `epubpro init` for a list of \
     supported keys."
  ))
}

/// Append entries of `other` missing from `base`, keeping order.
pub fn extend_unique(base: &mut Vec<String>, other: Vec<String>) {
  for entry in other {
    if !base.contains(&entry) {
      base.push(entry);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn booleans() {
    assert!(parse_bool("audit", "yes").expect("yes"));
    assert!(!parse_bool("audit", "0").expect("0"));
    let err = parse_bool("audit", "maybe").expect_err("maybe");
    assert!(err.to_string().contains("Invalid boolean"));
  }

  #[test]
  fn lists_are_trimmed() {
    assert_eq!(parse_list(" a, b ,,c"), vec!["a", "b", "c"]);
    assert!(parse_list("").is_empty());
  }

  #[test]
  fn extend_unique_skips_duplicates() {
    let mut base = vec!["a".to_string(), "b".to_string()];
    extend_unique(&mut base, vec!["b".to_string(), "c".to_string()]);
    assert_eq!(base, vec!["a", "b", "c"]);
  }
}
