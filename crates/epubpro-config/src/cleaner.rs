use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, overrides};

/// Text-level removals applied to every content document before the tree
/// edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanerConfig {
  /// Regular expressions whose matches are deleted from the markup.
  ///
  /// A pattern matching an `id="_id…"` attribute spares the ids of elements
  /// whose class is listed in [`Self::preserve_id_classes`].
  pub remove_patterns: Vec<String>,

  /// Classes whose generated `_id…` ids survive cleaning.
  pub preserve_id_classes: Vec<String>,
}

impl Default for CleanerConfig {
  fn default() -> Self {
    Self {
      remove_patterns:     [
        r#"id="_id[^"]*""#,
        "_idGenObjectStyle-Disabled",
        r#"xml:lang="[^"]*""#,
        r#"lang="[^"]*""#,
        r#"\sclass="negrito""#,
        r#"\sclass="italico""#,
        r#"\sclass="sobrescrito""#,
        r#"\sclass="subscrito""#,
      ]
      .into_iter()
      .map(str::to_owned)
      .collect(),
      preserve_id_classes: vec![
        "_0-Titulo-Artigo".to_string(),
        "_1-Titulo-1".to_string(),
      ],
    }
  }
}

impl CleanerConfig {
  /// Compile [`Self::remove_patterns`].
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::Pattern`] for the first pattern that is not a
  /// valid regular expression.
  pub fn compile_patterns(&self) -> Result<Vec<Regex>, ConfigError> {
    self
      .remove_patterns
      .iter()
      .map(|pattern| {
        Regex::new(pattern).map_err(|source| {
          ConfigError::Pattern {
            pattern: pattern.clone(),
            source,
          }
        })
      })
      .collect()
  }

  pub(crate) fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "remove_patterns" => self.remove_patterns = overrides::parse_list(value),
      "preserve_id_classes" => {
        self.preserve_id_classes = overrides::parse_list(value);
      },
      _ => return Err(overrides::unknown_key(&format!("cleaner.{key}"))),
    }
    Ok(())
  }

  pub(crate) fn merge(&mut self, other: Self) {
    overrides::extend_unique(&mut self.remove_patterns, other.remove_patterns);
    overrides::extend_unique(
      &mut self.preserve_id_classes,
      other.preserve_id_classes,
    );
  }
}
