use epubpro_interactive::Labels;
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, overrides};

/// Settings of the exercise injection stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractivityConfig {
  /// Whether prompts are turned into interactive exercises.
  pub enable: bool,

  /// Sentences written into the generated feedback blocks.
  pub labels: Labels,
}

impl Default for InteractivityConfig {
  fn default() -> Self {
    Self {
      enable: true,
      labels: Labels::default(),
    }
  }
}

impl InteractivityConfig {
  pub(crate) fn apply_override(
    &mut self,
    key: &str,
    value: &str,
  ) -> Result<(), ConfigError> {
    match key {
      "enable" => self.enable = overrides::parse_bool("interactivity.enable", value)?,
      "labels.reveal" => self.labels.reveal = value.to_string(),
      "labels.correct" => self.labels.correct = value.to_string(),
      "labels.incorrect" => self.labels.incorrect = value.to_string(),
      "labels.check" => self.labels.check = value.to_string(),
      _ => return Err(overrides::unknown_key(&format!("interactivity.{key}"))),
    }
    Ok(())
  }
}
