use crate::error::ConfigError;

/// Default configuration in TOML, with a comment on every field so that a
/// freshly generated file documents itself.
pub const DEFAULT_TOML_TEMPLATE: &str = r#"# EpubPro Configuration File

# Wrap bare http(s):// URLs in body text with links
enable_url_linker = false

# Directory with .ttf/.otf/.woff/.woff2 files to embed (optional)
# fonts_dir = "fonts"

# Compare element counts before and after processing
audit = true

# Regenerate toc.ncx from the spine
generate_ncx = true

[cleaner]
# Regular expressions whose matches are deleted from every content document
remove_patterns = [
  'id="_id[^"]*"',
  '_idGenObjectStyle-Disabled',
  'xml:lang="[^"]*"',
  'lang="[^"]*"',
  '\sclass="negrito"',
  '\sclass="italico"',
  '\sclass="sobrescrito"',
  '\sclass="subscrito"',
]

# Elements with these classes keep their generated _id... ids
preserve_id_classes = ["_0-Titulo-Artigo", "_1-Titulo-1"]

[interactivity]
# Turn question prompts into self-checking exercises
enable = true

[interactivity.labels]
reveal = "Confira aqui a resposta"
correct = "Resposta correta."
incorrect = "Resposta incorreta. A alternativa correta é a"
check = "A alternativa correta é a"
"#;

/// Default configuration in JSON format.
pub const DEFAULT_JSON_TEMPLATE: &str = r#"{
  "enable_url_linker": false,
  "fonts_dir": null,
  "audit": true,
  "generate_ncx": true,
  "cleaner": {
    "remove_patterns": [
      "id=\"_id[^\"]*\"",
      "_idGenObjectStyle-Disabled",
      "xml:lang=\"[^\"]*\"",
      "lang=\"[^\"]*\"",
      "\\sclass=\"negrito\"",
      "\\sclass=\"italico\"",
      "\\sclass=\"sobrescrito\"",
      "\\sclass=\"subscrito\""
    ],
    "preserve_id_classes": ["_0-Titulo-Artigo", "_1-Titulo-1"]
  },
  "interactivity": {
    "enable": true,
    "labels": {
      "reveal": "Confira aqui a resposta",
      "correct": "Resposta correta.",
      "incorrect": "Resposta incorreta. A alternativa correta é a",
      "check": "A alternativa correta é a"
    }
  }
}
"#;

/// Default configuration text for `format` (`toml` or `json`).
///
/// # Errors
///
/// Returns [`ConfigError::UnsupportedFormat`] for any other format.
pub fn get_template(format: &str) -> Result<&'static str, ConfigError> {
  match format.to_lowercase().as_str() {
    "toml" => Ok(DEFAULT_TOML_TEMPLATE),
    "json" => Ok(DEFAULT_JSON_TEMPLATE),
    _ => Err(ConfigError::UnsupportedFormat(format.to_string())),
  }
}
