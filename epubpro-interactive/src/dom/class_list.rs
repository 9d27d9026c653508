use std::fmt;

use indexmap::IndexSet;

/// The `class` attribute of an element, as an ordered set of tokens.
///
/// Insertion order is preserved so that serialising an unmodified list
/// reproduces the source attribute (modulo whitespace), and duplicate tokens
/// collapse into one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
  tokens: IndexSet<String>,
}

impl ClassList {
  /// Split a raw `class` attribute value on ASCII whitespace.
  #[must_use]
  pub fn parse(raw: &str) -> Self {
    Self {
      tokens: raw.split_ascii_whitespace().map(str::to_owned).collect(),
    }
  }

  #[must_use]
  pub fn contains(&self, token: &str) -> bool {
    self.tokens.contains(token)
  }

  /// Whether any token starts with `prefix`.
  #[must_use]
  pub fn any_starts_with(&self, prefix: &str) -> bool {
    self.tokens.iter().any(|token| token.starts_with(prefix))
  }

  /// Append `token` if absent. Returns `true` when the list changed.
  pub fn insert(&mut self, token: &str) -> bool {
    if self.tokens.contains(token) {
      return false;
    }
    self.tokens.insert(token.to_owned())
  }

  #[must_use]
  pub fn len(&self) -> usize {
    self.tokens.len()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.tokens.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.tokens.iter().map(String::as_str)
  }
}

impl fmt::Display for ClassList {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, token) in self.tokens.iter().enumerate() {
      if i > 0 {
        f.write_str(" ")?;
      }
      f.write_str(token)?;
    }
    Ok(())
  }
}

impl<'a> FromIterator<&'a str> for ClassList {
  fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
    let mut list = Self::default();
    for token in iter {
      list.insert(token);
    }
    list
  }
}
