//! Text normalisation used by both passes for pattern matching.
use unicode_normalization::{UnicodeNormalization, char::canonical_combining_class};

use crate::dom;

/// Replace non-breaking spaces with plain spaces and trim.
#[must_use]
pub fn normalize(text: &str) -> String {
  text.replace('\u{a0}', " ").trim().to_owned()
}

/// Decompose (NFKD), drop combining marks and collapse whitespace runs.
///
/// `"Referências  Bibliográficas"` becomes `"Referencias Bibliograficas"`.
#[must_use]
pub fn strip_accents(text: &str) -> String {
  let decomposed: String = text
    .nfkd()
    .filter(|c| canonical_combining_class(*c) == 0)
    .collect();
  decomposed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The canonical form headings are matched against: normalised,
/// accent-stripped and lower-cased.
#[must_use]
pub fn fold_for_match(text: &str) -> String {
  strip_accents(&normalize(text)).to_lowercase()
}

/// Normalised text content of a markup fragment.
#[must_use]
pub fn plain_text(markup: &str) -> String {
  let text: String = dom::parse_fragment(markup)
    .iter()
    .map(kuchikikiki::NodeRef::text_contents)
    .collect();
  normalize(&text)
}

/// First character of `text`, lower-cased. Used to compare option letters
/// with the stored answer.
#[must_use]
pub fn first_letter(text: &str) -> Option<char> {
  text.chars().next().and_then(|c| c.to_lowercase().next())
}
