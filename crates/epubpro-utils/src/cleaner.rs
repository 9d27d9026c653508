//! Markup sanitising.
//!
//! Cleaning runs in two layers. Text-level edits first: `id`/`class` order
//! normalisation, the configured removal patterns and empty frame wrappers.
//! Then a tree-level edit lifts headings out of the lists they were nested
//! into by the authoring tool.
use std::{path::Path, sync::OnceLock};

use color_eyre::eyre::Result;
use epubpro_config::cleaner::CleanerConfig;
use epubpro_interactive::{Document, dom, never_matching_regex};
use kuchikikiki::NodeRef;
use log::{debug, info};
use regex::{Captures, Regex};

use crate::files;

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];
const LIST_TAGS: &[&str] = &["ul", "ol"];

/// Compiled cleaning rules.
#[derive(Debug, Clone)]
pub struct Cleaner {
  patterns:            Vec<Regex>,
  preserve_id_classes: Vec<String>,
}

fn id_class_order() -> &'static Regex {
  static ID_CLASS: OnceLock<Regex> = OnceLock::new();
  ID_CLASS.get_or_init(|| {
    Regex::new(r#"(?i)(<[^>]+)\s+(id="[^"]*")(\s+)(class="[^"]*")"#)
      .unwrap_or_else(|_| never_matching_regex())
  })
}

fn empty_frame() -> &'static Regex {
  static EMPTY_FRAME: OnceLock<Regex> = OnceLock::new();
  EMPTY_FRAME.get_or_init(|| {
    Regex::new(r#"<div>\s*<div class="Basic-Text-Frame"></div>\s*</div>"#)
      .unwrap_or_else(|_| never_matching_regex())
  })
}

fn generated_id() -> &'static Regex {
  static GENERATED_ID: OnceLock<Regex> = OnceLock::new();
  GENERATED_ID.get_or_init(|| {
    Regex::new(r#"^id="_id"#).unwrap_or_else(|_| never_matching_regex())
  })
}

impl Cleaner {
  /// # Errors
  ///
  /// Returns an error if a configured pattern does not compile.
  pub fn new(config: &CleanerConfig) -> Result<Self> {
    Ok(Self {
      patterns:            config.compile_patterns()?,
      preserve_id_classes: config.preserve_id_classes.clone(),
    })
  }

  /// Put `class` before `id` so that a preserved class is always seen right
  /// before the id it protects.
  #[must_use]
  pub fn invert_attributes(markup: &str) -> String {
    id_class_order()
      .replace_all(markup, "$1 $4$3$2")
      .into_owned()
  }

  /// Delete every match of the configured patterns.
  ///
  /// A generated `id="_id…"` directly preceded by `class="<preserved>" ` is
  /// kept.
  #[must_use]
  pub fn remove_patterns(&self, markup: &str) -> String {
    let mut current = markup.to_owned();
    for pattern in &self.patterns {
      let source = current.clone();
      current = pattern
        .replace_all(&source, |caps: &Captures<'_>| {
          let Some(found) = caps.get(0) else {
            return String::new();
          };
          if self.is_preserved_id(&source[..found.start()], found.as_str()) {
            found.as_str().to_owned()
          } else {
            String::new()
          }
        })
        .into_owned();
    }
    current
  }

  fn is_preserved_id(&self, before: &str, matched: &str) -> bool {
    generated_id().is_match(matched)
      && self
        .preserve_id_classes
        .iter()
        .any(|class| before.ends_with(&format!("class=\"{class}\" ")))
  }

  /// Text-level and tree-level cleaning of one document.
  #[must_use]
  pub fn clean_markup(&self, markup: &str) -> String {
    let inverted = Self::invert_attributes(markup);
    let stripped = self.remove_patterns(&inverted);
    let content = empty_frame().replace_all(&stripped, "").into_owned();

    let document = Document::parse(&content);
    if lift_headings_out_of_lists(&document) > 0 {
      document.to_xhtml()
    } else {
      content
    }
  }
}

/// Move every heading nested in a list item to just after the outermost
/// enclosing list. Headings lifted out of the same list keep their order.
///
/// Returns the number of headings moved.
pub fn lift_headings_out_of_lists(document: &Document) -> usize {
  let mut last_moved: Vec<(NodeRef, NodeRef)> = Vec::new();
  let mut moved = 0;

  for heading in document.elements_named(HEADING_TAGS) {
    if dom::ancestor_named(&heading, &["li"]).is_none() {
      continue;
    }
    let Some(list) = heading
      .ancestors()
      .filter(|ancestor| dom::is_tag(ancestor, LIST_TAGS))
      .last()
    else {
      continue;
    };

    let anchor = last_moved
      .iter()
      .find(|(moved_from, _)| *moved_from == list)
      .map_or_else(|| list.clone(), |(_, previous)| previous.clone());

    heading.detach();
    anchor.insert_after(heading.clone());
    debug!(
      "Moved heading {:?} out of a list",
      heading.text_contents().chars().take(20).collect::<String>()
    );

    match last_moved.iter_mut().find(|(moved_from, _)| *moved_from == list) {
      Some(entry) => entry.1 = heading,
      None => last_moved.push((list, heading)),
    }
    moved += 1;
  }

  moved
}

/// Clean every content document under `content_dir`.
///
/// # Errors
///
/// Returns an error if a pattern is invalid or a file cannot be rewritten.
pub fn run(content_dir: &Path, config: &CleanerConfig) -> Result<usize> {
  info!("Cleaning files in {}...", content_dir.display());
  let cleaner = Cleaner::new(config)?;

  let changed = files::rewrite_content_files(content_dir, |_, content| {
    Ok(Some(cleaner.clean_markup(content)))
  })?;

  info!("Cleaned {changed} file(s)");
  Ok(changed)
}
