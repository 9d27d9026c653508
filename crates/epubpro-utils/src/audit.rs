//! Before/after element accounting.
//!
//! The pipeline counts structural elements once on the freshly extracted
//! book and once before packaging. Images, tables, rows, list items and
//! prompts must survive processing unchanged. Paragraphs are reported after
//! discounting the ones the injector generates, but a paragraph difference
//! never fails the audit.
use std::{fmt, fs, path::Path};

use color_eyre::eyre::{Context, Result};
use epubpro_interactive::{
  Document,
  Labels,
  dom,
  inject::{
    ANSWER_PARAGRAPH_CLASS,
    COMMENT_PARAGRAPH_CLASS,
    PROMPT_CLASS,
    REVEAL_CLASS,
  },
};
use log::{error, info, warn};

use crate::files;

/// Element totals over every content document of a book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementCounts {
  /// Authored paragraphs; generated ones are not counted.
  pub p:        usize,
  pub img:      usize,
  pub table:    usize,
  pub tr:       usize,
  /// Radio buttons and any other `input`.
  pub input:    usize,
  pub li:       usize,
  /// Question prompts.
  pub activity: usize,
}

impl fmt::Display for ElementCounts {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "p={} img={} table={} tr={} input={} li={} activity={}",
      self.p, self.img, self.table, self.tr, self.input, self.li, self.activity
    )
  }
}

impl ElementCounts {
  /// Counts for a single document.
  #[must_use]
  pub fn of_document(document: &Document, labels: &Labels) -> Self {
    let count = |tag: &str| document.elements_named(&[tag]).len();
    let generated_texts = labels.all();

    let p = document
      .elements_named(&["p"])
      .iter()
      .filter(|paragraph| {
        let classes = dom::class_list(paragraph);
        let generated_class = [
          COMMENT_PARAGRAPH_CLASS,
          ANSWER_PARAGRAPH_CLASS,
          REVEAL_CLASS,
        ]
        .iter()
        .any(|class| classes.contains(class));
        if generated_class {
          return false;
        }
        let text = paragraph.text_contents();
        let text = text.trim();
        !generated_texts
          .iter()
          .any(|label| !label.is_empty() && text.starts_with(label))
      })
      .count();

    Self {
      p,
      img: count("img"),
      table: count("table"),
      tr: count("tr"),
      input: count("input"),
      li: count("li"),
      activity: document.elements_with_class(PROMPT_CLASS).len(),
    }
  }
}

impl std::ops::AddAssign for ElementCounts {
  fn add_assign(&mut self, other: Self) {
    self.p += other.p;
    self.img += other.img;
    self.table += other.table;
    self.tr += other.tr;
    self.input += other.input;
    self.li += other.li;
    self.activity += other.activity;
  }
}

/// Count elements over every content document under `content_dir`.
///
/// `stage` only labels the log line.
///
/// # Errors
///
/// Returns an error if a content file cannot be read.
pub fn count_elements(
  content_dir: &Path,
  stage: &str,
  labels: &Labels,
) -> Result<ElementCounts> {
  info!("[{stage}] Auditing content elements...");

  let mut totals = ElementCounts::default();
  for path in files::collect_content_files(content_dir) {
    let content = fs::read_to_string(&path)
      .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    totals += ElementCounts::of_document(&Document::parse(&content), labels);
  }

  info!("[{stage}] Stats: {totals}");
  Ok(totals)
}

/// Log the comparison of two counts. Returns whether every strictly
/// checked element kind kept its count.
pub fn compare(before: &ElementCounts, after: &ElementCounts) -> bool {
  info!("=== AUDIT REPORT ===");

  let strict = [
    ("IMG", before.img, after.img),
    ("TABLE", before.table, after.table),
    ("TR", before.tr, after.tr),
    ("LI", before.li, after.li),
    ("ACTIVITY", before.activity, after.activity),
  ];

  let mut matched = true;
  for (name, start, end) in strict {
    if start == end {
      info!("MATCH: {name} count: {start}");
    } else {
      warn!("MISMATCH: {name} - Before: {start}, After: {end}");
      matched = false;
    }
  }

  if before.p == after.p {
    info!("MATCH: Paragraphs (adjusted): {}", before.p);
  } else {
    #[allow(
      clippy::cast_possible_wrap,
      reason = "Paragraph counts are far below isize::MAX"
    )]
    let diff = after.p as isize - before.p as isize;
    warn!(
      "MISMATCH: Paragraphs - Before: {}, After (adjusted): {} (Diff: {diff})",
      before.p, after.p
    );
  }

  if matched {
    info!("SUCCESS: Content elements preserved.");
  } else {
    error!("FAILURE: Content elements count mismatch.");
  }
  matched
}
