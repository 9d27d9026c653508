//! Answer-key ("gabarito") extraction.
//!
//! A single forward scan over the block-level elements of a document. The
//! scan is driven by [`ScanState`]: a heading announcing the answers section
//! enters the answer key, an `Atividade N` line starts tracking activity `N`,
//! and a references/bibliography heading moves to [`ScanState::References`],
//! where activity lines are citations until another answer-key heading.
//! While an activity is tracked, `Resposta:` and `Comentário:` lines fill
//! its [`ActivityRecord`]; paragraphs after a comment extend it.
//!
//! Nothing is ever removed from the document here. The elements that belong
//! to the answer-key section are reported in
//! [`Extraction::answer_key_section`] and left in place.
use std::{collections::BTreeMap, sync::OnceLock};

use kuchikikiki::NodeRef;
use log::{debug, trace};
use regex::Regex;

use crate::{
  dom::{self, Document},
  never_matching_regex,
  text,
};

/// Elements visited by the scan, in document order.
const SCANNED_TAGS: &[&str] = &["p", "div", "h1", "h2", "h3", "h4", "li", "span"];

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4"];

/// Containers whose text already covers a nested `span`. A span inside one of
/// these is inline formatting, not a line of the answer key.
const SPAN_CONTAINERS: &[&str] = &["p", "li", "h1", "h2", "h3", "h4"];

/// Answer and commentary markup for one activity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityRecord {
  pub id:      u32,
  /// Inner markup of the `Resposta:` line, label stripped. Overwritten by a
  /// later answer line, never appended.
  pub answer:  String,
  /// Inner markup of the `Comentário:` line plus any continuation
  /// paragraphs, space-joined.
  pub comment: String,
}

impl ActivityRecord {
  #[must_use]
  pub const fn new(id: u32) -> Self {
    Self {
      id,
      answer: String::new(),
      comment: String::new(),
    }
  }
}

/// Activity number to record. At most one record per number.
pub type GabaritoMap = BTreeMap<u32, ActivityRecord>;

/// Position of the scan within the document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanState {
  /// Outside the answer key, no activity tracked.
  #[default]
  Idle,
  /// Inside the answer-key section, no activity tracked yet.
  AnswerKey,
  /// Tracking an activity outside the answer-key section.
  Tracking(u32),
  /// Tracking an activity inside the answer-key section.
  TrackingInAnswerKey(u32),
  /// After a references heading. Activity lines are ignored here.
  References,
}

impl ScanState {
  /// A heading announcing the answers section was seen.
  #[must_use]
  pub const fn enter_answer_key(self) -> Self {
    match self {
      Self::Idle | Self::AnswerKey | Self::References => Self::AnswerKey,
      Self::Tracking(id) | Self::TrackingInAnswerKey(id) => {
        Self::TrackingInAnswerKey(id)
      },
    }
  }

  /// An `Atividade N` line was seen.
  #[must_use]
  pub const fn track(self, id: u32) -> Self {
    match self {
      Self::References => Self::References,
      Self::AnswerKey | Self::TrackingInAnswerKey(_) => {
        Self::TrackingInAnswerKey(id)
      },
      Self::Idle | Self::Tracking(_) => Self::Tracking(id),
    }
  }

  /// A references or bibliography heading was seen.
  #[must_use]
  pub const fn leave(self) -> Self {
    Self::References
  }

  /// Whether an `Atividade N` line starts a record in this state.
  #[must_use]
  pub const fn accepts_activity(self) -> bool {
    !matches!(self, Self::References)
  }

  #[must_use]
  pub const fn activity(self) -> Option<u32> {
    match self {
      Self::Tracking(id) | Self::TrackingInAnswerKey(id) => Some(id),
      Self::Idle | Self::AnswerKey | Self::References => None,
    }
  }

  #[must_use]
  pub const fn in_answer_key(self) -> bool {
    matches!(self, Self::AnswerKey | Self::TrackingInAnswerKey(_))
  }
}

/// Result of scanning one document.
#[derive(Debug, Default)]
pub struct Extraction {
  pub records:            GabaritoMap,
  /// Elements visited while inside the answer-key section. Kept for
  /// reporting only; the section stays in the output document.
  pub answer_key_section: Vec<NodeRef>,
}

struct Patterns {
  answer_key_heading: Regex,
  references_heading: Regex,
  activity:           Regex,
  activity_prefix:    Regex,
  answer:             Regex,
  comment:            Regex,
  label:              Regex,
  leading_colon:      Regex,
}

fn patterns() -> &'static Patterns {
  static PATTERNS: OnceLock<Patterns> = OnceLock::new();
  PATTERNS.get_or_init(|| {
    let compile =
      |pattern: &str| Regex::new(pattern).unwrap_or_else(|_| never_matching_regex());
    Patterns {
      // Matched against accent-stripped, lower-cased text
      answer_key_heading: compile(
        r"\b(respostas?\s.*atividades|atividades\s.*respostas?|answers?\s.*activit(y|ies)|activit(y|ies)\s.*answers?)\b",
      ),
      references_heading: compile(
        r"^(referencias|referencia|bibliografia|leitura|references?|bibliography|further reading)",
      ),
      activity:           compile(r"(?i)^(?:atividade|activity)[:\s]*0*(\d+)"),
      activity_prefix:    compile(r"(?i)^(?:atividade|activity)"),
      answer:             compile(r"(?i)^(?:resposta|answer)\b"),
      comment:            compile(r"(?i)^(?:comentário|comentario|comment)\b"),
      label:              compile(
        r"(?i)^\s*(?:resposta|answer|comentário|comentario|comment)\b(?:\s*:)?\s*",
      ),
      leading_colon:      compile(r"^\s*:\s*"),
    }
  })
}

/// Activity number announced by a line such as `Atividade 07`.
#[must_use]
pub fn activity_number(text: &str) -> Option<u32> {
  patterns()
    .activity
    .captures(text)
    .and_then(|caps| caps.get(1))
    .and_then(|m| m.as_str().parse().ok())
}

/// Whether the scan should consider `element` a line of its own.
fn is_scanned(element: &NodeRef) -> bool {
  if !dom::is_tag(element, SCANNED_TAGS) {
    return false;
  }
  !dom::is_tag(element, &["span"])
    || dom::ancestor_named(element, SPAN_CONTAINERS).is_none()
}

/// Inner markup of `element` with the leading `Resposta:`/`Comentário:`
/// label removed from its first non-blank text node.
#[must_use]
pub fn strip_label(markup: &str) -> String {
  let nodes = dom::parse_fragment(markup);
  let mut texts = nodes
    .iter()
    .flat_map(NodeRef::inclusive_descendants)
    .filter(|node| {
      node
        .as_text()
        .is_some_and(|text| !text.borrow().trim().is_empty())
    });

  if let Some(first) = texts.next() {
    if let Some(text) = first.as_text() {
      let stripped = patterns().label.replace(&text.borrow(), "").into_owned();
      let emptied = stripped.trim().is_empty();
      *text.borrow_mut() = stripped;

      // `<strong>Resposta</strong>: C` leaves the colon in the next text node
      if emptied {
        if let Some(next) = texts.next() {
          if let Some(text) = next.as_text() {
            let stripped =
              patterns().leading_colon.replace(&text.borrow(), "").into_owned();
            *text.borrow_mut() = stripped;
          }
        }
      }
    }
  }

  dom::nodes_markup(&nodes).trim().to_owned()
}

/// Scan `document` and build its answer-key records.
#[must_use]
pub fn extract(document: &Document) -> Extraction {
  let patterns = patterns();
  let mut state = ScanState::default();
  let mut extraction = Extraction::default();

  for element in document.elements_named(SCANNED_TAGS) {
    if !is_scanned(&element) {
      continue;
    }

    let line = text::normalize(&element.text_contents());

    if dom::is_tag(&element, HEADING_TAGS) {
      let folded = text::fold_for_match(&line);
      if patterns.answer_key_heading.is_match(&folded) {
        trace!("Answer-key heading: {line:?}");
        state = state.enter_answer_key();
      }
      if patterns.references_heading.is_match(&folded) {
        trace!("References heading ends the answer key: {line:?}");
        state = state.leave();
        continue;
      }
    }

    if state.in_answer_key() {
      extraction.answer_key_section.push(element.clone());
    }

    if let Some(id) = activity_number(&line) {
      if !state.accepts_activity() {
        trace!("Citation after references, not an activity: {line:?}");
        continue;
      }
      state = state.track(id);
      extraction
        .records
        .entry(id)
        .or_insert_with(|| ActivityRecord::new(id));
      continue;
    }

    let Some(id) = state.activity() else {
      continue;
    };
    let Some(record) = extraction.records.get_mut(&id) else {
      continue;
    };

    if patterns.answer.is_match(&line) {
      record.answer = strip_label(&dom::inner_markup(&element));
      trace!("Activity {id}: answer {:?}", record.answer);
    } else if patterns.comment.is_match(&line) {
      record.comment = strip_label(&dom::inner_markup(&element));
      trace!("Activity {id}: comment started");
    } else if !record.comment.is_empty()
      && !patterns.activity_prefix.is_match(&line)
    {
      record.comment.push(' ');
      record.comment.push_str(dom::inner_markup(&element).trim());
    }
  }

  debug!(
    "Extracted {} answer-key record(s), {} element(s) in the answer-key \
     section",
    extraction.records.len(),
    extraction.answer_key_section.len()
  );

  extraction
}
