//! Interactivity injection.
//!
//! Every element carrying [`PROMPT_CLASS`] whose text opens with a numeral
//! (`3.` or `03)`) is bound to the answer-key record with that number. The
//! prompt's following element siblings are scanned until the next prompt:
//! option siblings receive a radio input, and the first reveal marker is
//! replaced by the four feedback blocks built in [`blocks`].
//!
//! Prompts without a record, or without a reveal marker, degrade silently.
mod blocks;
mod edit;

use std::sync::OnceLock;

pub use blocks::{
  ANSWER_PARAGRAPH_CLASS,
  CHECK_CLASS,
  COMMENT_PARAGRAPH_CLASS,
  CORRECT_CLASS,
  INCORRECT_CLASS,
  Labels,
};
pub use edit::{Edit, EditScript};
use kuchikikiki::NodeRef;
use log::{debug, trace};
use regex::Regex;

use crate::{
  dom::{self, Document},
  gabarito::{ActivityRecord, GabaritoMap},
  never_matching_regex,
  text,
};

/// Marker class of a question prompt.
pub const PROMPT_CLASS: &str = "_c-Atividade-Enunciado";
/// Marker class of a multiple-choice option.
pub const OPTION_CLASS: &str = "_b-Atividade-alternativa";
/// Marker class of the element the feedback blocks replace.
pub const REVEAL_CLASS: &str = "_r-Atividade-Resposta";

/// Identifiers derived from a prompt number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityIds {
  number: u32,
}

impl ActivityIds {
  #[must_use]
  pub const fn new(number: u32) -> Self {
    Self { number }
  }

  #[must_use]
  pub const fn number(&self) -> u32 {
    self.number
  }

  /// Radio group name, `opc{N}`.
  #[must_use]
  pub fn group(&self) -> String {
    format!("opc{}", self.number)
  }

  #[must_use]
  pub fn incorrect(&self) -> String {
    format!("opc{}E", self.number)
  }

  #[must_use]
  pub fn correct(&self) -> String {
    format!("opc{}C", self.number)
  }

  #[must_use]
  pub fn reveal(&self) -> String {
    format!("opc{}R", self.number)
  }

  #[must_use]
  pub fn check(&self) -> String {
    format!("opc{}D", self.number)
  }

  /// Handler of the right option: shows the correct block.
  #[must_use]
  pub fn on_correct(&self) -> String {
    show_me(&self.correct(), &[
      &self.incorrect(),
      &self.reveal(),
      &self.check(),
    ])
  }

  /// Handler of a wrong option: shows the incorrect block.
  #[must_use]
  pub fn on_incorrect(&self) -> String {
    show_me(&self.incorrect(), &[
      &self.correct(),
      &self.reveal(),
      &self.check(),
    ])
  }

  /// Handler of the reveal control: shows the check block.
  #[must_use]
  pub fn on_reveal(&self) -> String {
    show_me(&self.check(), &[
      &self.incorrect(),
      &self.reveal(),
      &self.correct(),
    ])
  }
}

/// `showMe(show, hide, hide, hide)`.
fn show_me(show: &str, hide: &[&str; 3]) -> String {
  format!(
    "showMe('{show}', '{}', '{}', '{}')",
    hide[0], hide[1], hide[2]
  )
}

/// Outcome counts of one injection pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InjectionReport {
  /// Prompts that received the four feedback blocks.
  pub bound:   usize,
  /// Prompts with a record but no reveal marker before the scan boundary.
  pub partial: usize,
  /// Prompts without a readable number or without a record.
  pub skipped: usize,
  /// Radio inputs inserted.
  pub radios:  usize,
}

fn prompt_number_regex() -> &'static Regex {
  static PROMPT_NUMBER: OnceLock<Regex> = OnceLock::new();
  PROMPT_NUMBER.get_or_init(|| {
    Regex::new(r"^0*(\d+)[\.\)]").unwrap_or_else(|_| never_matching_regex())
  })
}

fn option_letter_regex() -> &'static Regex {
  static OPTION_LETTER: OnceLock<Regex> = OnceLock::new();
  OPTION_LETTER.get_or_init(|| {
    Regex::new(r"^([A-Da-d])[\)\.]").unwrap_or_else(|_| never_matching_regex())
  })
}

/// Number opening a prompt's text, leading zeros ignored.
#[must_use]
pub fn prompt_number(text: &str) -> Option<u32> {
  prompt_number_regex()
    .captures(&text::normalize(text))
    .and_then(|caps| caps.get(1))
    .and_then(|m| m.as_str().parse().ok())
}

/// Lower-cased letter labelling an option such as `b) texto`.
#[must_use]
pub fn option_letter(text: &str) -> Option<char> {
  option_letter_regex()
    .captures(&text::normalize(text))
    .and_then(|caps| caps.get(1))
    .and_then(|m| text::first_letter(m.as_str()))
}

/// Bind every prompt of `document` to its record in `gabarito`.
pub fn inject(
  document: &Document,
  gabarito: &GabaritoMap,
  labels: &Labels,
) -> InjectionReport {
  let mut report = InjectionReport::default();

  for prompt in document.elements_with_class(PROMPT_CLASS) {
    let Some(number) = prompt_number(&prompt.text_contents()) else {
      trace!("Prompt without a leading number skipped");
      report.skipped += 1;
      continue;
    };
    let Some(record) = gabarito.get(&number) else {
      trace!("Prompt {number} has no answer-key record");
      report.skipped += 1;
      continue;
    };

    let plan = plan_prompt(&prompt, record, labels);
    report.radios += plan.radios;
    if plan.bound {
      debug!("Prompt {number} bound ({} edit(s))", plan.script.len());
      report.bound += 1;
    } else {
      debug!("Prompt {number} has no reveal marker; {} radio(s) only", plan.radios);
      report.partial += 1;
    }
    plan.script.apply();
  }

  report
}

struct PromptPlan {
  script: EditScript,
  radios: usize,
  bound:  bool,
}

/// Walk a snapshot of the siblings following `prompt` and record the edits
/// for it, without touching the tree.
fn plan_prompt(
  prompt: &NodeRef,
  record: &ActivityRecord,
  labels: &Labels,
) -> PromptPlan {
  let ids = ActivityIds::new(record.id);
  let correct_letter = text::first_letter(&text::plain_text(&record.answer));
  let mut plan = PromptPlan {
    script: EditScript::default(),
    radios: 0,
    bound:  false,
  };
  let mut multiple_choice = false;

  for sibling in dom::following_elements(prompt) {
    if dom::has_class(&sibling, PROMPT_CLASS) {
      break;
    }

    if dom::has_class(&sibling, OPTION_CLASS) {
      multiple_choice = true;
      if let Some(radio) = radio_for(&sibling, &ids, correct_letter) {
        plan.script.push(Edit::Prepend {
          parent: sibling.clone(),
          node:   radio,
        });
        plan.radios += 1;
      }
    }

    if dom::has_class(&sibling, REVEAL_CLASS) {
      let blocks = blocks::Blocks {
        ids: &ids,
        record,
        labels,
        multiple_choice,
      };
      for node in blocks.build() {
        plan.script.push(Edit::InsertBefore {
          anchor: sibling.clone(),
          node,
        });
      }
      plan.script.push(Edit::Detach(sibling));
      plan.bound = true;
      break;
    }
  }

  plan
}

/// Radio input for an option, unless it is unlabelled or already has one.
fn radio_for(
  option: &NodeRef,
  ids: &ActivityIds,
  correct_letter: Option<char>,
) -> Option<NodeRef> {
  let letter = option_letter(&option.text_contents())?;
  if dom::has_descendant(option, "input") {
    return None;
  }

  let onclick = if Some(letter) == correct_letter {
    ids.on_correct()
  } else {
    ids.on_incorrect()
  };
  Some(dom::new_element("input", &[
    ("type", "radio"),
    ("name", &ids.group()),
    ("value", &letter.to_string()),
    ("onclick", &onclick),
  ]))
}
