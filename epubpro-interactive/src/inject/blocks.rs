//! Construction of the feedback blocks attached to a bound prompt.
//!
//! The ids and classes produced here are consumed by the publisher's
//! stylesheet and by the toggling script, so their spelling is fixed.
use kuchikikiki::NodeRef;
use serde::{Deserialize, Serialize};

use super::ActivityIds;
use crate::{dom, gabarito::ActivityRecord, text};

pub const INCORRECT_CLASS: &str = "questaoErrada";
pub const CORRECT_CLASS: &str = "questaoCorreta";
pub const CHECK_CLASS: &str = "questaoConfira";
pub const ANSWER_PARAGRAPH_CLASS: &str = "_1-Corpo-Resposta";
pub const COMMENT_PARAGRAPH_CLASS: &str = "_1-Corpo-Comentario";
const RULE_CLASS: &str = "resposta";

/// Fixed sentences written into the generated blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
  /// Text of the reveal control.
  pub reveal:    String,
  /// Sentence shown when the chosen option is right.
  pub correct:   String,
  /// Lead-in before the quoted correct option after a wrong choice.
  pub incorrect: String,
  /// Lead-in before the quoted correct option when the answer is revealed.
  pub check:     String,
}

impl Default for Labels {
  fn default() -> Self {
    Self {
      reveal:    "Confira aqui a resposta".to_string(),
      correct:   "Resposta correta.".to_string(),
      incorrect: "Resposta incorreta. A alternativa correta é a".to_string(),
      check:     "A alternativa correta é a".to_string(),
    }
  }
}

impl Labels {
  /// Every label, in block order.
  #[must_use]
  pub fn all(&self) -> [&str; 4] {
    [&self.reveal, &self.incorrect, &self.correct, &self.check]
  }
}

/// Everything the block builders need for one prompt.
pub struct Blocks<'a> {
  pub ids:             &'a ActivityIds,
  pub record:          &'a ActivityRecord,
  pub labels:          &'a Labels,
  pub multiple_choice: bool,
}

impl Blocks<'_> {
  /// The four elements, in insertion order: reveal control, incorrect,
  /// correct, check.
  #[must_use]
  pub fn build(&self) -> [NodeRef; 4] {
    [
      self.reveal_control(),
      self.incorrect(),
      self.correct(),
      self.check(),
    ]
  }

  fn reveal_control(&self) -> NodeRef {
    let control = dom::new_element("div", &[
      ("id", &self.ids.reveal()),
      ("onclick", &self.ids.on_reveal()),
    ]);
    control.append(dom::new_text_element(
      "p",
      &[("class", super::REVEAL_CLASS)],
      &self.labels.reveal,
    ));
    control
  }

  fn incorrect(&self) -> NodeRef {
    let block = dom::new_element("div", &[
      ("class", INCORRECT_CLASS),
      ("id", &self.ids.incorrect()),
    ]);
    if self.multiple_choice {
      block.append(self.quoted_answer(&self.labels.incorrect));
    }
    block.append(rule());
    block.append(self.comment_paragraph());
    block
  }

  fn correct(&self) -> NodeRef {
    let block = dom::new_element("div", &[
      ("class", CORRECT_CLASS),
      ("id", &self.ids.correct()),
    ]);
    block.append(dom::new_text_element(
      "p",
      &[("class", ANSWER_PARAGRAPH_CLASS)],
      &self.labels.correct,
    ));
    block.append(rule());
    block.append(self.comment_paragraph());
    block
  }

  /// Multiple choice restates the right option; an open-ended prompt shows
  /// the stored answer as a model answer instead.
  fn check(&self) -> NodeRef {
    let block = dom::new_element("div", &[
      ("class", CHECK_CLASS),
      ("id", &self.ids.check()),
    ]);

    if self.multiple_choice {
      block.append(self.quoted_answer(&self.labels.check));
      block.append(rule());
      block.append(self.comment_paragraph());
    } else {
      if !self.record.answer.is_empty() {
        let paragraph =
          dom::new_element("p", &[("class", COMMENT_PARAGRAPH_CLASS)]);
        dom::append_all(&paragraph, dom::parse_fragment(&self.record.answer));
        block.append(paragraph);
      }
      if !self.record.comment.is_empty() {
        block.append(self.comment_paragraph());
      }
    }
    block
  }

  /// `<lead> "<answer markup>".`
  fn quoted_answer(&self, lead: &str) -> NodeRef {
    let paragraph = dom::new_text_element(
      "p",
      &[("class", ANSWER_PARAGRAPH_CLASS)],
      &format!("{lead} \""),
    );
    dom::append_all(&paragraph, dom::parse_fragment(&self.record.answer));
    paragraph.append(NodeRef::new_text("\"."));
    paragraph
  }

  /// Comment paragraph; left empty when the comment has no visible text.
  fn comment_paragraph(&self) -> NodeRef {
    let paragraph = dom::new_element("p", &[("class", COMMENT_PARAGRAPH_CLASS)]);
    if !text::plain_text(&self.record.comment).is_empty() {
      dom::append_all(&paragraph, dom::parse_fragment(&self.record.comment));
    }
    paragraph
  }
}

fn rule() -> NodeRef {
  dom::new_element("hr", &[("class", RULE_CLASS)])
}
