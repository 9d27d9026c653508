use log::debug;

use crate::{
  dom::Document,
  gabarito,
  inject::{self, InjectionReport, Labels},
  script,
};

/// Runs both passes and the script emitter over one document.
#[derive(Debug, Clone, Default)]
pub struct InteractivityProcessor {
  labels: Labels,
}

/// What happened to one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentReport {
  /// Activity numbers found in the answer key, ascending.
  pub activities:          Vec<u32>,
  /// Elements inside the answer-key section. They remain in the output.
  pub answer_key_elements: usize,
  pub injection:           InjectionReport,
  /// Whether the toggling script was appended to the head.
  pub script_added:        bool,
}

impl DocumentReport {
  /// Whether the document was modified.
  #[must_use]
  pub const fn changed(&self) -> bool {
    self.script_added
      || self.injection.bound > 0
      || self.injection.radios > 0
  }
}

/// Serialised output together with its report.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
  pub markup: String,
  pub report: DocumentReport,
}

impl InteractivityProcessor {
  #[must_use]
  pub const fn new(labels: Labels) -> Self {
    Self { labels }
  }

  /// Extract the answer key, inject the exercises and ensure the script, in
  /// that order. The answer key is local to `document`.
  pub fn process_document(&self, document: &Document) -> DocumentReport {
    let extraction = gabarito::extract(document);
    let injection = inject::inject(document, &extraction.records, &self.labels);
    let script_added = script::ensure_script(document);

    let report = DocumentReport {
      activities: extraction.records.keys().copied().collect(),
      answer_key_elements: extraction.answer_key_section.len(),
      injection,
      script_added,
    };
    debug!(
      "Processed document: {} record(s), {} bound, {} partial, {} skipped, {} \
       radio(s)",
      report.activities.len(),
      injection.bound,
      injection.partial,
      injection.skipped,
      injection.radios
    );
    report
  }

  /// Parse `markup`, process it and serialise the result as XHTML.
  #[must_use]
  pub fn process_markup(&self, markup: &str) -> ProcessedDocument {
    let document = Document::parse(markup);
    let report = self.process_document(&document);
    ProcessedDocument {
      markup: document.to_xhtml(),
      report,
    }
  }
}
