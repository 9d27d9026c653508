//! # epubpro-interactive
//!
//! Turns the printed questions and answer key of an EPUB content document
//! into self-checking exercises.
//!
//! Processing a document runs two passes over one parsed tree:
//!
//! 1. [`gabarito::extract`] scans the answer-key section and records, per
//!    activity number, the answer and commentary markup.
//! 2. [`inject::inject`] finds each question prompt, looks up its record and
//!    splices in radio inputs and the reveal/feedback blocks.
//!
//! [`script::ensure_script`] then makes sure the head carries the toggling
//! script exactly once.
//!
//! ```rust
//! use epubpro_interactive::InteractivityProcessor;
//!
//! let processor = InteractivityProcessor::default();
//! let result = processor.process_markup(
//!   "<html><head></head><body>\
//!    <p class=\"_c-Atividade-Enunciado\">1. Qual?</p>\
//!    <p class=\"_b-Atividade-alternativa\">a) Sim</p>\
//!    <p class=\"_b-Atividade-alternativa\">b) Não</p>\
//!    <p class=\"_r-Atividade-Resposta\">Resposta</p>\
//!    <h2>Respostas das atividades</h2>\
//!    <p>Atividade 1</p><p>Resposta: B</p>\
//!    </body></html>",
//! );
//!
//! assert!(result.markup.contains("id=\"opc1C\""));
//! assert_eq!(result.report.injection.bound, 1);
//! ```
//!
//! Nothing here fails on malformed authoring markup: prompts that cannot be
//! bound are left as they are.

pub mod dom;
pub mod gabarito;
pub mod inject;
pub mod processor;
pub mod script;
pub mod text;

pub use dom::Document;
pub use gabarito::{ActivityRecord, GabaritoMap};
pub use inject::{ActivityIds, InjectionReport, Labels};
pub use processor::{DocumentReport, InteractivityProcessor, ProcessedDocument};

/// A regex that never matches anything, the fallback for the `OnceLock`
/// regex statics, which only ever hold literal patterns.
#[must_use]
pub fn never_matching_regex() -> regex::Regex {
  #[allow(
    clippy::unwrap_used,
    reason = "Literal pattern, verified by the test suite"
  )]
  regex::Regex::new(r"[^\s\S]").unwrap()
}
