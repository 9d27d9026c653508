use std::{fs, path::Path};

use color_eyre::eyre::{Context, Result};
use epubpro_interactive::{InteractivityProcessor, Labels};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::files;

/// Totals over every document the stage touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractivitySummary {
  pub files:   usize,
  /// Files written back.
  pub changed: usize,
  /// Answer-key records found.
  pub records: usize,
  pub bound:   usize,
  pub partial: usize,
  pub skipped: usize,
  pub radios:  usize,
}

fn progress_bar(len: usize) -> ProgressBar {
  let bar = ProgressBar::new(len as u64);
  let style = ProgressStyle::with_template("{prefix} [{bar:30}] {pos}/{len} {msg}")
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("=> ");
  bar.set_style(style);
  bar.set_prefix("Interactivity");
  bar
}

/// Run the answer-key extraction and exercise injection over every content
/// document under `content_dir`.
///
/// Each document is processed on its own: an answer key only binds prompts
/// in the file it appears in.
///
/// # Errors
///
/// Returns an error if a content file cannot be read or written.
pub fn run(content_dir: &Path, labels: &Labels) -> Result<InteractivitySummary> {
  info!("Injecting interactivity...");

  let processor = InteractivityProcessor::new(labels.clone());
  let paths = files::collect_content_files(content_dir);
  let bar = progress_bar(paths.len());
  let mut summary = InteractivitySummary {
    files: paths.len(),
    ..InteractivitySummary::default()
  };

  for path in &paths {
    if let Some(name) = path.file_name() {
      bar.set_message(name.to_string_lossy().into_owned());
    }

    let content = fs::read_to_string(path)
      .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    let processed = processor.process_markup(&content);
    let report = &processed.report;

    summary.records += report.activities.len();
    summary.bound += report.injection.bound;
    summary.partial += report.injection.partial;
    summary.skipped += report.injection.skipped;
    summary.radios += report.injection.radios;

    if report.changed() {
      fs::write(path, &processed.markup)
        .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
      summary.changed += 1;
      debug!(
        "{}: {} exercise(s), {} radio(s)",
        path.display(),
        report.injection.bound,
        report.injection.radios
      );
    }
    bar.inc(1);
  }
  bar.finish_and_clear();

  info!(
    "Interactivity completed: {} record(s), {} exercise(s) bound, {} without \
     reveal marker, {} skipped, {} file(s) updated",
    summary.records, summary.bound, summary.partial, summary.skipped, summary.changed
  );
  Ok(summary)
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn answer_keys_stay_in_their_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
      dir.path().join("a.xhtml"),
      "<html><head></head><body>\
       <p class=\"_c-Atividade-Enunciado\">1. Explique.</p>\
       <p class=\"_r-Atividade-Resposta\">Confira</p>\
       <p>Atividade 1</p><p>Resposta: Porque sim.</p></body></html>",
    )
    .expect("write a");
    fs::write(
      dir.path().join("b.xhtml"),
      "<html><head></head><body>\
       <p class=\"_c-Atividade-Enunciado\">1. Outra.</p>\
       <p class=\"_r-Atividade-Resposta\">Confira</p></body></html>",
    )
    .expect("write b");

    let summary = run(dir.path(), &Labels::default()).expect("stage runs");
    assert_eq!(summary.files, 2);
    assert_eq!(summary.records, 1);
    assert_eq!(summary.bound, 1);
    assert_eq!(summary.skipped, 1);

    let a = fs::read_to_string(dir.path().join("a.xhtml")).expect("read a");
    let b = fs::read_to_string(dir.path().join("b.xhtml")).expect("read b");
    assert!(a.contains("id=\"opc1D\""));
    assert!(!b.contains("id=\"opc1D\""));
    // The script is still added to every document with a head
    assert!(b.contains("showMe"));
  }
}
