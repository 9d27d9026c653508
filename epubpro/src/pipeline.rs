//! The full post-processing run over one EPUB.
//!
//! The book is extracted into a temporary directory, every stage rewrites
//! the extracted tree in place, and the tree is packaged into the output
//! file. The temporary directory is removed when the run ends, whether it
//! succeeded or not.
use std::{
  fs,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, bail};
use epubpro_config::Config;
use epubpro_interactive::{InteractivityProcessor, ProcessedDocument};
use epubpro_utils::{
  audit,
  cleaner,
  extract_epub,
  fonts,
  interactivity::{self, InteractivitySummary},
  linker,
  ncx,
  package_epub,
  structure,
};
use log::{debug, info, warn};

/// Outcome of [`process_epub`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
  pub interactivity: InteractivitySummary,
  /// `None` when auditing is disabled.
  pub audit_passed:  Option<bool>,
  /// Links created by the URL linker.
  pub links:         usize,
  /// Fonts added to the manifest.
  pub fonts_added:   usize,
  pub ncx_written:   bool,
}

/// Run every enabled stage over `input` and write the result to `output`.
///
/// # Errors
///
/// Returns an error if the input cannot be unpacked, a stage fails, or the
/// output cannot be written. Audit mismatches are reported, never raised.
pub fn process_epub(
  input: &Path,
  output: &Path,
  config: &Config,
) -> Result<PipelineReport> {
  if !input.is_file() {
    bail!("Input EPUB not found: {}", input.display());
  }
  info!("Processing {} -> {}", input.display(), output.display());

  let work_dir = tempfile::Builder::new()
    .prefix("epubpro-")
    .tempdir()
    .wrap_err("Failed to create a temporary work directory")?;
  debug!("Work directory: {}", work_dir.path().display());

  let book = extract_epub(input, work_dir.path())
    .wrap_err_with(|| format!("Failed to extract {}", input.display()))?;
  let content_dir = &book.content_dir;
  let labels = &config.interactivity.labels;

  let before = if config.audit {
    Some(audit::count_elements(content_dir, "BEFORE", labels)?)
  } else {
    None
  };

  cleaner::run(content_dir, &config.cleaner)?;
  structure::run(content_dir)?;

  let mut report = PipelineReport::default();
  if config.interactivity.enable {
    report.interactivity = interactivity::run(content_dir, labels)?;
  } else {
    info!("Interactivity disabled, skipping");
  }

  if config.enable_url_linker {
    report.links = linker::run(content_dir)?;
  }

  if let Some(fonts_dir) = config.existing_fonts_dir() {
    report.fonts_added = fonts::run(content_dir, &book.opf_path, fonts_dir)?;
  } else if let Some(fonts_dir) = &config.fonts_dir {
    warn!("Fonts directory not found: {}", fonts_dir.display());
  }

  if config.generate_ncx {
    report.ncx_written = ncx::run(&book.opf_path)?;
  }

  if let Some(before) = before {
    let after = audit::count_elements(content_dir, "AFTER", labels)?;
    report.audit_passed = Some(audit::compare(&before, &after));
  }

  if let Some(parent) = output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
    fs::create_dir_all(parent)
      .wrap_err_with(|| format!("Failed to create {}", parent.display()))?;
  }
  package_epub(&book.root, output)
    .wrap_err_with(|| format!("Failed to package {}", output.display()))?;

  info!("Processed EPUB written to {}", output.display());
  Ok(report)
}

/// Where [`interact_files`] writes its results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractTarget {
  /// Only report what would change.
  DryRun,
  InPlace,
  Directory(PathBuf),
}

/// Run the exercise injection over loose content files.
///
/// Every file is processed on its own, as inside an EPUB. Returns the
/// number of files that changed.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written.
pub fn interact_files(
  files: &[PathBuf],
  target: &InteractTarget,
  config: &Config,
) -> Result<usize> {
  let processor = InteractivityProcessor::new(config.interactivity.labels.clone());
  if let InteractTarget::Directory(dir) = target {
    fs::create_dir_all(dir)
      .wrap_err_with(|| format!("Failed to create {}", dir.display()))?;
  }

  let mut changed = 0;
  for path in files {
    let content = fs::read_to_string(path)
      .wrap_err_with(|| format!("Failed to read {}", path.display()))?;
    let ProcessedDocument { markup, report } = processor.process_markup(&content);
    info!(
      "{}: {} record(s), {} bound, {} without reveal marker, {} skipped",
      path.display(),
      report.activities.len(),
      report.injection.bound,
      report.injection.partial,
      report.injection.skipped
    );
    if report.changed() {
      changed += 1;
    }

    let destination = match target {
      InteractTarget::DryRun => continue,
      InteractTarget::InPlace if !report.changed() => continue,
      InteractTarget::InPlace => path.clone(),
      InteractTarget::Directory(dir) => {
        let Some(name) = path.file_name() else {
          bail!("Not a file: {}", path.display());
        };
        dir.join(name)
      },
    };
    fs::write(&destination, markup)
      .wrap_err_with(|| format!("Failed to write {}", destination.display()))?;
    debug!("Wrote {}", destination.display());
  }

  Ok(changed)
}
