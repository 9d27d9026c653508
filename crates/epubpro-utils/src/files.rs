use std::{
  fs,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result};
use log::{debug, trace};
use walkdir::WalkDir;

/// Every `*.xhtml`/`*.html` file under `dir`, sorted.
#[must_use]
pub fn collect_content_files(dir: &Path) -> Vec<PathBuf> {
  let mut files: Vec<PathBuf> = WalkDir::new(dir)
    .follow_links(true)
    .into_iter()
    .filter_map(std::result::Result::ok)
    .filter(|entry| entry.file_type().is_file())
    .map(walkdir::DirEntry::into_path)
    .filter(|path| is_content_file(path))
    .collect();
  files.sort();

  trace!("Found {} content file(s) under {}", files.len(), dir.display());
  files
}

fn is_content_file(path: &Path) -> bool {
  path.extension().is_some_and(|ext| {
    ext.eq_ignore_ascii_case("xhtml") || ext.eq_ignore_ascii_case("html")
  })
}

/// Run `transform` over every content file under `dir`, writing back the
/// files whose markup changed.
///
/// `transform` returns `None` to leave a file alone.
///
/// # Errors
///
/// Returns an error if a file cannot be read or written, or if `transform`
/// fails.
pub fn rewrite_content_files<F>(dir: &Path, mut transform: F) -> Result<usize>
where
  F: FnMut(&Path, &str) -> Result<Option<String>>,
{
  let mut changed = 0;
  for path in collect_content_files(dir) {
    let content = fs::read_to_string(&path)
      .wrap_err_with(|| format!("Failed to read {}", path.display()))?;

    let Some(updated) = transform(&path, &content)
      .wrap_err_with(|| format!("Failed to process {}", path.display()))?
    else {
      continue;
    };
    if updated == content {
      continue;
    }

    fs::write(&path, updated)
      .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
    debug!("Rewrote {}", path.display());
    changed += 1;
  }
  Ok(changed)
}
