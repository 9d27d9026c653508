use std::{
  fs::{self, File},
  io::{self, Write},
  path::{Path, PathBuf},
};

use log::{debug, info};
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipArchive, ZipWriter, write::SimpleFileOptions};

use crate::error::ArchiveError;

const MIMETYPE: &str = "mimetype";
const EPUB_MIMETYPE: &[u8] = b"application/epub+zip";

/// Paths inside an extracted EPUB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedEpub {
  /// Directory the archive was extracted into.
  pub root:        PathBuf,
  /// The package document.
  pub opf_path:    PathBuf,
  /// Directory holding the OPF; manifest hrefs are relative to it.
  pub content_dir: PathBuf,
}

/// Extract `epub` into `work_dir` and locate its package document.
///
/// The first `*.opf` file in sorted walk order is used.
///
/// # Errors
///
/// Returns an error if the archive cannot be read, an entry would land
/// outside `work_dir`, or no OPF file exists.
pub fn extract_epub(
  epub: &Path,
  work_dir: &Path,
) -> Result<ExtractedEpub, ArchiveError> {
  let mut archive = ZipArchive::new(File::open(epub)?)?;
  fs::create_dir_all(work_dir)?;

  for index in 0..archive.len() {
    let mut entry = archive.by_index(index)?;
    let relative = entry
      .enclosed_name()
      .ok_or_else(|| ArchiveError::UnsafeEntry(entry.name().to_owned()))?;
    let target = work_dir.join(relative);

    if entry.is_dir() {
      fs::create_dir_all(&target)?;
      continue;
    }
    if let Some(parent) = target.parent() {
      fs::create_dir_all(parent)?;
    }
    let mut out = File::create(&target)?;
    io::copy(&mut entry, &mut out)?;
  }
  debug!("Extracted {} entries to {}", archive.len(), work_dir.display());

  let opf_path = find_opf(work_dir)?
    .ok_or_else(|| ArchiveError::OpfNotFound(work_dir.to_path_buf()))?;
  let content_dir = opf_path
    .parent()
    .map_or_else(|| work_dir.to_path_buf(), Path::to_path_buf);

  Ok(ExtractedEpub {
    root: work_dir.to_path_buf(),
    opf_path,
    content_dir,
  })
}

fn find_opf(dir: &Path) -> Result<Option<PathBuf>, ArchiveError> {
  for entry in WalkDir::new(dir).sort_by_file_name() {
    let entry = entry?;
    let path = entry.path();
    if entry.file_type().is_file()
      && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("opf"))
    {
      return Ok(Some(path.to_path_buf()));
    }
  }
  Ok(None)
}

/// Zip `source_dir` into an EPUB at `output`.
///
/// `mimetype` is written first and stored uncompressed, as reading systems
/// require; it is created when missing. Every other file follows, deflated,
/// in sorted order with `/`-separated names.
///
/// # Errors
///
/// Returns an error if a file cannot be read or the archive cannot be
/// written.
pub fn package_epub(source_dir: &Path, output: &Path) -> Result<(), ArchiveError> {
  let mimetype_path = source_dir.join(MIMETYPE);
  if !mimetype_path.exists() {
    debug!("No mimetype file in {}; creating one", source_dir.display());
    fs::write(&mimetype_path, EPUB_MIMETYPE)?;
  }

  let stored =
    SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
  let deflated =
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

  let mut zip = ZipWriter::new(File::create(output)?);
  zip.start_file(MIMETYPE, stored)?;
  zip.write_all(&fs::read(&mimetype_path)?)?;

  let mut written = 1usize;
  for entry in WalkDir::new(source_dir).sort_by_file_name() {
    let entry = entry?;
    if !entry.file_type().is_file() {
      continue;
    }
    let Ok(relative) = entry.path().strip_prefix(source_dir) else {
      continue;
    };
    let name = relative
      .components()
      .map(|component| component.as_os_str().to_string_lossy())
      .collect::<Vec<_>>()
      .join("/");
    if name == MIMETYPE {
      continue;
    }

    zip.start_file(name, deflated)?;
    zip.write_all(&fs::read(entry.path())?)?;
    written += 1;
  }
  zip.finish()?;

  info!("Packaged {written} file(s) into {}", output.display());
  Ok(())
}

#[cfg(test)]
mod tests {
  #![allow(clippy::expect_used, reason = "Fine in tests")]
  use super::*;

  #[test]
  fn missing_opf_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let src = dir.path().join("src");
    fs::create_dir_all(src.join("OEBPS")).expect("mkdir");
    fs::write(src.join("OEBPS/chapter.xhtml"), "<html/>").expect("write");

    let epub = dir.path().join("book.epub");
    package_epub(&src, &epub).expect("package");

    let err = extract_epub(&epub, &dir.path().join("out")).expect_err("no opf");
    assert!(matches!(err, ArchiveError::OpfNotFound(_)));
  }
}
