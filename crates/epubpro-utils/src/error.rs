use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors raised while unpacking or packing an EPUB archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
  #[error("Zip error: {0}")]
  Zip(#[from] zip::result::ZipError),

  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Failed to walk directory: {0}")]
  Walk(#[from] walkdir::Error),

  #[error("Archive entry escapes the work directory: {0}")]
  UnsafeEntry(String),

  #[error("OPF file not found in the EPUB extracted to {0}")]
  OpfNotFound(PathBuf),

  #[error("Malformed package document: {0}")]
  Package(#[from] roxmltree::Error),
}
