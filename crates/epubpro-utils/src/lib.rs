//! Pipeline stages that run around the exercise injection.
//!
//! Every stage works on an extracted EPUB tree and rewrites content
//! documents in place. Stages are independent of each other; the order they
//! run in is decided by the caller.
pub mod archive;
pub mod audit;
pub mod cleaner;
pub mod error;
pub mod files;
pub mod fonts;
pub mod interactivity;
pub mod linker;
pub mod ncx;
pub mod package;
pub mod structure;

// Re-export commonly used utilities
pub use archive::{ExtractedEpub, extract_epub, package_epub};
pub use error::ArchiveError;
pub use files::collect_content_files;

