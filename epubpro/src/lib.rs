//! Library side of the `epubpro` binary: the command line definition and the
//! pipeline driver. Exposed for the integration tests and the `xtask`
//! completions/manpage generator.
pub mod cli;
pub mod pipeline;

pub use pipeline::{InteractTarget, PipelineReport, interact_files, process_epub};
