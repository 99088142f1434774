//! Analyzer error types.

use std::path::PathBuf;
use thiserror::Error;

/// Failures the analyzer itself can hit before any line is scanned.
///
/// Callers that want the "diagnostics only" contract convert these into a
/// single `syntax-check-failure` diagnostic; see `check_file`.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("failed to read source file '{path}': {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
