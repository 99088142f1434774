//! Core support: analyzer error type and filesystem helpers.

pub mod errors;
pub mod fs_utils;

pub use errors::AnalyzerError;
pub use fs_utils::read_source;
