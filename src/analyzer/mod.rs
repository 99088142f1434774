//! The static analysis pipeline: preprocessing, block balancing, symbol
//! tracking, member validation, heuristics and the aggregation engine.

pub mod blocks;
pub mod engine;
pub mod heuristics;
pub mod members;
pub mod preprocess;
pub mod symbols;

pub use blocks::{BlockFrame, BlockKind, BlockTracker};
pub use engine::{analyze, check_file, SyntaxChecker};
pub use symbols::{SymbolRecord, SymbolTracker};
