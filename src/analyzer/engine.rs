//! Diagnostic aggregation engine.
//!
//! Drives one forward pass over all lines, invoking the preprocessor, block
//! validator, symbol tracker and member validator per line, then a second
//! order-independent pass over the accumulated symbol tables. Diagnostics
//! come out in natural emission order: the large-program notice first, then
//! per-line findings in line order, then cross-reference findings.

use std::path::Path;

use tracing::debug;

use crate::analyzer::blocks::BlockTracker;
use crate::analyzer::symbols::SymbolTracker;
use crate::analyzer::{heuristics, members, preprocess};
use crate::core::fs_utils;
use crate::diagnostics::{codes, Diagnostic, Severity};

/// Line count above which the large-program notice fires.
const LARGE_PROGRAM_LINES: usize = 1000;

/// The syntax checker. Stateless between runs; every call to [`check`]
/// builds fresh transient tables, so independent documents can be analyzed
/// from separate calls concurrently.
///
/// [`check`]: SyntaxChecker::check
#[derive(Debug, Default)]
pub struct SyntaxChecker;

impl SyntaxChecker {
    pub fn new() -> Self {
        Self
    }

    /// Analyze the full source text and return the ordered diagnostic list.
    /// Never fails; an empty input yields an empty list.
    pub fn check(&self, source: &str) -> Vec<Diagnostic> {
        let lines: Vec<&str> = source.split('\n').collect();
        let mut diagnostics = Vec::new();

        if lines.len() > LARGE_PROGRAM_LINES {
            diagnostics.push(Diagnostic::new(
                1,
                Severity::Information,
                codes::LARGE_PROGRAM,
                format!(
                    "Large program detected ({} lines). Consider breaking it into smaller modules.",
                    lines.len()
                ),
            ));
        }

        let mut blocks = BlockTracker::new();
        let mut symbols = SymbolTracker::new();

        for (index, raw) in lines.iter().enumerate() {
            let line_num = index + 1;
            let code = preprocess::code_of(raw);
            let trimmed = code.trim();
            if trimmed.is_empty() {
                continue;
            }

            heuristics::check_unbalanced_quotes(code, line_num, &mut diagnostics);
            heuristics::check_semicolon(code, line_num, &mut diagnostics);
            heuristics::check_lowercase_keywords(code, line_num, &mut diagnostics);
            heuristics::check_malformed_assignment(code, line_num, &mut diagnostics);
            heuristics::check_infinite_loop(code, line_num, source, &mut diagnostics);

            symbols.track_assignments(code, line_num);
            symbols.track_usages(code, line_num);

            if let Some(sub_name) = blocks.process_line(code, line_num, &lines, index, &mut diagnostics)
            {
                symbols.define_subroutine(&sub_name, line_num);
            }
            symbols.track_subroutine_call(code, line_num);

            members::check_member_access(code, line_num, &symbols, &mut diagnostics);

            heuristics::check_zero_index_array(code, line_num, &mut diagnostics);
            heuristics::check_zero_based_loop(code, line_num, &mut diagnostics);

            symbols.track_labels(code, line_num, &mut diagnostics);
            symbols.track_goto(code, line_num);

            if index > 0 {
                heuristics::check_duplicate_line(trimmed, lines[index - 1], line_num, &mut diagnostics);
            }

            members::check_missing_parentheses(code, line_num, &mut diagnostics);
            symbols.check_capitalization(code, line_num, &mut diagnostics);
        }

        blocks.finish(&mut diagnostics);
        symbols.cross_reference(&mut diagnostics);

        debug!(
            lines = lines.len(),
            diagnostics = diagnostics.len(),
            "syntax check finished"
        );
        diagnostics
    }
}

/// Analyze source text. Convenience wrapper around [`SyntaxChecker::check`].
pub fn analyze(source: &str) -> Vec<Diagnostic> {
    SyntaxChecker::new().check(source)
}

/// Analyze a file on disk. Read failures are never propagated: they come
/// back as a single `syntax-check-failure` diagnostic at line 1, so a
/// failing analysis is still ordinary data.
pub fn check_file<P: AsRef<Path>>(path: P) -> Vec<Diagnostic> {
    match fs_utils::read_source(path.as_ref()) {
        Ok(content) => analyze(&content),
        Err(err) => vec![Diagnostic::new(
            1,
            Severity::Error,
            codes::SYNTAX_CHECK_FAILURE,
            format!("Failed to check syntax: {err}"),
        )],
    }
}
