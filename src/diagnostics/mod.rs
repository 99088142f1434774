//! Diagnostic message structures shared by every check.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a reported finding.
///
/// `Error` findings are structural violations that should block compilation,
/// `Warning` marks likely bugs, `Information` marks style and insight notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Information,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Information => write!(f, "information"),
        }
    }
}

/// One reported finding. Produced by the checker, never mutated afterwards.
///
/// `line` is 1-based; `column`, when present, is a 0-based offset into the
/// raw line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub message: String,
    pub severity: Severity,
    pub code: String,
}

impl Diagnostic {
    pub fn new(
        line: usize,
        severity: Severity,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            line,
            column: None,
            message: message.into(),
            severity,
            code: code.into(),
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] line {}", self.severity, self.line)?;
        if let Some(column) = self.column {
            write!(f, ":{}", column)?;
        }
        write!(f, ": {} ({})", self.message, self.code)
    }
}

/// Stable diagnostic codes, used by quick-fix providers and compile gates.
pub mod codes {
    pub const UNBALANCED_QUOTES: &str = "unbalanced-quotes";
    pub const SEMICOLON_USAGE: &str = "semicolon-usage";
    pub const LOWERCASE_KEYWORD: &str = "lowercase-keyword";
    pub const MALFORMED_ASSIGNMENT: &str = "malformed-assignment";
    pub const INFINITE_LOOP: &str = "infinite-loop";

    pub const UNMATCHED_ELSEIF: &str = "unmatched-elseif";
    pub const UNMATCHED_ELSE: &str = "unmatched-else";
    pub const UNMATCHED_ENDIF: &str = "unmatched-endif";
    pub const UNMATCHED_NEXT: &str = "unmatched-next";
    pub const UNMATCHED_ENDWHILE: &str = "unmatched-endwhile";
    pub const UNMATCHED_ENDSUB: &str = "unmatched-endsub";
    pub const UNCLOSED_BLOCK: &str = "unclosed-block";
    pub const LOOP_VAR_MODIFIED: &str = "loop-var-modified";

    pub const UNKNOWN_OBJECT: &str = "unknown-object";
    pub const INVALID_MEMBER: &str = "invalid-member";
    pub const MISSING_PARENTHESES: &str = "missing-parentheses";

    pub const ZERO_INDEX_ARRAY: &str = "zero-index-array";
    pub const ZERO_BASED_LOOP: &str = "zero-based-loop";

    pub const DUPLICATE_LABEL: &str = "duplicate-label";
    pub const UNDEFINED_LABEL: &str = "undefined-label";
    pub const UNUSED_LABEL: &str = "unused-label";
    pub const UNDEFINED_SUBROUTINE: &str = "undefined-subroutine";
    pub const UNUSED_SUBROUTINE: &str = "unused-subroutine";
    pub const UNUSED_VARIABLE: &str = "unused-variable";
    pub const INCONSISTENT_CAPITALIZATION: &str = "inconsistent-capitalization";

    pub const DUPLICATE_LINE: &str = "duplicate-line";
    pub const LARGE_PROGRAM: &str = "large-program";
    pub const SYNTAX_CHECK_FAILURE: &str = "syntax-check-failure";
}
