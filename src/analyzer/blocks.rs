//! Control-block balance validation.
//!
//! A stack machine over the four Small Basic block kinds. Lines are matched
//! with the same keyword patterns the IDE compiler tolerates: an `If` only
//! opens a block together with `Then`, a `For` only together with `To`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::{codes, Diagnostic, Severity};

static RE_IF_THEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bIf\b.*\bThen\b").unwrap());
static RE_ELSEIF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bElseIf\b").unwrap());
static RE_ELSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bElse\b").unwrap());
static RE_ENDIF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bEndIf\b").unwrap());
static RE_FOR_TO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bFor\b.*\bTo\b").unwrap());
static RE_FOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bFor\b").unwrap());
static RE_FOR_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bFor\s+(\w+)\s+=").unwrap());
static RE_NEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bNext\b").unwrap());
static RE_WHILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bWhile\b").unwrap());
static RE_ENDWHILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bEndWhile\b").unwrap());
static RE_SUB: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bSub\b").unwrap());
static RE_SUB_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bSub\s+(\w+)").unwrap());
static RE_ENDSUB: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bEndSub\b").unwrap());

/// Kind of an open control block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Conditional,
    CountedLoop,
    ConditionalLoop,
    /// Carries the subroutine's canonical (lowercased) name.
    Subroutine(String),
}

impl BlockKind {
    /// Opening keyword, as shown in diagnostics.
    pub fn keyword(&self) -> &'static str {
        match self {
            BlockKind::Conditional => "If",
            BlockKind::CountedLoop => "For",
            BlockKind::ConditionalLoop => "While",
            BlockKind::Subroutine(_) => "Sub",
        }
    }
}

/// One open, not-yet-closed block on the validator stack.
#[derive(Debug, Clone)]
pub struct BlockFrame {
    pub kind: BlockKind,
    pub opened_at: usize,
}

/// Tracks nested control structures across one forward scan.
#[derive(Debug, Default)]
pub struct BlockTracker {
    stack: Vec<BlockFrame>,
}

impl BlockTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process the code portion of one line.
    ///
    /// `raw_lines`/`index` give the whole file for the loop-variable scan,
    /// which inspects the raw body of a freshly opened `For` block. Returns
    /// the surface name of a subroutine defined on this line, if any.
    pub fn process_line(
        &mut self,
        code: &str,
        line_num: usize,
        raw_lines: &[&str],
        index: usize,
        out: &mut Vec<Diagnostic>,
    ) -> Option<String> {
        if RE_IF_THEN.is_match(code) {
            self.stack.push(BlockFrame {
                kind: BlockKind::Conditional,
                opened_at: line_num,
            });
        } else if RE_ELSEIF.is_match(code) {
            if !self.top_is(&BlockKind::Conditional) {
                out.push(Diagnostic::new(
                    line_num,
                    Severity::Error,
                    codes::UNMATCHED_ELSEIF,
                    "ElseIf without matching If",
                ));
            }
        } else if RE_ELSE.is_match(code) {
            if !self.top_is(&BlockKind::Conditional) {
                out.push(Diagnostic::new(
                    line_num,
                    Severity::Error,
                    codes::UNMATCHED_ELSE,
                    "Else without matching If",
                ));
            }
        } else if RE_ENDIF.is_match(code) {
            if self.top_is(&BlockKind::Conditional) {
                self.stack.pop();
            } else {
                out.push(Diagnostic::new(
                    line_num,
                    Severity::Error,
                    codes::UNMATCHED_ENDIF,
                    "EndIf without matching If",
                ));
            }
        } else if RE_FOR_TO.is_match(code) {
            self.stack.push(BlockFrame {
                kind: BlockKind::CountedLoop,
                opened_at: line_num,
            });
            self.scan_loop_variable(code, raw_lines, index, out);
        } else if RE_NEXT.is_match(code) {
            if self.top_is(&BlockKind::CountedLoop) {
                self.stack.pop();
            } else {
                out.push(Diagnostic::new(
                    line_num,
                    Severity::Error,
                    codes::UNMATCHED_NEXT,
                    "Next without matching For",
                ));
            }
        } else if RE_WHILE.is_match(code) {
            self.stack.push(BlockFrame {
                kind: BlockKind::ConditionalLoop,
                opened_at: line_num,
            });
        } else if RE_ENDWHILE.is_match(code) {
            if self.top_is(&BlockKind::ConditionalLoop) {
                self.stack.pop();
            } else {
                out.push(Diagnostic::new(
                    line_num,
                    Severity::Error,
                    codes::UNMATCHED_ENDWHILE,
                    "EndWhile without matching While",
                ));
            }
        } else if RE_ENDSUB.is_match(code) {
            if matches!(
                self.stack.last(),
                Some(BlockFrame {
                    kind: BlockKind::Subroutine(_),
                    ..
                })
            ) {
                self.stack.pop();
            } else {
                out.push(Diagnostic::new(
                    line_num,
                    Severity::Error,
                    codes::UNMATCHED_ENDSUB,
                    "EndSub without matching Sub",
                ));
            }
        } else if RE_SUB.is_match(code) {
            let surface = RE_SUB_NAME
                .captures(code)
                .map(|caps| caps[1].to_string());
            let canonical = surface
                .as_deref()
                .map(|s| s.to_lowercase())
                .unwrap_or_default();
            self.stack.push(BlockFrame {
                kind: BlockKind::Subroutine(canonical),
                opened_at: line_num,
            });
            return surface;
        }
        None
    }

    /// Unclosed frames left at end of file, reported oldest first.
    pub fn finish(self, out: &mut Vec<Diagnostic>) {
        for frame in self.stack {
            out.push(Diagnostic::new(
                frame.opened_at,
                Severity::Error,
                codes::UNCLOSED_BLOCK,
                format!("Unclosed {} block started here", frame.kind.keyword()),
            ));
        }
    }

    fn top_is(&self, kind: &BlockKind) -> bool {
        self.stack.last().map(|frame| &frame.kind == kind).unwrap_or(false)
    }

    /// Warn about reassignments of a counted loop's control variable inside
    /// the loop body. The body is delimited by depth-matching `Next` over the
    /// raw lines, and only lines strictly between open and close are checked.
    fn scan_loop_variable(
        &self,
        code: &str,
        raw_lines: &[&str],
        index: usize,
        out: &mut Vec<Diagnostic>,
    ) {
        let Some(caps) = RE_FOR_VAR.captures(code) else {
            return;
        };
        let surface = &caps[1];
        let Ok(re_assign) = Regex::new(&format!(r"(?i)\b{}\s*=", regex::escape(surface))) else {
            return;
        };

        let end = find_matching_next(raw_lines, index);
        if end <= index {
            return;
        }
        for (i, inner) in raw_lines.iter().enumerate().take(end).skip(index + 1) {
            if re_assign.is_match(inner) {
                out.push(Diagnostic::new(
                    i + 1,
                    Severity::Warning,
                    codes::LOOP_VAR_MODIFIED,
                    format!("Loop variable '{surface}' should not be modified inside the loop"),
                ));
            }
        }
    }
}

/// Index of the `Next` closing the `For` at `for_index`, by depth counting
/// over raw lines. Falls back to the last line when unterminated.
fn find_matching_next(raw_lines: &[&str], for_index: usize) -> usize {
    let mut depth = 1usize;
    for (i, line) in raw_lines.iter().enumerate().skip(for_index + 1) {
        if RE_FOR.is_match(line) {
            depth += 1;
        } else if RE_NEXT.is_match(line) {
            depth -= 1;
            if depth == 0 {
                return i;
            }
        }
    }
    raw_lines.len().saturating_sub(1)
}
