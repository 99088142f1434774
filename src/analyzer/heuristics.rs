//! Line-local heuristic checks that need no cross-line state beyond the
//! previous raw line and the whole file text.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::{codes, Diagnostic, Severity};

static RE_MULTI_ASSIGN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"=[^=].*[^<>+\-*/^%&|]=").unwrap());
static RE_WHILE_TRUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bWhile\s+True\b").unwrap());
static RE_ARRAY_ACCESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\w+)\[(\d+)\]").unwrap());
static RE_FOR_FROM_ZERO: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bFor\s+\w+\s*=\s*0\b").unwrap());

/// Lowercase keyword spellings and their conventional casing. Matching is
/// case-sensitive on purpose; a keyword followed by an uppercase letter
/// (after optional whitespace) is left alone.
static LOWERCASE_KEYWORDS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("if", "If"),
        ("then", "Then"),
        ("else", "Else"),
        ("elseif", "ElseIf"),
        ("endif", "EndIf"),
        ("for", "For"),
        ("to", "To"),
        ("step", "Step"),
        ("next", "Next"),
        ("while", "While"),
        ("endwhile", "EndWhile"),
        ("sub", "Sub"),
        ("endsub", "EndSub"),
        ("goto", "Goto"),
    ]
    .into_iter()
    .map(|(lower, cased)| (Regex::new(&format!(r"\b{lower}\b")).unwrap(), cased))
    .collect()
});

/// Odd number of quote characters on the code portion of a line.
pub fn check_unbalanced_quotes(code: &str, line_num: usize, out: &mut Vec<Diagnostic>) {
    if code.matches('"').count() % 2 != 0 {
        out.push(Diagnostic::new(
            line_num,
            Severity::Error,
            codes::UNBALANCED_QUOTES,
            "Unbalanced quotes - missing opening or closing quote",
        ));
    }
}

/// Small Basic has no statement separator; `;` is almost always carried over
/// from another language.
pub fn check_semicolon(code: &str, line_num: usize, out: &mut Vec<Diagnostic>) {
    if let Some(idx) = code.find(';') {
        out.push(
            Diagnostic::new(
                line_num,
                Severity::Warning,
                codes::SEMICOLON_USAGE,
                "Semicolons are not used in Small Basic",
            )
            .with_column(idx + 1),
        );
    }
}

/// One diagnostic per lowercase keyword spelling present on the line.
pub fn check_lowercase_keywords(code: &str, line_num: usize, out: &mut Vec<Diagnostic>) {
    for (re, cased) in LOWERCASE_KEYWORDS.iter() {
        for m in re.find_iter(code) {
            if followed_by_uppercase(&code[m.end()..]) {
                continue;
            }
            out.push(Diagnostic::new(
                line_num,
                Severity::Information,
                codes::LOWERCASE_KEYWORD,
                format!("Consider using '{cased}' instead of lowercase for consistency"),
            ));
            break;
        }
    }
}

fn followed_by_uppercase(rest: &str) -> bool {
    rest.trim_start()
        .chars()
        .next()
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false)
}

/// Two or more `=` outside comparison or compound operators.
pub fn check_malformed_assignment(code: &str, line_num: usize, out: &mut Vec<Diagnostic>) {
    if RE_MULTI_ASSIGN.is_match(code) {
        out.push(Diagnostic::new(
            line_num,
            Severity::Warning,
            codes::MALFORMED_ASSIGNMENT,
            "Potential malformed expression with multiple assignments",
        ));
    }
}

/// `While True` with no `EndWhile` anywhere in the file text. The
/// containment test is a literal, case-sensitive substring search over the
/// whole file, not a block match; kept as-is for output compatibility.
pub fn check_infinite_loop(code: &str, line_num: usize, full_text: &str, out: &mut Vec<Diagnostic>) {
    if RE_WHILE_TRUE.is_match(code) && !full_text.contains("EndWhile") {
        out.push(Diagnostic::new(
            line_num,
            Severity::Warning,
            codes::INFINITE_LOOP,
            "Potential infinite loop: While True without a clear exit condition",
        ));
    }
}

/// Array access with literal index 0: Small Basic arrays are 1-based.
pub fn check_zero_index_array(code: &str, line_num: usize, out: &mut Vec<Diagnostic>) {
    for caps in RE_ARRAY_ACCESS.captures_iter(code) {
        let index = &caps[2];
        if index.chars().all(|c| c == '0') {
            out.push(Diagnostic::new(
                line_num,
                Severity::Warning,
                codes::ZERO_INDEX_ARRAY,
                "Small Basic arrays are typically 1-based. Index 0 might not work as expected.",
            ));
        }
    }
}

/// Counted loop starting at 0.
pub fn check_zero_based_loop(code: &str, line_num: usize, out: &mut Vec<Diagnostic>) {
    if RE_FOR_FROM_ZERO.is_match(code) {
        out.push(Diagnostic::new(
            line_num,
            Severity::Information,
            codes::ZERO_BASED_LOOP,
            "Small Basic is typically 1-based. Starting a For loop at 0 might not be standard practice.",
        ));
    }
}

/// Current trimmed code line identical to the trimmed previous raw line.
pub fn check_duplicate_line(
    trimmed_code: &str,
    previous_raw: &str,
    line_num: usize,
    out: &mut Vec<Diagnostic>,
) {
    if !trimmed_code.is_empty() && trimmed_code == previous_raw.trim() {
        out.push(Diagnostic::new(
            line_num,
            Severity::Information,
            codes::DUPLICATE_LINE,
            "Duplicate line detected. Possible copy-paste error.",
        ));
    }
}
