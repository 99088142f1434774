//! Symbol, subroutine and label cross-referencing.
//!
//! All tables are rebuilt from scratch for every scan. Names are compared by
//! canonical (lowercased) form; the surface form of the first occurrence is
//! kept for capitalization checks and for display in messages.
//!
//! Identifier extraction is deliberately shallow: a token counts as a
//! variable site only when it sits outside string literals, is not a
//! dot-qualified member, is not immediately called, and does not name a
//! `Sub`, `Label` or `Goto` target (those are tracked in their own tables).

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog;
use crate::diagnostics::{codes, Diagnostic, Severity};

static RE_ASSIGNMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Za-z]\w*)\s*=").unwrap());
static RE_IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Za-z]\w*)\b").unwrap());
static RE_BARE_CALL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b([A-Za-z]\w*)\s*\(\)").unwrap());
static RE_LABEL_DEF: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bLabel\s+(\w+)").unwrap());
static RE_GOTO: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bGoto\s+(\w+)").unwrap());
static RE_NAME_CONTEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:Sub|Label|Goto)\s*$").unwrap());

/// Recorded sites of one name, with its first-seen surface spelling.
#[derive(Debug, Clone)]
pub struct SymbolRecord {
    pub surface: String,
    pub lines: Vec<usize>,
}

/// Insertion-ordered map from canonical name to its record, so that the
/// cross-reference pass emits in first-seen order deterministically.
#[derive(Debug, Default)]
pub struct SymbolTable {
    records: HashMap<String, SymbolRecord>,
    order: Vec<String>,
}

impl SymbolTable {
    fn record(&mut self, surface: &str, line: usize) {
        let canonical = surface.to_lowercase();
        match self.records.get_mut(&canonical) {
            Some(existing) => existing.lines.push(line),
            None => {
                self.records.insert(
                    canonical.clone(),
                    SymbolRecord {
                        surface: surface.to_string(),
                        lines: vec![line],
                    },
                );
                self.order.push(canonical);
            }
        }
    }

    pub fn get(&self, canonical: &str) -> Option<&SymbolRecord> {
        self.records.get(canonical)
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.records.contains_key(canonical)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SymbolRecord)> {
        self.order
            .iter()
            .filter_map(|name| self.records.get(name).map(|rec| (name.as_str(), rec)))
    }
}

/// Definition sites, insertion ordered; only the first definition is kept.
#[derive(Debug, Default)]
struct DefinitionSet {
    defs: HashMap<String, (String, usize)>,
    order: Vec<String>,
}

impl DefinitionSet {
    fn define(&mut self, surface: &str, line: usize) -> bool {
        let canonical = surface.to_lowercase();
        if self.defs.contains_key(&canonical) {
            return false;
        }
        self.defs
            .insert(canonical.clone(), (surface.to_string(), line));
        self.order.push(canonical);
        true
    }

    fn contains(&self, canonical: &str) -> bool {
        self.defs.contains_key(canonical)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &str, usize)> {
        self.order.iter().filter_map(|name| {
            self.defs
                .get(name)
                .map(|(surface, line)| (name.as_str(), surface.as_str(), *line))
        })
    }
}

/// Accumulates symbol usage during the forward scan and emits the
/// cross-reference diagnostics at end of scan.
#[derive(Debug, Default)]
pub struct SymbolTracker {
    variables: SymbolTable,
    assigned: HashSet<String>,
    subroutine_calls: SymbolTable,
    goto_refs: SymbolTable,
    defined_subroutines: DefinitionSet,
    defined_labels: DefinitionSet,
}

impl SymbolTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a name has been the target of an assignment so far. Usage
    /// sites alone do not qualify; a name only seen as `name.member` stays
    /// unassigned and can be reported as an unknown object.
    pub fn is_assigned_variable(&self, canonical: &str) -> bool {
        self.assigned.contains(canonical)
    }

    /// Record every `identifier =` assignment site on the line.
    pub fn track_assignments(&mut self, code: &str, line_num: usize) {
        let strings = string_spans(code);
        for caps in RE_ASSIGNMENT.captures_iter(code) {
            let Some(m) = caps.get(1) else { continue };
            if inside_span(&strings, m.start()) {
                continue;
            }
            self.assigned.insert(m.as_str().to_lowercase());
            self.variables.record(m.as_str(), line_num);
        }
    }

    /// Record every eligible identifier as a usage site.
    pub fn track_usages(&mut self, code: &str, line_num: usize) {
        for m in eligible_identifiers(code) {
            self.variables.record(m.as_str(), line_num);
        }
    }

    /// Record the first bare `name()` call site on the line, excluding
    /// dot-qualified method calls and well-known builtin method names.
    pub fn track_subroutine_call(&mut self, code: &str, line_num: usize) {
        let Some(caps) = RE_BARE_CALL.captures(code) else {
            return;
        };
        let Some(m) = caps.get(1) else {
            return;
        };
        let canonical = m.as_str().to_lowercase();

        let is_method_call = code[..m.start()].trim_end().ends_with('.');
        if is_method_call || catalog::KNOWN_METHOD_NAMES.contains(canonical.as_str()) {
            return;
        }
        self.subroutine_calls.record(m.as_str(), line_num);
    }

    /// Register a `Sub name` definition (found by the block validator).
    pub fn define_subroutine(&mut self, surface: &str, line_num: usize) {
        self.defined_subroutines.define(surface, line_num);
    }

    /// Record `Label name` definitions, flagging duplicates.
    pub fn track_labels(&mut self, code: &str, line_num: usize, out: &mut Vec<Diagnostic>) {
        let Some(caps) = RE_LABEL_DEF.captures(code) else {
            return;
        };
        let surface = &caps[1];
        if !self.defined_labels.define(surface, line_num) {
            out.push(Diagnostic::new(
                line_num,
                Severity::Error,
                codes::DUPLICATE_LABEL,
                format!("Label '{surface}' is already defined elsewhere"),
            ));
        }
    }

    /// Record `Goto name` reference sites.
    pub fn track_goto(&mut self, code: &str, line_num: usize) {
        if let Some(caps) = RE_GOTO.captures(code) {
            self.goto_refs.record(&caps[1], line_num);
        }
    }

    /// Compare each identifier on the line against its first-seen surface
    /// spelling. Runs after usage tracking, so a name first seen on this very
    /// line compares equal to itself.
    pub fn check_capitalization(&self, code: &str, line_num: usize, out: &mut Vec<Diagnostic>) {
        for m in eligible_identifiers(code) {
            let surface = m.as_str();
            let canonical = surface.to_lowercase();
            if let Some(record) = self.variables.get(&canonical) {
                if record.surface != surface {
                    out.push(Diagnostic::new(
                        line_num,
                        Severity::Information,
                        codes::INCONSISTENT_CAPITALIZATION,
                        format!(
                            "Inconsistent capitalization: '{}' vs '{}'. Variable names are case-insensitive in Small Basic.",
                            surface, record.surface
                        ),
                    ));
                }
            }
        }
    }

    /// End-of-scan cross-reference pass: unused variables, undefined and
    /// unused subroutines, undefined and unused labels, in that order.
    pub fn cross_reference(&self, out: &mut Vec<Diagnostic>) {
        for (_, record) in self.variables.iter() {
            if record.lines.len() == 1 {
                out.push(Diagnostic::new(
                    record.lines[0],
                    Severity::Information,
                    codes::UNUSED_VARIABLE,
                    format!(
                        "Variable '{}' is only used once. It might be unused or misspelled.",
                        record.surface
                    ),
                ));
            }
        }

        for (canonical, record) in self.subroutine_calls.iter() {
            if !self.defined_subroutines.contains(canonical) {
                for &line in &record.lines {
                    out.push(Diagnostic::new(
                        line,
                        Severity::Warning,
                        codes::UNDEFINED_SUBROUTINE,
                        format!("Call to undefined subroutine '{}'", record.surface),
                    ));
                }
            }
        }

        for (canonical, surface, line) in self.defined_subroutines.iter() {
            if !self.subroutine_calls.contains(canonical) {
                out.push(Diagnostic::new(
                    line,
                    Severity::Information,
                    codes::UNUSED_SUBROUTINE,
                    format!("Subroutine '{surface}' is defined but never called"),
                ));
            }
        }

        for (canonical, record) in self.goto_refs.iter() {
            if !self.defined_labels.contains(canonical) {
                for &line in &record.lines {
                    out.push(Diagnostic::new(
                        line,
                        Severity::Error,
                        codes::UNDEFINED_LABEL,
                        format!("Goto references undefined label '{}'", record.surface),
                    ));
                }
            }
        }

        for (canonical, surface, line) in self.defined_labels.iter() {
            if !self.goto_refs.contains(canonical) {
                out.push(Diagnostic::new(
                    line,
                    Severity::Information,
                    codes::UNUSED_LABEL,
                    format!("Label '{surface}' is defined but never used in a Goto statement"),
                ));
            }
        }
    }
}

/// Identifier tokens that count as variable sites.
fn eligible_identifiers(code: &str) -> Vec<regex::Match<'_>> {
    let strings = string_spans(code);
    RE_IDENTIFIER
        .find_iter(code)
        .filter(|m| {
            if inside_span(&strings, m.start()) {
                return false;
            }
            if catalog::is_keyword_or_builtin(&m.as_str().to_lowercase()) {
                return false;
            }
            let before = &code[..m.start()];
            if before.trim_end().ends_with('.') || RE_NAME_CONTEXT.is_match(before) {
                return false;
            }
            let after = &code[m.end()..];
            !after.trim_start().starts_with('(')
        })
        .collect()
}

/// Byte spans of paired double-quoted string literals; an unterminated
/// trailing string is not masked.
fn string_spans(code: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    for (i, ch) in code.char_indices() {
        if ch != '"' {
            continue;
        }
        match open.take() {
            Some(start) => spans.push((start, i)),
            None => open = Some(i),
        }
    }
    spans
}

fn inside_span(spans: &[(usize, usize)], pos: usize) -> bool {
    spans.iter().any(|&(start, end)| pos > start && pos < end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(lines: &[&str]) -> (SymbolTracker, Vec<Diagnostic>) {
        let mut tracker = SymbolTracker::new();
        let mut out = Vec::new();
        for (index, code) in lines.iter().enumerate() {
            let line_num = index + 1;
            tracker.track_assignments(code, line_num);
            tracker.track_usages(code, line_num);
            tracker.track_subroutine_call(code, line_num);
            tracker.track_labels(code, line_num, &mut out);
            tracker.track_goto(code, line_num);
            tracker.check_capitalization(code, line_num, &mut out);
        }
        (tracker, out)
    }

    fn cross_ref(lines: &[&str]) -> Vec<Diagnostic> {
        let (tracker, mut out) = scan(lines);
        tracker.cross_reference(&mut out);
        out
    }

    #[test]
    fn test_single_use_variable_is_flagged() {
        let out = cross_ref(&["y = x + 1"]);
        // y is recorded twice (assignment and token scan), x only once
        let unused: Vec<_> = out
            .iter()
            .filter(|d| d.code == codes::UNUSED_VARIABLE)
            .collect();
        assert_eq!(unused.len(), 1);
        assert!(unused[0].message.contains("'x'"));
    }

    #[test]
    fn test_assigned_and_reused_variable_is_not_flagged() {
        let out = cross_ref(&["x = 1", "z = x + x"]);
        assert!(out
            .iter()
            .filter(|d| d.code == codes::UNUSED_VARIABLE)
            .all(|d| !d.message.contains("'x'")));
    }

    #[test]
    fn test_string_contents_are_not_variables() {
        let out = cross_ref(&["msg = \"hello world\"", "msg = msg"]);
        assert!(out.iter().all(|d| d.code != codes::UNUSED_VARIABLE));
    }

    #[test]
    fn test_member_names_are_not_variables() {
        let out = cross_ref(&["TextWindow.WriteLine(\"hi\")"]);
        assert!(out.iter().all(|d| d.code != codes::UNUSED_VARIABLE));
    }

    #[test]
    fn test_undefined_subroutine_call() {
        let out = cross_ref(&["Greet()"]);
        let undef: Vec<_> = out
            .iter()
            .filter(|d| d.code == codes::UNDEFINED_SUBROUTINE)
            .collect();
        assert_eq!(undef.len(), 1);
        assert_eq!(undef[0].line, 1);
        assert!(undef[0].message.contains("'Greet'"));
    }

    #[test]
    fn test_builtin_method_call_is_not_a_subroutine() {
        let (tracker, _) = scan(&["Clear()", "TextWindow.WriteLine()"]);
        let mut out = Vec::new();
        tracker.cross_reference(&mut out);
        assert!(out.iter().all(|d| d.code != codes::UNDEFINED_SUBROUTINE));
    }

    #[test]
    fn test_unused_subroutine_reports_definition_line() {
        let mut tracker = SymbolTracker::new();
        tracker.define_subroutine("Greet", 3);
        let mut out = Vec::new();
        tracker.cross_reference(&mut out);
        let unused: Vec<_> = out
            .iter()
            .filter(|d| d.code == codes::UNUSED_SUBROUTINE)
            .collect();
        assert_eq!(unused.len(), 1);
        assert_eq!(unused[0].line, 3);
    }

    #[test]
    fn test_subroutine_call_matches_case_insensitively() {
        let (mut tracker, mut out) = scan(&["greet()"]);
        tracker.define_subroutine("Greet", 10);
        tracker.cross_reference(&mut out);
        assert!(out.iter().all(|d| d.code != codes::UNDEFINED_SUBROUTINE));
        assert!(out.iter().all(|d| d.code != codes::UNUSED_SUBROUTINE));
    }

    #[test]
    fn test_duplicate_label() {
        let out = cross_ref(&["Label start", "Label Start"]);
        let dups: Vec<_> = out
            .iter()
            .filter(|d| d.code == codes::DUPLICATE_LABEL)
            .collect();
        assert_eq!(dups.len(), 1);
        assert_eq!(dups[0].line, 2);
        assert!(dups[0].message.contains("'Start'"));
    }

    #[test]
    fn test_undefined_and_unused_labels() {
        let out = cross_ref(&["Label top", "Goto bottom"]);
        assert!(out
            .iter()
            .any(|d| d.code == codes::UNDEFINED_LABEL && d.line == 2));
        assert!(out
            .iter()
            .any(|d| d.code == codes::UNUSED_LABEL && d.line == 1));
    }

    #[test]
    fn test_label_names_are_not_variables() {
        let out = cross_ref(&["Label top", "Goto top"]);
        assert!(out.iter().all(|d| d.code != codes::UNUSED_VARIABLE));
    }

    #[test]
    fn test_capitalization_mismatch() {
        let out = cross_ref(&["counter = 1", "Counter = counter + 1"]);
        let caps: Vec<_> = out
            .iter()
            .filter(|d| d.code == codes::INCONSISTENT_CAPITALIZATION)
            .collect();
        assert_eq!(caps.len(), 1);
        assert_eq!(caps[0].line, 2);
        assert!(caps[0].message.contains("'Counter' vs 'counter'"));
    }

    #[test]
    fn test_keywords_are_not_tracked_as_variables() {
        let out = cross_ref(&["If true Then", "EndIf"]);
        assert!(out.iter().all(|d| d.code != codes::UNUSED_VARIABLE));
    }

    #[test]
    fn test_usage_alone_does_not_count_as_assigned() {
        let (tracker, _) = scan(&["Foo.Bar", "x = Foo.Bar"]);
        assert!(!tracker.is_assigned_variable("foo"));
        assert!(tracker.is_assigned_variable("x"));
    }

    #[test]
    fn test_assignment_inside_string_is_ignored() {
        let (tracker, _) = scan(&["msg = \"a = b\""]);
        assert!(tracker.is_assigned_variable("msg"));
        assert!(!tracker.is_assigned_variable("a"));
    }
}
