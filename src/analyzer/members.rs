//! `Object.Member` validation against the API catalog.
//!
//! Misspelled members get a "did you mean" suggestion computed by classic
//! Levenshtein distance (insert/delete/substitute, unit cost) over the valid
//! member list, suggested only when the best distance is 3 or less.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analyzer::symbols::SymbolTracker;
use crate::catalog;
use crate::diagnostics::{codes, Diagnostic, Severity};

static RE_DOT_ACCESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z]\w*)\.([A-Za-z]\w*)").unwrap());
static RE_MEMBER_ACCESS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\w+)\.(\w+)").unwrap());
static RE_DOMAIN_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\w{2,}").unwrap());

/// Suggestion threshold for member name suggestions.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Check every `Object.Member` occurrence on the line for unknown objects
/// and invalid members. Occurrences inside URL-like string literals are
/// skipped to avoid flagging `"www.example.com"` style text.
pub fn check_member_access(
    code: &str,
    line_num: usize,
    symbols: &SymbolTracker,
    out: &mut Vec<Diagnostic>,
) {
    for caps in RE_DOT_ACCESS.captures_iter(code) {
        let (Some(whole), Some(obj), Some(member)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        if is_within_url_string(code, whole.start()) {
            continue;
        }

        let obj_canonical = obj.as_str().to_lowercase();
        if !catalog::is_builtin_object(&obj_canonical) {
            if !symbols.is_assigned_variable(&obj_canonical) {
                out.push(
                    Diagnostic::new(
                        line_num,
                        Severity::Warning,
                        codes::UNKNOWN_OBJECT,
                        format!("'{}' might be undefined or misspelled", obj.as_str()),
                    )
                    .with_column(whole.start()),
                );
            }
            continue;
        }

        let Some(members) = catalog::members_of(&obj_canonical) else {
            continue;
        };
        let member_canonical = member.as_str().to_lowercase();
        if members.contains(&member_canonical.as_str()) {
            continue;
        }

        let message = match find_closest_match(&member_canonical, members) {
            Some(closest) => format!(
                "'{}' is not a valid member of '{}'. Did you mean '{}'?",
                member.as_str(),
                obj.as_str(),
                closest
            ),
            None => format!(
                "'{}' is not a valid member of '{}'",
                member.as_str(),
                obj.as_str()
            ),
        };
        out.push(
            Diagnostic::new(line_num, Severity::Warning, codes::INVALID_MEMBER, message)
                .with_column(whole.start() + obj.as_str().len() + 1),
        );
    }
}

/// Flag known methods accessed without call parentheses and outside an
/// assignment target position.
pub fn check_missing_parentheses(code: &str, line_num: usize, out: &mut Vec<Diagnostic>) {
    for caps in RE_MEMBER_ACCESS.captures_iter(code) {
        let (Some(whole), Some(obj), Some(member)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let rest = &code[whole.end()..];
        if rest.starts_with('(') || rest.trim_start().starts_with('=') {
            continue;
        }

        let obj_canonical = obj.as_str().to_lowercase();
        let member_canonical = member.as_str().to_lowercase();
        if catalog::is_method(&obj_canonical, &member_canonical) {
            out.push(
                Diagnostic::new(
                    line_num,
                    Severity::Warning,
                    codes::MISSING_PARENTHESES,
                    format!(
                        "Method '{}' should be called with parentheses: {}.{}()",
                        member.as_str(),
                        obj.as_str(),
                        member.as_str()
                    ),
                )
                .with_column(whole.start() + obj.as_str().len() + 1),
            );
        }
    }
}

/// Closest candidate by edit distance, first match winning ties; `None`
/// when even the best candidate is further than the suggestion threshold.
fn find_closest_match<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let (first, rest) = candidates.split_first()?;
    let mut best = *first;
    let mut best_score = levenshtein_distance(input, best);
    for &candidate in rest {
        let score = levenshtein_distance(input, candidate);
        if score < best_score {
            best_score = score;
            best = candidate;
        }
    }
    (best_score <= MAX_SUGGESTION_DISTANCE).then_some(best)
}

/// Classic dynamic-programming Levenshtein distance, two-row variant.
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Whether `position` falls inside a quoted string that looks like a URL
/// (`http://`, `https://`, `www.` or a domain-style dotted suffix).
fn is_within_url_string(line: &str, position: usize) -> bool {
    let mut in_string = false;
    let mut string_start = 0usize;

    for (i, ch) in line.char_indices() {
        if ch != '"' {
            continue;
        }
        if in_string {
            let content = &line[string_start..i];
            if position > string_start
                && position < i
                && (content.contains("http://")
                    || content.contains("https://")
                    || content.contains("www.")
                    || RE_DOMAIN_SUFFIX.is_match(content))
            {
                return true;
            }
            in_string = false;
        } else {
            string_start = i;
            in_string = true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(code: &str) -> Vec<Diagnostic> {
        let symbols = SymbolTracker::new();
        let mut out = Vec::new();
        check_member_access(code, 1, &symbols, &mut out);
        out
    }

    fn parens(code: &str) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        check_missing_parentheses(code, 1, &mut out);
        out
    }

    #[test]
    fn test_levenshtein_distance() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("squarroot", "squareroot"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("abc", ""), 3);
    }

    #[test]
    fn test_misspelled_member_gets_suggestion() {
        let out = members("Math.SquarRoot(9)");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code, codes::INVALID_MEMBER);
        assert!(out[0].message.contains("Did you mean 'squareroot'?"));
        assert_eq!(out[0].column, Some(5));
    }

    #[test]
    fn test_far_misspelling_gets_no_suggestion() {
        let out = members("Math.CompletelyWrongName(9)");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code, codes::INVALID_MEMBER);
        assert!(!out[0].message.contains("Did you mean"));
    }

    #[test]
    fn test_valid_member_is_silent() {
        assert!(members("TextWindow.WriteLine(\"hi\")").is_empty());
    }

    #[test]
    fn test_unknown_object() {
        let out = members("TextWindwo.WriteLine(\"hi\")");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code, codes::UNKNOWN_OBJECT);
        assert_eq!(out[0].column, Some(0));
    }

    #[test]
    fn test_assigned_variable_is_not_unknown() {
        let mut symbols = SymbolTracker::new();
        symbols.track_assignments("result = 1", 1);
        let mut out = Vec::new();
        check_member_access("result.value", 2, &symbols, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_url_strings_are_skipped() {
        assert!(members("url = \"http://example.com/data.txt\"").is_empty());
        assert!(members("site = \"www.contoso.org\"").is_empty());
    }

    #[test]
    fn test_dot_access_outside_string_still_checked() {
        let out = members("x = \"plain text\" + Math.Flor(2)");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code, codes::INVALID_MEMBER);
    }

    #[test]
    fn test_method_without_parentheses() {
        let out = parens("TextWindow.WriteLine");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].code, codes::MISSING_PARENTHESES);
        assert!(out[0].message.contains("TextWindow.WriteLine()"));
        assert_eq!(out[0].column, Some(11));
    }

    #[test]
    fn test_called_method_is_silent() {
        assert!(parens("TextWindow.WriteLine(\"hi\")").is_empty());
    }

    #[test]
    fn test_property_access_is_silent() {
        assert!(parens("GraphicsWindow.Height").is_empty());
    }

    #[test]
    fn test_assignment_target_is_silent() {
        assert!(parens("TextWindow.Title = \"demo\"").is_empty());
        assert!(parens("GraphicsWindow.PenWidth   = 4").is_empty());
    }
}
