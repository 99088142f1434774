//! End-to-end tests for the syntax checker's observable contract.

use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use sb_analyzer::{analyze, check_file, codes, Severity};

#[test]
fn analysis_is_deterministic() {
    let source = "\
If x > 0 Then\n\
  y = 1\n\
EndIf\n\
Greet()\n\
misc.bar\n\
TextWindow.WriteLine\n";
    assert_eq!(analyze(source), analyze(source));
}

#[test]
fn well_nested_blocks_produce_no_block_diagnostics() {
    let source = "\
Sub main\n\
  For i = 1 To 3\n\
    If i > 1 Then\n\
      While i < 10\n\
        i = 0\n\
      EndWhile\n\
    EndIf\n\
  Next\n\
EndSub\n\
main()\n";
    let out = analyze(source);
    assert!(out
        .iter()
        .all(|d| !d.code.starts_with("unmatched-") && d.code != codes::UNCLOSED_BLOCK));
}

#[test]
fn zero_index_array_access() {
    let out = analyze("x = 5\nPrint(x[0])");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].code, codes::ZERO_INDEX_ARRAY);
    assert_eq!(out[0].line, 2);
    assert_eq!(out[0].severity, Severity::Warning);
}

#[test]
fn misspelled_member_suggests_closest_match() {
    let out = analyze("Math.SquarRoot(9)");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].code, codes::INVALID_MEMBER);
    assert!(out[0].message.contains("squareroot"), "{}", out[0].message);
}

#[test]
fn called_method_needs_no_parentheses_diagnostic() {
    let out = analyze("TextWindow.WriteLine(\"hi\")");
    assert!(out.iter().all(|d| d.code != codes::MISSING_PARENTHESES));
}

#[test]
fn uncalled_method_gets_exactly_one_parentheses_diagnostic() {
    let out = analyze("TextWindow.WriteLine");
    let missing: Vec<_> = out
        .iter()
        .filter(|d| d.code == codes::MISSING_PARENTHESES)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].line, 1);
}

#[test]
fn defined_but_never_called_subroutine() {
    let source = "\
Sub greet\n\
  TextWindow.WriteLine(\"hi\")\n\
EndSub\n";
    let out = analyze(source);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].code, codes::UNUSED_SUBROUTINE);
    assert_eq!(out[0].line, 1);
    assert_eq!(out[0].severity, Severity::Information);
}

#[test]
fn missing_endif_reports_unclosed_conditional() {
    let out = analyze("If x > 0 Then\n  y = 1\n");
    let unclosed: Vec<_> = out
        .iter()
        .filter(|d| d.code == codes::UNCLOSED_BLOCK)
        .collect();
    assert_eq!(unclosed.len(), 1);
    assert_eq!(unclosed[0].line, 1);
    assert!(unclosed[0].message.contains("If"));
    assert_eq!(unclosed[0].severity, Severity::Error);
}

#[test]
fn large_program_notice_is_first() {
    let mut source = String::new();
    for i in 0..1001 {
        if i % 2 == 0 {
            source.push_str("x = x + 1\n");
        } else {
            source.push_str("y = y + 1\n");
        }
    }
    let out = analyze(&source);
    assert!(!out.is_empty());
    assert_eq!(out[0].code, codes::LARGE_PROGRAM);
    assert_eq!(out[0].line, 1);
    assert_eq!(out[0].severity, Severity::Information);
    assert!(out[0].message.contains("1002 lines"), "{}", out[0].message);
}

#[test]
fn diagnostics_follow_emission_order() {
    let source = "\
x = 1;\n\
If y > 0 Then\n\
Goto finish\n";
    let seen: Vec<String> = analyze(source).into_iter().map(|d| d.code).collect();
    assert_eq!(
        seen,
        vec![
            codes::SEMICOLON_USAGE.to_string(),
            codes::UNCLOSED_BLOCK.to_string(),
            codes::UNUSED_VARIABLE.to_string(),
            codes::UNDEFINED_LABEL.to_string(),
        ]
    );
}

#[test]
fn loop_variable_mutation_is_reported_inside_body() {
    let source = "\
For i = 1 To 10\n\
  i = i + 2\n\
Next\n";
    let out = analyze(source);
    let modified: Vec<_> = out
        .iter()
        .filter(|d| d.code == codes::LOOP_VAR_MODIFIED)
        .collect();
    assert_eq!(modified.len(), 1);
    assert_eq!(modified[0].line, 2);
}

#[test]
fn while_true_without_endwhile_is_flagged() {
    let out = analyze("While True\n  x = 1\n");
    assert!(out.iter().any(|d| d.code == codes::INFINITE_LOOP));

    // closing the loop silences the heuristic (whole-file text search)
    let out = analyze("While True\n  x = 1\nEndWhile\n");
    assert!(out.iter().all(|d| d.code != codes::INFINITE_LOOP));
}

#[test]
fn misspelled_object_name_is_flagged() {
    let out = analyze("TextWindwo.WriteLine(\"hi\")");
    let unknown: Vec<_> = out
        .iter()
        .filter(|d| d.code == codes::UNKNOWN_OBJECT)
        .collect();
    assert_eq!(unknown.len(), 1);
    assert_eq!(unknown[0].line, 1);
    assert_eq!(unknown[0].severity, Severity::Warning);
    assert!(unknown[0].message.contains("'TextWindwo'"), "{}", unknown[0].message);
}

#[test]
fn member_access_on_assigned_variable_is_not_unknown() {
    let out = analyze("result = 10\nTextWindow.WriteLine(result.value)");
    assert!(out.iter().all(|d| d.code != codes::UNKNOWN_OBJECT));
}

#[test]
fn url_string_literals_are_not_member_accesses() {
    let source = "url = \"http://smallbasic.com/program.sb\"\nNetwork.DownloadFile(url)\n";
    let out = analyze(source);
    assert!(out.iter().all(|d| d.code != codes::UNKNOWN_OBJECT));
    assert!(out.iter().all(|d| d.code != codes::INVALID_MEMBER));
}

#[test]
fn check_file_reads_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"If x > 0 Then\n").unwrap();
    let out = check_file(file.path());
    assert!(out.iter().any(|d| d.code == codes::UNCLOSED_BLOCK));
}

#[test]
fn check_file_converts_read_failure_into_diagnostic() {
    let out = check_file("/definitely/not/here.sb");
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].code, codes::SYNTAX_CHECK_FAILURE);
    assert_eq!(out[0].line, 1);
    assert_eq!(out[0].severity, Severity::Error);
}

#[test]
fn analyzer_tolerates_odd_input() {
    for source in ["", "\n\n\n", "\"", "'", "\u{FEFF}", "日本語 = 1", "\t;'\""] {
        let _ = analyze(source); // must not panic
    }
}

#[test]
fn goto_to_defined_label_is_silent() {
    let source = "\
Label top\n\
x = x + 1\n\
If x < 3 Then\n\
  Goto top\n\
EndIf\n";
    let out = analyze(source);
    assert!(out.iter().all(|d| d.code != codes::UNDEFINED_LABEL));
    assert!(out.iter().all(|d| d.code != codes::UNUSED_LABEL));
}
