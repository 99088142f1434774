/*!
# Small Basic Analyzer

Static analyzer for Microsoft Small Basic source text. One forward scan over
the lines of a program produces an ordered list of diagnostics: structural
errors (unbalanced blocks and quotes, duplicate labels), likely bugs
(misspelled object members, missing call parentheses, loop-variable
mutation) and style findings (unused symbols, capitalization drift,
lowercase keywords).

No AST is built and nothing is executed; the checker is a line-oriented
heuristic linter with limited cross-line state, which keeps it fast enough
to re-run on every keystroke in an editor.

## Usage

### Library
```rust
use sb_analyzer::{analyze, Severity};

let diagnostics = analyze("If x > 0 Then\n  y = 1\n");
assert!(diagnostics.iter().any(|d| d.severity == Severity::Error));
```

### CLI
```bash
# Check one program
sb-analyzer main.sb

# Check a directory tree, machine-readable output
sb-analyzer ./src --format json
```
*/

pub mod analyzer;
pub mod catalog;
pub mod core;
pub mod diagnostics;

pub use analyzer::{analyze, check_file, SyntaxChecker};
pub use core::AnalyzerError;
pub use diagnostics::{codes, Diagnostic, Severity};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_program_has_no_diagnostics() {
        let source = "\
x = 1\n\
While x < 10\n\
  x = x + 1\n\
  TextWindow.WriteLine(x)\n\
EndWhile\n";
        assert!(analyze(source).is_empty());
    }

    #[test]
    fn test_error_severity_blocks_compilation() {
        let out = analyze("If x > 0 Then\n");
        assert!(out.iter().any(|d| d.severity == Severity::Error));
    }
}
