/*!
# Small Basic Analyzer CLI

Checks Small Basic programs and prints diagnostics in human, JSON or
LSP-compatible form.
*/

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use console::style;
use tracing::info;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use sb_analyzer::{check_file, Diagnostic, Severity};

#[derive(Parser, Debug)]
#[command(
    name = "sb-analyzer",
    version = env!("CARGO_PKG_VERSION"),
    about = "Static analyzer for Microsoft Small Basic",
    long_about = "Checks Small Basic source files for structural errors, likely bugs and style issues without compiling or running them"
)]
struct Args {
    /// A .sb file or a directory containing Small Basic sources
    path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Print only error-severity diagnostics
    #[arg(short, long)]
    errors_only: bool,

    /// Recurse into subdirectories
    #[arg(short, long, default_value = "true")]
    recursive: bool,

    /// Print a summary after checking
    #[arg(short, long)]
    stats: bool,

    /// Quiet mode (exit code only)
    #[arg(short, long)]
    quiet: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum OutputFormat {
    Human,
    Json,
    Lsp,
}

#[derive(Default)]
struct CheckStats {
    files_checked: usize,
    files_with_errors: usize,
    total_errors: usize,
    total_warnings: usize,
}

const SOURCE_EXTENSIONS: [&str; 2] = ["sb", "smallbasic"];

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut stats = CheckStats::default();

    if args.path.is_file() {
        check_one(&args.path, &args, &mut stats);
    } else if args.path.is_dir() {
        check_directory(&args.path, &args, &mut stats)?;
    } else {
        eprintln!("Error: {} is not a file or directory", args.path.display());
        std::process::exit(2);
    }

    info!(
        files = stats.files_checked,
        errors = stats.total_errors,
        warnings = stats.total_warnings,
        "check finished"
    );

    if args.stats && !args.quiet {
        print_stats(&stats);
    }

    if stats.files_with_errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn check_one(path: &Path, args: &Args, stats: &mut CheckStats) {
    let diagnostics = check_file(path);
    stats.files_checked += 1;

    let errors = count_severity(&diagnostics, Severity::Error);
    stats.total_errors += errors;
    stats.total_warnings += count_severity(&diagnostics, Severity::Warning);
    if errors > 0 {
        stats.files_with_errors += 1;
    }

    if args.quiet {
        return;
    }
    match args.format {
        OutputFormat::Human => print_human_format(&diagnostics, path, args.errors_only),
        OutputFormat::Json => print_json_format(&diagnostics, path),
        OutputFormat::Lsp => print_lsp_format(&diagnostics, path),
    }
}

fn check_directory(path: &Path, args: &Args, stats: &mut CheckStats) -> Result<()> {
    let walker = if args.recursive {
        WalkDir::new(path)
    } else {
        WalkDir::new(path).max_depth(1)
    };

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_source = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|ext| SOURCE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if is_source {
            check_one(entry.path(), args, stats);
        }
    }
    Ok(())
}

fn count_severity(diagnostics: &[Diagnostic], severity: Severity) -> usize {
    diagnostics.iter().filter(|d| d.severity == severity).count()
}

fn print_human_format(diagnostics: &[Diagnostic], path: &Path, errors_only: bool) {
    let mut has_output = false;

    for diag in diagnostics {
        if errors_only && diag.severity != Severity::Error {
            continue;
        }
        has_output = true;

        let severity_style = match diag.severity {
            Severity::Error => style("error").red().bold(),
            Severity::Warning => style("warning").yellow().bold(),
            Severity::Information => style("info").blue(),
        };

        println!("{}: {} ({})", severity_style, diag.message, diag.code);
        match diag.column {
            Some(column) => println!("  --> {}:{}:{}", path.display(), diag.line, column),
            None => println!("  --> {}:{}", path.display(), diag.line),
        }
        println!();
    }

    if has_output {
        let _ = io::stdout().flush();
    }
}

fn print_json_format(diagnostics: &[Diagnostic], path: &Path) {
    let output = serde_json::json!({
        "file": path.to_str().unwrap_or("<unknown>"),
        "diagnostics": diagnostics,
        "hasErrors": diagnostics.iter().any(|d| d.severity == Severity::Error),
    });
    match serde_json::to_string_pretty(&output) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("Error: failed to serialize diagnostics: {err}"),
    }
}

/// Editor-oriented output: 0-based positions, numeric severities.
fn print_lsp_format(diagnostics: &[Diagnostic], path: &Path) {
    let mapped: Vec<_> = diagnostics
        .iter()
        .map(|diag| {
            let character = diag.column.unwrap_or(0);
            serde_json::json!({
                "range": {
                    "start": { "line": diag.line - 1, "character": character },
                    "end": { "line": diag.line - 1, "character": character },
                },
                "severity": match diag.severity {
                    Severity::Error => 1,
                    Severity::Warning => 2,
                    Severity::Information => 3,
                },
                "code": diag.code,
                "message": diag.message,
            })
        })
        .collect();

    let output = serde_json::json!({
        "uri": format!("file://{}", path.display()),
        "diagnostics": mapped,
    });
    match serde_json::to_string(&output) {
        Ok(text) => println!("{text}"),
        Err(err) => eprintln!("Error: failed to serialize diagnostics: {err}"),
    }
}

fn print_stats(stats: &CheckStats) {
    println!();
    println!("{}", style("=== Check summary ===").bold());
    println!("Files checked: {}", stats.files_checked);
    println!("Files with errors: {}", stats.files_with_errors);
    println!(
        "Total errors: {}",
        if stats.total_errors > 0 {
            style(stats.total_errors).red()
        } else {
            style(stats.total_errors).green()
        }
    );
    println!(
        "Total warnings: {}",
        if stats.total_warnings > 0 {
            style(stats.total_warnings).yellow()
        } else {
            style(stats.total_warnings).green()
        }
    );
}
