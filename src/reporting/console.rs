// src/reporting/console.rs
use super::pluralize;
use crate::model::{BatchResult, Change, ChangeKind, ProcessingResult};
use crate::processor::ScanEntry;
use crate::rewrite::{render_block, RenderOptions};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Display switches taken from `[output]` and the command line.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub verbose: bool,
    pub show_diff: bool,
    pub dry_run: bool,
    pub render: RenderOptions,
}

/// Prints one file's metrics, its problems and, in dry-run, its changes.
pub fn print_file(result: &ProcessingResult, opts: &ReportOptions) {
    let status = if result.success() {
        "OK".green().bold()
    } else {
        "FAILED".red().bold()
    };
    println!("{status} {}", result.file_path.display());

    if opts.verbose && result.success() {
        println!("   {:<22}{}", "File size:", format!("{} bytes", result.file_size));
        println!("   {:<22}{:.2}s", "Processing time:", result.elapsed.as_secs_f64());
        println!("   {:<22}{}", "Functions found:", result.functions_found);
        println!("   {:<22}{}", "Docstrings added:", result.docstrings_added);
        println!("   {:<22}{}", "Docstrings modified:", result.docstrings_modified);
    }

    for error in &result.errors {
        println!("   {} {}", "error:".red(), error);
    }
    for warning in &result.warnings {
        println!("   {} {}", "warning:".yellow(), warning);
    }

    if opts.dry_run && !result.changes.is_empty() {
        println!("   {}", "Proposed changes:".cyan());
        for change in &result.changes {
            for line in change_preview(change, opts) {
                println!("{line}");
            }
        }
    }
}

/// Lines describing one change; with `show_diff` the rendered block is shown
/// with `-`/`+` markers.
#[must_use]
pub fn change_preview(change: &Change, opts: &ReportOptions) -> Vec<String> {
    let mut out = vec![format!(
        "   {} {} (line {})",
        "*".blue(),
        change.description,
        change.anchor_line
    )];
    if !opts.show_diff {
        return out;
    }
    if change.kind == ChangeKind::Modify {
        for line in change.original_text.lines() {
            out.push(format!("     {}", format!("- {line}").red()));
        }
    }
    for line in render_block(&change.new_text, "", opts.render) {
        out.push(format!("     {}", format!("+ {line}").green()));
    }
    out
}

/// Prints the per-file reports followed by the batch summary.
pub fn print_batch(batch: &BatchResult, opts: &ReportOptions) {
    for result in &batch.results {
        print_file(result, opts);
    }
    println!();
    println!("{}", summary_line(batch));
}

#[must_use]
pub fn summary_line(batch: &BatchResult) -> String {
    let head = if batch.failed_files == 0 {
        "Done".green().bold()
    } else {
        "Done with failures".yellow().bold()
    };
    format!(
        "{head}: {} {} ({} ok, {} failed), {} {}, {} {}, {} {} in {:.2}s",
        batch.total_files,
        pluralize("file", batch.total_files),
        batch.successful_files,
        batch.failed_files,
        batch.total_changes,
        pluralize("change", batch.total_changes),
        batch.total_errors,
        pluralize("error", batch.total_errors),
        batch.total_warnings,
        pluralize("warning", batch.total_warnings),
        batch.elapsed.as_secs_f64(),
    )
}

/// Prints flagged functions grouped by file. Returns the number flagged.
pub fn print_check(entries: &[(PathBuf, Vec<ScanEntry>)], failures: &[(PathBuf, String)]) -> usize {
    let mut flagged = 0;
    for (path, scan) in entries {
        for entry in scan.iter().filter(|e| e.is_flagged()) {
            flagged += 1;
            println!("{}", check_line(path, entry));
        }
    }
    for (path, error) in failures {
        println!("{} {}: {}", "error:".red(), path.display(), error);
    }

    if flagged == 0 {
        println!("{} All eligible functions are documented.", "OK".green().bold());
    } else {
        println!(
            "{} {flagged} {} missing or needing docstrings.",
            "FOUND".yellow().bold(),
            pluralize("function", flagged)
        );
    }
    flagged
}

fn check_line(path: &Path, entry: &ScanEntry) -> String {
    let label = if entry.record.has_docstring() {
        "needs improvement".yellow()
    } else {
        "missing docstring".red()
    };
    format!(
        "{}:{} {} {}",
        path.display(),
        entry.record.header_line,
        entry.record.qualified_name().bold(),
        label
    )
}
