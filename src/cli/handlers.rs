// src/cli/handlers.rs
//! Command handlers for `fix`, `check` and `init`.

use super::args::FixArgs;
use crate::config::{Config, OutputFormat};
use crate::discovery::PathFilter;
use crate::error::DocError;
use crate::exit::DocwrightExit;
use crate::generate;
use crate::logging;
use crate::processor::{self, Processor, ScanEntry};
use crate::reporting::{self, console::ReportOptions};
use crate::rewrite::RenderOptions;
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct CheckReport<'a> {
    flagged: usize,
    files: Vec<CheckFile<'a>>,
    failures: Vec<CheckFailure<'a>>,
}

#[derive(Serialize)]
struct CheckFile<'a> {
    path: &'a Path,
    functions: Vec<&'a ScanEntry>,
}

#[derive(Serialize)]
struct CheckFailure<'a> {
    path: &'a Path,
    error: &'a str,
}

/// Handles the fix command.
///
/// # Errors
/// Returns error if a report cannot be serialized.
pub fn handle_fix(args: &FixArgs) -> Result<DocwrightExit> {
    logging::init(args.verbose, args.quiet);

    let mut config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return Ok(invalid(&e)),
    };
    apply_overrides(&mut config, args);
    if let Err(e) = config.validate() {
        return Ok(invalid(&e));
    }

    let generator = match generate::build_generator(&config.llm, &config.format) {
        Ok(generator) => generator,
        Err(e) => return Ok(invalid(&e)),
    };
    let processor = match Processor::new(&config, generator.as_ref()) {
        Ok(processor) => processor,
        Err(e) => return Ok(invalid(&e)),
    };

    let batch = match processor.process_paths(&args.targets) {
        Ok(batch) => batch,
        Err(e) if is_input_error(&e) => return Ok(invalid(&e)),
        Err(e) => return Err(e.into()),
    };

    if config.output.format == OutputFormat::Json {
        reporting::print_json(&batch)?;
    } else if args.quiet {
        println!("{}", reporting::console::summary_line(&batch));
    } else {
        let opts = ReportOptions {
            verbose: config.output.verbose,
            show_diff: config.output.show_diff,
            dry_run: config.processing.dry_run,
            render: RenderOptions::from(&config.format),
        };
        reporting::print_batch(&batch, &opts);
    }

    Ok(if batch.failed_files > 0 {
        DocwrightExit::ProcessingFailed
    } else {
        DocwrightExit::Success
    })
}

/// Handles the check command. Nothing is generated and no file is written.
///
/// # Errors
/// Returns error if the JSON report cannot be serialized.
pub fn handle_check(targets: &[PathBuf], config: Option<&Path>, json: bool) -> Result<DocwrightExit> {
    logging::init(false, false);

    let config = match load_config(config) {
        Ok(config) => config,
        Err(e) => return Ok(invalid(&e)),
    };
    let filter = match PathFilter::from_config(&config.processing) {
        Ok(filter) => filter,
        Err(e) => return Ok(invalid(&e)),
    };
    let files = match processor::collect_files(targets, &filter) {
        Ok(files) => files,
        Err(e) if is_input_error(&e) => return Ok(invalid(&e)),
        Err(e) => return Err(e.into()),
    };

    let mut scanned = Vec::new();
    let mut failures = Vec::new();
    for path in files {
        match processor::scan_file(&path, config.processing.max_file_size) {
            Ok(entries) => scanned.push((path, entries)),
            Err(e) => failures.push((path, e.to_string())),
        }
    }

    let flagged = if json {
        let report = check_report(&scanned, &failures);
        reporting::print_json(&report)?;
        report.flagged
    } else {
        reporting::print_check(&scanned, &failures)
    };

    Ok(if flagged > 0 {
        DocwrightExit::Undocumented
    } else if !failures.is_empty() {
        DocwrightExit::ProcessingFailed
    } else {
        DocwrightExit::Success
    })
}

/// Handles the init command.
///
/// # Errors
/// Returns error if the file cannot be written.
pub fn handle_init(path: &Path) -> Result<DocwrightExit> {
    if Config::write_default(path)? {
        println!("{} {}", "Created".green().bold(), path.display());
    } else {
        println!(
            "{} {} already exists, left untouched",
            "Skipped".yellow().bold(),
            path.display()
        );
    }
    Ok(DocwrightExit::Success)
}

fn load_config(explicit: Option<&Path>) -> crate::error::Result<Config> {
    match explicit {
        Some(path) => Config::load_file(path),
        None => Config::load(Path::new(".")),
    }
}

fn apply_overrides(config: &mut Config, args: &FixArgs) {
    if let Some(provider) = args.provider {
        config.override_provider(provider, |k| std::env::var(k).ok());
    }
    if let Some(key) = &args.api_key {
        config.llm.api_key = Some(key.clone());
    }
    if let Some(model) = &args.model {
        config.llm.model.clone_from(model);
    }
    if let Some(temperature) = args.temperature {
        config.llm.temperature = temperature;
    }
    if let Some(style) = args.style {
        config.format.style = style;
    }
    if args.dry_run {
        config.processing.dry_run = true;
    }
    if args.json {
        config.output.format = OutputFormat::Json;
    }
    if args.quiet {
        config.output.verbose = false;
    }
}

fn check_report<'a>(
    scanned: &'a [(PathBuf, Vec<ScanEntry>)],
    failures: &'a [(PathBuf, String)],
) -> CheckReport<'a> {
    let files: Vec<CheckFile<'a>> = scanned
        .iter()
        .map(|(path, entries)| CheckFile {
            path,
            functions: entries.iter().filter(|e| e.is_flagged()).collect(),
        })
        .filter(|f| !f.functions.is_empty())
        .collect();
    CheckReport {
        flagged: files.iter().map(|f| f.functions.len()).sum(),
        files,
        failures: failures
            .iter()
            .map(|(path, error)| CheckFailure { path, error })
            .collect(),
    }
}

fn is_input_error(err: &DocError) -> bool {
    match err {
        DocError::NotADirectory(_) | DocError::ConfigInvalid(_) => true,
        DocError::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
        _ => false,
    }
}

fn invalid(err: &DocError) -> DocwrightExit {
    eprintln!("{} {err}", "Error:".red());
    DocwrightExit::InvalidInput
}
