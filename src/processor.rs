// src/processor.rs
//! Sequences parse, filter, generate and rewrite for files and batches.

use crate::config::Config;
use crate::discovery::{self, PathFilter};
use crate::error::{DocError, Result};
use crate::generate::Generator;
use crate::heuristics;
use crate::lang;
use crate::model::{BatchResult, Change, ChangeKind, FunctionRecord, ProcessingResult};
use crate::parser;
use crate::rewrite::{self, writer, RenderOptions};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Outcome of the in-memory pipeline.
#[derive(Debug, Clone)]
pub struct SourceFix {
    pub text: String,
    pub changes: Vec<Change>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocStatus {
    Missing,
    NeedsImprovement,
    Documented,
}

/// One record as seen by `check`.
#[derive(Debug, Clone, Serialize)]
pub struct ScanEntry {
    pub record: FunctionRecord,
    pub status: DocStatus,
}

impl ScanEntry {
    #[must_use]
    pub fn is_flagged(&self) -> bool {
        self.status != DocStatus::Documented
    }
}

pub struct Processor<'a> {
    config: &'a Config,
    generator: &'a dyn Generator,
    filter: PathFilter,
    render: RenderOptions,
    cancel: Arc<AtomicBool>,
}

impl<'a> Processor<'a> {
    /// # Errors
    /// Returns `ConfigInvalid` if an include/exclude pattern does not compile.
    pub fn new(config: &'a Config, generator: &'a dyn Generator) -> Result<Self> {
        Ok(Self {
            config,
            generator,
            filter: PathFilter::from_config(&config.processing)?,
            render: RenderOptions::from(&config.format),
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Shares `flag` as the stop signal: once raised, no new file or function is started.
    #[must_use]
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = flag;
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Processes one file, writing it unless dry-run is configured.
    ///
    /// # Errors
    /// Returns `Io`, `UnsupportedFile`, `SizeLimitExceeded`, `ParseFailure` or
    /// `RewriteFailure`; generation failures only become warnings.
    pub fn process_file(&self, path: &Path) -> Result<ProcessingResult> {
        self.run_file(path, self.config.processing.dry_run)
    }

    /// Like [`Processor::process_file`] but never writes.
    ///
    /// # Errors
    /// Same as `process_file`.
    pub fn preview(&self, path: &Path) -> Result<ProcessingResult> {
        self.run_file(path, true)
    }

    fn run_file(&self, path: &Path, dry_run: bool) -> Result<ProcessingResult> {
        let started = Instant::now();
        let (source, snapshot) = read_checked(path, self.config.processing.max_file_size)?;
        let records = parser::parse_module(&source, &parser::module_name_for(path))?;
        let functions_found = records.len();

        let (changes, mut warnings) = self.draft_changes(path, &source, &records);

        if !changes.is_empty() {
            let rewritten = rewrite::rewrite_source(path, &source, &changes, self.render)?;
            warnings.extend(rewritten.warnings);
            if !dry_run {
                if self.config.processing.backup_files {
                    writer::create_backup(path)?;
                }
                writer::write_atomic(path, &rewritten.text, &snapshot)?;
            }
        }

        let result = ProcessingResult::new(
            path.to_path_buf(),
            changes,
            warnings,
            snapshot.len,
            functions_found,
            started.elapsed(),
        );
        tracing::info!(
            path = %path.display(),
            functions = result.functions_found,
            added = result.docstrings_added,
            modified = result.docstrings_modified,
            dry_run,
            "processed file"
        );
        Ok(result)
    }

    /// Full pipeline over an in-memory module; nothing touches disk.
    ///
    /// # Errors
    /// Returns `ParseFailure` or `RewriteFailure`.
    pub fn fix_source(&self, source: &str) -> Result<SourceFix> {
        let records = parser::parse(source)?;
        let target = Path::new(parser::ANONYMOUS_MODULE);
        let (changes, mut warnings) = self.draft_changes(target, source, &records);
        if changes.is_empty() {
            return Ok(SourceFix {
                text: source.to_string(),
                changes,
                warnings,
            });
        }
        let rewritten = rewrite::rewrite_source(target, source, &changes, self.render)?;
        warnings.extend(rewritten.warnings);
        Ok(SourceFix {
            text: rewritten.text,
            changes,
            warnings,
        })
    }

    /// Classifies every eligible function in `path` without generating anything.
    ///
    /// # Errors
    /// Same file-level errors as `process_file`.
    pub fn scan(&self, path: &Path) -> Result<Vec<ScanEntry>> {
        scan_file(path, self.config.processing.max_file_size)
    }

    /// Processes every eligible file under `root`.
    ///
    /// # Errors
    /// Returns `Io` if `root` is missing and `NotADirectory` if it is a file.
    /// Per-file failures are recorded in the batch instead.
    pub fn process_directory(&self, root: &Path) -> Result<BatchResult> {
        let files = discovery::discover(root, &self.filter)?;
        Ok(self.process_files(&files))
    }

    /// Processes a mix of files and directories as one batch.
    ///
    /// # Errors
    /// Returns `Io` if any listed path does not exist.
    pub fn process_paths(&self, paths: &[PathBuf]) -> Result<BatchResult> {
        let files = self.collect_files(paths)?;
        Ok(self.process_files(&files))
    }

    /// # Errors
    /// Returns `Io` if a listed path does not exist.
    pub fn collect_files(&self, paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
        collect_files(paths, &self.filter)
    }

    fn process_files(&self, files: &[PathBuf]) -> BatchResult {
        let started = Instant::now();
        let mut results = Vec::with_capacity(files.len());
        for file in files {
            if self.is_cancelled() {
                tracing::warn!("cancelled; {} files not started", files.len() - results.len());
                break;
            }
            match self.process_file(file) {
                Ok(result) => results.push(result),
                Err(e) => {
                    tracing::warn!(path = %file.display(), "file failed: {e}");
                    results.push(ProcessingResult::failed(file.clone(), e.to_string()));
                }
            }
        }
        BatchResult::from_results(results, started.elapsed())
    }

    /// Asks the generator for every record that wants a docstring.
    ///
    /// One failing function never stops the others; its error becomes a warning.
    fn draft_changes(
        &self,
        target: &Path,
        source: &str,
        records: &[FunctionRecord],
    ) -> (Vec<Change>, Vec<String>) {
        let lines: Vec<&str> = source.lines().collect();
        let style = self.config.format.style;
        let mut changes = Vec::new();
        let mut warnings = Vec::new();

        for record in records.iter().filter(|r| heuristics::wants_docstring(r)) {
            if self.is_cancelled() {
                warnings.push("Cancelled before all functions were processed".to_string());
                break;
            }
            let name = record.qualified_name();
            if !rewrite::is_header_end(lines.as_slice(), record.header_line) {
                warnings.push(format!(
                    "Skipped {name}: header at line {} could not be resolved",
                    record.header_line
                ));
                continue;
            }
            if record.header_line != record.signature_end_line {
                warnings.push(format!(
                    "Skipped {name}: line {} ends inside the signature, header closes at line {}",
                    record.header_line, record.signature_end_line
                ));
                continue;
            }
            if record.has_docstring()
                && rewrite::find_docstring_span(lines.as_slice(), record.header_line).is_none()
            {
                warnings.push(format!("Skipped {name}: existing docstring layout not supported"));
                continue;
            }

            match self.generator.generate(record, style) {
                Ok(generation) => {
                    let change = Change::for_record(target, record, generation.content);
                    tracing::debug!(
                        function = %name,
                        kind = %change.kind,
                        model = %generation.model,
                        "drafted docstring"
                    );
                    changes.push(change);
                }
                Err(e) => {
                    tracing::warn!(function = %name, "generation failed: {e}");
                    warnings.push(format!("Failed to generate docstring for {name}: {e}"));
                }
            }
        }
        debug_assert!(changes
            .iter()
            .all(|c| (c.kind == ChangeKind::Add) == c.original_text.is_empty()));
        (changes, warnings)
    }
}

/// Expands directories through discovery; explicit files are taken as given.
///
/// # Errors
/// Returns `Io` if a listed path does not exist.
pub fn collect_files(paths: &[PathBuf], filter: &PathFilter) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        let meta = fs::metadata(path).map_err(|e| DocError::io(e, path))?;
        if meta.is_dir() {
            files.extend(discovery::discover(path, filter)?);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

/// Classifies every eligible function in `path`; no generator involved.
///
/// # Errors
/// Returns `Io`, `UnsupportedFile`, `SizeLimitExceeded` or `ParseFailure`.
pub fn scan_file(path: &Path, max_file_size: u64) -> Result<Vec<ScanEntry>> {
    let (source, _) = read_checked(path, max_file_size)?;
    let records = parser::parse_module(&source, &parser::module_name_for(path))?;
    Ok(records
        .into_iter()
        .map(|record| {
            let status = if !record.has_docstring() {
                DocStatus::Missing
            } else if heuristics::needs_improvement(&record) {
                DocStatus::NeedsImprovement
            } else {
                DocStatus::Documented
            };
            ScanEntry { record, status }
        })
        .collect())
}

/// Reads a Python file after checking its extension and size.
fn read_checked(path: &Path, limit: u64) -> Result<(String, writer::Snapshot)> {
    let meta = fs::metadata(path).map_err(|e| DocError::io(e, path))?;
    if !meta.is_file() || !lang::is_python(path) {
        return Err(DocError::UnsupportedFile(path.to_path_buf()));
    }
    if meta.len() > limit {
        return Err(DocError::SizeLimitExceeded {
            size: meta.len(),
            limit,
        });
    }

    let bytes = fs::read(path).map_err(|e| DocError::io(e, path))?;
    let snapshot = writer::Snapshot::of(&bytes);
    let source = String::from_utf8(bytes).map_err(|e| {
        DocError::io(
            std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            path,
        )
    })?;
    Ok((source, snapshot))
}
