// src/model.rs
//! Entity types shared by the parser, the rewrite engine and the processor.

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Documentation convention used for generated text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DocstringStyle {
    #[default]
    Google,
    Numpy,
    #[value(name = "restructuredtext", alias = "rst")]
    #[serde(alias = "rst")]
    Restructuredtext,
}

impl DocstringStyle {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Numpy => "numpy",
            Self::Restructuredtext => "restructuredtext",
        }
    }
}

impl fmt::Display for DocstringStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocstringStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "numpy" => Ok(Self::Numpy),
            "restructuredtext" | "rst" => Ok(Self::Restructuredtext),
            other => Err(format!("unknown docstring style '{other}'")),
        }
    }
}

/// One declared parameter, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    /// Rendered annotation, `Any` when the parameter is unannotated.
    #[serde(rename = "type")]
    pub type_name: String,
    pub default: Option<String>,
    pub required: bool,
    pub is_vararg: bool,
    pub is_kwarg: bool,
    pub keyword_only: bool,
}

/// One eligible function or method found in a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionRecord {
    pub name: String,
    pub enclosing_type_name: Option<String>,
    pub module_name: String,
    pub signature_text: String,
    pub existing_docstring: Option<String>,
    /// 1-based line on which the header's terminating colon sits.
    pub header_line: usize,
    /// 1-based line of the colon the grammar assigns to the header. Differs
    /// from `header_line` only when the line scan stopped inside the signature.
    pub signature_end_line: usize,
    /// 1-based, heuristic end of the body.
    pub body_end_line: usize,
    pub is_async: bool,
    pub return_type: Option<String>,
    pub parameters: Vec<Parameter>,
    pub body_snippet: Option<String>,
}

impl FunctionRecord {
    #[must_use]
    pub fn has_docstring(&self) -> bool {
        self.existing_docstring.is_some()
    }

    #[must_use]
    pub fn is_method(&self) -> bool {
        self.enclosing_type_name.is_some()
    }

    /// Dunder names such as `__init__`.
    #[must_use]
    pub fn is_special(&self) -> bool {
        self.name.len() > 4 && self.name.starts_with("__") && self.name.ends_with("__")
    }

    /// Return annotation that promises a value (anything but `None`).
    #[must_use]
    pub fn returns_value(&self) -> bool {
        self.return_type
            .as_deref()
            .is_some_and(|r| !r.trim().eq_ignore_ascii_case("none"))
    }

    /// `Class.method` or plain `function`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.enclosing_type_name {
            Some(owner) => format!("{owner}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Add,
    Modify,
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => f.write_str("add"),
            Self::Modify => f.write_str("modify"),
        }
    }
}

/// A proposed docstring edit anchored on a header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub target_path: PathBuf,
    pub anchor_line: usize,
    pub original_text: String,
    pub new_text: String,
    pub kind: ChangeKind,
    pub description: String,
}

impl Change {
    /// Builds the change that realizes `new_text` for `record`: an addition
    /// when the function has no docstring, a replacement otherwise.
    #[must_use]
    pub fn for_record(target: &Path, record: &FunctionRecord, new_text: String) -> Self {
        match &record.existing_docstring {
            None => Self {
                target_path: target.to_path_buf(),
                anchor_line: record.header_line,
                original_text: String::new(),
                new_text,
                kind: ChangeKind::Add,
                description: format!("Add docstring to {}", record.qualified_name()),
            },
            Some(existing) => {
                // An empty literal still has to be replaced, so keep its quotes.
                let original_text = if existing.is_empty() {
                    "\"\"\"\"\"\"".to_string()
                } else {
                    existing.clone()
                };
                Self {
                    target_path: target.to_path_buf(),
                    anchor_line: record.header_line,
                    original_text,
                    new_text,
                    kind: ChangeKind::Modify,
                    description: format!("Improve docstring for {}", record.qualified_name()),
                }
            }
        }
    }
}

fn duration_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

/// Outcome of processing one file.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingResult {
    pub file_path: PathBuf,
    pub changes: Vec<Change>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub file_size: u64,
    #[serde(serialize_with = "duration_secs")]
    pub elapsed: Duration,
    pub functions_found: usize,
    pub docstrings_added: usize,
    pub docstrings_modified: usize,
}

impl ProcessingResult {
    #[must_use]
    pub fn new(
        file_path: PathBuf,
        changes: Vec<Change>,
        warnings: Vec<String>,
        file_size: u64,
        functions_found: usize,
        elapsed: Duration,
    ) -> Self {
        let docstrings_added = changes.iter().filter(|c| c.kind == ChangeKind::Add).count();
        let docstrings_modified = changes.len() - docstrings_added;
        Self {
            file_path,
            changes,
            errors: Vec::new(),
            warnings,
            file_size,
            elapsed,
            functions_found,
            docstrings_added,
            docstrings_modified,
        }
    }

    /// Result for a file whose processing stopped on a fatal error.
    #[must_use]
    pub fn failed(file_path: PathBuf, error: String) -> Self {
        Self {
            file_path,
            changes: Vec::new(),
            errors: vec![error],
            warnings: Vec::new(),
            file_size: 0,
            elapsed: Duration::ZERO,
            functions_found: 0,
            docstrings_added: 0,
            docstrings_modified: 0,
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Aggregate over many files.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub total_changes: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    #[serde(serialize_with = "duration_secs")]
    pub elapsed: Duration,
    pub results: Vec<ProcessingResult>,
}

impl BatchResult {
    #[must_use]
    pub fn from_results(results: Vec<ProcessingResult>, elapsed: Duration) -> Self {
        let successful_files = results.iter().filter(|r| r.success()).count();
        Self {
            total_files: results.len(),
            successful_files,
            failed_files: results.len() - successful_files,
            total_changes: results
                .iter()
                .filter(|r| r.success())
                .map(|r| r.changes.len())
                .sum(),
            total_errors: results.iter().map(|r| r.errors.len()).sum(),
            total_warnings: results.iter().map(|r| r.warnings.len()).sum(),
            elapsed,
            results,
        }
    }
}
