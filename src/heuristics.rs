// src/heuristics.rs
//! Cheap lexical check for docstrings that are worth regenerating.

use crate::model::FunctionRecord;

const MIN_DOCSTRING_CHARS: usize = 20;
const PARAM_MARKERS: &[&str] = &["param", "arg"];
const RETURN_MARKER: &str = "return";

/// True when an existing docstring looks too thin to keep.
///
/// Functions without a docstring return `false`; they take the add path instead.
#[must_use]
pub fn needs_improvement(record: &FunctionRecord) -> bool {
    let Some(doc) = record.existing_docstring.as_deref() else {
        return false;
    };
    let stripped = doc.trim();
    if stripped.chars().count() < MIN_DOCSTRING_CHARS {
        return true;
    }

    let lower = stripped.to_lowercase();
    let has_param_markers = PARAM_MARKERS.iter().any(|m| lower.contains(m));
    let has_return_marker = lower.contains(RETURN_MARKER);

    if !record.parameters.is_empty() && !has_param_markers {
        return true;
    }
    record.returns_value() && !has_return_marker
}

/// Whether the processor should ask for text for this record at all.
#[must_use]
pub fn wants_docstring(record: &FunctionRecord) -> bool {
    !record.has_docstring() || needs_improvement(record)
}
