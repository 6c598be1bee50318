// src/parser/mod.rs
//! Structural parser: Python source in, one `FunctionRecord` per eligible
//! definition out, in source order.

pub mod docstring;
pub mod lines;
pub mod parents;
pub mod signature;

use crate::error::{DocError, Result};
use crate::lang;
use crate::model::FunctionRecord;
use parents::ParentIndex;
use std::fs;
use std::path::Path;
use tree_sitter::Node;

/// Module name used for sources that did not come from a file.
pub const ANONYMOUS_MODULE: &str = "<string>";

/// Parses `source` as an anonymous module.
///
/// # Errors
/// Returns `ParseFailure` if the text is not valid Python.
pub fn parse(source: &str) -> Result<Vec<FunctionRecord>> {
    parse_module(source, ANONYMOUS_MODULE)
}

/// Reads `path` as UTF-8 and parses it, naming the module after the file stem.
///
/// # Errors
/// Returns `Io` when the file cannot be read, `ParseFailure` on invalid Python.
pub fn parse_file(path: &Path) -> Result<Vec<FunctionRecord>> {
    let source = fs::read_to_string(path).map_err(|e| DocError::io(e, path))?;
    parse_module(&source, &module_name_for(path))
}

#[must_use]
pub fn module_name_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map_or_else(|| ANONYMOUS_MODULE.to_string(), str::to_string)
}

/// Parses `source` and extracts every eligible function and method.
///
/// # Errors
/// Returns `ParseFailure` if the text is not valid Python.
pub fn parse_module(source: &str, module_name: &str) -> Result<Vec<FunctionRecord>> {
    let tree = lang::parse_tree(source)?;
    let bytes = source.as_bytes();
    let index = ParentIndex::build(tree.root_node(), bytes);
    let source_lines: Vec<&str> = source.lines().collect();

    let mut records = Vec::new();
    for &node in index.functions() {
        let Some(name) = node
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(bytes).ok())
        else {
            continue;
        };
        if !is_eligible(name) {
            tracing::debug!(name, "skipping ineligible definition");
            continue;
        }
        let record = build_record(node, &index, bytes, &source_lines, name, module_name);
        tracing::debug!(
            name = %record.qualified_name(),
            header_line = record.header_line,
            has_docstring = record.has_docstring(),
            "found definition"
        );
        records.push(record);
    }
    Ok(records)
}

fn build_record(
    node: Node,
    index: &ParentIndex,
    bytes: &[u8],
    source_lines: &[&str],
    name: &str,
    module_name: &str,
) -> FunctionRecord {
    let start_line = node.start_position().row + 1;
    let is_async = node.child(0).is_some_and(|c| c.kind() == "async");
    let sig = signature::build(node, bytes, name, is_async);
    let existing_docstring = node
        .child_by_field_name("body")
        .and_then(|body| docstring::extract(body, bytes));

    let header_line = lines::header_line(source_lines, start_line);
    let signature_end_line = colon_line(node).unwrap_or(header_line);
    let body_end_line = lines::body_end_line(source_lines, start_line, header_line);
    let body_snippet = lines::body_snippet(source_lines, header_line, body_end_line);

    FunctionRecord {
        name: name.to_string(),
        enclosing_type_name: index.enclosing_class(node.id()).map(str::to_string),
        module_name: module_name.to_string(),
        signature_text: sig.text,
        existing_docstring,
        header_line,
        signature_end_line,
        body_end_line,
        is_async,
        return_type: sig.return_type,
        parameters: sig.parameters,
        body_snippet,
    }
}

/// Line of the `:` token that closes the definition's header.
fn colon_line(node: Node) -> Option<usize> {
    let mut cursor = node.walk();
    let line = node
        .children(&mut cursor)
        .find(|c| c.kind() == ":")
        .map(|c| c.start_position().row + 1);
    line
}

/// Single-underscore helpers and test functions are left alone. Anything
/// starting with `__` (dunders and name-mangled methods) is kept.
#[must_use]
pub fn is_eligible(name: &str) -> bool {
    if name.starts_with("test_") {
        return false;
    }
    !(name.starts_with('_') && !name.starts_with("__"))
}
