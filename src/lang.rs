// src/lang.rs
//! Grammar plumbing. Python is the only language the parser understands.

use crate::error::{DocError, Result};
use std::path::Path;
use tree_sitter::{Language, Node, Parser, Tree};

pub const PYTHON_EXT: &str = "py";

#[must_use]
pub fn grammar() -> Language {
    tree_sitter_python::language()
}

#[must_use]
pub fn is_python(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(PYTHON_EXT))
}

/// Parses `source` into a tree, rejecting trees that contain error recovery nodes.
///
/// # Errors
/// Returns `ParseFailure` when the grammar cannot be loaded or the text is not valid Python.
pub fn parse_tree(source: &str) -> Result<Tree> {
    let mut parser = Parser::new();
    parser
        .set_language(grammar())
        .map_err(|e| DocError::ParseFailure {
            line: 0,
            column: 0,
            message: format!("grammar unavailable: {e}"),
        })?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| DocError::ParseFailure {
            line: 0,
            column: 0,
            message: "parser produced no tree".to_string(),
        })?;

    let root = tree.root_node();
    if root.has_error() {
        let bad = first_error(root).unwrap_or(root);
        let pos = bad.start_position();
        let message = if bad.is_missing() {
            format!("missing '{}'", bad.kind())
        } else {
            "invalid syntax".to_string()
        };
        return Err(DocError::ParseFailure {
            line: pos.row + 1,
            column: pos.column + 1,
            message,
        });
    }
    Ok(tree)
}

/// True when `source` parses without error nodes.
#[must_use]
pub fn is_valid(source: &str) -> bool {
    parse_tree(source).is_ok()
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_python() {
        assert!(is_python(Path::new("pkg/mod.py")));
        assert!(is_python(Path::new("MOD.PY")));
        assert!(!is_python(Path::new("mod.pyi.bak")));
        assert!(!is_python(Path::new("Makefile")));
    }

    #[test]
    fn test_syntax_error_location() {
        let err = parse_tree("def ok():\n    pass\n\ndef broken(:\n    pass\n").unwrap_err();
        match err {
            DocError::ParseFailure { line, .. } => assert_eq!(line, 4),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_valid_source() {
        assert!(is_valid("async def f(x: int = 1) -> int:\n    return x\n"));
    }
}
