// src/parser/docstring.rs
use tree_sitter::Node;

/// Raw docstring of a function body: the first statement, when it is a bare
/// string literal. Byte strings and f-strings do not count.
#[must_use]
pub fn extract(body: Node, source: &[u8]) -> Option<String> {
    let mut cursor = body.walk();
    let first = body
        .named_children(&mut cursor)
        .find(|n| n.kind() != "comment")?;
    if first.kind() != "expression_statement" || first.named_child_count() != 1 {
        return None;
    }
    let expr = first.named_child(0)?;
    match expr.kind() {
        "string" => literal_value(expr.utf8_text(source).ok()?),
        "concatenated_string" => {
            let mut inner = expr.walk();
            let parts: Option<Vec<String>> = expr
                .named_children(&mut inner)
                .filter(|n| n.kind() == "string")
                .map(|n| n.utf8_text(source).ok().and_then(literal_value))
                .collect();
            parts.map(|p| p.concat())
        }
        _ => None,
    }
}

/// Splits a string literal into its text between the delimiters.
///
/// Accepts `r`/`u` prefixes in any case; rejects `b` and `f` prefixes.
#[must_use]
pub fn literal_value(literal: &str) -> Option<String> {
    let (prefix, quoted) = split_prefix(literal.trim());
    if prefix.chars().any(|c| matches!(c, 'b' | 'B' | 'f' | 'F')) {
        return None;
    }
    let delim = delimiter(quoted)?;
    let inner = quoted.strip_prefix(delim)?.strip_suffix(delim)?;
    Some(inner.to_string())
}

/// Prefix letters and the rest of a literal, e.g. `("r", "\"\"\"x\"\"\"")`.
#[must_use]
pub fn split_prefix(literal: &str) -> (&str, &str) {
    let end = literal
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map_or(literal.len(), |(i, _)| i);
    if end > 2 {
        return ("", literal);
    }
    literal.split_at(end)
}

/// The opening delimiter of a literal body that starts with a quote.
#[must_use]
pub fn delimiter(quoted: &str) -> Option<&'static str> {
    if quoted.starts_with("\"\"\"") {
        Some("\"\"\"")
    } else if quoted.starts_with("'''") {
        Some("'''")
    } else if quoted.starts_with('"') {
        Some("\"")
    } else if quoted.starts_with('\'') {
        Some("'")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_value() {
        assert_eq!(literal_value("\"\"\"Doc.\"\"\"").as_deref(), Some("Doc."));
        assert_eq!(literal_value("'x'").as_deref(), Some("x"));
        assert_eq!(literal_value("r'''a\\b'''").as_deref(), Some("a\\b"));
        assert_eq!(literal_value("\"\"\"\"\"\"").as_deref(), Some(""));
        assert_eq!(literal_value("b\"bytes\""), None);
        assert_eq!(literal_value("f\"{x}\""), None);
    }

    #[test]
    fn test_split_prefix() {
        assert_eq!(split_prefix("Rb'x'"), ("Rb", "'x'"));
        assert_eq!(split_prefix("\"x\""), ("", "\"x\""));
    }
}
