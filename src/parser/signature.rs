// src/parser/signature.rs
//! Canonical one-line signatures rebuilt from the syntax tree.

use crate::model::Parameter;
use tree_sitter::Node;

const ANY: &str = "Any";

pub struct Signature {
    pub text: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
}

/// Rebuilds the signature of a `function_definition` node.
#[must_use]
pub fn build(node: Node, source: &[u8], name: &str, is_async: bool) -> Signature {
    let (parameters, rendered) = node
        .child_by_field_name("parameters")
        .map(|p| collect_parameters(p, source))
        .unwrap_or_default();
    let return_type = node
        .child_by_field_name("return_type")
        .map(|r| render_expr(r, source));

    let mut text = String::new();
    if is_async {
        text.push_str("async ");
    }
    text.push_str("def ");
    text.push_str(name);
    text.push('(');
    text.push_str(&rendered.join(", "));
    text.push(')');
    if let Some(ret) = &return_type {
        text.push_str(" -> ");
        text.push_str(ret);
    }

    Signature {
        text,
        parameters,
        return_type,
    }
}

fn collect_parameters(params: Node, source: &[u8]) -> (Vec<Parameter>, Vec<String>) {
    let mut parameters = Vec::new();
    let mut rendered = Vec::new();
    let mut keyword_only = false;
    let mut cursor = params.walk();

    for child in params.named_children(&mut cursor) {
        match child.kind() {
            "comment" => {}
            "keyword_separator" => {
                keyword_only = true;
                rendered.push("*".to_string());
            }
            "positional_separator" => rendered.push("/".to_string()),
            _ => {
                let Some(param) = read_parameter(child, source, keyword_only) else {
                    continue;
                };
                if param.is_vararg {
                    keyword_only = true;
                }
                rendered.push(render_parameter(&param, child, source));
                parameters.push(param);
            }
        }
    }
    (parameters, rendered)
}

fn read_parameter(node: Node, source: &[u8], keyword_only: bool) -> Option<Parameter> {
    let annotation = node
        .child_by_field_name("type")
        .map(|t| render_expr(t, source));
    let default = node
        .child_by_field_name("value")
        .map(|v| render_expr(v, source));

    // typed `*args: T` wraps the splat pattern rather than an identifier
    let target = match node.kind() {
        "typed_parameter" => node.named_child(0)?,
        "default_parameter" | "typed_default_parameter" => node.child_by_field_name("name")?,
        _ => node,
    };

    let (name, is_vararg, is_kwarg) = match target.kind() {
        "list_splat_pattern" => (splat_name(target, source, "*"), true, false),
        "dictionary_splat_pattern" => (splat_name(target, source, "**"), false, true),
        _ => (text_of(target, source), false, false),
    };
    if name.is_empty() {
        return None;
    }

    let required = default.is_none() && !is_vararg && !is_kwarg;
    Some(Parameter {
        name,
        type_name: annotation.unwrap_or_else(|| ANY.to_string()),
        default,
        required,
        is_vararg,
        is_kwarg,
        keyword_only: keyword_only && !is_vararg && !is_kwarg,
    })
}

fn render_parameter(param: &Parameter, node: Node, source: &[u8]) -> String {
    let mut out = String::new();
    if param.is_vararg {
        out.push('*');
    } else if param.is_kwarg {
        out.push_str("**");
    }
    out.push_str(&param.name);

    let annotated = node.child_by_field_name("type").is_some();
    if annotated {
        out.push_str(": ");
        out.push_str(&param.type_name);
    }
    if let Some(default) = &param.default {
        out.push_str(if annotated { " = " } else { "=" });
        out.push_str(default);
    }
    out
}

fn splat_name(node: Node, source: &[u8], marker: &str) -> String {
    text_of(node, source).trim_start_matches(marker).trim().to_string()
}

fn text_of(node: Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or_default().to_string()
}

/// Renders an expression back to single-line source.
///
/// Line breaks and indentation inside bracketed expressions collapse to one
/// space; padding just inside brackets and before commas is dropped.
#[must_use]
pub fn render_expr(node: Node, source: &[u8]) -> String {
    let raw = node.utf8_text(source).unwrap_or_default();
    if !raw.contains('\n') {
        return raw.trim().to_string();
    }
    let joined = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    tidy_brackets(&joined)
}

fn tidy_brackets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let chars: Vec<char> = text.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c == ' ' {
            let prev = out.chars().last();
            let next = chars.get(i + 1).copied();
            if matches!(prev, Some('(' | '[' | '{')) || matches!(next, Some(')' | ']' | '}' | ',')) {
                continue;
            }
        }
        if matches!(c, ')' | ']' | '}') && out.ends_with(',') {
            out.pop();
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang;

    fn signature_of(src: &str) -> Signature {
        let tree = lang::parse_tree(src).unwrap();
        let root = tree.root_node();
        let mut cursor = root.walk();
        let func = root
            .named_children(&mut cursor)
            .find(|n| n.kind() == "function_definition")
            .unwrap();
        let name = func
            .child_by_field_name("name")
            .unwrap()
            .utf8_text(src.as_bytes())
            .unwrap()
            .to_string();
        let is_async = func.child(0).is_some_and(|c| c.kind() == "async");
        build(func, src.as_bytes(), &name, is_async)
    }

    #[test]
    fn test_tidy_brackets() {
        assert_eq!(tidy_brackets("{ \"a\": 1, }"), "{\"a\": 1}");
        assert_eq!(tidy_brackets("f( x , y )"), "f(x, y)");
    }

    #[test]
    fn test_multiline_default_collapses() {
        let sig = signature_of("def f(opts: dict = {\n    \"a\": 1,\n    \"b\": 2,\n}):\n    pass\n");
        assert_eq!(sig.text, "def f(opts: dict = {\"a\": 1, \"b\": 2})");
        assert_eq!(sig.parameters[0].default.as_deref(), Some("{\"a\": 1, \"b\": 2}"));
    }

    #[test]
    fn test_separators_render_but_are_not_parameters() {
        let sig = signature_of("def f(a, /, b, *, c: int = 3, **kw):\n    pass\n");
        assert_eq!(sig.text, "def f(a, /, b, *, c: int = 3, **kw)");
        let names: Vec<&str> = sig.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "kw"]);
        assert!(sig.parameters[2].keyword_only);
        assert!(!sig.parameters[2].required);
        assert!(sig.parameters[3].is_kwarg);
    }

    #[test]
    fn test_typed_varargs() {
        let sig = signature_of("async def g(*args: int, key=None, **extra: str) -> None:\n    pass\n");
        assert_eq!(sig.text, "async def g(*args: int, key=None, **extra: str) -> None");
        assert!(sig.parameters[0].is_vararg);
        assert_eq!(sig.parameters[0].type_name, "int");
        assert!(sig.parameters[1].keyword_only);
        assert_eq!(sig.parameters[1].type_name, "Any");
        assert_eq!(sig.return_type.as_deref(), Some("None"));
    }
}
