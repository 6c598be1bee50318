// src/parser/parents.rs
//! Parent side-table built in one pre-order pass over the tree.
//!
//! The tree itself is never mutated: each named node's id maps to its nearest
//! named ancestor plus the little we need to know about scopes.

use std::collections::HashMap;
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Class,
    Function,
    Other,
}

#[derive(Debug, Clone)]
struct Link {
    parent: Option<usize>,
    kind: ScopeKind,
    name: Option<String>,
}

pub struct ParentIndex<'tree> {
    links: HashMap<usize, Link>,
    functions: Vec<Node<'tree>>,
}

impl<'tree> ParentIndex<'tree> {
    /// Walks the tree once, recording parent links and collecting every
    /// `function_definition` in source order.
    #[must_use]
    pub fn build(root: Node<'tree>, source: &[u8]) -> Self {
        let mut links = HashMap::new();
        let mut functions = Vec::new();
        let mut stack: Vec<(Node<'tree>, Option<usize>)> = vec![(root, None)];

        while let Some((node, parent)) = stack.pop() {
            let kind = scope_kind(node.kind());
            let name = match kind {
                ScopeKind::Other => None,
                _ => node
                    .child_by_field_name("name")
                    .and_then(|n| n.utf8_text(source).ok())
                    .map(str::to_string),
            };
            if kind == ScopeKind::Function {
                functions.push(node);
            }
            links.insert(node.id(), Link { parent, kind, name });

            let mut cursor = node.walk();
            let children: Vec<Node<'tree>> = node.named_children(&mut cursor).collect();
            for child in children.into_iter().rev() {
                stack.push((child, Some(node.id())));
            }
        }

        Self { links, functions }
    }

    /// Function definitions in pre-order (outer before nested, top to bottom).
    #[must_use]
    pub fn functions(&self) -> &[Node<'tree>] {
        &self.functions
    }

    #[must_use]
    pub fn parent(&self, id: usize) -> Option<usize> {
        self.links.get(&id).and_then(|l| l.parent)
    }

    /// Name of the class that directly owns the definition `id`.
    ///
    /// The walk stops at the first enclosing scope: a class yields its name,
    /// an enclosing function means the definition is a local helper, not a method.
    #[must_use]
    pub fn enclosing_class(&self, id: usize) -> Option<&str> {
        let mut current = self.parent(id);
        while let Some(pid) = current {
            let link = self.links.get(&pid)?;
            match link.kind {
                ScopeKind::Class => return link.name.as_deref(),
                ScopeKind::Function => return None,
                ScopeKind::Other => current = link.parent,
            }
        }
        None
    }
}

fn scope_kind(kind: &str) -> ScopeKind {
    match kind {
        "class_definition" => ScopeKind::Class,
        "function_definition" => ScopeKind::Function,
        _ => ScopeKind::Other,
    }
}
