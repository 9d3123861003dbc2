/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template AST types.
//!
//! This module defines the tree produced by the compiler. Each node records
//! where it came from in the template source for error reporting. Nodes hold
//! no references into any namespace.

/// A location in template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// 1-based line on which the node starts.
    pub line: usize,
    /// Byte offset of the first byte.
    pub start: usize,
    /// Byte offset one past the last byte.
    pub end: usize,
}

impl Span {
    pub fn new(line: usize, start: usize, end: usize) -> Self {
        Self { line, start, end }
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// A node in the template AST.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateNode {
    /// Literal text to be output as-is.
    Text(Text),

    /// Conditional block: `{{if path}}...{{else}}...{{endif}}`
    If(Conditional),

    /// Loop: `{{for var in path}}...{{endfor}}`
    For(ForLoop),

    /// Variable substitution: `{{path}}`
    Subst(Substitution),
}

impl TemplateNode {
    pub fn span(&self) -> Span {
        match self {
            TemplateNode::Text(n) => n.span,
            TemplateNode::If(n) => n.span,
            TemplateNode::For(n) => n.span,
            TemplateNode::Subst(n) => n.span,
        }
    }
}

/// Literal text node.
///
/// Brace escapes such as `{{{}}` also compile to text nodes. The bytes are
/// copied from the source as they are and need not be UTF-8.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: Vec<u8>,
    pub span: Span,
}

/// Conditional block.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    /// Namespace path whose truthiness selects the branch.
    pub condition: String,
    pub then_branch: Vec<TemplateNode>,
    /// Empty when the block has no `{{else}}`.
    pub else_branch: Vec<TemplateNode>,
    /// Location of the opening `{{if ...}}` directive.
    pub span: Span,
}

/// Loop over an array or dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    /// Name the loop variable is bound to in the local namespace. Inside the
    /// body it is a dictionary with `key` and `value` entries.
    pub var: String,
    /// Namespace path of the collection being iterated.
    pub iterable: String,
    pub body: Vec<TemplateNode>,
    /// Location of the opening `{{for ...}}` directive.
    pub span: Span,
}

/// Variable substitution.
#[derive(Debug, Clone, PartialEq)]
pub struct Substitution {
    pub path: String,
    pub span: Span,
}

/// Count the nodes in a tree, including nested blocks.
pub fn count_nodes(nodes: &[TemplateNode]) -> usize {
    nodes
        .iter()
        .map(|node| {
            1 + match node {
                TemplateNode::If(c) => count_nodes(&c.then_branch) + count_nodes(&c.else_branch),
                TemplateNode::For(f) => count_nodes(&f.body),
                TemplateNode::Text(_) | TemplateNode::Subst(_) => 0,
            }
        })
        .sum()
}
