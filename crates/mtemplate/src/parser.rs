/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template compiler.
//!
//! A single forward scan over the source bytes. Text runs accumulate until a
//! `{{` is found; the directive up to the next `}}` is classified and
//! either appended to the active block or used to open, switch or close a
//! block. Open blocks live on a stack until their closing directive.
//!
//! Text is passed through byte for byte, so templates need not be UTF-8.
//! Directives other than comments must be.

use std::path::Path;

use tracing::debug;

use crate::ast::{Conditional, ForLoop, Span, Substitution, TemplateNode, Text, count_nodes};
use crate::error::{CompileError, CompileErrorKind, TemplateError};

/// A compiled template ready for rendering.
///
/// Compiling does not consult any namespace, so one template can be
/// rendered any number of times against different data.
#[derive(Debug, Clone)]
pub struct Template {
    /// The parsed template AST.
    pub(crate) nodes: Vec<TemplateNode>,
}

impl Template {
    /// Compile a template from source text.
    ///
    /// Compilation is all-or-nothing: the first error discards everything
    /// parsed so far.
    pub fn compile(source: impl AsRef<[u8]>) -> Result<Self, CompileError> {
        let source = source.as_ref();
        let nodes = Parser::new(source).parse()?;
        debug!(nodes = count_nodes(&nodes), bytes = source.len(), "compiled template");
        Ok(Template { nodes })
    }

    /// Compile a template read from a file.
    pub fn compile_from_file(path: &Path) -> Result<Self, TemplateError> {
        let source = std::fs::read(path)?;
        Ok(Self::compile(source)?)
    }

    /// Get the AST nodes of this template.
    pub fn nodes(&self) -> &[TemplateNode] {
        &self.nodes
    }
}

/// Characters allowed in a substitution path.
fn is_path_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'[' | b']')
}

/// A directive, classified by its content.
#[derive(Debug, PartialEq)]
enum Directive<'s> {
    If(&'s str),
    Else,
    EndIf,
    For(&'s str),
    EndFor,
    /// A run of `{` characters, emitted literally.
    Escape(&'s str),
    Subst(&'s str),
}

fn classify(content: &str) -> Option<Directive<'_>> {
    let (keyword, expression) = match content.split_once(' ') {
        Some((keyword, rest)) => (keyword, Some(rest)),
        None => (content, None),
    };
    // Exactly one space between keyword and expression
    let expression = expression.filter(|e| !e.is_empty() && !e.starts_with(' '));

    match keyword {
        "if" => expression.map(Directive::If),
        "for" => expression.map(Directive::For),
        "else" if content == keyword => Some(Directive::Else),
        "endif" if content == keyword => Some(Directive::EndIf),
        "endfor" if content == keyword => Some(Directive::EndFor),
        "else" | "endif" | "endfor" => None,
        _ if content.bytes().all(|b| b == b'{') => Some(Directive::Escape(content)),
        _ if content.bytes().all(is_path_byte) => Some(Directive::Subst(content)),
        _ => None,
    }
}

/// Split `VAR in PATH`.
fn parse_for(expression: &str) -> Option<(&str, &str)> {
    let (var, iterable) = expression.split_once(" in ")?;
    let valid = !var.is_empty()
        && !iterable.is_empty()
        && !var.contains([' ', '.', '[', ']'])
        && !iterable.contains(' ');
    valid.then_some((var, iterable))
}

/// A block whose closing directive has not been seen yet.
#[derive(Debug)]
enum OpenBlock {
    If {
        condition: String,
        then_branch: Vec<TemplateNode>,
        /// `Some` once `{{else}}` has been seen.
        else_branch: Option<Vec<TemplateNode>>,
        span: Span,
    },
    For {
        var: String,
        iterable: String,
        body: Vec<TemplateNode>,
        span: Span,
    },
}

impl OpenBlock {
    fn name(&self) -> &'static str {
        match self {
            OpenBlock::If { .. } => "if",
            OpenBlock::For { .. } => "for",
        }
    }

    fn span(&self) -> Span {
        match self {
            OpenBlock::If { span, .. } | OpenBlock::For { span, .. } => *span,
        }
    }

    /// The node list that new nodes are appended to.
    fn active(&mut self) -> &mut Vec<TemplateNode> {
        match self {
            OpenBlock::If {
                else_branch: Some(else_branch),
                ..
            } => else_branch,
            OpenBlock::If { then_branch, .. } => then_branch,
            OpenBlock::For { body, .. } => body,
        }
    }

    fn into_node(self) -> TemplateNode {
        match self {
            OpenBlock::If {
                condition,
                then_branch,
                else_branch,
                span,
            } => TemplateNode::If(Conditional {
                condition,
                then_branch,
                else_branch: else_branch.unwrap_or_default(),
                span,
            }),
            OpenBlock::For {
                var,
                iterable,
                body,
                span,
            } => TemplateNode::For(ForLoop {
                var,
                iterable,
                body,
                span,
            }),
        }
    }
}

struct Parser<'s> {
    source: &'s [u8],
    /// Current 1-based line.
    line: usize,
    root: Vec<TemplateNode>,
    stack: Vec<OpenBlock>,
}

impl<'s> Parser<'s> {
    fn new(source: &'s [u8]) -> Self {
        Self {
            source,
            line: 1,
            root: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn error(&self, kind: CompileErrorKind, span: Span) -> CompileError {
        CompileError {
            kind,
            line: self.line,
            span,
        }
    }

    fn active(&mut self) -> &mut Vec<TemplateNode> {
        match self.stack.last_mut() {
            Some(block) => block.active(),
            None => &mut self.root,
        }
    }

    fn push_text(&mut self, text: &[u8], span: Span) {
        if !text.is_empty() {
            self.active().push(TemplateNode::Text(Text {
                text: text.to_vec(),
                span,
            }));
        }
    }

    fn parse(mut self) -> Result<Vec<TemplateNode>, CompileError> {
        let source = self.source;
        // Start of the pending text run, and the line it starts on
        let mut text_start = 0;
        let mut text_line = 1;
        let mut scan = 0;

        loop {
            let Some(found) = source[scan..]
                .iter()
                .position(|&b| b == b'\n' || b == b'{')
                .map(|i| scan + i)
            else {
                let span = Span::new(text_line, text_start, source.len());
                self.push_text(&source[text_start..], span);
                break;
            };

            if source[found] == b'\n' {
                self.line += 1;
                scan = found + 1;
                continue;
            }
            if source.get(found + 1) != Some(&b'{') {
                scan = found + 1;
                continue;
            }

            let span = Span::new(text_line, text_start, found);
            self.push_text(&source[text_start..found], span);

            let open = found + 2;
            let Some(close) = source[open..]
                .windows(2)
                .position(|w| w == b"}}")
                .map(|i| open + i)
            else {
                return Err(self.error(
                    CompileErrorKind::UnterminatedDirective,
                    Span::new(self.line, found, open),
                ));
            };
            let content = &source[open..close];
            if let Some(newline) = content.iter().position(|&b| b == b'\n') {
                return Err(self.error(
                    CompileErrorKind::NewlineInDirective,
                    Span::new(self.line, found, open + newline),
                ));
            }
            let span = Span::new(self.line, found, close + 2);
            if content.is_empty() {
                return Err(self.error(CompileErrorKind::EmptyDirective, span));
            }
            self.directive(content, span)?;

            scan = close + 2;
            text_start = scan;
            text_line = self.line;
        }

        if let Some(block) = self.stack.last() {
            let begun = block.span();
            return Err(self.error(
                CompileErrorKind::UnclosedBlock {
                    directive: block.name(),
                    begun_at: begun.line,
                },
                begun,
            ));
        }
        Ok(self.root)
    }

    fn directive(&mut self, content: &[u8], span: Span) -> Result<(), CompileError> {
        if content.starts_with(b"#") {
            return Ok(());
        }
        let directive = std::str::from_utf8(content)
            .ok()
            .and_then(classify)
            .ok_or_else(|| self.error(CompileErrorKind::InvalidDirective, span))?;

        match directive {
            Directive::Escape(braces) => self.push_text(braces.as_bytes(), span),
            Directive::Subst(path) => self.active().push(TemplateNode::Subst(Substitution {
                path: path.to_string(),
                span,
            })),
            Directive::If(condition) => self.stack.push(OpenBlock::If {
                condition: condition.to_string(),
                then_branch: Vec::new(),
                else_branch: None,
                span,
            }),
            Directive::For(expression) => {
                let (var, iterable) = parse_for(expression)
                    .ok_or_else(|| self.error(CompileErrorKind::InvalidForSyntax, span))?;
                self.stack.push(OpenBlock::For {
                    var: var.to_string(),
                    iterable: iterable.to_string(),
                    body: Vec::new(),
                    span,
                });
            }
            Directive::Else => {
                let outside = self.error(
                    CompileErrorKind::OutsideOfParent {
                        directive: "else",
                        parent: "if",
                    },
                    span,
                );
                let else_inside_else = self.error(CompileErrorKind::ElseInsideElse, span);
                match self.stack.last_mut() {
                    Some(OpenBlock::If {
                        else_branch: Some(_),
                        ..
                    }) => return Err(else_inside_else),
                    Some(OpenBlock::If { else_branch, .. }) => *else_branch = Some(Vec::new()),
                    _ => return Err(outside),
                }
            }
            Directive::EndIf => self.close("endif", "if", span)?,
            Directive::EndFor => self.close("endfor", "for", span)?,
        }
        Ok(())
    }

    /// Pop the innermost block if it is a `parent` block.
    fn close(
        &mut self,
        directive: &'static str,
        parent: &'static str,
        span: Span,
    ) -> Result<(), CompileError> {
        match self.stack.pop() {
            Some(block) if block.name() == parent => {
                let node = block.into_node();
                self.active().push(node);
                Ok(())
            }
            other => {
                // Leave the stack as it was; the whole parse is abandoned anyway
                if let Some(block) = other {
                    self.stack.push(block);
                }
                Err(self.error(
                    CompileErrorKind::OutsideOfParent { directive, parent },
                    span,
                ))
            }
        }
    }
}
