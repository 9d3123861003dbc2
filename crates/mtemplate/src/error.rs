/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template compilation and rendering.

use std::fmt;

use mobject::NamespaceError;
use thiserror::Error;

use crate::ast::Span;

/// What went wrong while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileErrorKind {
    /// `{{` with no matching `}}`.
    #[error("Unterminated directive")]
    UnterminatedDirective,

    #[error("Newline in directive")]
    NewlineInDirective,

    /// `{{}}`
    #[error("Empty directive")]
    EmptyDirective,

    /// Unknown keyword, malformed keyword expression, or a substitution path
    /// with characters outside `[A-Za-z0-9._[\]]`.
    #[error("Invalid directive")]
    InvalidDirective,

    /// `for` expression that is not `VAR in PATH`.
    #[error("Invalid \"for\" syntax")]
    InvalidForSyntax,

    /// `else`/`endif` without an open `if`, or `endfor` without an open `for`.
    #[error("\"{directive}\" directive outside of \"{parent}\"")]
    OutsideOfParent {
        directive: &'static str,
        parent: &'static str,
    },

    /// A second `else` in the same `if`.
    #[error("\"else\" inside \"else\"")]
    ElseInsideElse,

    /// End of input with a block still open.
    #[error("Unclosed \"{directive}\" block, begun at line {begun_at}")]
    UnclosedBlock {
        directive: &'static str,
        begun_at: usize,
    },
}

/// A failed compile.
///
/// `line` is the line being scanned when the error was detected. `span`
/// points at the directive at fault, which for an unclosed block is the
/// directive that opened it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub line: usize,
    pub span: Span,
}

/// The directive on whose behalf a namespace lookup was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    If,
    For,
    Substitution,
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DirectiveKind::If => "\"if\" directive",
            DirectiveKind::For => "\"for\" directive",
            DirectiveKind::Substitution => "variable substitution",
        })
    }
}

/// What went wrong while rendering a template.
#[derive(Debug, Error)]
pub enum RenderErrorKind {
    /// The path was found in neither the local nor the outer namespace.
    /// Carries the outer namespace's error.
    #[error("Error in {directive}: {error}")]
    Lookup {
        directive: DirectiveKind,
        error: NamespaceError,
    },

    /// A `for` path resolved to something other than an array or dictionary.
    #[error("Error in \"for\": could not get iterator from object {path}")]
    NotIterable { path: String },

    #[error("Loop variable missing")]
    LoopVariableMissing,

    /// The output sink refused a chunk.
    #[error("write error: {0}")]
    Write(std::io::Error),
}

/// A failed render. Output emitted before the failure stays emitted.
#[derive(Debug, Error)]
#[error("{kind} at line {line}")]
pub struct RenderError {
    pub kind: RenderErrorKind,
    pub line: usize,
    pub span: Span,
}

impl RenderError {
    pub(crate) fn new(kind: RenderErrorKind, span: Span) -> Self {
        Self {
            kind,
            line: span.line,
            span,
        }
    }
}

/// Errors from [`crate::Template::compile_from_file`].
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// I/O error (e.g., reading a template file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
