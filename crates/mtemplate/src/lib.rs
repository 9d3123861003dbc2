/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Logic-enabled text templates rendered against an [`mobject`] namespace.
//!
//! Template syntax:
//!
//! - Variable substitution: `{{name}}`, `{{obj.field}}`, `{{list[2].name}}`
//! - Conditionals: `{{if path}}...{{else}}...{{endif}}`
//! - Loops: `{{for x in path}}...{{endfor}}`, where `x.key` and `x.value`
//!   are the current index or key and element
//! - Comments: `{{# anything}}`
//! - Literal braces: `{{{}}` renders `{`, `{{{{}}` renders `{{`, and so on
//!
//! A directive must fit on one line.
//!
//! # Example
//!
//! ```
//! use mobject::{Dict, Value, namespace};
//! use mtemplate::Template;
//!
//! let template = Template::compile("{{for x in fruit}}{{x.key}}:{{x.value}} {{endfor}}")?;
//!
//! let mut ns = Dict::new();
//! namespace::set(&mut ns, "fruit[0]", Value::string("apple")).unwrap();
//! namespace::set(&mut ns, "fruit[1]", Value::string("pear")).unwrap();
//!
//! assert_eq!(template.render(&ns)?, "0:apple 1:pear ");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod sink;

// Re-export main types at crate root
pub use ast::{Conditional, ForLoop, Span, Substitution, TemplateNode, Text};
pub use error::{
    CompileError, CompileErrorKind, DirectiveKind, RenderError, RenderErrorKind, TemplateError,
};
pub use evaluator::EvalContext;
pub use parser::Template;
pub use sink::{BufferSink, CallbackSink, OutputSink, WriterSink};
