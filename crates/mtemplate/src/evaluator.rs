/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template evaluation engine.
//!
//! Rendering walks the compiled tree depth-first with two namespaces in
//! scope: the caller's (never modified) and a local one that starts empty
//! and holds loop variables. Paths are resolved against the local
//! namespace first, then the caller's.

use std::io;

use mobject::{Dict, Value, namespace};
use tracing::trace;

use crate::ast::{Conditional, ForLoop, Span, Substitution, TemplateNode, Text};
use crate::error::{DirectiveKind, RenderError, RenderErrorKind};
use crate::parser::Template;
use crate::sink::{BufferSink, CallbackSink, OutputSink, WriterSink};

/// Initial size of the buffer used to render non-string substitutions.
const SCRATCH_LEN: usize = 256;

impl Template {
    /// Render this template against `ns`, sending output to `sink`.
    pub fn render_to_sink<S: OutputSink + ?Sized>(
        &self,
        ns: &Dict,
        sink: &mut S,
    ) -> Result<(), RenderError> {
        let local = Dict::new();
        let mut ctx = EvalContext::new(ns, sink);
        ctx.render_nodes(&self.nodes, &local)
    }

    /// Render this template to a stream.
    pub fn render_to_writer<W: io::Write>(
        &self,
        ns: &Dict,
        writer: &mut W,
    ) -> Result<(), RenderError> {
        self.render_to_sink(ns, &mut WriterSink::new(writer))
    }

    /// Render this template to a byte buffer.
    pub fn render_to_vec(&self, ns: &Dict) -> Result<Vec<u8>, RenderError> {
        let mut sink = BufferSink::new();
        self.render_to_sink(ns, &mut sink)?;
        Ok(sink.into_bytes())
    }

    /// Render this template to a string.
    ///
    /// Invalid UTF-8 in the output is replaced with U+FFFD.
    pub fn render(&self, ns: &Dict) -> Result<String, RenderError> {
        let bytes = self.render_to_vec(ns)?;
        Ok(match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    /// Render this template, handing each output chunk to `callback`.
    pub fn render_with_callback<F>(&self, ns: &Dict, callback: F) -> Result<(), RenderError>
    where
        F: FnMut(&[u8]) -> io::Result<()>,
    {
        self.render_to_sink(ns, &mut CallbackSink::new(callback))
    }
}

/// State threaded through a single render.
pub struct EvalContext<'a, S: ?Sized> {
    /// The caller's namespace.
    namespace: &'a Dict,
    sink: &'a mut S,
    /// Reused for rendering non-string substitutions.
    scratch: Vec<u8>,
}

impl<'a, S: OutputSink + ?Sized> EvalContext<'a, S> {
    pub fn new(namespace: &'a Dict, sink: &'a mut S) -> Self {
        Self {
            namespace,
            sink,
            scratch: vec![0; SCRATCH_LEN],
        }
    }

    /// Render a list of nodes with `local` as the local namespace.
    pub fn render_nodes(
        &mut self,
        nodes: &[TemplateNode],
        local: &Dict,
    ) -> Result<(), RenderError> {
        for node in nodes {
            match node {
                TemplateNode::Text(Text { text, span }) => self.emit(text, *span)?,
                TemplateNode::If(conditional) => self.render_conditional(conditional, local)?,
                TemplateNode::For(for_loop) => self.render_for_loop(for_loop, local)?,
                TemplateNode::Subst(subst) => self.render_substitution(subst, local)?,
            }
        }
        Ok(())
    }

    fn emit(&mut self, bytes: &[u8], span: Span) -> Result<(), RenderError> {
        self.sink
            .emit(bytes)
            .map_err(|e| RenderError::new(RenderErrorKind::Write(e), span))
    }

    /// Resolve `path` in the local namespace, then the caller's.
    ///
    /// When both fail, the caller's namespace error is reported.
    fn fetch<'v>(
        &self,
        path: &str,
        local: &'v Dict,
        directive: DirectiveKind,
        span: Span,
    ) -> Result<&'v Value, RenderError>
    where
        'a: 'v,
    {
        if let Ok(value) = namespace::lookup(local, path) {
            return Ok(value);
        }
        namespace::lookup(self.namespace, path)
            .map_err(|error| RenderError::new(RenderErrorKind::Lookup { directive, error }, span))
    }

    fn render_conditional(
        &mut self,
        conditional: &Conditional,
        local: &Dict,
    ) -> Result<(), RenderError> {
        let value = self.fetch(
            &conditional.condition,
            local,
            DirectiveKind::If,
            conditional.span,
        )?;
        if value.is_truthy() {
            self.render_nodes(&conditional.then_branch, local)
        } else {
            self.render_nodes(&conditional.else_branch, local)
        }
    }

    fn render_for_loop(&mut self, for_loop: &ForLoop, local: &Dict) -> Result<(), RenderError> {
        let span = for_loop.span;
        let collection = self.fetch(&for_loop.iterable, local, DirectiveKind::For, span)?;
        let entries = collection.iter().map_err(|_| {
            RenderError::new(
                RenderErrorKind::NotIterable {
                    path: for_loop.iterable.clone(),
                },
                span,
            )
        })?;
        trace!(
            var = %for_loop.var,
            iterable = %for_loop.iterable,
            entries = entries.len(),
            line = span.line,
            "entering loop"
        );

        // One frame for the whole loop; only the loop variable changes
        let mut frame = local.clone();
        frame.replace(&for_loop.var, Value::dict());

        for (key, value) in entries {
            let loop_var = frame
                .item_mut(&for_loop.var)
                .and_then(|v| v.as_dict_mut().ok())
                .ok_or_else(|| RenderError::new(RenderErrorKind::LoopVariableMissing, span))?;
            loop_var.replace("key", key.to_value());
            loop_var.replace("value", value.clone());
            self.render_nodes(&for_loop.body, &frame)?;
        }
        Ok(())
    }

    fn render_substitution(
        &mut self,
        subst: &Substitution,
        local: &Dict,
    ) -> Result<(), RenderError> {
        let value = self.fetch(&subst.path, local, DirectiveKind::Substitution, subst.span)?;
        if let Value::String(bytes) = value {
            return self.emit(bytes, subst.span);
        }

        let needed = value.render_into(&mut self.scratch);
        if needed > self.scratch.len() {
            self.scratch.resize(needed, 0);
            value.render_into(&mut self.scratch);
        }
        let scratch = std::mem::take(&mut self.scratch);
        let result = self.emit(&scratch[..needed], subst.span);
        self.scratch = scratch;
        result
    }
}
