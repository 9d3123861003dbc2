/*
 * report.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Source-annotated diagnostics for template failures.

use std::ops::Range;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use mtemplate::{CompileError, CompileErrorKind, RenderError, Span};

/// Convert a byte range into the character range ariadne expects.
///
/// Offsets are counted in the lossily decoded source, where each invalid
/// UTF-8 sequence is one replacement character.
fn char_range(source: &[u8], span: &Span) -> Range<usize> {
    let to_chars = |byte: usize| {
        let prefix = &source[..byte.min(source.len())];
        String::from_utf8_lossy(prefix).chars().count()
    };
    to_chars(span.start)..to_chars(span.end)
}

fn build(name: &str, source: &[u8], title: &str, span: &Span, label: String, color: bool) -> String {
    let range = char_range(source, span);
    let text = String::from_utf8_lossy(source);

    let report = Report::build(ReportKind::Error, name.to_string(), range.start)
        .with_config(Config::default().with_color(color))
        .with_message(title)
        .with_label(
            Label::new((name.to_string(), range))
                .with_message(label)
                .with_color(Color::Red),
        )
        .finish();

    let mut output = Vec::new();
    match report.write((name.to_string(), Source::from(text.as_ref())), &mut output) {
        Ok(()) => String::from_utf8_lossy(&output).into_owned(),
        // Fall back to the bare message if the snippet cannot be drawn
        Err(_) => format!("Error: {title}\n"),
    }
}

/// Report a compile failure, pointing at the offending directive.
pub fn compile_error(name: &str, source: &[u8], err: &CompileError, color: bool) -> String {
    let label = match &err.kind {
        CompileErrorKind::UnclosedBlock { directive, .. } => {
            format!("\"{directive}\" block opened here is never closed")
        }
        kind => kind.to_string(),
    };
    build(name, source, &err.to_string(), &err.span, label, color)
}

/// Report a render failure, pointing at the directive that failed.
pub fn render_error(name: &str, source: &[u8], err: &RenderError, color: bool) -> String {
    build(name, source, &err.to_string(), &err.span, err.kind.to_string(), color)
}
