/*
 * display.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Display text for values.
//!
//! Containers are never expanded: an array renders as `array(<addr>, <len>)`
//! and a dictionary as `dict(<addr>)`. Strings are escaped so that the
//! output is always printable ASCII.

use std::fmt::{self, Write};

use crate::value::Value;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Int(n) => write!(f, "{n}"),
            Value::String(bytes) => write_escaped(f, bytes),
            Value::Array(a) => write!(f, "array({:p}, {})", a, a.len()),
            Value::Dict(d) => write!(f, "dict({:p})", d),
        }
    }
}

/// Write `bytes` with non-printable bytes as three-digit octal escapes.
///
/// Printable ASCII, space, tab and newline pass through unchanged and a
/// backslash is doubled.
pub fn write_escaped(out: &mut impl Write, bytes: &[u8]) -> fmt::Result {
    for &b in bytes {
        match b {
            b'\\' => out.write_str("\\\\")?,
            b'\t' | b'\n' | b' '..=b'~' => out.write_char(char::from(b))?,
            _ => write!(out, "\\{b:03o}")?,
        }
    }
    Ok(())
}

impl Value {
    /// Render the display text into `buf`, truncating if it does not fit.
    ///
    /// Returns the full length of the display text, which is larger than
    /// `buf.len()` exactly when the output was truncated. A caller can
    /// retry with a buffer of the returned size.
    pub fn render_into(&self, buf: &mut [u8]) -> usize {
        let mut out = Truncating {
            buf,
            total: 0,
        };
        // Truncating never reports an error, and neither does Display
        let _ = write!(out, "{self}");
        out.total
    }
}

struct Truncating<'a> {
    buf: &'a mut [u8],
    total: usize,
}

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let bytes = s.as_bytes();
        if self.total < self.buf.len() {
            let room = self.buf.len() - self.total;
            let n = room.min(bytes.len());
            self.buf[self.total..self.total + n].copy_from_slice(&bytes[..n]);
        }
        self.total += bytes.len();
        Ok(())
    }
}
