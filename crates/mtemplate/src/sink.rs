/*
 * sink.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Output sinks for rendering.
//!
//! Rendering emits chunks in document order and stops at the first chunk a
//! sink refuses. The sinks differ only in where the bytes go.

use std::io;

/// Default cap on the size of a [`BufferSink`]'s output.
pub const MAX_BUFFER_LEN: usize = 64 * 1024 * 1024;

/// Destination for rendered output.
pub trait OutputSink {
    /// Accept one chunk of output.
    fn emit(&mut self, chunk: &[u8]) -> io::Result<()>;
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn emit(&mut self, chunk: &[u8]) -> io::Result<()> {
        (**self).emit(chunk)
    }
}

/// Writes every chunk to an [`io::Write`] stream.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: io::Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> OutputSink for WriterSink<W> {
    fn emit(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.writer.write_all(chunk)
    }
}

/// Collects output in memory, up to a size limit.
///
/// The total output must stay strictly below the limit. A chunk that would
/// reach it is refused and the buffer is emptied, so a failed render never
/// leaves partial output behind in memory.
#[derive(Debug)]
pub struct BufferSink {
    buffer: Vec<u8>,
    limit: usize,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::with_limit(MAX_BUFFER_LEN)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            buffer: Vec::new(),
            limit,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    fn refuse(&mut self, error: io::Error) -> io::Result<()> {
        self.buffer = Vec::new();
        Err(error)
    }
}

impl Default for BufferSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for BufferSink {
    fn emit(&mut self, chunk: &[u8]) -> io::Result<()> {
        if chunk.is_empty() {
            return Ok(());
        }
        if self.buffer.len().saturating_add(chunk.len()) >= self.limit {
            let limit = self.limit;
            return self.refuse(io::Error::other(format!(
                "output exceeds the {limit} byte buffer limit"
            )));
        }
        if let Err(e) = self.buffer.try_reserve(chunk.len()) {
            return self.refuse(io::Error::new(io::ErrorKind::OutOfMemory, e));
        }
        self.buffer.extend_from_slice(chunk);
        Ok(())
    }
}

/// Hands every chunk to a caller-supplied function.
///
/// Returning an error from the function aborts the render.
pub struct CallbackSink<F> {
    callback: F,
}

impl<F: FnMut(&[u8]) -> io::Result<()>> CallbackSink<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F: FnMut(&[u8]) -> io::Result<()>> OutputSink for CallbackSink<F> {
    fn emit(&mut self, chunk: &[u8]) -> io::Result<()> {
        (self.callback)(chunk)
    }
}
