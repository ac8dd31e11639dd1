//! Bounded line reading.
//!
//! Input is taken at most `limit` bytes at a time, stopping early after a newline.
//! A read that fills the whole limit without reaching a newline marks an overlong
//! line; [`LineReader::discard_rest`] then consumes (and echoes) the remainder of
//! that logical line.

use crate::lexer;
use std::io::{self, BufRead, ErrorKind, Write};

/// One bounded read from the input source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    bytes: Vec<u8>,
    limit: usize,
}

impl RawLine {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn ends_with_newline(&self) -> bool {
        self.bytes.last() == Some(&b'\n')
    }

    /// The read filled the whole limit and the line goes on.
    pub fn is_overlong(&self) -> bool {
        self.bytes.len() >= self.limit && !self.ends_with_newline()
    }

    pub fn is_blank(&self) -> bool {
        lexer::is_blank(&self.bytes)
    }

    /// The line with a single trailing newline removed, bytes untouched.
    pub fn text(&self) -> &[u8] {
        self.bytes.strip_suffix(b"\n").unwrap_or(&self.bytes)
    }
}

/// Reads [`RawLine`]s of at most `limit` bytes from a buffered source.
pub struct LineReader<R> {
    inner: R,
    limit: usize,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R, limit: usize) -> Self {
        Self {
            inner,
            limit: limit.max(1),
        }
    }

    /// Read up to `limit` bytes, stopping after the first newline.
    ///
    /// Returns `None` once the source is exhausted.
    pub fn read_line(&mut self) -> io::Result<Option<RawLine>> {
        let mut bytes = Vec::new();
        while bytes.len() < self.limit {
            let available = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                break;
            }

            let room = self.limit - bytes.len();
            let window = &available[..available.len().min(room)];
            let (taken, found_newline) = match window.iter().position(|&b| b == b'\n') {
                Some(i) => (i + 1, true),
                None => (window.len(), false),
            };
            bytes.extend_from_slice(&window[..taken]);
            self.inner.consume(taken);

            if found_newline {
                break;
            }
        }

        if bytes.is_empty() {
            Ok(None)
        } else {
            Ok(Some(RawLine {
                bytes,
                limit: self.limit,
            }))
        }
    }

    /// Swallow the rest of an overlong line, echoing every chunk read.
    ///
    /// Stops after the chunk holding the newline, or at end of input.
    pub fn discard_rest(&mut self, echo: &mut dyn Write) -> io::Result<()> {
        while let Some(chunk) = self.read_line()? {
            echo.write_all(chunk.as_bytes())?;
            if chunk.ends_with_newline() {
                break;
            }
        }
        Ok(())
    }
}
