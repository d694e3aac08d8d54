//! # Bounded Line Reader
//!
//! Pulls one newline-terminated line at a time from the input stream into a
//! single reusable, capacity-bounded buffer.
//!
//! - The buffer never holds more than `capacity + 2` bytes (content plus an
//!   optional `\r\n` terminator)
//! - A line longer than `capacity` is rejected with
//!   [`MaslinError::LineTooLong`]; lines are never truncated
//! - One trailing `\n` is stripped, and one `\r` immediately before it
//! - A final line without a newline is returned whole

use crate::MaslinError;
use std::io::{BufRead, Read};

/// Reads bounded lines from a buffered input stream.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    capacity: usize,
    line: u64,
}

impl<R: BufRead> LineReader<R> {
    /// Create a reader that accepts lines of at most `capacity` bytes.
    pub fn new(inner: R, capacity: usize) -> Self {
        Self {
            inner,
            buf: Vec::with_capacity(capacity.saturating_add(2).min(64 * 1024)),
            capacity,
            line: 0,
        }
    }

    /// The 1-based number of the line most recently returned.
    #[must_use]
    pub fn line_number(&self) -> u64 {
        self.line
    }

    /// Read the next line with its terminator stripped.
    ///
    /// Returns `Ok(None)` at end of stream. The returned slice borrows the
    /// reader's buffer and is only valid until the next call.
    pub fn next_line(&mut self) -> Result<Option<&[u8]>, MaslinError> {
        self.buf.clear();

        let limit = (self.capacity as u64).saturating_add(2);
        let read = (&mut self.inner)
            .take(limit)
            .read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            return Ok(None);
        }
        self.line += 1;

        let mut end = self.buf.len();
        if self.buf.last() == Some(&b'\n') {
            end -= 1;
            if end > 0 && self.buf[end - 1] == b'\r' {
                end -= 1;
            }
        }

        if end > self.capacity {
            return Err(MaslinError::LineTooLong {
                line: self.line,
                limit: self.capacity,
            });
        }

        Ok(Some(&self.buf[..end]))
    }
}

// =============================================================================
// TESTS
// =============================================================================
