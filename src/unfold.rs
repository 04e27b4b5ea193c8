//! Line unfolding.
//!
//! vCard producers may break a long logical line into several physical lines by
//! inserting a line ending followed by a single space or tab. [`UnfoldingReader`]
//! undoes this on the fly, one byte at a time, so the parser never sees the
//! continuation markers:
//!
//! - `\r\n` or `\n` followed by a space or tab is dropped together with that one
//!   whitespace byte
//! - any other `\r\n` or `\n` becomes a single `\n` (a logical line terminator)
//! - a `\r` not followed by `\n` passes through unchanged
//!
//! ```rust
//! use std::io::Read;
//! use vcard::UnfoldingReader;
//!
//! let mut out = String::new();
//! UnfoldingReader::new("NOTE:long\r\n  line\r\nEND".as_bytes())
//!     .read_to_string(&mut out)
//!     .unwrap();
//! assert_eq!(out, "NOTE:long line\nEND");
//! ```

use std::io::{self, Read};

const PUSHBACK_CAPACITY: usize = 3;

/// Bytes read ahead of time that turned out not to start a continuation.
///
/// Lookahead never goes deeper than a line ending, so a handful of slots is
/// enough and the buffer never grows.
#[derive(Debug, Default)]
struct Pushback {
    bytes: [u8; PUSHBACK_CAPACITY],
    len: usize,
}

impl Pushback {
    fn push(&mut self, b: u8) {
        debug_assert!(self.len < PUSHBACK_CAPACITY, "pushback overflow");
        if self.len < PUSHBACK_CAPACITY {
            self.bytes[self.len] = b;
            self.len += 1;
        }
    }

    fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.bytes[self.len])
    }
}

/// A byte reader that unfolds continuation lines and normalizes line endings to `\n`.
///
/// It keeps a count of logical lines, used by the parser for diagnostics: the
/// count starts at 1 and goes up by one each time a `\n` is handed out by
/// [`next_byte`](Self::next_byte). Continuation breaks are not counted.
///
/// The reader pulls one byte at a time from the source, so wrap unbuffered
/// sources such as files in a [`BufReader`](std::io::BufReader).
#[derive(Debug)]
pub struct UnfoldingReader<R> {
    inner: R,
    line: usize,
    pending: Pushback,
    peeked: Option<u8>,
    exhausted: bool,
    /// Source error held back by [`Read::read`] until its filled bytes are handed out.
    read_error: Option<io::Error>,
}

impl<R: Read> UnfoldingReader<R> {
    pub fn new(inner: R) -> Self {
        UnfoldingReader {
            inner,
            line: 1,
            pending: Pushback::default(),
            peeked: None,
            exhausted: false,
            read_error: None,
        }
    }

    /// Returns the current logical line number (1-based).
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Reads the next unfolded byte, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns any error produced by the underlying reader.
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let b = match self.peeked.take() {
            Some(b) => Some(b),
            None => self.unfold_next()?,
        };
        if b == Some(b'\n') {
            self.line += 1;
        }
        Ok(b)
    }

    /// Returns the next unfolded byte without consuming it.
    ///
    /// Repeated calls return the same byte until [`next_byte`](Self::next_byte) is called.
    ///
    /// # Errors
    ///
    /// Returns any error produced by the underlying reader.
    pub fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        if self.peeked.is_none() {
            self.peeked = self.unfold_next()?;
        }
        Ok(self.peeked)
    }

    /// Consumes the reader, returning the underlying source.
    ///
    /// Bytes that were read ahead but not yet returned are lost.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn unfold_next(&mut self) -> io::Result<Option<u8>> {
        loop {
            let Some(b) = self.raw_next()? else {
                return Ok(None);
            };
            match b {
                b'\r' => match self.lookahead(&[b'\r'])? {
                    Some(b'\n') => {
                        if self.continues_line(&[b'\r', b'\n'])? {
                            continue;
                        }
                        return Ok(Some(b'\n'));
                    }
                    Some(other) => {
                        self.pending.push(other);
                        return Ok(Some(b'\r'));
                    }
                    None => return Ok(Some(b'\r')),
                },
                b'\n' => {
                    if self.continues_line(&[b'\n'])? {
                        continue;
                    }
                    return Ok(Some(b'\n'));
                }
                _ => return Ok(Some(b)),
            }
        }
    }

    /// Checks whether the line ending just read is followed by continuation
    /// whitespace, consuming that whitespace if so.
    fn continues_line(&mut self, ending: &[u8]) -> io::Result<bool> {
        match self.lookahead(ending)? {
            Some(b' ' | b'\t') => Ok(true),
            Some(other) => {
                self.pending.push(other);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// Reads one byte ahead. On error the bytes already consumed for the
    /// current token are put back so that a retry sees them again.
    fn lookahead(&mut self, consumed: &[u8]) -> io::Result<Option<u8>> {
        match self.raw_next() {
            Ok(b) => Ok(b),
            Err(e) => {
                for &b in consumed.iter().rev() {
                    self.pending.push(b);
                }
                Err(e)
            }
        }
    }

    fn raw_next(&mut self) -> io::Result<Option<u8>> {
        if let Some(b) = self.pending.pop() {
            return Ok(Some(b));
        }
        if self.exhausted {
            return Ok(None);
        }
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => {
                    self.exhausted = true;
                    return Ok(None);
                }
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> Read for UnfoldingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(e) = self.read_error.take() {
            return Err(e);
        }
        for (i, slot) in buf.iter_mut().enumerate() {
            match self.next_byte() {
                Ok(Some(b)) => *slot = b,
                Ok(None) => return Ok(i),
                // Hand out what we have; the error is reported by the next call.
                Err(e) if i > 0 => {
                    self.read_error = Some(e);
                    return Ok(i);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(buf.len())
    }
}
