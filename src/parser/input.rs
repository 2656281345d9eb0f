//! Chunked input cursor and lexeme accumulator.
//!
//! [`Input`] wraps a [`Source`], refilling a fixed-size chunk whenever the
//! parser asks for a byte past the end of the current one, and tracks the
//! position (line, column, byte offset) of the next unread byte.
//!
//! [`Lexeme`] is the growable token buffer the state machine accumulates
//! bytes into between token boundaries. It is capped by
//! `ParseOptions::max_lexeme_length` and grows through fallible reservation.

use std::io;

use crate::error::{ErrorKind, SourceLocation};

use super::source::Source;

/// Default size of a single read from the source, in bytes.
pub(crate) const DEFAULT_CHUNK_SIZE: usize = 4096;

/// Default maximum length of a single token (tag name, attribute value,
/// text run, comment), in bytes.
pub(crate) const DEFAULT_MAX_LEXEME_LENGTH: usize = 10 * 1024 * 1024; // 10 MB

/// Default maximum element nesting depth.
pub(crate) const DEFAULT_MAX_DEPTH: u32 = 256;

/// Bytes the parser treats as insignificant inside tags.
const BLANKS: &[u8] = b" \t\n\r\x0b\x0c";

/// Returns `true` if `b` is one of the blank bytes skipped inside tags.
pub(crate) fn is_blank(b: u8) -> bool {
    BLANKS.contains(&b)
}

/// Strips leading and trailing blanks.
pub(crate) fn trim_blanks(mut bytes: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = bytes {
        if !is_blank(*first) {
            break;
        }
        bytes = rest;
    }
    while let [rest @ .., last] = bytes {
        if !is_blank(*last) {
            break;
        }
        bytes = rest;
    }
    bytes
}

// -------------------------------------------------------------------------
// Input
// -------------------------------------------------------------------------

/// Pull-based cursor over a [`Source`].
pub(crate) struct Input<S> {
    source: S,

    /// Bytes of the most recent read; only `chunk[..filled]` is valid.
    chunk: Vec<u8>,
    filled: usize,

    /// Next unread byte within `chunk`.
    pos: usize,

    /// Position of the next unread byte in the whole input.
    line: u32,
    column: u32,
    byte_offset: usize,
}

impl<S: Source> Input<S> {
    /// Creates a cursor reading `chunk_size` bytes at a time (at least one).
    pub fn new(source: S, chunk_size: usize) -> Self {
        Self {
            source,
            chunk: vec![0; chunk_size.max(1)],
            filled: 0,
            pos: 0,
            line: 1,
            column: 1,
            byte_offset: 0,
        }
    }

    pub fn open(&mut self) -> io::Result<()> {
        self.source.open()
    }

    pub fn close(&mut self) -> io::Result<()> {
        self.source.close()
    }

    /// Returns the location of the next unread byte.
    pub fn location(&self) -> SourceLocation {
        SourceLocation {
            line: self.line,
            column: self.column,
            byte_offset: self.byte_offset,
        }
    }

    /// Makes sure at least one unread byte is buffered. Returns `false` once
    /// the source has handed out everything it reported.
    fn fill(&mut self) -> io::Result<bool> {
        if self.pos < self.filled {
            return Ok(true);
        }
        if self.source.offset() >= self.source.total_size() {
            return Ok(false);
        }
        let read = self.source.read(&mut self.chunk)?;
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "source ended at byte {} of {}",
                    self.source.offset(),
                    self.source.total_size()
                ),
            ));
        }
        self.filled = read;
        self.pos = 0;
        Ok(true)
    }

    /// Returns the next byte without consuming it.
    pub fn peek_byte(&mut self) -> io::Result<Option<u8>> {
        if !self.fill()? {
            return Ok(None);
        }
        Ok(Some(self.chunk[self.pos]))
    }

    /// Consumes and returns the next byte.
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let Some(byte) = self.peek_byte()? else {
            return Ok(None);
        };
        self.pos += 1;
        self.byte_offset += 1;
        if byte == b'\n' {
            self.line = self.line.saturating_add(1);
            self.column = 1;
        } else if byte & 0xC0 != 0x80 {
            // Continuation bytes of a multi-byte UTF-8 sequence do not start
            // a new column.
            self.column = self.column.saturating_add(1);
        }
        Ok(Some(byte))
    }
}

// -------------------------------------------------------------------------
// Lexeme
// -------------------------------------------------------------------------

/// The in-progress token between two recognised boundaries.
#[derive(Debug)]
pub(crate) struct Lexeme {
    bytes: Vec<u8>,
    limit: usize,
}

impl Lexeme {
    pub fn new(limit: usize) -> Self {
        Self {
            bytes: Vec::new(),
            limit,
        }
    }

    /// Appends a byte, failing once the token would exceed its limit.
    pub fn push(&mut self, byte: u8) -> Result<(), ErrorKind> {
        if self.bytes.len() >= self.limit {
            return Err(ErrorKind::LexemeOverflow { limit: self.limit });
        }
        self.bytes.try_reserve(1).map_err(|_| ErrorKind::Capacity)?;
        self.bytes.push(byte);
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns `true` if the token holds anything other than blanks.
    pub fn has_content(&self) -> bool {
        !trim_blanks(&self.bytes).is_empty()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Converts the token to a string and resets it. Invalid UTF-8 is
    /// replaced rather than rejected.
    pub fn take_string(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.bytes).into_owned();
        self.bytes.clear();
        text
    }

    /// Returns `true` once a comment body (the bytes after `<!`) has been
    /// closed by `-->`. The dashes of the opening `<!--` do not count
    /// towards the terminator.
    pub fn closes_comment(&self) -> bool {
        let body = self.bytes.strip_prefix(b"--").unwrap_or(&self.bytes);
        body.ends_with(b"-->")
    }
}
