//! Push-style front end.
//!
//! Data can be fed to the parser in arbitrarily sized chunks via
//! [`PushParser::push`], and the document is obtained by calling
//! [`PushParser::finish`]. This suits input that arrives incrementally, such
//! as bytes read from a socket or another process.
//!
//! # Design
//!
//! Pushed chunks are buffered, and [`PushParser::finish`] runs the regular
//! state machine over them through a [`BufferSource`]. Chunk boundaries may
//! split tags, attribute values or multi-byte characters anywhere.
//!
//! # Examples
//!
//! ```
//! use littlexml::PushParser;
//!
//! let mut parser = PushParser::new();
//! parser.push(b"<root>");
//! parser.push(b"<child>Hello</child>");
//! parser.push(b"</root>");
//!
//! let doc = parser.finish();
//! assert!(doc.success());
//! let root = doc.root_element().unwrap();
//! assert_eq!(doc.tag(root), Some("root"));
//! ```

use crate::parser::{BufferSource, ParseOptions};
use crate::tree::Document;

/// A push-based parser front end.
///
/// # Examples
///
/// ```
/// use littlexml::{ParseOptions, PushParser};
///
/// let mut parser = PushParser::with_options(ParseOptions::default().no_blanks(true));
/// parser.push(b"<?xml version=\"1.0\"?>");
/// parser.push(b"<root attr=\"value\">\n");
/// parser.push(b"</root>");
///
/// let doc = parser.finish();
/// let root = doc.root_element().unwrap();
/// assert_eq!(doc.attribute_value(root, "attr").as_deref(), Some("value"));
/// assert_eq!(doc.inner_text(root), None);
/// ```
#[derive(Debug, Default)]
pub struct PushParser {
    /// Accumulated raw bytes from all `push()` calls.
    buffer: Vec<u8>,
    options: ParseOptions,
}

impl PushParser {
    /// Creates a new push parser with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new push parser with the specified options.
    #[must_use]
    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            buffer: Vec::new(),
            options,
        }
    }

    /// Feeds a chunk of raw bytes into the parser.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Parses everything pushed so far and returns the document.
    ///
    /// Like every other entry point this always yields a `Document`; check
    /// [`Document::success`] for the outcome.
    #[must_use]
    pub fn finish(self) -> Document {
        crate::parser::load(BufferSource::new(self.buffer), &self.options)
    }

    /// Returns the number of bytes currently buffered.
    ///
    /// ```
    /// use littlexml::PushParser;
    ///
    /// let mut parser = PushParser::new();
    /// assert_eq!(parser.buffered_bytes(), 0);
    /// parser.push(b"<root/>");
    /// assert_eq!(parser.buffered_bytes(), 7);
    /// ```
    #[must_use]
    pub fn buffered_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if no data has been pushed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discards all buffered data, keeping the options.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}
