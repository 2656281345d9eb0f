//! Streaming parser.
//!
//! A byte-at-a-time state machine that pulls its input from a [`Source`]
//! in fixed-size chunks and builds a [`Document`] as it goes. Every entry
//! point returns a `Document`: a malformed or unreadable input yields one
//! whose [`success`](Document::success) flag is `false`, with the partial
//! tree still attached and the cause available from
//! [`Document::error`].

pub(crate) mod input;
pub mod push;
pub mod source;
mod xml;

pub use push::PushParser;
pub use source::{BufferSource, FileSource, Source};

use std::path::Path;

use crate::tree::Document;

use input::{DEFAULT_CHUNK_SIZE, DEFAULT_MAX_DEPTH, DEFAULT_MAX_LEXEME_LENGTH};

/// Parse options controlling parser behavior and resource limits.
///
/// Use the builder pattern to configure options:
///
/// ```
/// use littlexml::parser::ParseOptions;
///
/// let opts = ParseOptions::default()
///     .chunk_size(512)
///     .no_blanks(true)
///     .max_depth(128);
/// assert_eq!(opts.chunk_size, 512);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Number of bytes requested from the source per read (default: 4096).
    pub chunk_size: usize,
    /// If true, whitespace-only text is dropped instead of becoming inner
    /// text.
    pub no_blanks: bool,

    // -- Resource limits --
    /// Maximum length in bytes of a single token: a tag name, attribute
    /// value, text run or comment (default: 10 MB).
    pub max_lexeme_length: usize,
    /// Maximum element nesting depth (default: 256).
    pub max_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            no_blanks: false,
            max_lexeme_length: DEFAULT_MAX_LEXEME_LENGTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Sets the read size. Values below 1 are raised to 1.
    #[must_use]
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    /// Enables or disables dropping of whitespace-only text.
    #[must_use]
    pub fn no_blanks(mut self, yes: bool) -> Self {
        self.no_blanks = yes;
        self
    }

    /// Sets the maximum token length in bytes.
    #[must_use]
    pub fn max_lexeme_length(mut self, max: usize) -> Self {
        self.max_lexeme_length = max;
        self
    }

    /// Sets the maximum element nesting depth.
    #[must_use]
    pub fn max_depth(mut self, max: u32) -> Self {
        self.max_depth = max;
        self
    }
}

/// Parses everything `source` hands out.
///
/// The source is opened before the first read and closed exactly once when
/// parsing ends, on success and on failure.
///
/// ```
/// use littlexml::parser::{self, BufferSource, ParseOptions};
///
/// let doc = parser::load(BufferSource::new(&b"<a><b/></a>"[..]), &ParseOptions::default());
/// assert!(doc.success());
/// ```
#[must_use]
pub fn load<S: Source>(source: S, options: &ParseOptions) -> Document {
    log::debug!("loading with chunk size {}", options.chunk_size);
    xml::XmlParser::new(source, options).parse()
}

/// Parses a string with default options.
#[must_use]
pub fn parse_str(input: &str) -> Document {
    parse_bytes(input.as_bytes())
}

/// Parses raw bytes with default options.
#[must_use]
pub fn parse_bytes(input: &[u8]) -> Document {
    load(BufferSource::new(input), &ParseOptions::default())
}

/// Parses the file at `path`, reading it in `options.chunk_size` pieces.
#[must_use]
pub fn load_path(path: impl AsRef<Path>, options: &ParseOptions) -> Document {
    let path = path.as_ref();
    log::debug!("loading {}", path.display());
    load(FileSource::new(path), options)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_options() {
        let opts = ParseOptions::default();
        assert_eq!(opts.chunk_size, 4096);
        assert_eq!(opts.max_lexeme_length, 10 * 1024 * 1024);
        assert_eq!(opts.max_depth, 256);
        assert!(!opts.no_blanks);
    }

    #[test]
    fn test_chunk_size_minimum() {
        assert_eq!(ParseOptions::default().chunk_size(0).chunk_size, 1);
    }

    #[test]
    fn test_parse_str_and_bytes_agree() {
        let from_str = parse_str("<a k=\"v\">t</a>");
        let from_bytes = parse_bytes(b"<a k=\"v\">t</a>");
        let a = from_str.root_element().unwrap();
        let b = from_bytes.root_element().unwrap();
        assert_eq!(from_str.tag(a), from_bytes.tag(b));
        assert_eq!(from_str.inner_text(a), from_bytes.inner_text(b));
        assert_eq!(from_str.attributes(a), from_bytes.attributes(b));
    }
}
