//! Error types and diagnostics for parsing and tree mutation.
//!
//! A failed load is reported as a single [`ParseError`] stored on the
//! `Document`, carrying a structured [`ErrorKind`] and the [`SourceLocation`]
//! where the problem was detected. Problems that do not stop the parse are
//! collected as [`ParseDiagnostic`]s alongside the (complete) tree.
//!
//! Tree mutations that are refused (appending to a destroyed node, destroying
//! a node that is still owned by a parent, running out of memory while
//! growing a list) are reported as [`TreeError`].

use std::fmt;
use std::io;

use crate::tree::NodeId;

/// Severity level for a parse diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// A non-fatal issue that doesn't prevent parsing.
    Warning,
    /// A recoverable error: the parse continued but dropped something.
    Error,
    /// An unrecoverable error: parsing stopped.
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
            Self::Fatal => write!(f, "fatal error"),
        }
    }
}

/// Source location within the input stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number (in characters, not bytes).
    pub column: u32,
    /// 0-based byte offset from the start of the input.
    pub byte_offset: usize,
}

impl SourceLocation {
    /// The location of the very first byte of input.
    #[must_use]
    pub fn start() -> Self {
        Self {
            line: 1,
            column: 1,
            byte_offset: 0,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A single non-fatal diagnostic emitted during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    /// The severity of this diagnostic.
    pub severity: ErrorSeverity,
    /// Human-readable message.
    pub message: String,
    /// Where in the source this was noticed.
    pub location: SourceLocation,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} at {}",
            self.severity, self.message, self.location
        )
    }
}

/// The markup construct the parser was inside when input ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Construct {
    /// A start tag (`<name attr="..."`).
    Tag,
    /// A quoted attribute value.
    AttributeValue,
    /// An end tag (`</name`).
    EndTag,
    /// A comment (`<!-- ...`).
    Comment,
    /// A declaration (`<?xml ...`).
    Declaration,
}

impl fmt::Display for Construct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Tag => "tag",
            Self::AttributeValue => "attribute value",
            Self::EndTag => "end tag",
            Self::Comment => "comment",
            Self::Declaration => "declaration",
        };
        f.write_str(name)
    }
}

/// Errors raised by tree mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// An allocation failed while growing a list, the node arena or a string.
    Capacity,
    /// The node has already been destroyed and cannot be used again.
    Destroyed(NodeId),
    /// The node already has a parent; a node has exactly one owner.
    AlreadyAttached(NodeId),
    /// The node is owned by a parent list and must be destroyed through it.
    Attached(NodeId),
    /// Appending the node would make it its own ancestor.
    WouldCycle(NodeId),
    /// Attributes must have a non-empty key.
    EmptyAttributeKey,
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capacity => write!(f, "allocation failed while growing the tree"),
            Self::Destroyed(id) => write!(f, "node {} has been destroyed", id.into_raw()),
            Self::AlreadyAttached(id) => {
                write!(f, "node {} already has a parent", id.into_raw())
            }
            Self::Attached(id) => write!(
                f,
                "node {} is owned by its parent and cannot be destroyed directly",
                id.into_raw()
            ),
            Self::WouldCycle(id) => {
                write!(f, "node {} cannot become its own descendant", id.into_raw())
            }
            Self::EmptyAttributeKey => write!(f, "attribute key must not be empty"),
        }
    }
}

impl std::error::Error for TreeError {}

/// What went wrong during a load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The source could not be opened, read or closed.
    Io {
        /// The underlying I/O error kind.
        kind: io::ErrorKind,
        /// The underlying error's message.
        message: String,
    },
    /// An end tag did not match the innermost open element.
    MismatchedTag {
        /// Tag name of the innermost open element.
        expected: String,
        /// Tag name found in the end tag.
        found: String,
    },
    /// An end tag appeared after the implicit root had already been closed.
    UnmatchedEndTag {
        /// Tag name found in the end tag.
        found: String,
    },
    /// Input ended inside a markup construct.
    UnexpectedEof {
        /// The construct left unterminated.
        construct: Construct,
    },
    /// Text appeared after the implicit root had been closed.
    TextOutsideDocument,
    /// An element appeared after the implicit root had been closed.
    ElementOutsideDocument,
    /// A `"` was found inside a tag with no pending `key=`.
    ValueWithoutKey,
    /// A single token grew beyond the configured maximum.
    LexemeOverflow {
        /// The configured maximum, in bytes.
        limit: usize,
    },
    /// Elements were nested deeper than the configured maximum.
    DepthExceeded {
        /// The configured maximum depth.
        limit: u32,
    },
    /// An allocation failed while growing the tree or a token.
    Capacity,
    /// The tree refused a mutation.
    Tree(TreeError),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { message, .. } => write!(f, "I/O error: {message}"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched tags (expected </{expected}>, found </{found}>)")
            }
            Self::UnmatchedEndTag { found } => {
                write!(f, "end tag </{found}> has no open element")
            }
            Self::UnexpectedEof { construct } => {
                write!(f, "unexpected end of input inside {construct}")
            }
            Self::TextOutsideDocument => write!(f, "text outside of document"),
            Self::ElementOutsideDocument => write!(f, "element outside of document"),
            Self::ValueWithoutKey => write!(f, "attribute value has no key"),
            Self::LexemeOverflow { limit } => {
                write!(f, "token exceeds maximum length ({limit} bytes)")
            }
            Self::DepthExceeded { limit } => {
                write!(f, "maximum nesting depth exceeded ({limit})")
            }
            Self::Capacity => write!(f, "allocation failed"),
            Self::Tree(err) => write!(f, "{err}"),
        }
    }
}

impl From<io::Error> for ErrorKind {
    fn from(err: io::Error) -> Self {
        Self::Io {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<TreeError> for ErrorKind {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::Capacity => Self::Capacity,
            other => Self::Tree(other),
        }
    }
}

/// The error recorded on a `Document` when loading fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Where in the source the failure was detected.
    pub location: SourceLocation,
}

impl ParseError {
    /// Creates an error of `kind` detected at `location`.
    #[must_use]
    pub fn new(kind: impl Into<ErrorKind>, location: SourceLocation) -> Self {
        Self {
            kind: kind.into(),
            location,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "parse error at {}: {}", self.location, self.kind)
    }
}

impl std::error::Error for ParseError {}
