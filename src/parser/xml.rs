//! Core parser state machine.
//!
//! The parser pulls one byte at a time from a chunked [`Input`] and feeds it
//! to the handler for the current [`State`]. Elements are appended to the
//! tree as soon as their `<` is seen, so a parse that stops early leaves a
//! partial tree reflecting document order up to the failure.

use crate::error::{Construct, ErrorKind, ErrorSeverity, ParseDiagnostic, ParseError, SourceLocation};
use crate::tree::{Attribute, Document, NodeId};

use super::input::{is_blank, trim_blanks, Input, Lexeme};
use super::source::Source;
use super::ParseOptions;

/// Where the state machine is within the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Between markup, nothing accumulated yet.
    Root,
    /// Between markup, accumulating candidate inner text.
    Text,
    /// Scanning a start tag's name.
    TagOpen,
    /// Inside a tag after its name, scanning attribute keys.
    AttrKey,
    /// Inside a quoted attribute value.
    AttrValue,
    /// Inside `<!...`, waiting for `-->`.
    Comment,
    /// Scanning a `<?...` declaration's name.
    Declaration,
    /// Inside `</...`, waiting for `>`.
    EndTag,
    /// Parsing stopped on an error.
    Failed,
}

/// The tag currently being scanned.
#[derive(Debug, Clone, Copy)]
struct TagTarget {
    node: NodeId,
    /// `true` for a `<?...?>` declaration, scanned into a detached node.
    declaration: bool,
}

/// The tree-building parser.
pub(crate) struct XmlParser<S> {
    input: Input<S>,
    doc: Document,
    state: State,
    lexeme: Lexeme,
    /// Innermost open element; `None` once the implicit root was closed.
    current: Option<NodeId>,
    target: Option<TagTarget>,
    pending_key: Option<String>,
    /// The byte handled by the previous step.
    last_byte: Option<u8>,
    /// Location of the byte being handled.
    byte_location: SourceLocation,
    /// Location of the `<` that opened the markup being scanned.
    markup_start: SourceLocation,
    depth: u32,
    max_depth: u32,
    no_blanks: bool,
}

impl<S: Source> XmlParser<S> {
    pub fn new(source: S, options: &ParseOptions) -> Self {
        let doc = Document::new();
        let root = doc.root();
        Self {
            input: Input::new(source, options.chunk_size),
            doc,
            state: State::Root,
            lexeme: Lexeme::new(options.max_lexeme_length),
            current: Some(root),
            target: None,
            pending_key: None,
            last_byte: None,
            byte_location: SourceLocation::start(),
            markup_start: SourceLocation::start(),
            depth: 0,
            max_depth: options.max_depth,
            no_blanks: options.no_blanks,
        }
    }

    /// Runs the parse to completion and returns the document.
    ///
    /// The source is opened first and, if that succeeded, closed exactly
    /// once afterwards on every path.
    pub fn parse(mut self) -> Document {
        if let Err(err) = self.input.open() {
            let location = self.input.location();
            self.fail(ParseError::new(err, location));
            return self.doc;
        }

        let outcome = self.run();
        self.discard_declaration();
        let closed = self.input.close();

        match (outcome, closed) {
            (Err(err), _) => self.fail(err),
            (Ok(()), Err(err)) => {
                let location = self.input.location();
                self.fail(ParseError::new(err, location));
            }
            (Ok(()), Ok(())) => {
                log::debug!(
                    "parsed {} bytes into {} nodes",
                    self.input.location().byte_offset,
                    self.doc.node_count()
                );
            }
        }
        self.doc
    }

    fn fail(&mut self, err: ParseError) {
        log::warn!("{err}");
        self.state = State::Failed;
        self.doc.set_failure(err);
    }

    /// Tears down a declaration node left behind by a parse that stopped
    /// inside `<?...`. It was never attached, so nothing else owns it.
    fn discard_declaration(&mut self) {
        let Some(target) = self.target.take() else {
            return;
        };
        if !target.declaration {
            return;
        }
        if let Err(err) = self.doc.destroy_node(target.node) {
            log::warn!("could not discard declaration: {err}");
        }
    }

    fn run(&mut self) -> Result<(), ParseError> {
        while let Some(byte) = self.next_byte()? {
            self.step(byte)?;
            self.last_byte = Some(byte);
        }
        self.finish()
    }

    // --- Helpers ---

    fn next_byte(&mut self) -> Result<Option<u8>, ParseError> {
        let location = self.input.location();
        let byte = self
            .input
            .next_byte()
            .map_err(|err| ParseError::new(err, location))?;
        self.byte_location = location;
        Ok(byte)
    }

    fn peek_byte(&mut self) -> Result<Option<u8>, ParseError> {
        let location = self.input.location();
        self.input
            .peek_byte()
            .map_err(|err| ParseError::new(err, location))
    }

    fn error(&self, kind: impl Into<ErrorKind>) -> ParseError {
        ParseError::new(kind, self.byte_location)
    }

    fn push_byte(&mut self, byte: u8) -> Result<(), ParseError> {
        self.lexeme.push(byte).map_err(|kind| self.error(kind))
    }

    fn warn(&mut self, message: String, location: SourceLocation) {
        let diagnostic = ParseDiagnostic {
            severity: ErrorSeverity::Warning,
            message,
            location,
        };
        log::warn!("{diagnostic}");
        self.doc.diagnostics.push(diagnostic);
    }

    // --- State dispatch ---

    fn step(&mut self, byte: u8) -> Result<(), ParseError> {
        match self.state {
            State::Root | State::Text => self.text_byte(byte),
            State::TagOpen | State::Declaration => self.tag_name_byte(byte),
            State::AttrKey => self.attr_key_byte(byte),
            State::AttrValue => self.attr_value_byte(byte),
            State::Comment => self.comment_byte(byte),
            State::EndTag => self.end_tag_byte(byte),
            State::Failed => Ok(()),
        }
    }

    fn text_byte(&mut self, byte: u8) -> Result<(), ParseError> {
        if byte != b'<' {
            self.state = State::Text;
            return self.push_byte(byte);
        }

        self.markup_start = self.byte_location;
        self.flush_text()?;

        match self.peek_byte()? {
            Some(b'/') => {
                self.next_byte()?;
                self.state = State::EndTag;
            }
            Some(b'!') => {
                self.next_byte()?;
                self.state = State::Comment;
            }
            Some(b'?') => {
                self.next_byte()?;
                let node = self.doc.create_node().map_err(|err| self.error(err))?;
                self.target = Some(TagTarget {
                    node,
                    declaration: true,
                });
                self.state = State::Declaration;
            }
            Some(_) => {
                let parent = self
                    .current
                    .ok_or_else(|| self.error(ErrorKind::ElementOutsideDocument))?;
                let node = self
                    .doc
                    .create_and_append(parent)
                    .map_err(|err| self.error(err))?;
                self.target = Some(TagTarget {
                    node,
                    declaration: false,
                });
                self.state = State::TagOpen;
            }
            None => {
                return Err(self.error(ErrorKind::UnexpectedEof {
                    construct: Construct::Tag,
                }))
            }
        }
        Ok(())
    }

    /// Hands accumulated text to the current element. The first assignment
    /// wins; later runs are dropped.
    fn flush_text(&mut self) -> Result<(), ParseError> {
        if self.lexeme.is_empty() {
            return Ok(());
        }
        if self.no_blanks && !self.lexeme.has_content() {
            self.lexeme.clear();
            return Ok(());
        }
        let Some(current) = self.current else {
            return Err(ParseError::new(
                ErrorKind::TextOutsideDocument,
                self.markup_start,
            ));
        };
        let text = self.lexeme.take_string();
        self.doc
            .set_inner_text(current, text)
            .map_err(|err| self.error(err))?;
        Ok(())
    }

    fn tag_name_byte(&mut self, byte: u8) -> Result<(), ParseError> {
        match byte {
            b'>' => {
                let self_closing = self.last_byte == Some(b'/');
                let name = self.take_tag_name(self_closing);
                self.assign_tag(name)?;
                self.finish_tag(self_closing)
            }
            b if is_blank(b) => {
                if !self.lexeme.is_empty() {
                    let name = self.take_tag_name(false);
                    self.assign_tag(name)?;
                    self.state = State::AttrKey;
                }
                Ok(())
            }
            b => self.push_byte(b),
        }
    }

    /// Takes the tag name from the lexeme, dropping a trailing `/` on a
    /// self-closing tag and a trailing `?` on a declaration.
    fn take_tag_name(&mut self, self_closing: bool) -> String {
        let declaration = self.target.is_some_and(|t| t.declaration);
        let mut name = self.lexeme.take_string();
        if self_closing && name.ends_with('/') {
            name.pop();
        }
        if declaration && name.ends_with('?') {
            name.pop();
        }
        name
    }

    fn assign_tag(&mut self, name: String) -> Result<(), ParseError> {
        if let Some(target) = self.target {
            self.doc
                .set_tag(target.node, name)
                .map_err(|err| self.error(err))?;
        }
        Ok(())
    }

    fn attr_key_byte(&mut self, byte: u8) -> Result<(), ParseError> {
        match byte {
            b'>' => {
                let self_closing = self.last_byte == Some(b'/');
                self.discard_leftovers(self_closing);
                self.finish_tag(self_closing)
            }
            b'=' => {
                if !self.lexeme.is_empty() {
                    self.pending_key = Some(self.lexeme.take_string());
                }
                Ok(())
            }
            b'"' => {
                if self.pending_key.is_none() {
                    return Err(self.error(ErrorKind::ValueWithoutKey));
                }
                if !self.lexeme.is_empty() {
                    let stray = self.lexeme.take_string();
                    self.warn(
                        format!("discarded `{stray}` before attribute value"),
                        self.byte_location,
                    );
                }
                self.state = State::AttrValue;
                Ok(())
            }
            b if is_blank(b) => Ok(()),
            b => self.push_byte(b),
        }
    }

    /// Reports anything left over in a tag when its `>` arrives.
    fn discard_leftovers(&mut self, self_closing: bool) {
        let declaration = self.target.is_some_and(|t| t.declaration);
        let mut stray = self.lexeme.as_bytes();
        if self_closing {
            stray = stray.strip_suffix(b"/").unwrap_or(stray);
        }
        if declaration {
            stray = stray.strip_suffix(b"?").unwrap_or(stray);
        }
        if !stray.is_empty() {
            let stray = String::from_utf8_lossy(stray).into_owned();
            self.warn(
                format!("discarded attribute `{stray}` without a value"),
                self.byte_location,
            );
        }
        if let Some(key) = self.pending_key.take() {
            self.warn(
                format!("discarded attribute `{key}` without a value"),
                self.byte_location,
            );
        }
        self.lexeme.clear();
    }

    fn attr_value_byte(&mut self, byte: u8) -> Result<(), ParseError> {
        if byte != b'"' {
            return self.push_byte(byte);
        }
        let value = self.lexeme.take_string();
        if let (Some(key), Some(target)) = (self.pending_key.take(), self.target) {
            let attr = Attribute::new(key, value).map_err(|err| self.error(err))?;
            self.doc
                .add_attribute(target.node, attr)
                .map_err(|err| self.error(err))?;
        }
        self.state = State::AttrKey;
        Ok(())
    }

    fn finish_tag(&mut self, self_closing: bool) -> Result<(), ParseError> {
        self.state = State::Root;
        self.lexeme.clear();
        self.pending_key = None;
        let Some(target) = self.target.take() else {
            return Ok(());
        };

        if target.declaration {
            return self.finish_declaration(target.node);
        }

        if self_closing {
            log::trace!("empty element <{}>", self.doc.tag(target.node).unwrap_or(""));
            return Ok(());
        }

        if self.depth >= self.max_depth {
            return Err(ParseError::new(
                ErrorKind::DepthExceeded {
                    limit: self.max_depth,
                },
                self.markup_start,
            ));
        }
        self.depth += 1;
        self.current = Some(target.node);
        log::trace!("open <{}>", self.doc.tag(target.node).unwrap_or(""));
        Ok(())
    }

    /// Copies the declared version and encoding, then discards the
    /// temporary node the declaration was scanned into.
    fn finish_declaration(&mut self, node: NodeId) -> Result<(), ParseError> {
        if self.doc.tag(node) == Some("xml") {
            if let Some(version) = self
                .doc
                .attribute_value(node, "version")
                .filter(|v| !v.is_empty())
            {
                self.doc.version = version;
            }
            if let Some(encoding) = self
                .doc
                .attribute_value(node, "encoding")
                .filter(|v| !v.is_empty())
            {
                self.doc.encoding = encoding;
            }
            log::debug!(
                "declaration: version {} encoding {}",
                self.doc.version,
                self.doc.encoding
            );
        }
        self.doc
            .destroy_node(node)
            .map_err(|err| self.error(err))
    }

    fn comment_byte(&mut self, byte: u8) -> Result<(), ParseError> {
        self.push_byte(byte)?;
        if self.lexeme.closes_comment() {
            self.lexeme.clear();
            self.state = State::Root;
        }
        Ok(())
    }

    fn end_tag_byte(&mut self, byte: u8) -> Result<(), ParseError> {
        if byte != b'>' {
            return self.push_byte(byte);
        }

        let found = String::from_utf8_lossy(trim_blanks(self.lexeme.as_bytes())).into_owned();
        self.lexeme.clear();

        let Some(current) = self.current else {
            return Err(ParseError::new(
                ErrorKind::UnmatchedEndTag { found },
                self.markup_start,
            ));
        };
        let expected = self.doc.tag(current).unwrap_or("");
        if expected != found {
            return Err(ParseError::new(
                ErrorKind::MismatchedTag {
                    expected: expected.to_string(),
                    found,
                },
                self.markup_start,
            ));
        }

        log::trace!("close <{found}>");
        self.current = self.doc.parent(current);
        self.depth = self.depth.saturating_sub(1);
        self.state = State::Root;
        Ok(())
    }

    /// Handles end of input.
    fn finish(&mut self) -> Result<(), ParseError> {
        let construct = match self.state {
            State::Root | State::Text | State::Failed => None,
            State::TagOpen => Some(Construct::Tag),
            State::Declaration => Some(Construct::Declaration),
            State::AttrKey => Some(if self.target.is_some_and(|t| t.declaration) {
                Construct::Declaration
            } else {
                Construct::Tag
            }),
            State::AttrValue => Some(Construct::AttributeValue),
            State::Comment => Some(Construct::Comment),
            State::EndTag => Some(Construct::EndTag),
        };
        if let Some(construct) = construct {
            return Err(self.error(ErrorKind::UnexpectedEof { construct }));
        }

        let end = self.input.location();
        if self.lexeme.has_content() {
            self.warn("discarded text after the last element".to_string(), end);
        }
        self.lexeme.clear();

        let root = self.doc.root();
        let mut open = self.current;
        while let Some(id) = open.filter(|&id| id != root) {
            let message = format!(
                "element <{}> was never closed",
                self.doc.tag(id).unwrap_or("")
            );
            self.warn(message, end);
            open = self.doc.parent(id);
        }
        Ok(())
    }
}
