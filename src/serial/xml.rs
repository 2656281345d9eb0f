//! Indenting serializer.
//!
//! Writes a `Document` back out as markup: a declaration line, then every
//! element on its own line, indented by `indent` spaces per nesting level.
//! Empty elements use the self-closing form, leaves with text keep it
//! inline. No escaping is performed, so the output parses back to the same
//! tree only when text and attribute values are free of `<`, `>` and `"`.

use std::io::{self, Write};

use crate::tree::{Collection, Document, NodeId};

/// Options controlling serialization output.
///
/// # Examples
///
/// ```
/// use littlexml::Document;
/// use littlexml::serial::{serialize_with_options, SerializeOptions};
///
/// let doc = Document::parse_str("<root><child>Hello</child></root>");
/// let xml = serialize_with_options(&doc, &SerializeOptions::default().indent(4));
/// assert!(xml.contains("\n    <child>Hello</child>\n"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Spaces per nesting level. Defaults to 2.
    pub indent: usize,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl SerializeOptions {
    /// Sets the number of spaces per nesting level. Zero puts every element
    /// at the start of its line.
    #[must_use]
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }
}

/// Serializes a document to a string with default options.
///
/// # Examples
///
/// ```
/// use littlexml::Document;
/// use littlexml::serial::serialize;
///
/// let doc = Document::parse_str("<a></a>");
/// assert_eq!(serialize(&doc), "<?xml version=\"1.0\" encoding=\"UTF-8\" ?>\n<a />\n");
/// ```
#[must_use]
pub fn serialize(doc: &Document) -> String {
    serialize_with_options(doc, &SerializeOptions::default())
}

/// Serializes a document to a string with the given options.
#[must_use]
pub fn serialize_with_options(doc: &Document, options: &SerializeOptions) -> String {
    let mut output = String::new();

    output.push_str("<?xml version=\"");
    output.push_str(&doc.version);
    output.push_str("\" encoding=\"");
    output.push_str(&doc.encoding);
    output.push_str("\" ?>\n");

    serialize_children(doc, doc.root(), &mut output, options, 0);
    output
}

/// Serializes a document into any writer.
///
/// # Errors
///
/// Returns the writer's I/O error.
pub fn write_document<W: Write>(
    writer: &mut W,
    doc: &Document,
    options: &SerializeOptions,
) -> io::Result<()> {
    writer.write_all(serialize_with_options(doc, options).as_bytes())?;
    writer.flush()
}

/// Number of spaces in front of an element at `depth`.
fn indent_width(options: &SerializeOptions, depth: usize) -> usize {
    options.indent.saturating_mul(depth)
}

fn push_indent(out: &mut String, options: &SerializeOptions, depth: usize) {
    for _ in 0..indent_width(options, depth) {
        out.push(' ');
    }
}

/// One pending step of the tree walk.
enum Frame {
    /// Write the element's start tag (and, for leaves, the whole element).
    Open(NodeId, usize),
    /// Write the end tag of an element whose children are done.
    Close(NodeId, usize),
}

/// Writes every child of `parent` in document order. The walk keeps its own
/// stack, so nesting depth is limited by memory rather than the call stack.
fn serialize_children(
    doc: &Document,
    parent: NodeId,
    out: &mut String,
    options: &SerializeOptions,
    depth: usize,
) {
    let mut stack: Vec<Frame> = doc
        .children(parent)
        .rev()
        .map(|child| Frame::Open(child, depth))
        .collect();

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Open(id, depth) => {
                let node = doc.node(id);
                let tag = node.tag().unwrap_or("");

                push_indent(out, options, depth);
                out.push('<');
                out.push_str(tag);

                // Attributes with an empty value are kept in the tree but not written.
                for attr in node.attributes().iter().filter(|a| !a.value.is_empty()) {
                    out.push(' ');
                    out.push_str(&attr.key);
                    out.push_str("=\"");
                    out.push_str(&attr.value);
                    out.push('"');
                }

                match (node.children().is_empty(), node.inner_text()) {
                    (true, None) => out.push_str(" />\n"),
                    (true, Some(text)) => {
                        out.push('>');
                        out.push_str(text);
                        push_end_tag(out, tag);
                    }
                    (false, _) => {
                        out.push_str(">\n");
                        stack.push(Frame::Close(id, depth));
                        stack.extend(
                            doc.children(id)
                                .rev()
                                .map(|child| Frame::Open(child, depth + 1)),
                        );
                    }
                }
            }
            Frame::Close(id, depth) => {
                push_indent(out, options, depth);
                push_end_tag(out, doc.tag(id).unwrap_or(""));
            }
        }
    }
}

fn push_end_tag(out: &mut String, tag: &str) {
    out.push_str("</");
    out.push_str(tag);
    out.push_str(">\n");
}
