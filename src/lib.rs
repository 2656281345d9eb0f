//! # littlexml
//!
//! A small streaming XML parser that builds an owned document tree and can
//! write it back out as indented markup. The dialect is deliberately simple:
//! elements, double-quoted attributes, inner text, comments and an optional
//! `<?xml ... ?>` declaration. There are no namespaces, entities, CDATA
//! sections or DOCTYPEs.
//!
//! ## Quick Start
//!
//! ```
//! use littlexml::Document;
//!
//! let doc = Document::parse_str("<root><child>Hello</child></root>");
//! assert!(doc.success());
//! let root = doc.root_element().unwrap();
//! assert_eq!(doc.tag(root), Some("root"));
//! ```
//!
//! A failed parse still hands back the partial tree for inspection:
//!
//! ```
//! use littlexml::Document;
//!
//! let doc = Document::parse_str("<a><b></a>");
//! assert!(!doc.success());
//! let a = doc.root_element().unwrap();
//! assert_eq!(doc.child_count(a), 1);
//! ```

pub mod error;
pub mod parser;
pub mod serial;
pub mod tree;

// Re-export primary types at the crate root for convenience.
pub use error::{ErrorKind, ParseError, TreeError};
pub use parser::{BufferSource, FileSource, ParseOptions, PushParser, Source};
pub use tree::{Attribute, AttributeList, Collection, Document, NodeId, NodeList};
