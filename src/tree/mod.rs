//! Arena-based document tree.
//!
//! All nodes live in a contiguous `Vec<NodeData>` owned by the `Document`,
//! and are referenced by `NodeId`, a newtype over `NonZeroU32`. Each node
//! owns its [`AttributeList`] and its [`NodeList`] of children; the parent
//! link is a `NodeId` used for lookups only and is never followed when
//! tearing a subtree down.
//!
//! Destruction walks down from the owner: [`Document::destroy_node`] tears a
//! detached subtree down children-first and leaves every slot in the
//! [`NodeState::Destroyed`] state, and [`Document::destroy`] does the same
//! from the implicit root. Mutating a destroyed node is refused with
//! [`TreeError::Destroyed`].

mod list;
mod node;

pub use list::{Attribute, AttributeList, Collection, NodeList};
pub use node::{NodeData, NodeState};

use std::num::NonZeroU32;
use std::path::Path;

use crate::error::{ParseDiagnostic, ParseError, TreeError};

/// Version reported when the input carried no declaration.
pub const DEFAULT_VERSION: &str = "1.0";

/// Encoding reported when the input carried no declaration.
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// A typed index into the document's node arena.
///
/// `NodeId` is a newtype over `NonZeroU32`, meaning it can never be zero
/// and `Option<NodeId>` has the same size as `NodeId` (niche optimization).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(NonZeroU32);

impl NodeId {
    /// Creates a `NodeId` from an arena index, if it fits.
    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
    }

    /// Returns the raw index as a `usize` for indexing into the arena.
    fn as_index(self) -> usize {
        self.0.get() as usize
    }

    /// Converts this `NodeId` to a raw `u32`.
    ///
    /// The returned value is always non-zero (valid `NodeId`s start at 1).
    #[must_use]
    pub fn into_raw(self) -> u32 {
        self.0.get()
    }

    /// Creates a `NodeId` from a raw `u32`, if non-zero.
    #[must_use]
    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }
}

/// A parsed (or hand-built) document.
///
/// The `Document` owns every node, the declared version and encoding, and
/// the outcome of the load that produced it. A failed load keeps the partial
/// tree so it can be inspected; [`success`](Document::success) tells the two
/// apart.
///
/// # Examples
///
/// ```
/// use littlexml::Document;
///
/// let doc = Document::parse_str(r#"<item id="7">seven</item>"#);
/// let item = doc.root_element().unwrap();
/// assert_eq!(doc.tag(item), Some("item"));
/// assert_eq!(doc.attribute_value(item, "id").as_deref(), Some("7"));
/// assert_eq!(doc.inner_text(item), Some("seven"));
/// ```
#[derive(Debug)]
pub struct Document {
    /// The node arena. Index 0 is unused (placeholder for `NonZeroU32`).
    nodes: Vec<NodeData>,
    /// The implicit root; its children are the top-level elements.
    root: NodeId,
    /// XML version from the declaration, or `"1.0"`.
    pub version: String,
    /// Encoding from the declaration, or `"UTF-8"`.
    pub encoding: String,
    success: bool,
    error: Option<ParseError>,
    /// Non-fatal diagnostics collected during parsing.
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl Document {
    /// Creates an empty document holding only the implicit root.
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(64);
        // Index 0: placeholder (NodeId uses NonZeroU32)
        nodes.push(NodeData::new());
        // Index 1: the implicit root
        nodes.push(NodeData::new());
        let root = NodeId(NonZeroU32::MIN);
        Self {
            nodes,
            root,
            version: DEFAULT_VERSION.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            success: true,
            error: None,
            diagnostics: Vec::new(),
        }
    }

    /// Parses a string with default options.
    ///
    /// Always returns a document; check [`success`](Document::success).
    #[must_use]
    pub fn parse_str(input: &str) -> Self {
        crate::parser::parse_str(input)
    }

    /// Parses raw bytes with default options.
    #[must_use]
    pub fn parse_bytes(input: &[u8]) -> Self {
        crate::parser::parse_bytes(input)
    }

    /// Parses the file at `path` with default options, reading it in chunks.
    ///
    /// A file that cannot be opened yields an unsuccessful document with an
    /// I/O error.
    #[must_use]
    pub fn load_path(path: impl AsRef<Path>) -> Self {
        crate::parser::load_path(path, &crate::parser::ParseOptions::default())
    }

    /// Writes the document to `path`, indenting nested elements by
    /// `indent` spaces per level.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the destination cannot be created or written.
    pub fn write_to_path(&self, path: impl AsRef<Path>, indent: usize) -> std::io::Result<()> {
        crate::serial::write_to_path(self, path, indent)
    }

    /// Returns `true` if the load that produced this document completed.
    #[must_use]
    pub fn success(&self) -> bool {
        self.success
    }

    /// Returns the error that stopped the load, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Converts a failed load into its error, discarding the partial tree.
    ///
    /// # Errors
    ///
    /// Returns the recorded `ParseError` if the load failed.
    pub fn into_result(mut self) -> Result<Self, ParseError> {
        match self.error.take() {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    pub(crate) fn set_failure(&mut self, err: ParseError) {
        self.success = false;
        self.error = Some(err);
    }

    /// Returns the implicit root node.
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns the first top-level element, if any.
    #[must_use]
    pub fn root_element(&self) -> Option<NodeId> {
        self.child(self.root, 0)
    }

    /// Returns a reference to the `NodeData` for the given node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this document.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    fn live_mut(&mut self, id: NodeId) -> Result<&mut NodeData, TreeError> {
        let node = self.node_mut(id);
        if node.is_destroyed() {
            return Err(TreeError::Destroyed(id));
        }
        Ok(node)
    }

    /// Returns the tag name of a node.
    #[must_use]
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id).tag()
    }

    /// Returns the inner text of a node.
    #[must_use]
    pub fn inner_text(&self, id: NodeId) -> Option<&str> {
        self.node(id).inner_text()
    }

    /// Returns the attributes of a node.
    #[must_use]
    pub fn attributes(&self, id: NodeId) -> &AttributeList {
        self.node(id).attributes()
    }

    /// Returns the first attribute named `key`, borrowed from the tree.
    #[must_use]
    pub fn attribute(&self, id: NodeId, key: &str) -> Option<&Attribute> {
        self.attributes(id).get_attribute(key)
    }

    /// Returns an owned copy of the first value of attribute `key`.
    #[must_use]
    pub fn attribute_value(&self, id: NodeId, key: &str) -> Option<String> {
        self.attributes(id).get_attribute_value(key)
    }

    /// Returns `true` if the node has been destroyed.
    #[must_use]
    pub fn is_destroyed(&self, id: NodeId) -> bool {
        self.node(id).is_destroyed()
    }

    // --- Navigation ---

    /// Returns the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Returns the `index`-th child of a node.
    #[must_use]
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.node(id).children.get(index).copied()
    }

    /// Returns the number of children of a node.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.node(id).children.len()
    }

    /// Returns an iterator over the children of a node.
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            inner: self.node(id).children.iter(),
        }
    }

    /// Returns the first immediate child tagged `tag`.
    ///
    /// Only direct children are searched; a tag that appears deeper in the
    /// subtree is not found.
    #[must_use]
    pub fn immediate_element_by_tag_name(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.children(id).find(|&child| self.tag(child) == Some(tag))
    }

    /// Returns every immediate child tagged `tag`, in document order.
    pub fn children_by_tag_name<'a>(
        &'a self,
        id: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .filter(move |&child| self.tag(child) == Some(tag))
    }

    /// Returns an iterator over a node and its ancestors (walking up to root).
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: Some(id),
        }
    }

    /// Returns an iterator over all descendants of a node (depth-first,
    /// document order). The node itself is not included.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    // --- Mutation ---

    /// Allocates a new, empty, detached node in the arena.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Capacity`] if the arena cannot grow.
    pub fn create_node(&mut self) -> Result<NodeId, TreeError> {
        let index = self.nodes.len();
        let id = NodeId::from_index(index).ok_or(TreeError::Capacity)?;
        self.nodes.try_reserve(1).map_err(|_| TreeError::Capacity)?;
        self.nodes.push(NodeData::new());
        Ok(id)
    }

    /// Appends `child` to the end of `parent`'s child list and records
    /// `parent` as its parent. Ownership moves to `parent` in the same step.
    ///
    /// # Errors
    ///
    /// Fails if either node is destroyed, if `child` already has an owner
    /// (or is the implicit root), if `child` is an ancestor of `parent`, or
    /// if the child list cannot grow.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.live_mut(parent)?;
        let has_parent = self.live_mut(child)?.parent.is_some();
        if has_parent || child == self.root {
            return Err(TreeError::AlreadyAttached(child));
        }
        if self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(TreeError::WouldCycle(child));
        }
        self.attach(parent, child)
    }

    /// Links a live, ownerless `child` under `parent` without re-checking
    /// either.
    fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.node_mut(parent).children.add(child)?;
        self.node_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Creates an empty node and appends it to `parent` in one step.
    ///
    /// A fresh node cannot be an ancestor of anything, so unlike
    /// [`append_child`](Document::append_child) this runs in constant time
    /// regardless of how deep `parent` sits.
    ///
    /// # Errors
    ///
    /// Fails if `parent` is destroyed or the arena or child list cannot grow.
    pub fn create_and_append(&mut self, parent: NodeId) -> Result<NodeId, TreeError> {
        self.live_mut(parent)?;
        let child = self.create_node()?;
        self.attach(parent, child)?;
        Ok(child)
    }

    /// Assigns the tag name if none has been assigned yet.
    ///
    /// Returns `Ok(true)` if the name was taken, `Ok(false)` if the node
    /// already had one (the first assignment wins) or `tag` is empty.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Destroyed`] if the node has been destroyed.
    pub fn set_tag(&mut self, id: NodeId, tag: impl Into<String>) -> Result<bool, TreeError> {
        let node = self.live_mut(id)?;
        let tag = tag.into();
        if node.tag.is_some() || tag.is_empty() {
            return Ok(false);
        }
        node.tag = Some(tag);
        Ok(true)
    }

    /// Assigns the inner text if none has been assigned yet and the node has
    /// no children.
    ///
    /// Returns `Ok(true)` if the text was taken, `Ok(false)` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Destroyed`] if the node has been destroyed.
    pub fn set_inner_text(
        &mut self,
        id: NodeId,
        text: impl Into<String>,
    ) -> Result<bool, TreeError> {
        let node = self.live_mut(id)?;
        let text = text.into();
        if node.inner_text.is_some() || !node.children.is_empty() || text.is_empty() {
            return Ok(false);
        }
        node.inner_text = Some(text);
        Ok(true)
    }

    /// Appends an attribute to a node.
    ///
    /// # Errors
    ///
    /// Fails if the node is destroyed or its attribute list cannot grow.
    pub fn add_attribute(&mut self, id: NodeId, attr: Attribute) -> Result<(), TreeError> {
        self.live_mut(id)?.attributes.add(attr)
    }

    /// Tears down a detached subtree, children first.
    ///
    /// Every node in the subtree ends in the destroyed state with no tag,
    /// text, attributes or children. Nodes that are still owned by a parent
    /// must be torn down through their owner.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Destroyed`] if `id` was already destroyed and
    /// [`TreeError::Attached`] if it still has a parent.
    pub fn destroy_node(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.live_mut(id)?;
        if node.parent.is_some() {
            return Err(TreeError::Attached(id));
        }

        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let children = self.node_mut(next).children.take_all();
            stack.extend(children);
            order.push(next);
        }
        // Parents were recorded before their children; clear in reverse.
        for next in order.into_iter().rev() {
            self.node_mut(next).clear();
        }
        Ok(())
    }

    /// Tears down the whole tree and resets the document to its terminal
    /// state: no nodes, empty metadata, `success() == false`.
    ///
    /// Calling it again is a no-op.
    pub fn destroy(&mut self) {
        if self.is_destroyed(self.root) {
            return;
        }
        if let Err(err) = self.destroy_node(self.root) {
            log::warn!("document teardown refused: {err}");
        }
        self.version.clear();
        self.encoding.clear();
        self.success = false;
        self.error = None;
        self.diagnostics.clear();
    }

    /// Returns the total number of arena slots in use, including destroyed
    /// ones (but not the placeholder).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1 // subtract placeholder at index 0
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

// --- Iterators ---

/// Iterator over the children of a node.
pub struct Children<'a> {
    inner: std::slice::Iter<'a, NodeId>,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().copied()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().copied()
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Iterator over a node and its ancestors.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).parent;
        Some(current)
    }
}

/// Depth-first iterator over all descendants of a node.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack.extend(self.doc.children(current).rev());
        Some(current)
    }
}
