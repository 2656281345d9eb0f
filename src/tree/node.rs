//! Per-node storage.
//!
//! A `NodeData` is one slot in the document arena. It owns the element's
//! attribute list and the list of its children; the parent link is a plain
//! `NodeId` used for lookups only.

use super::list::{AttributeList, NodeList};
use super::NodeId;

/// Whether a slot still holds a usable node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NodeState {
    /// The node is part of (or waiting to join) a tree.
    #[default]
    Live,
    /// The node has been torn down; every field is empty and any mutation
    /// is refused with `TreeError::Destroyed`.
    Destroyed,
}

/// Storage for a single element in the document arena.
///
/// Read it through [`Document::node`](super::Document::node) or the
/// per-field accessors on `Document`.
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    pub(crate) tag: Option<String>,
    pub(crate) inner_text: Option<String>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) attributes: AttributeList,
    pub(crate) children: NodeList,
    pub(crate) state: NodeState,
}

impl NodeData {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// The element's tag name, once assigned.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The element's inner text, once assigned.
    #[must_use]
    pub fn inner_text(&self) -> Option<&str> {
        self.inner_text.as_deref()
    }

    /// The owning element, if any. The implicit root and detached nodes
    /// have none.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The element's attributes in document order.
    #[must_use]
    pub fn attributes(&self) -> &AttributeList {
        &self.attributes
    }

    /// The element's children in document order.
    #[must_use]
    pub fn children(&self) -> &NodeList {
        &self.children
    }

    /// Returns the slot's lifecycle state.
    #[must_use]
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Returns `true` once the node has been torn down.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.state == NodeState::Destroyed
    }

    /// Releases everything the slot owns except its children, which the
    /// caller tears down separately, and marks it destroyed.
    pub(crate) fn clear(&mut self) {
        self.tag = None;
        self.inner_text = None;
        self.parent = None;
        self.attributes.destroy();
        self.state = NodeState::Destroyed;
    }
}
