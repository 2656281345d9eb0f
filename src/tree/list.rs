//! Growable ordered lists owned by a node.
//!
//! Both lists grow by doubling their capacity starting from 1, reserve
//! storage fallibly so that an allocation failure surfaces as
//! [`TreeError::Capacity`], and can be torn down into an empty terminal state
//! any number of times.

use crate::error::TreeError;

use super::NodeId;

/// Operations shared by [`AttributeList`] and [`NodeList`].
pub trait Collection {
    /// The element type stored in the list.
    type Item;

    /// Returns the stored elements in insertion order.
    fn as_slice(&self) -> &[Self::Item];

    /// Returns the logical capacity (always `>= len()`).
    fn capacity(&self) -> usize;

    /// Returns the number of stored elements.
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` if the list holds no elements.
    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Returns the element at `index`, if any.
    fn get(&self, index: usize) -> Option<&Self::Item> {
        self.as_slice().get(index)
    }

    /// Returns an iterator over the elements in insertion order.
    fn iter(&self) -> std::slice::Iter<'_, Self::Item> {
        self.as_slice().iter()
    }
}

/// Doubling storage behind both lists.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Slots<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Slots<T> {
    const fn new() -> Self {
        Self {
            items: Vec::new(),
            capacity: 0,
        }
    }

    fn push(&mut self, item: T) -> Result<(), TreeError> {
        if self.items.len() >= self.capacity {
            let grown = if self.capacity == 0 {
                1
            } else {
                self.capacity.checked_mul(2).ok_or(TreeError::Capacity)?
            };
            self.items
                .try_reserve_exact(grown - self.items.len())
                .map_err(|_| TreeError::Capacity)?;
            self.capacity = grown;
        }
        self.items.push(item);
        Ok(())
    }

    /// Hands back every stored element and releases the backing storage.
    fn drain_all(&mut self) -> Vec<T> {
        self.capacity = 0;
        std::mem::take(&mut self.items)
    }
}

/// A key/value pair on an element.
///
/// The key is never empty. The value may be empty (`attr=""`); such
/// attributes are kept in the tree but skipped by the serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name.
    pub key: String,
    /// The raw attribute value, exactly as written between the quotes.
    pub value: String,
}

impl Attribute {
    /// Creates an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::EmptyAttributeKey`] if `key` is empty.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Result<Self, TreeError> {
        let key = key.into();
        if key.is_empty() {
            return Err(TreeError::EmptyAttributeKey);
        }
        Ok(Self {
            key,
            value: value.into(),
        })
    }
}

/// Ordered attributes of one element. Duplicate keys are allowed; lookups
/// return the first match in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeList {
    slots: Slots<Attribute>,
}

impl AttributeList {
    /// Creates an empty list with no backing storage.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Slots::new(),
        }
    }

    /// Appends an attribute at the end of the list.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::Capacity`] if the list cannot grow.
    pub fn add(&mut self, attr: Attribute) -> Result<(), TreeError> {
        self.slots.push(attr)
    }

    /// Returns the first attribute whose key equals `key`.
    #[must_use]
    pub fn get_attribute(&self, key: &str) -> Option<&Attribute> {
        self.iter().find(|attr| attr.key == key)
    }

    /// Returns an owned copy of the first value whose key equals `key`.
    #[must_use]
    pub fn get_attribute_value(&self, key: &str) -> Option<String> {
        self.get_attribute(key).map(|attr| attr.value.clone())
    }

    /// Drops every attribute and releases the backing storage. Calling this
    /// on an empty list is a no-op.
    pub fn destroy(&mut self) {
        drop(self.slots.drain_all());
    }
}

impl Collection for AttributeList {
    type Item = Attribute;

    fn as_slice(&self) -> &[Attribute] {
        &self.slots.items
    }

    fn capacity(&self) -> usize {
        self.slots.capacity
    }
}

/// Ordered children of one node.
///
/// The list owns the children it names: a child is reachable from exactly
/// one `NodeList`, and the node arena only tears a child down when walking
/// down from its owner. Recording the parent back-reference happens in the
/// same step, through `Document::append_child`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeList {
    slots: Slots<NodeId>,
}

impl NodeList {
    /// Creates an empty list with no backing storage.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Slots::new(),
        }
    }

    pub(crate) fn add(&mut self, child: NodeId) -> Result<(), TreeError> {
        self.slots.push(child)
    }

    /// Empties the list, handing the owned children to the caller for
    /// teardown.
    pub(crate) fn take_all(&mut self) -> Vec<NodeId> {
        self.slots.drain_all()
    }
}

impl Collection for NodeList {
    type Item = NodeId;

    fn as_slice(&self) -> &[NodeId] {
        &self.slots.items
    }

    fn capacity(&self) -> usize {
        self.slots.capacity
    }
}
