//! Document tree engine for pocdom.
//!
//! This crate provides the mutable, doubly-linked node tree that proof-of-
//! concept pages are assembled in, together with the structural edit
//! operations, lazy traversals and attribute/text search built on it.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Nodes are
//! allocated detached and only become part of a document through the edit
//! operations in [`mutation`], which are the sole writers of the parent, child
//! and sibling links. After every edit, for each node `x` with parent `p`:
//!
//! - `x` appears exactly once in `p`'s children, at index `i`;
//! - `x`'s previous/next siblings are `p`'s children at `i - 1` / `i + 1`.
//!
//! Document order is pre-order depth-first traversal of the children lists.
//!
//! ```
//! use pocdom_dom::{DomTree, Filter};
//!
//! let mut tree = DomTree::new();
//! let form = tree.element_with("form", [("method", "POST")]);
//! let input = tree.element_with("input", [("name", "email")]);
//! tree.append(form, input)?;
//!
//! assert_eq!(tree.find(form, &Filter::new().name("input")), Some(input));
//! assert_eq!(tree.attr(form, "method")?, "POST");
//! # Ok::<(), pocdom_dom::DomError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use pocdom_common::{NodeEncoder, html_encoder};
use serde::Serialize;
use strum_macros::{Display, EnumString};

pub mod error;
pub mod mutation;
pub mod search;
pub mod snapshot;
pub mod traverse;

pub use error::{DomError, Result};
pub use search::Filter;
pub use snapshot::NodeSnapshot;
pub use traverse::{AncestorIterator, Descendants, FollowingSiblingIterator, PrecedingSiblingIterator};

/// Insertion-ordered map of attribute names to values.
///
/// Order is preserved so generated markup is deterministic.
pub type AttributesMap = IndexMap<String, String>;

/// A type-safe index into the [`DomTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is. Fixed at construction and never inferred from its fields.
///
/// The string forms (`html`, `script`, `html_text`, `cdata`) are the type
/// tags builders use when filtering by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(ascii_case_insensitive)]
pub enum NodeKind {
    /// An ordinary HTML element; its text children are HTML-encoded.
    #[strum(serialize = "html")]
    #[serde(rename = "html")]
    Element,
    /// A `<script>` element; its text children are emitted verbatim.
    #[strum(serialize = "script")]
    #[serde(rename = "script")]
    Script,
    /// A run of character data.
    #[strum(serialize = "html_text")]
    #[serde(rename = "html_text")]
    Text,
    /// A `<![CDATA[...]]>` section.
    #[strum(serialize = "cdata")]
    #[serde(rename = "cdata")]
    CData,
}

impl NodeKind {
    /// Parse a kind from its type tag.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::TypeConstraint`] for an unknown tag.
    pub fn from_tag(tag: &str) -> Result<Self> {
        Ok(tag.parse()?)
    }

    /// Whether nodes of this kind carry a tag name and attributes.
    #[must_use]
    pub const fn is_tag(self) -> bool {
        matches!(self, Self::Element | Self::Script)
    }

    /// Whether nodes of this kind carry a text payload.
    #[must_use]
    pub const fn has_text(self) -> bool {
        matches!(self, Self::Text | Self::CData)
    }
}

/// The payload of a node: everything except its position in the tree.
///
/// The kind is fixed by the constructor; every other field may be edited
/// through [`DomTree::data_mut`].
#[derive(Debug, Clone)]
pub struct NodeData {
    kind: NodeKind,
    /// Tag name; empty for text and CDATA nodes.
    pub name: String,
    /// Attributes in insertion order.
    pub attrs: AttributesMap,
    /// Raw text payload of text and CDATA nodes.
    pub value: String,
    /// Renders without a closing tag and without children.
    pub self_closing: bool,
    /// Escapes attributes and text children on output; `None` emits them raw.
    pub encoder: Option<Arc<dyn NodeEncoder>>,
}

impl NodeData {
    /// An element named `name`.
    ///
    /// A `script` name (any ASCII case) yields a [`NodeKind::Script`] node
    /// without an encoder; any other name yields an HTML-encoded
    /// [`NodeKind::Element`].
    #[must_use]
    pub fn element(name: &str) -> Self {
        let is_script = name.eq_ignore_ascii_case("script");
        Self {
            kind: if is_script { NodeKind::Script } else { NodeKind::Element },
            name: name.to_string(),
            attrs: AttributesMap::new(),
            value: String::new(),
            self_closing: false,
            encoder: if is_script { None } else { Some(html_encoder()) },
        }
    }

    /// A text node holding `value`.
    #[must_use]
    pub fn text(value: &str) -> Self {
        Self::character_data(NodeKind::Text, value)
    }

    /// A CDATA section holding `value`.
    #[must_use]
    pub fn cdata(value: &str) -> Self {
        Self::character_data(NodeKind::CData, value)
    }

    fn character_data(kind: NodeKind, value: &str) -> Self {
        Self {
            kind,
            name: String::new(),
            attrs: AttributesMap::new(),
            value: value.to_string(),
            self_closing: false,
            encoder: Some(html_encoder()),
        }
    }

    /// Replace the attributes.
    #[must_use]
    pub fn with_attrs<K, V>(mut self, attrs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attrs = attrs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    /// Mark the node as self-closing.
    #[must_use]
    pub const fn self_closing(mut self) -> Self {
        self.self_closing = true;
        self
    }

    /// Replace the encoder.
    #[must_use]
    pub fn with_encoder(mut self, encoder: Option<Arc<dyn NodeEncoder>>) -> Self {
        self.encoder = encoder;
        self
    }

    /// The node's kind.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        self.kind
    }

    /// The text payload, for node kinds that expose one.
    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        self.kind.has_text().then_some(self.value.as_str())
    }

    /// Returns the element's id attribute value if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// Returns the whitespace-separated class names from the class attribute.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .map(String::as_str)
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Same kind, name, value, attributes and self-closing flag.
    ///
    /// Attribute order and the encoder are not compared.
    #[must_use]
    pub fn same_properties(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.name == other.name
            && self.value == other.value
            && self.self_closing == other.self_closing
            && self.attrs == other.attrs
    }
}

/// A vertex in the document tree.
///
/// The payload is public through [`Node::data`]; the links are read-only and
/// maintained by the tree's edit operations.
#[derive(Debug, Clone)]
pub struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    next_sibling: Option<NodeId>,
    prev_sibling: Option<NodeId>,
}

impl Node {
    const fn detached(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        }
    }

    /// The node's payload.
    #[must_use]
    pub const fn data(&self) -> &NodeData {
        &self.data
    }

    /// The node's parent, `None` for roots.
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The node's children in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The child following this one in its parent.
    #[must_use]
    pub const fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }

    /// The child preceding this one in its parent.
    #[must_use]
    pub const fn prev_sibling(&self) -> Option<NodeId> {
        self.prev_sibling
    }

    /// No parent, no siblings and no children.
    #[must_use]
    pub const fn is_detached(&self) -> bool {
        self.parent.is_none()
            && self.next_sibling.is_none()
            && self.prev_sibling.is_none()
            && self.children.is_empty()
    }
}

/// Arena holding every node of one or more document trees.
///
/// Any node without a parent is the root of its own tree. Decomposed nodes
/// leave a tombstone so their ids are never reused.
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    nodes: Vec<Option<Node>>,
}

impl DomTree {
    /// Create an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of live (not decomposed) nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    /// Whether the arena has no live nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocate a new detached node and return its ID.
    pub fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::detached(data)));
        id
    }

    /// Allocate a detached element (or script) without attributes.
    pub fn element(&mut self, name: &str) -> NodeId {
        self.alloc(NodeData::element(name))
    }

    /// Allocate a detached element (or script) with attributes.
    pub fn element_with<K, V>(&mut self, name: &str, attrs: impl IntoIterator<Item = (K, V)>) -> NodeId
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.alloc(NodeData::element(name).with_attrs(attrs))
    }

    /// Allocate a detached text node.
    pub fn text(&mut self, value: &str) -> NodeId {
        self.alloc(NodeData::text(value))
    }

    /// Allocate a detached CDATA node.
    pub fn cdata(&mut self, value: &str) -> NodeId {
        self.alloc(NodeData::cdata(value))
    }

    /// Whether `id` names a live node.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    /// Get a node by its ID, failing for unknown or decomposed ids.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or(DomError::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(DomError::NodeNotFound(id))
    }

    /// Get a node's payload.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn data(&self, id: NodeId) -> Result<&NodeData> {
        self.node(id).map(Node::data)
    }

    /// Get a mutable reference to a node's payload.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn data_mut(&mut self, id: NodeId) -> Result<&mut NodeData> {
        self.node_mut(id).map(|node| &mut node.data)
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Get the first child of a node.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.first().copied())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// Number of direct children.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// Whether `child` is a direct child of `parent`.
    #[must_use]
    pub fn contains_child(&self, parent: NodeId, child: NodeId) -> bool {
        self.parent(child) == Some(parent) && self.contains(parent)
    }

    /// Whether the node has no parent, siblings or children.
    #[must_use]
    pub fn is_detached(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_detached)
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.parents(descendant).any(|id| id == ancestor)
    }

    /// Value of attribute `key`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::AttributeNotFound`] if the attribute is absent and
    /// [`DomError::NodeNotFound`] if the node does not exist.
    pub fn attr(&self, id: NodeId, key: &str) -> Result<&str> {
        self.data(id)?
            .attrs
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| DomError::AttributeNotFound(key.to_string()))
    }

    /// Value of attribute `key`, or `None` if absent.
    #[must_use]
    pub fn get_attr(&self, id: NodeId, key: &str) -> Option<&str> {
        self.get(id)
            .and_then(|n| n.data.attrs.get(key))
            .map(String::as_str)
    }

    /// Whether the node has attribute `key`.
    #[must_use]
    pub fn has_attr(&self, id: NodeId, key: &str) -> bool {
        self.get(id).is_some_and(|n| n.data.attrs.contains_key(key))
    }

    /// Set attribute `key`, keeping its position if it already exists.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn set_attr(&mut self, id: NodeId, key: &str, value: &str) -> Result<()> {
        let _ = self
            .data_mut(id)?
            .attrs
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Remove attribute `key`, returning its old value.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn remove_attr(&mut self, id: NodeId, key: &str) -> Result<Option<String>> {
        Ok(self.data_mut(id)?.attrs.shift_remove(key))
    }

    /// Whether two nodes have the same properties, ignoring tree links.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if either node does not exist.
    pub fn is_equal(&self, a: NodeId, b: NodeId) -> Result<bool> {
        Ok(a == b || self.data(a)?.same_properties(self.data(b)?))
    }

    /// Whether two subtrees are structurally equal: equal properties and
    /// pairwise-equal children, recursively.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if a node does not exist.
    pub fn subtree_eq(&self, a: NodeId, b: NodeId) -> Result<bool> {
        if a == b {
            return Ok(true);
        }
        if !self.is_equal(a, b)? {
            return Ok(false);
        }
        let (left, right) = (self.children(a), self.children(b));
        if left.len() != right.len() {
            return Ok(false);
        }
        for (&x, &y) in left.iter().zip(right) {
            if !self.subtree_eq(x, y)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
