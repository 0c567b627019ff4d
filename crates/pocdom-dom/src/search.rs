//! Predicate search over traversals.
//!
//! A [`Filter`] combines up to four independent predicates (name, kind,
//! text, attributes) with AND. The `find_*` methods apply it to one of the
//! traversals in [`crate::traverse`].

use crate::{DomTree, NodeData, NodeId, NodeKind};

/// Search criteria for the `find_*` family.
///
/// An empty filter matches every node.
///
/// ```
/// use pocdom_dom::{Filter, NodeKind};
///
/// let filter = Filter::new().name("label").attr("for", "mail");
/// let texts = Filter::new().kind(NodeKind::Text).text("Email");
/// # let _ = (filter, texts);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    name: Option<String>,
    kind: Option<NodeKind>,
    text: Option<String>,
    attrs: Vec<(String, String)>,
    recursive: bool,
    limit: Option<usize>,
}

impl Default for Filter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter {
    /// A filter that matches everything, searching all descendants.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            name: None,
            kind: None,
            text: None,
            attrs: Vec::new(),
            recursive: true,
            limit: None,
        }
    }

    /// Require this exact tag name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Require this node kind.
    #[must_use]
    pub const fn kind(mut self, kind: NodeKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Require a text payload containing `text`.
    ///
    /// Only text and CDATA nodes expose a payload, so this never matches an
    /// element.
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Require attribute `key` to exist with a value containing `value`.
    ///
    /// May be called repeatedly; every attribute must match.
    #[must_use]
    pub fn attr(mut self, key: &str, value: &str) -> Self {
        self.attrs.push((key.to_string(), value.to_string()));
        self
    }

    /// Search all descendants (`true`, the default) or only direct children.
    ///
    /// Only [`DomTree::find`] and [`DomTree::find_all`] consult this.
    #[must_use]
    pub const fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Stop after this many matches.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `data` satisfies every predicate.
    #[must_use]
    pub fn matches(&self, data: &NodeData) -> bool {
        self.name.as_deref().is_none_or(|name| name == data.name)
            && self.kind.is_none_or(|kind| kind == data.kind())
            && self
                .text
                .as_deref()
                .is_none_or(|text| data.text_content().is_some_and(|own| own.contains(text)))
            && self.attrs_match(data)
    }

    fn attrs_match(&self, data: &NodeData) -> bool {
        self.attrs.iter().all(|(key, wanted)| {
            data.attrs
                .get(key)
                .is_some_and(|value| value.contains(wanted.as_str()))
        })
    }

    fn collect(&self, tree: &DomTree, candidates: impl Iterator<Item = NodeId>) -> Vec<NodeId> {
        let limit = self.limit.unwrap_or(usize::MAX);
        candidates
            .filter(|&id| tree.get(id).is_some_and(|node| self.matches(node.data())))
            .take(limit)
            .collect()
    }

    fn first(&self, tree: &DomTree, mut candidates: impl Iterator<Item = NodeId>) -> Option<NodeId> {
        candidates.find(|&id| tree.get(id).is_some_and(|node| self.matches(node.data())))
    }
}

impl DomTree {
    /// First descendant (or child, when not recursive) matching `filter`.
    #[must_use]
    pub fn find(&self, id: NodeId, filter: &Filter) -> Option<NodeId> {
        if filter.recursive {
            filter.first(self, self.descendants(id))
        } else {
            filter.first(self, self.children(id).iter().copied())
        }
    }

    /// All descendants (or children, when not recursive) matching `filter`,
    /// in document order.
    #[must_use]
    pub fn find_all(&self, id: NodeId, filter: &Filter) -> Vec<NodeId> {
        if filter.recursive {
            filter.collect(self, self.descendants(id))
        } else {
            filter.collect(self, self.children(id).iter().copied())
        }
    }

    /// Closest following sibling matching `filter`.
    #[must_use]
    pub fn find_next_sibling(&self, id: NodeId, filter: &Filter) -> Option<NodeId> {
        filter.first(self, self.next_siblings(id))
    }

    /// Following siblings matching `filter`, nearest first.
    #[must_use]
    pub fn find_next_siblings(&self, id: NodeId, filter: &Filter) -> Vec<NodeId> {
        filter.collect(self, self.next_siblings(id))
    }

    /// Closest preceding sibling matching `filter`.
    #[must_use]
    pub fn find_previous_sibling(&self, id: NodeId, filter: &Filter) -> Option<NodeId> {
        filter.first(self, self.previous_siblings(id))
    }

    /// Preceding siblings matching `filter`, nearest first.
    #[must_use]
    pub fn find_previous_siblings(&self, id: NodeId, filter: &Filter) -> Vec<NodeId> {
        filter.collect(self, self.previous_siblings(id))
    }

    /// Closest ancestor matching `filter`.
    #[must_use]
    pub fn find_parent(&self, id: NodeId, filter: &Filter) -> Option<NodeId> {
        filter.first(self, self.parents(id))
    }

    /// Ancestors matching `filter`, nearest first.
    #[must_use]
    pub fn find_parents(&self, id: NodeId, filter: &Filter) -> Vec<NodeId> {
        filter.collect(self, self.parents(id))
    }

    /// First descendant named `name`, in document order.
    #[must_use]
    pub fn find_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.find(id, &Filter::new().name(name))
    }

    /// First direct child named `name`.
    #[must_use]
    pub fn child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.find(id, &Filter::new().name(name).recursive(false))
    }

    /// Every direct child named `name`.
    #[must_use]
    pub fn children_named(&self, id: NodeId, name: &str) -> Vec<NodeId> {
        self.find_all(id, &Filter::new().name(name).recursive(false))
    }
}
