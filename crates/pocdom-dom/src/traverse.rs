//! Lazy traversals over the tree.
//!
//! Each iterator borrows the tree and follows the live links one step per
//! `next()`, so a fresh call always reflects the current shape. The borrow
//! also means the tree cannot be edited mid-iteration; collect the ids into a
//! `Vec` first when the walk drives edits.

use crate::{DomTree, NodeId};

impl DomTree {
    /// Iterate over following siblings (from immediately after to last child).
    #[must_use]
    pub fn next_siblings(&self, id: NodeId) -> FollowingSiblingIterator<'_> {
        FollowingSiblingIterator {
            tree: self,
            current: self.next_sibling(id),
        }
    }

    /// Iterate over preceding siblings (from immediately before to first child).
    #[must_use]
    pub fn previous_siblings(&self, id: NodeId) -> PrecedingSiblingIterator<'_> {
        PrecedingSiblingIterator {
            tree: self,
            current: self.prev_sibling(id),
        }
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn parents(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate over the subtree below `id` in document order, excluding `id`.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.first_child(id),
        }
    }
}

/// Iterator over ancestors of a node.
#[derive(Debug, Clone)]
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over preceding siblings of a node.
#[derive(Debug, Clone)]
pub struct PrecedingSiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for PrecedingSiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.prev_sibling(id);
        Some(id)
    }
}

/// Iterator over following siblings of a node.
#[derive(Debug, Clone)]
pub struct FollowingSiblingIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for FollowingSiblingIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.next_sibling(id);
        Some(id)
    }
}

/// Pre-order depth-first iterator over a subtree.
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: Option<NodeId>,
}

impl Descendants<'_> {
    /// The node after `id` in document order, staying inside `root`.
    fn successor(&self, id: NodeId) -> Option<NodeId> {
        if let Some(child) = self.tree.first_child(id) {
            return Some(child);
        }
        let mut current = id;
        loop {
            if current == self.root {
                return None;
            }
            if let Some(sibling) = self.tree.next_sibling(current) {
                return Some(sibling);
            }
            current = self.tree.parent(current)?;
        }
    }
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.successor(id);
        Some(id)
    }
}
