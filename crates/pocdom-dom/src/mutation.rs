//! Structural edit operations.
//!
//! These are the only functions that write parent, child and sibling links.
//! Each one validates its preconditions before touching the tree, so a failed
//! edit leaves the tree unchanged.

use log::trace;
use pocdom_common::warning::warn_once;

use crate::{DomError, DomTree, NodeId, Result};

impl DomTree {
    /// Insert `child` into `parent`'s children at `position`.
    ///
    /// If `child` is already attached it is extracted first. When it is
    /// already a child of `parent` at an index before `position`, the
    /// position is shifted down by one to account for its removal. A
    /// position past the end of the children list is clamped (with a
    /// warning) and the child is appended.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::InvalidOperation`] if `child` is `parent` or one of
    /// its ancestors, and [`DomError::NodeNotFound`] if either node does not
    /// exist.
    pub fn insert(&mut self, parent: NodeId, child: NodeId, position: usize) -> Result<()> {
        let _ = self.node(parent)?;
        let _ = self.node(child)?;
        if child == parent {
            return Err(DomError::invalid("cannot insert a node into itself"));
        }
        if self.is_descendant_of(parent, child) {
            return Err(DomError::invalid("cannot insert a node into its own descendant"));
        }

        let mut position = position;
        if let Some(old_parent) = self.parent(child) {
            if old_parent == parent && self.index(parent, child)? < position {
                position -= 1;
            }
            let _ = self.extract(child)?;
        }

        let count = self.child_count(parent);
        if position > count {
            warn_once("Mutation", "insert position past the end of the children list was clamped");
            position = count;
        }

        let siblings = self.children(parent);
        let prev = position.checked_sub(1).map(|i| siblings[i]);
        let next = siblings.get(position).copied();

        self.node_mut(parent)?.children.insert(position, child);
        {
            let node = self.node_mut(child)?;
            node.parent = Some(parent);
            node.prev_sibling = prev;
            node.next_sibling = next;
        }
        if let Some(prev) = prev {
            self.node_mut(prev)?.next_sibling = Some(child);
        }
        if let Some(next) = next {
            self.node_mut(next)?.prev_sibling = Some(child);
        }

        trace!(target: "pocdom::mutation", "insert {child} into {parent} at {position}");
        Ok(())
    }

    /// Append `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// See [`DomTree::insert`].
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let _ = self.node(parent)?;
        let end = self.child_count(parent);
        self.insert(parent, child, end)
    }

    /// Append each of `children` to `parent`, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing [`DomTree::append`].
    pub fn append_all(
        &mut self,
        parent: NodeId,
        children: impl IntoIterator<Item = NodeId>,
    ) -> Result<()> {
        for child in children {
            self.append(parent, child)?;
        }
        Ok(())
    }

    /// Detach `id` (with its subtree) from its parent and return it.
    ///
    /// The former neighbours are linked to each other. Extracting a node
    /// that is already detached is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::InvalidOperation`] for a root that still has
    /// children, and [`DomError::NodeNotFound`] if the node does not exist.
    pub fn extract(&mut self, id: NodeId) -> Result<NodeId> {
        let node = self.node(id)?;
        let Some(parent) = node.parent else {
            if node.is_detached() {
                return Ok(id);
            }
            return Err(DomError::invalid(format!(
                "cannot extract root node {id}: it is not attached to a parent"
            )));
        };
        let (prev, next) = (node.prev_sibling, node.next_sibling);

        let index = self.index(parent, id)?;
        let _ = self.node_mut(parent)?.children.remove(index);
        if let Some(prev) = prev {
            self.node_mut(prev)?.next_sibling = next;
        }
        if let Some(next) = next {
            self.node_mut(next)?.prev_sibling = prev;
        }
        let node = self.node_mut(id)?;
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;

        trace!(target: "pocdom::mutation", "extract {id} from {parent}");
        Ok(id)
    }

    /// Put `replacement` where `id` was, hand it all of `id`'s children, and
    /// extract `id`. Returns `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::InvalidOperation`] if `id` has no parent, if
    /// `replacement` is `id` or `id`'s parent, or if `replacement` has
    /// siblings or children.
    pub fn replace_with(&mut self, id: NodeId, replacement: NodeId) -> Result<NodeId> {
        let _ = self.node(id)?;
        let candidate = self.node(replacement)?;
        if replacement == id {
            return Err(DomError::invalid("cannot replace a node with itself"));
        }
        let parent = self
            .parent(id)
            .ok_or_else(|| DomError::invalid("cannot replace a node that has no parent"))?;
        if replacement == parent {
            return Err(DomError::invalid("cannot replace a node with its parent"));
        }
        if candidate.prev_sibling.is_some()
            || candidate.next_sibling.is_some()
            || !candidate.children.is_empty()
        {
            return Err(DomError::invalid(
                "replacement must not have siblings or children",
            ));
        }

        let index = self.index(parent, id)?;
        self.insert(parent, replacement, index)?;
        let children = self.children(id).to_vec();
        self.append_all(replacement, children)?;
        self.extract(id)
    }

    /// Move `id`'s children into its place, in order, and extract `id`.
    /// Returns the now childless `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::InvalidOperation`] if `id` has no parent.
    pub fn unwrap(&mut self, id: NodeId) -> Result<NodeId> {
        let _ = self.node(id)?;
        let parent = self
            .parent(id)
            .ok_or_else(|| DomError::invalid("cannot unwrap a node that has no parent"))?;
        let index = self.index(parent, id)?;
        let children = self.children(id).to_vec();
        for (offset, child) in children.into_iter().enumerate() {
            self.insert(parent, child, index + offset)?;
        }
        self.extract(id)
    }

    /// Put `wrapper` where `id` was and make `id` its first child.
    /// Returns `wrapper`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::InvalidOperation`] if `id` has no parent or if
    /// `wrapper` is `id` or one of its ancestors.
    pub fn wrap_with(&mut self, id: NodeId, wrapper: NodeId) -> Result<NodeId> {
        let _ = self.node(id)?;
        let _ = self.node(wrapper)?;
        if wrapper == id {
            return Err(DomError::invalid("cannot wrap a node with itself"));
        }
        let parent = self
            .parent(id)
            .ok_or_else(|| DomError::invalid("cannot wrap a node that has no parent"))?;
        if self.is_descendant_of(id, wrapper) {
            return Err(DomError::invalid("cannot wrap a node with its own ancestor"));
        }

        let index = self.index(parent, id)?;
        let _ = self.extract(id)?;
        self.insert(parent, wrapper, index)?;
        self.insert(wrapper, id, 0)?;
        Ok(wrapper)
    }

    /// Make `sibling` the immediate predecessor of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::InvalidOperation`] if `id` has no parent or
    /// `sibling` is `id`.
    pub fn insert_before(&mut self, id: NodeId, sibling: NodeId) -> Result<()> {
        let (parent, index) = self.sibling_slot(id, sibling)?;
        self.insert(parent, sibling, index)
    }

    /// Make `sibling` the immediate successor of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::InvalidOperation`] if `id` has no parent or
    /// `sibling` is `id`.
    pub fn insert_after(&mut self, id: NodeId, sibling: NodeId) -> Result<()> {
        let (parent, index) = self.sibling_slot(id, sibling)?;
        self.insert(parent, sibling, index + 1)
    }

    fn sibling_slot(&self, id: NodeId, sibling: NodeId) -> Result<(NodeId, usize)> {
        let _ = self.node(id)?;
        let _ = self.node(sibling)?;
        if sibling == id {
            return Err(DomError::invalid("cannot place a node next to itself"));
        }
        let parent = self.parent(id).ok_or_else(|| {
            DomError::invalid("cannot insert a sibling next to a node that has no parent")
        })?;
        Ok((parent, self.index(parent, id)?))
    }

    /// Position of `child` among `parent`'s direct children, by identity.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NotAChild`] if `child` is not a direct child and
    /// [`DomError::NodeNotFound`] if `parent` does not exist.
    pub fn index(&self, parent: NodeId, child: NodeId) -> Result<usize> {
        self.node(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(DomError::NotAChild { parent, child })
    }

    /// Extract `id` and destroy its whole subtree.
    ///
    /// Every destroyed id is tombstoned; later operations naming it fail with
    /// [`DomError::NodeNotFound`].
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn decompose(&mut self, id: NodeId) -> Result<()> {
        if self.node(id)?.parent.is_some() {
            let _ = self.extract(id)?;
        }
        let mut doomed = vec![id];
        while let Some(next) = doomed.pop() {
            if let Some(node) = self.nodes.get_mut(next.0).and_then(Option::take) {
                doomed.extend(node.children);
            }
        }
        trace!(target: "pocdom::mutation", "decompose {id}");
        Ok(())
    }

    /// Remove every child of `id`, destroying them when `decompose` is set.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn clear_children(&mut self, id: NodeId, decompose: bool) -> Result<()> {
        for child in self.node(id)?.children.clone() {
            if decompose {
                self.decompose(child)?;
            } else {
                let _ = self.extract(child)?;
            }
        }
        Ok(())
    }

    /// Allocate a detached copy of the subtree rooted at `id`.
    ///
    /// The copy shares encoders with the source subtree but no links.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::NodeNotFound`] if the node does not exist.
    pub fn deep_copy(&mut self, id: NodeId) -> Result<NodeId> {
        let data = self.data(id)?.clone();
        let copy = self.alloc(data);
        for child in self.children(id).to_vec() {
            let child_copy = self.deep_copy(child)?;
            self.append(copy, child_copy)?;
        }
        Ok(copy)
    }
}
