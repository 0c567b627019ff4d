//! Read-only views of a subtree for debugging and assertions.

use serde::Serialize;

use crate::{AttributesMap, DomTree, NodeId, NodeKind, Result};

/// Owned, serializable copy of a subtree without its links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    /// The node's kind.
    pub kind: NodeKind,
    /// Tag name; omitted when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Attributes in insertion order; omitted when empty.
    #[serde(skip_serializing_if = "AttributesMap::is_empty")]
    pub attrs: AttributesMap,
    /// Text payload; omitted when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,
    /// Omitted unless set.
    #[serde(skip_serializing_if = "is_false")]
    pub self_closing: bool,
    /// Child snapshots in document order; omitted when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(flag: &bool) -> bool {
    !*flag
}

impl DomTree {
    /// Capture the subtree rooted at `id`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DomError::NodeNotFound`] if the node does not exist.
    pub fn snapshot(&self, id: NodeId) -> Result<NodeSnapshot> {
        let data = self.data(id)?;
        let children = self
            .children(id)
            .iter()
            .map(|&child| self.snapshot(child))
            .collect::<Result<Vec<_>>>()?;
        Ok(NodeSnapshot {
            kind: data.kind(),
            name: data.name.clone(),
            attrs: data.attrs.clone(),
            value: data.value.clone(),
            self_closing: data.self_closing,
            children,
        })
    }

    /// One-line description of a node: `kind:payload`.
    ///
    /// Text and CDATA nodes show their value, scripts show `None`, and
    /// elements show their name followed by the concatenated values of their
    /// direct text children (or `None` when they have none).
    ///
    /// ```
    /// use pocdom_dom::DomTree;
    ///
    /// let mut tree = DomTree::new();
    /// let title = tree.element("title");
    /// let text = tree.text("Login");
    /// tree.append(title, text)?;
    /// assert_eq!(tree.summary(title)?, "html:title:Login");
    /// assert_eq!(tree.summary(text)?, "html_text:Login");
    /// # Ok::<(), pocdom_dom::DomError>(())
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`crate::DomError::NodeNotFound`] if the node does not exist.
    pub fn summary(&self, id: NodeId) -> Result<String> {
        let data = self.data(id)?;
        let payload = match data.kind() {
            NodeKind::Text | NodeKind::CData => data.value.clone(),
            NodeKind::Script => "None".to_string(),
            NodeKind::Element => {
                let texts: Vec<&str> = self
                    .children(id)
                    .iter()
                    .filter_map(|&child| self.get(child))
                    .filter(|child| child.data().kind() == NodeKind::Text)
                    .map(|child| child.data().value.as_str())
                    .collect();
                let text = if texts.is_empty() { "None".to_string() } else { texts.concat() };
                format!("{}:{text}", data.name)
            }
        };
        Ok(format!("{}:{payload}", data.kind()))
    }
}
