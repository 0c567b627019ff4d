//! Tree to text.
//!
//! Output format, per node kind:
//!
//! - element / script: `<name attrs>` then the children, each on its own
//!   line one level deeper, then `</name>` on its own line. Without
//!   children the closing tag follows immediately. Self-closing nodes stop
//!   after the opening tag.
//! - text: the value, escaped with the parent's encoder.
//! - CDATA: `<![CDATA[value]]>`, never escaped.
//!
//! An element's encoder escapes its own attributes and its text children.
//! Script nodes carry no encoder, so their content is emitted verbatim.

use std::fmt::Write as _;

use log::trace;
use pocdom_common::NodeEncoder;
use pocdom_common::warning::warn_once;
use pocdom_dom::{DomTree, NodeData, NodeId, NodeKind, Result};

/// Indentation unit, repeated once per nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// `n` spaces per level.
    Spaces(usize),
    /// One tab per level.
    Tabs,
}

impl Default for Indent {
    fn default() -> Self {
        Self::Spaces(1)
    }
}

/// Serializer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Indentation unit.
    pub indent: Indent,
    /// Separator placed before every rendered child.
    pub newline: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            indent: Indent::default(),
            newline: "\r\n".to_string(),
        }
    }
}

impl GenerateOptions {
    /// Use `indent` instead of the default.
    #[must_use]
    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Use `newline` instead of `\r\n`.
    #[must_use]
    pub fn with_newline(mut self, newline: &str) -> Self {
        self.newline = newline.to_string();
        self
    }

    fn indentation(&self, level: usize) -> String {
        match self.indent {
            Indent::Spaces(width) => " ".repeat(width * level),
            Indent::Tabs => "\t".repeat(level),
        }
    }
}

/// Render the subtree rooted at `id` with default options.
///
/// # Errors
///
/// Returns [`pocdom_dom::DomError::NodeNotFound`] if a node in the subtree
/// does not exist.
pub fn generate(tree: &DomTree, id: NodeId) -> Result<String> {
    generate_with(tree, id, &GenerateOptions::default(), 0)
}

/// Render the subtree rooted at `id`, starting `level` levels deep.
///
/// # Errors
///
/// Returns [`pocdom_dom::DomError::NodeNotFound`] if a node in the subtree
/// does not exist.
pub fn generate_indented(tree: &DomTree, id: NodeId, level: usize) -> Result<String> {
    generate_with(tree, id, &GenerateOptions::default(), level)
}

/// Render the subtree rooted at `id` with explicit options.
///
/// The root itself is rendered without an inherited encoder, so a text
/// root comes out raw.
///
/// # Errors
///
/// Returns [`pocdom_dom::DomError::NodeNotFound`] if a node in the subtree
/// does not exist.
pub fn generate_with(
    tree: &DomTree,
    id: NodeId,
    options: &GenerateOptions,
    level: usize,
) -> Result<String> {
    trace!(target: "pocdom::generate", "generate {id} at level {level}");
    Generator { tree, options }.node(id, level, None)
}

struct Generator<'a> {
    tree: &'a DomTree,
    options: &'a GenerateOptions,
}

impl Generator<'_> {
    fn node(&self, id: NodeId, level: usize, encoder: Option<&dyn NodeEncoder>) -> Result<String> {
        let data = self.tree.data(id)?;
        let indent = self.options.indentation(level);
        match data.kind() {
            NodeKind::CData => Ok(format!("{indent}<![CDATA[{}]]>", data.value)),
            NodeKind::Text => {
                let value = match encoder {
                    Some(encoder) if !data.value.is_empty() => encoder.encode_text(&data.value),
                    _ => data.value.clone(),
                };
                let children = self.children(id, level + 1, None)?;
                Ok(format!("{indent}{value}{children}"))
            }
            NodeKind::Element | NodeKind::Script => self.element(id, data, &indent, level),
        }
    }

    fn element(&self, id: NodeId, data: &NodeData, indent: &str, level: usize) -> Result<String> {
        let own = data.encoder.as_deref();
        let name = &data.name;
        let mut out = format!("{indent}<{name}");
        for (key, value) in &data.attrs {
            let (key, value) = match own {
                Some(encoder) => (encoder.encode_attr_name(key), encoder.encode_attr_value(value)),
                None => (key.clone(), value.clone()),
            };
            let _ = write!(out, " {key}=\"{value}\"");
        }
        out.push('>');

        if data.self_closing {
            if self.tree.child_count(id) > 0 {
                warn_once(
                    "Generate",
                    &format!("self-closing <{name}> has children; they were not rendered"),
                );
            }
            return Ok(out);
        }

        let children = self.children(id, level + 1, own)?;
        if children.is_empty() {
            let _ = write!(out, "</{name}>");
        } else {
            let _ = write!(out, "{children}{}{indent}</{name}>", self.options.newline);
        }
        Ok(out)
    }

    fn children(&self, id: NodeId, level: usize, encoder: Option<&dyn NodeEncoder>) -> Result<String> {
        let mut out = String::new();
        for &child in self.tree.children(id) {
            let text = self.node(child, level, encoder)?;
            if !text.is_empty() {
                out.push_str(&self.options.newline);
                out.push_str(&text);
            }
        }
        Ok(out)
    }
}
