//! Factories for the HTML elements proof-of-concept pages are built from.
//!
//! Every factory allocates a detached, fully configured node. Attributes
//! passed by the caller take precedence over the factory's defaults; the
//! caller's attributes come first in the output, followed by any defaults
//! they did not override.

use pocdom_dom::{AttributesMap, DomTree, NodeData, NodeId, Result};
use strum_macros::{AsRefStr, Display, EnumString};

/// Caller-supplied attributes, in output order.
pub type Attrs<'a> = &'a [(&'a str, &'a str)];

/// `type` values for [`input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum InputType {
    /// Single-line text.
    #[default]
    Text,
    /// Masked text.
    Password,
    /// File upload.
    File,
    /// Not rendered; carries a value such as a CSRF token.
    Hidden,
    /// Submit button.
    Submit,
    /// E-mail address.
    Email,
}

/// `type` values for [`script`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr)]
pub enum ScriptType {
    /// `text/javascript`
    #[default]
    #[strum(serialize = "text/javascript")]
    JavaScript,
    /// `text/vbscript`
    #[strum(serialize = "text/vbscript")]
    VbScript,
}

/// Text used by [`heading`] when none is given.
pub const EMPTY_HEADING: &str = "empty_heading_value";

/// Caller attributes first, then every default the caller left out.
fn merged(attrs: Attrs<'_>, defaults: Attrs<'_>) -> AttributesMap {
    let mut map: AttributesMap = attrs
        .iter()
        .map(|&(key, value)| (key.to_string(), value.to_string()))
        .collect();
    for &(key, value) in defaults {
        let _ = map
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }
    map
}

fn configured(mut data: NodeData, attrs: Attrs<'_>, defaults: Attrs<'_>) -> NodeData {
    data.attrs = merged(attrs, defaults);
    data
}

fn tag(tree: &mut DomTree, name: &str, attrs: Attrs<'_>, defaults: Attrs<'_>) -> NodeId {
    tree.alloc(configured(NodeData::element(name), attrs, defaults))
}

/// Append a text child holding `text`, unless it is empty.
fn with_text(tree: &mut DomTree, id: NodeId, text: &str) -> Result<NodeId> {
    if !text.is_empty() {
        let child = tree.text(text);
        tree.append(id, child)?;
    }
    Ok(id)
}

/// A text node.
pub fn text(tree: &mut DomTree, value: &str) -> NodeId {
    tree.text(value)
}

/// `<html>`
pub fn html(tree: &mut DomTree) -> NodeId {
    tree.element("html")
}

/// `<head>`, with an optional text child.
///
/// # Errors
///
/// Propagates tree errors from attaching the text child.
pub fn head(tree: &mut DomTree, text: &str) -> Result<NodeId> {
    let id = tree.element("head");
    with_text(tree, id, text)
}

/// `<body>`
pub fn body(tree: &mut DomTree) -> NodeId {
    tree.element("body")
}

/// `<title>`
///
/// # Errors
///
/// Propagates tree errors from attaching the text child.
pub fn title(tree: &mut DomTree, text: &str) -> Result<NodeId> {
    let id = tree.element("title");
    with_text(tree, id, text)
}

/// Self-closing `<meta name content>`.
pub fn meta(tree: &mut DomTree, name: &str, content: &str, attrs: Attrs<'_>) -> NodeId {
    let data = NodeData::element("meta").self_closing();
    tree.alloc(configured(data, attrs, &[("name", name), ("content", content)]))
}

/// `<form action method>`
pub fn form(tree: &mut DomTree, action: &str, method: &str, attrs: Attrs<'_>) -> NodeId {
    tag(tree, "form", attrs, &[("action", action), ("method", method)])
}

/// `<input name type value>`
pub fn input(
    tree: &mut DomTree,
    name: &str,
    kind: InputType,
    value: &str,
    attrs: Attrs<'_>,
) -> NodeId {
    tag(
        tree,
        "input",
        attrs,
        &[("name", name), ("type", kind.as_ref()), ("value", value)],
    )
}

/// `<label>` around `text`.
///
/// # Errors
///
/// Propagates tree errors from attaching the text child.
pub fn label(tree: &mut DomTree, text: &str, attrs: Attrs<'_>) -> Result<NodeId> {
    let id = tag(tree, "label", attrs, &[]);
    with_text(tree, id, text)
}

/// `<iframe src width height>`, 500 by 500 unless overridden.
pub fn iframe(tree: &mut DomTree, src: &str, attrs: Attrs<'_>) -> NodeId {
    tag(
        tree,
        "iframe",
        attrs,
        &[("src", src), ("width", "500"), ("height", "500")],
    )
}

/// `<a href>` around `text`.
///
/// # Errors
///
/// Propagates tree errors from attaching the text child.
pub fn anchor(tree: &mut DomTree, href: &str, text: &str, attrs: Attrs<'_>) -> Result<NodeId> {
    let id = tag(tree, "a", attrs, &[("href", href)]);
    with_text(tree, id, text)
}

/// Self-closing `<img src width height>`, 20 by 20 unless overridden.
pub fn img(tree: &mut DomTree, src: &str, attrs: Attrs<'_>) -> NodeId {
    let data = NodeData::element("img").self_closing();
    tree.alloc(configured(
        data,
        attrs,
        &[("src", src), ("width", "20"), ("height", "20")],
    ))
}

/// `<button onclick>` around `text`.
///
/// # Errors
///
/// Propagates tree errors from attaching the text child.
pub fn button(tree: &mut DomTree, text: &str, onclick: &str, attrs: Attrs<'_>) -> Result<NodeId> {
    let id = tag(tree, "button", attrs, &[("onclick", onclick)]);
    with_text(tree, id, text)
}

/// `<font style="color:...">` around `text`.
///
/// # Errors
///
/// Propagates tree errors from attaching the text child.
pub fn font(tree: &mut DomTree, text: &str, color: &str, attrs: Attrs<'_>) -> Result<NodeId> {
    let style = format!("color:{color}");
    let id = tag(tree, "font", attrs, &[("style", style.as_str())]);
    with_text(tree, id, text)
}

/// `<h1>` to `<h6>`. Levels outside that range fall back to `<h3>`, and an
/// empty `text` is replaced by [`EMPTY_HEADING`].
///
/// # Errors
///
/// Propagates tree errors from attaching the text child.
pub fn heading(tree: &mut DomTree, level: u8, text: &str) -> Result<NodeId> {
    let level = if (1..=6).contains(&level) { level } else { 3 };
    let id = tree.element(&format!("h{level}"));
    let text = if text.is_empty() { EMPTY_HEADING } else { text };
    with_text(tree, id, text)
}

/// Self-closing `<br>`.
pub fn br(tree: &mut DomTree) -> NodeId {
    tree.alloc(NodeData::element("br").self_closing())
}

/// `<script type>`. Script nodes carry no encoder, so their text children
/// are emitted exactly as given.
pub fn script(tree: &mut DomTree, kind: ScriptType) -> NodeId {
    let kind: &str = kind.as_ref();
    tree.element_with("script", [("type", kind)])
}

/// `<div>`
pub fn div(tree: &mut DomTree, attrs: Attrs<'_>) -> NodeId {
    tag(tree, "div", attrs, &[])
}
