//! Tests for node construction, kinds, attributes, equality and snapshots.

use pocdom_dom::{DomError, DomTree, NodeData, NodeKind};
use serde_json::json;

// ========== kinds ==========

#[test]
fn test_script_name_selects_script_kind() {
    let mut tree = DomTree::new();
    let lower = tree.element("script");
    let upper = tree.element("SCRIPT");
    let div = tree.element("div");

    assert_eq!(tree.data(lower).unwrap().kind(), NodeKind::Script);
    assert_eq!(tree.data(upper).unwrap().kind(), NodeKind::Script);
    assert_eq!(tree.data(div).unwrap().kind(), NodeKind::Element);
}

#[test]
fn test_script_has_no_encoder() {
    let mut tree = DomTree::new();
    let script = tree.element("script");
    let div = tree.element("div");
    let text = tree.text("hi");

    assert!(tree.data(script).unwrap().encoder.is_none());
    assert!(tree.data(div).unwrap().encoder.is_some());
    assert!(tree.data(text).unwrap().encoder.is_some());
}

#[test]
fn test_text_and_cdata_have_no_name() {
    let mut tree = DomTree::new();
    let text = tree.text("hello");
    let cdata = tree.cdata("raw");

    let text = tree.data(text).unwrap();
    assert_eq!(text.kind(), NodeKind::Text);
    assert!(text.name.is_empty());
    assert_eq!(text.text_content(), Some("hello"));

    let cdata = tree.data(cdata).unwrap();
    assert_eq!(cdata.kind(), NodeKind::CData);
    assert_eq!(cdata.text_content(), Some("raw"));
}

#[test]
fn test_element_exposes_no_text() {
    let data = NodeData::element("p");
    assert_eq!(data.text_content(), None);
}

#[test]
fn test_kind_tags() {
    assert_eq!(NodeKind::from_tag("html_text").unwrap(), NodeKind::Text);
    assert_eq!(NodeKind::from_tag("CDATA").unwrap(), NodeKind::CData);
    assert_eq!(NodeKind::Element.to_string(), "html");
    assert_eq!(NodeKind::Script.to_string(), "script");
    assert!(matches!(
        NodeKind::from_tag("comment"),
        Err(DomError::TypeConstraint(_))
    ));
}

#[test]
fn test_new_nodes_are_detached() {
    let mut tree = DomTree::new();
    let node = tree.alloc(NodeData::element("br").self_closing());

    assert!(tree.is_detached(node));
    assert!(tree.data(node).unwrap().self_closing);
    assert_eq!(tree.len(), 1);
}

#[test]
fn test_kind_survives_payload_edits() {
    let mut tree = DomTree::new();
    let div = tree.element("div");
    let text = tree.text("hi");

    let data = tree.data_mut(div).unwrap();
    data.name = "script".to_string();
    let _ = data.attrs.insert("type".to_string(), "text/javascript".to_string());
    assert_eq!(tree.data(div).unwrap().kind(), NodeKind::Element);

    tree.data_mut(text).unwrap().value = "<b>".to_string();
    assert_eq!(tree.data(text).unwrap().kind(), NodeKind::Text);
}

// ========== attributes ==========

#[test]
fn test_attr_lookup() {
    let mut tree = DomTree::new();
    let input = tree.element_with("input", [("type", "text"), ("name", "user")]);

    assert_eq!(tree.attr(input, "type").unwrap(), "text");
    assert_eq!(tree.get_attr(input, "name"), Some("user"));
    assert!(tree.has_attr(input, "name"));
    assert_eq!(
        tree.attr(input, "value"),
        Err(DomError::AttributeNotFound("value".to_string()))
    );
    assert_eq!(tree.get_attr(input, "value"), None);
}

#[test]
fn test_set_attr_keeps_insertion_order() {
    let mut tree = DomTree::new();
    let form = tree.element_with("form", [("action", "/a"), ("method", "GET")]);

    tree.set_attr(form, "action", "/b").unwrap();
    tree.set_attr(form, "enctype", "text/plain").unwrap();

    let keys: Vec<&str> = tree
        .data(form)
        .unwrap()
        .attrs
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, ["action", "method", "enctype"]);
    assert_eq!(tree.attr(form, "action").unwrap(), "/b");
}

#[test]
fn test_remove_attr() {
    let mut tree = DomTree::new();
    let a = tree.element_with("a", [("href", "#"), ("target", "_blank")]);

    assert_eq!(tree.remove_attr(a, "href").unwrap(), Some("#".to_string()));
    assert_eq!(tree.remove_attr(a, "href").unwrap(), None);
    assert!(!tree.has_attr(a, "href"));
}

#[test]
fn test_id_and_classes() {
    let data = NodeData::element("div").with_attrs([("id", "main"), ("class", "a  b\tc")]);
    assert_eq!(data.id(), Some("main"));
    assert_eq!(data.classes().collect::<Vec<_>>(), ["a", "b", "c"]);
}

// ========== equality ==========

#[test]
fn test_is_equal_ignores_links_and_attribute_order() {
    let mut tree = DomTree::new();
    let a = tree.element_with("input", [("type", "text"), ("name", "q")]);
    let b = tree.element_with("input", [("name", "q"), ("type", "text")]);
    let parent = tree.element("form");
    tree.append(parent, a).unwrap();

    assert!(tree.is_equal(a, b).unwrap());
    tree.set_attr(b, "type", "email").unwrap();
    assert!(!tree.is_equal(a, b).unwrap());
}

#[test]
fn test_is_equal_compares_text_values() {
    let mut tree = DomTree::new();
    let a = tree.text("one");
    let b = tree.text("two");
    assert!(!tree.is_equal(a, b).unwrap());
}

#[test]
fn test_subtree_eq_compares_children() {
    let mut tree = DomTree::new();
    let left = tree.element("label");
    let right = tree.element("label");
    let left_text = tree.text("Email");
    let right_text = tree.text("Email");
    tree.append(left, left_text).unwrap();

    assert!(tree.is_equal(left, right).unwrap());
    assert!(!tree.subtree_eq(left, right).unwrap());

    tree.append(right, right_text).unwrap();
    assert!(tree.subtree_eq(left, right).unwrap());
}

// ========== snapshot / summary ==========

#[test]
fn test_snapshot_json() {
    let mut tree = DomTree::new();
    let label = tree.element_with("label", [("for", "mail")]);
    let text = tree.text("Email");
    let br = tree.alloc(NodeData::element("br").self_closing());
    tree.append_all(label, [text, br]).unwrap();

    let snapshot = serde_json::to_value(tree.snapshot(label).unwrap()).unwrap();
    assert_eq!(
        snapshot,
        json!({
            "kind": "html",
            "name": "label",
            "attrs": { "for": "mail" },
            "children": [
                { "kind": "html_text", "value": "Email" },
                { "kind": "html", "name": "br", "self_closing": true }
            ]
        })
    );
}

#[test]
fn test_summary_forms() {
    let mut tree = DomTree::new();
    let label = tree.element("label");
    let first = tree.text("E");
    let second = tree.text("mail");
    tree.append_all(label, [first, second]).unwrap();
    let empty = tree.element("div");
    let script = tree.element("script");
    let cdata = tree.cdata("x < y");

    assert_eq!(tree.summary(label).unwrap(), "html:label:Email");
    assert_eq!(tree.summary(empty).unwrap(), "html:div:None");
    assert_eq!(tree.summary(script).unwrap(), "script:None");
    assert_eq!(tree.summary(first).unwrap(), "html_text:E");
    assert_eq!(tree.summary(cdata).unwrap(), "cdata:x < y");
}
