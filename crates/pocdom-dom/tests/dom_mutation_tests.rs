//! Tests for tree mutation methods: insert, extract, replace_with, unwrap,
//! wrap_with, insert_before/after, index, decompose.

use pocdom_common::warning::has_warned;
use pocdom_dom::{DomError, DomTree, NodeId};

/// Helper to create a parent element holding one element child per tag.
fn parent_with(tree: &mut DomTree, tags: &[&str]) -> (NodeId, Vec<NodeId>) {
    let parent = tree.element("div");
    let children: Vec<NodeId> = tags.iter().map(|tag| tree.element(tag)).collect();
    tree.append_all(parent, children.iter().copied()).unwrap();
    (parent, children)
}

/// Every child points back at `parent` and sibling links match neighbours.
fn assert_links(tree: &DomTree, parent: NodeId) {
    let children = tree.children(parent);
    for (i, &child) in children.iter().enumerate() {
        assert_eq!(tree.parent(child), Some(parent));
        assert_eq!(tree.index(parent, child).unwrap(), i);
        let prev = i.checked_sub(1).map(|j| children[j]);
        assert_eq!(tree.prev_sibling(child), prev);
        assert_eq!(tree.next_sibling(child), children.get(i + 1).copied());
    }
}

fn is_invalid<T>(result: &Result<T, DomError>) -> bool {
    matches!(result, Err(DomError::InvalidOperation(_)))
}

// ========== insert ==========

#[test]
fn test_append_links_siblings() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a", "b", "c"]);

    assert_eq!(tree.children(parent), kids.as_slice());
    assert_eq!(tree.prev_sibling(kids[0]), None);
    assert_eq!(tree.next_sibling(kids[2]), None);
    assert_links(&tree, parent);
}

#[test]
fn test_insert_in_middle() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a", "c"]);
    let b = tree.element("b");

    tree.insert(parent, b, 1).unwrap();

    assert_eq!(tree.children(parent), &[kids[0], b, kids[1]]);
    assert_eq!(tree.next_sibling(kids[0]), Some(b));
    assert_eq!(tree.prev_sibling(kids[1]), Some(b));
    assert_links(&tree, parent);
}

#[test]
fn test_insert_at_front() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["b"]);
    let a = tree.element("a");

    tree.insert(parent, a, 0).unwrap();

    assert_eq!(tree.first_child(parent), Some(a));
    assert_eq!(tree.last_child(parent), Some(kids[0]));
    assert_links(&tree, parent);
}

#[test]
fn test_insert_past_end_is_clamped() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a"]);
    let b = tree.element("b");

    tree.insert(parent, b, 42).unwrap();

    assert_eq!(tree.children(parent), &[kids[0], b]);
    assert!(has_warned(
        "Mutation",
        "insert position past the end of the children list was clamped"
    ));
    assert_links(&tree, parent);
}

#[test]
fn test_insert_self_fails() {
    let mut tree = DomTree::new();
    let div = tree.element("div");
    assert!(is_invalid(&tree.insert(div, div, 0)));
    assert!(tree.is_detached(div));
}

#[test]
fn test_insert_ancestor_fails_and_leaves_tree_unchanged() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a", "b"]);

    assert!(is_invalid(&tree.append(kids[0], parent)));
    assert_eq!(tree.children(parent), kids.as_slice());
    assert_eq!(tree.parent(parent), None);
    assert_links(&tree, parent);
}

#[test]
fn test_insert_moves_forward_within_same_parent() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a", "b", "c"]);

    // a sits before position 2, so it lands just before c
    tree.insert(parent, kids[0], 2).unwrap();

    assert_eq!(tree.children(parent), &[kids[1], kids[0], kids[2]]);
    assert_links(&tree, parent);
}

#[test]
fn test_insert_moves_backward_within_same_parent() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a", "b", "c"]);

    tree.insert(parent, kids[2], 0).unwrap();

    assert_eq!(tree.children(parent), &[kids[2], kids[0], kids[1]]);
    assert_links(&tree, parent);
}

#[test]
fn test_append_existing_child_moves_it_last() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a", "b", "c"]);

    tree.append(parent, kids[0]).unwrap();

    assert_eq!(tree.children(parent), &[kids[1], kids[2], kids[0]]);
    assert_links(&tree, parent);
}

#[test]
fn test_insert_reparents_from_other_parent() {
    let mut tree = DomTree::new();
    let (first, first_kids) = parent_with(&mut tree, &["a", "b"]);
    let (second, second_kids) = parent_with(&mut tree, &["x"]);

    tree.append(second, first_kids[0]).unwrap();

    assert_eq!(tree.children(first), &[first_kids[1]]);
    assert_eq!(tree.children(second), &[second_kids[0], first_kids[0]]);
    assert_links(&tree, first);
    assert_links(&tree, second);
}

// ========== extract ==========

#[test]
fn test_extract_middle_relinks_neighbours() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a", "b", "c"]);

    let extracted = tree.extract(kids[1]).unwrap();

    assert_eq!(extracted, kids[1]);
    assert_eq!(tree.children(parent), &[kids[0], kids[2]]);
    assert_eq!(tree.next_sibling(kids[0]), Some(kids[2]));
    assert_eq!(tree.prev_sibling(kids[2]), Some(kids[0]));
    assert!(tree.is_detached(kids[1]));
    assert_links(&tree, parent);
}

#[test]
fn test_extract_keeps_subtree() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["form"]);
    let input = tree.element("input");
    tree.append(kids[0], input).unwrap();

    let _ = tree.extract(kids[0]).unwrap();

    assert_eq!(tree.child_count(parent), 0);
    assert_eq!(tree.parent(kids[0]), None);
    assert_eq!(tree.children(kids[0]), &[input]);
}

#[test]
fn test_extract_detached_is_noop() {
    let mut tree = DomTree::new();
    let p = tree.element("p");

    assert_eq!(tree.extract(p).unwrap(), p);
    assert_eq!(tree.extract(p).unwrap(), p);
    assert!(tree.is_detached(p));
}

#[test]
fn test_extract_root_with_children_fails() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a"]);

    assert!(is_invalid(&tree.extract(parent)));
    assert_eq!(tree.children(parent), kids.as_slice());
}

// ========== replace_with ==========

#[test]
fn test_replace_with_transfers_children() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a", "b", "c"]);
    let x = tree.element("x");
    let y = tree.element("y");
    tree.append_all(kids[1], [x, y]).unwrap();
    let replacement = tree.element("section");

    let old = tree.replace_with(kids[1], replacement).unwrap();

    assert_eq!(old, kids[1]);
    assert_eq!(tree.children(parent), &[kids[0], replacement, kids[2]]);
    assert_eq!(tree.children(replacement), &[x, y]);
    assert!(tree.is_detached(kids[1]));
    assert_links(&tree, parent);
    assert_links(&tree, replacement);
}

#[test]
fn test_replace_with_preconditions() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a", "b"]);
    let orphan = tree.element("orphan");
    let fresh = tree.element("fresh");
    let (busy, _) = parent_with(&mut tree, &["inner"]);

    assert!(is_invalid(&tree.replace_with(kids[0], kids[0])));
    assert!(is_invalid(&tree.replace_with(kids[0], parent)));
    assert!(is_invalid(&tree.replace_with(kids[0], kids[1])));
    assert!(is_invalid(&tree.replace_with(kids[0], busy)));
    assert!(is_invalid(&tree.replace_with(orphan, fresh)));

    assert_eq!(tree.children(parent), kids.as_slice());
    assert!(tree.is_detached(fresh));
}

// ========== unwrap ==========

#[test]
fn test_unwrap_promotes_children_in_order() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a", "b", "c"]);
    let x = tree.element("x");
    let y = tree.element("y");
    tree.append_all(kids[1], [x, y]).unwrap();

    let unwrapped = tree.unwrap(kids[1]).unwrap();

    assert_eq!(unwrapped, kids[1]);
    assert_eq!(tree.children(parent), &[kids[0], x, y, kids[2]]);
    assert!(tree.is_detached(kids[1]));
    assert_links(&tree, parent);
}

#[test]
fn test_unwrap_without_parent_fails() {
    let mut tree = DomTree::new();
    let (parent, _) = parent_with(&mut tree, &["a"]);
    assert!(is_invalid(&tree.unwrap(parent)));
}

// ========== wrap_with ==========

#[test]
fn test_wrap_with_takes_position() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a", "b", "c"]);
    let wrapper = tree.element("label");

    let returned = tree.wrap_with(kids[1], wrapper).unwrap();

    assert_eq!(returned, wrapper);
    assert_eq!(tree.children(parent), &[kids[0], wrapper, kids[2]]);
    assert_eq!(tree.children(wrapper), &[kids[1]]);
    assert_links(&tree, parent);
}

#[test]
fn test_wrap_with_non_empty_wrapper_puts_node_first() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["input"]);
    let wrapper = tree.element("label");
    let caption = tree.text("Email");
    tree.append(wrapper, caption).unwrap();

    let _ = tree.wrap_with(kids[0], wrapper).unwrap();

    assert_eq!(tree.children(parent), &[wrapper]);
    assert_eq!(tree.children(wrapper), &[kids[0], caption]);
    assert_links(&tree, wrapper);
}

#[test]
fn test_wrap_with_preconditions() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a"]);
    let orphan = tree.element("orphan");
    let wrapper = tree.element("wrapper");

    assert!(is_invalid(&tree.wrap_with(kids[0], kids[0])));
    assert!(is_invalid(&tree.wrap_with(kids[0], parent)));
    assert!(is_invalid(&tree.wrap_with(orphan, wrapper)));
    assert_eq!(tree.children(parent), kids.as_slice());
}

// ========== insert_before / insert_after ==========

#[test]
fn test_insert_before_and_after() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["b"]);
    let a = tree.element("a");
    let c = tree.element("c");

    tree.insert_before(kids[0], a).unwrap();
    tree.insert_after(kids[0], c).unwrap();

    assert_eq!(tree.children(parent), &[a, kids[0], c]);
    assert_links(&tree, parent);
}

#[test]
fn test_insert_after_moves_existing_sibling() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a", "b", "c"]);

    tree.insert_after(kids[1], kids[0]).unwrap();
    assert_eq!(tree.children(parent), &[kids[1], kids[0], kids[2]]);

    tree.insert_before(kids[1], kids[2]).unwrap();
    assert_eq!(tree.children(parent), &[kids[2], kids[1], kids[0]]);
    assert_links(&tree, parent);
}

#[test]
fn test_insert_sibling_preconditions() {
    let mut tree = DomTree::new();
    let (_, kids) = parent_with(&mut tree, &["a"]);
    let orphan = tree.element("orphan");
    let other = tree.element("other");

    assert!(is_invalid(&tree.insert_before(kids[0], kids[0])));
    assert!(is_invalid(&tree.insert_after(orphan, other)));
    assert!(tree.is_detached(other));
}

// ========== index ==========

#[test]
fn test_index_by_identity() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["p", "p", "p"]);
    assert_eq!(tree.index(parent, kids[2]).unwrap(), 2);
}

#[test]
fn test_index_of_grandchild_is_not_found() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["form"]);
    let input = tree.element("input");
    tree.append(kids[0], input).unwrap();

    let err = tree.index(parent, input).unwrap_err();
    assert_eq!(
        err,
        DomError::NotAChild {
            parent,
            child: input
        }
    );
    assert!(err.is_not_found());
}

// ========== decompose / clear_children ==========

#[test]
fn test_decompose_invalidates_subtree() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a", "b", "c"]);
    let x = tree.element("x");
    tree.append(kids[1], x).unwrap();
    let before = tree.len();

    tree.decompose(kids[1]).unwrap();

    assert_eq!(tree.len(), before - 2);
    assert_eq!(tree.children(parent), &[kids[0], kids[2]]);
    assert_links(&tree, parent);
    assert_eq!(tree.extract(x), Err(DomError::NodeNotFound(x)));
    assert_eq!(tree.append(parent, kids[1]), Err(DomError::NodeNotFound(kids[1])));
}

#[test]
fn test_clear_children_extracts_or_decomposes() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["a", "b"]);

    tree.clear_children(parent, false).unwrap();
    assert_eq!(tree.child_count(parent), 0);
    assert!(kids.iter().all(|&kid| tree.is_detached(kid)));

    tree.append_all(parent, kids.iter().copied()).unwrap();
    tree.clear_children(parent, true).unwrap();
    assert_eq!(tree.child_count(parent), 0);
    assert!(kids.iter().all(|&kid| !tree.contains(kid)));
}

// ========== deep_copy ==========

#[test]
fn test_deep_copy_is_detached_and_equal() {
    let mut tree = DomTree::new();
    let (parent, kids) = parent_with(&mut tree, &["form"]);
    let input = tree.element_with("input", [("name", "email")]);
    tree.append(kids[0], input).unwrap();

    let copy = tree.deep_copy(kids[0]).unwrap();

    assert_ne!(copy, kids[0]);
    assert_eq!(tree.parent(copy), None);
    assert!(tree.subtree_eq(copy, kids[0]).unwrap());
    assert_eq!(tree.child_count(parent), 1);

    let copied_input = tree.first_child(copy).unwrap();
    tree.set_attr(copied_input, "name", "phone").unwrap();
    assert_eq!(tree.attr(input, "name").unwrap(), "email");
    assert!(!tree.subtree_eq(copy, kids[0]).unwrap());
}
