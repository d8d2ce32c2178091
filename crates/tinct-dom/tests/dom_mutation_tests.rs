//! Tests for DOM tree mutation methods: remove_child, insert_before,
//! move_children, replace_with_children, split_text, normalize.

use tinct_dom::{DomError, DomTree, NodeId};

/// Helper to create an element node attached under `parent`.
fn append_element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
    let id = tree.create_element(tag);
    tree.append_child(parent, id);
    id
}

/// Helper to create a text node attached under `parent`.
fn append_text(tree: &mut DomTree, parent: NodeId, text: &str) -> NodeId {
    let id = tree.create_text(text);
    tree.append_child(parent, id);
    id
}

// ========== remove_child ==========

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let parent = append_element(&mut tree, NodeId::ROOT, "div");
    let a = append_element(&mut tree, parent, "a");
    let b = append_element(&mut tree, parent, "b");
    let c = append_element(&mut tree, parent, "c");

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
    assert_eq!(tree.parent(b), None);
    assert!(!tree.is_connected(b));
}

#[test]
fn test_remove_child_of_wrong_parent_is_noop() {
    let mut tree = DomTree::new();
    let p1 = append_element(&mut tree, NodeId::ROOT, "div");
    let p2 = append_element(&mut tree, NodeId::ROOT, "div");
    let child = append_element(&mut tree, p1, "span");

    tree.remove_child(p2, child);

    assert_eq!(tree.parent(child), Some(p1));
}

// ========== insert_before ==========

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let parent = append_element(&mut tree, NodeId::ROOT, "div");
    let a = append_element(&mut tree, parent, "a");
    let c = append_element(&mut tree, parent, "c");

    let b = tree.create_element("b");
    tree.insert_before(parent, b, c);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

#[test]
fn test_insert_fragment_inserts_its_children() {
    let mut tree = DomTree::new();
    let parent = append_element(&mut tree, NodeId::ROOT, "div");
    let last = append_element(&mut tree, parent, "z");

    let fragment = tree.create_fragment();
    let x = append_element(&mut tree, fragment, "x");
    let y = append_element(&mut tree, fragment, "y");

    tree.insert_before(parent, fragment, last);

    assert_eq!(tree.children(parent), &[x, y, last]);
    assert!(tree.children(fragment).is_empty());
}

#[test]
fn test_insert_ancestor_into_descendant_is_rejected() {
    let mut tree = DomTree::new();
    let outer = append_element(&mut tree, NodeId::ROOT, "div");
    let inner = append_element(&mut tree, outer, "span");

    assert_eq!(tree.insert_at(inner, 0, outer), Err(DomError::HierarchyRequest));
    assert_eq!(tree.parent(outer), Some(NodeId::ROOT));
}

#[test]
fn test_reinserting_within_same_parent_moves_node() {
    let mut tree = DomTree::new();
    let parent = append_element(&mut tree, NodeId::ROOT, "div");
    let a = append_element(&mut tree, parent, "a");
    let b = append_element(&mut tree, parent, "b");
    let c = append_element(&mut tree, parent, "c");

    tree.insert_at(parent, 3, a).unwrap();

    assert_eq!(tree.children(parent), &[b, c, a]);
}

// ========== move_children / replace_with_children ==========

#[test]
fn test_move_children_appends_to_existing() {
    let mut tree = DomTree::new();
    let from = append_element(&mut tree, NodeId::ROOT, "div");
    let to = append_element(&mut tree, NodeId::ROOT, "span");
    let existing = append_element(&mut tree, to, "x");
    let moved = append_element(&mut tree, from, "y");

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, moved]);
    assert_eq!(tree.next_sibling(existing), Some(moved));
    assert_eq!(tree.prev_sibling(moved), Some(existing));
}

#[test]
fn test_replace_with_children_unwraps_in_place() {
    let mut tree = DomTree::new();
    let parent = append_element(&mut tree, NodeId::ROOT, "div");
    let before = append_text(&mut tree, parent, "a");
    let wrapper = append_element(&mut tree, parent, "b");
    let inner1 = append_text(&mut tree, wrapper, "b");
    let inner2 = append_element(&mut tree, wrapper, "i");
    let after = append_text(&mut tree, parent, "c");

    assert!(tree.replace_with_children(wrapper));

    assert_eq!(tree.children(parent), &[before, inner1, inner2, after]);
    assert!(!tree.is_connected(wrapper));
}

// ========== text ==========

#[test]
fn test_split_text_counts_characters() {
    let mut tree = DomTree::new();
    let parent = append_element(&mut tree, NodeId::ROOT, "p");
    let text = append_text(&mut tree, parent, "héllo wörld");

    let tail = tree.split_text(text, 6).unwrap();

    assert_eq!(tree.as_text(text), Some("héllo "));
    assert_eq!(tree.as_text(tail), Some("wörld"));
    assert_eq!(tree.children(parent), &[text, tail]);
}

#[test]
fn test_split_text_out_of_range() {
    let mut tree = DomTree::new();
    let text = append_text(&mut tree, NodeId::ROOT, "abc");
    assert_eq!(tree.split_text(text, 4), Err(DomError::IndexSize));
}

#[test]
fn test_normalize_merges_and_drops_empty_text() {
    let mut tree = DomTree::new();
    let parent = append_element(&mut tree, NodeId::ROOT, "p");
    let a = append_text(&mut tree, parent, "Hel");
    let _empty = append_text(&mut tree, parent, "");
    let _b = append_text(&mut tree, parent, "lo");
    let span = append_element(&mut tree, parent, "span");
    let _c = append_text(&mut tree, span, "x");
    let _d = append_text(&mut tree, span, "y");

    tree.normalize(parent);

    assert_eq!(tree.children(parent), &[a, span]);
    assert_eq!(tree.as_text(a), Some("Hello"));
    assert_eq!(tree.children(span).len(), 1);
    assert_eq!(tree.text_content(parent), "Helloxy");
}

// ========== traversal ==========

#[test]
fn test_contains_is_inclusive() {
    let mut tree = DomTree::new();
    let host = append_element(&mut tree, NodeId::ROOT, "div");
    let text = append_text(&mut tree, host, "x");
    let other = append_element(&mut tree, NodeId::ROOT, "div");

    assert!(tree.contains(host, host));
    assert!(tree.contains(host, text));
    assert!(!tree.contains(host, other));
    assert!(!tree.contains(host, NodeId(9999)));
}

#[test]
fn test_tree_order_across_detached_trees() {
    let mut tree = DomTree::new();
    let attached = append_element(&mut tree, NodeId::ROOT, "div");
    let detached = tree.create_element("div");

    assert_eq!(tree.tree_order(attached, detached), None);
    assert!(tree.tree_order(NodeId::ROOT, attached).unwrap().is_lt());
}
