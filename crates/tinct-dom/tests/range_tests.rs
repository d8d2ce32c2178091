//! Tests for boundary-point comparison and the range mutation algorithms.

use std::cmp::Ordering;

use tinct_dom::{BoundaryPoint, DomError, DomTree, NodeId, Range, compare_points};

/// `<div><span style="color: red">Hello world</span>!</div>`
fn red_hello_world() -> (DomTree, NodeId, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let host = tree.create_element("div");
    tree.append_child(NodeId::ROOT, host);
    let span = tree.create_element("span");
    tree.set_attribute(span, "style", "color: red");
    tree.append_child(host, span);
    let text = tree.create_text("Hello world");
    tree.append_child(span, text);
    let bang = tree.create_text("!");
    tree.append_child(host, bang);
    (tree, host, span, text)
}

fn point(node: NodeId, offset: usize) -> BoundaryPoint {
    BoundaryPoint::new(node, offset)
}

#[test]
fn test_compare_points_ancestor_and_descendant() {
    let (tree, host, _span, text) = red_hello_world();

    assert_eq!(compare_points(&tree, point(host, 0), point(text, 3)), Some(Ordering::Less));
    assert_eq!(compare_points(&tree, point(host, 1), point(text, 3)), Some(Ordering::Greater));
    assert_eq!(compare_points(&tree, point(text, 3), point(host, 1)), Some(Ordering::Less));
    assert_eq!(compare_points(&tree, point(text, 3), point(text, 3)), Some(Ordering::Equal));
}

#[test]
fn test_range_text_within_single_node() {
    let (tree, _host, _span, text) = red_hello_world();
    let range = Range::new(point(text, 6), point(text, 11));
    assert_eq!(range.text(&tree), "world");
}

#[test]
fn test_range_text_across_nodes() {
    let (tree, host, _span, text) = red_hello_world();
    let bang = tree.children(host)[1];
    let range = Range::new(point(text, 6), point(bang, 1));
    assert_eq!(range.text(&tree), "world!");
}

#[test]
fn test_extract_contents_inside_one_text_node() {
    let (mut tree, _host, span, text) = red_hello_world();
    let mut range = Range::new(point(text, 6), point(text, 11));

    let fragment = range.extract_contents(&mut tree).unwrap();

    assert_eq!(tree.text_content(fragment), "world");
    assert_eq!(tree.text_content(span), "Hello ");
    assert!(range.collapsed());
    assert_eq!(range.start(), point(span, 1));
}

#[test]
fn test_extract_contents_clones_partially_contained_elements() {
    let (mut tree, host, span, text) = red_hello_world();
    let bang = tree.children(host)[1];
    let mut range = Range::new(point(text, 6), point(bang, 1));

    let fragment = range.extract_contents(&mut tree).unwrap();

    // The fragment holds a styled clone of the span plus the "!" text.
    let children = tree.children(fragment).to_vec();
    assert_eq!(children.len(), 2);
    assert_eq!(tree.get_attribute(children[0], "style"), Some("color: red"));
    assert_eq!(tree.text_content(children[0]), "world");
    assert_eq!(tree.text_content(children[1]), "!");
    assert_eq!(tree.text_content(span), "Hello ");
    assert_eq!(range.start(), point(host, 1));
}

#[test]
fn test_extract_contents_of_detached_range_fails_without_mutation() {
    let (mut tree, host, span, text) = red_hello_world();
    tree.remove_child(host, span);
    let mut range = Range::new(point(text, 0), point(text, 5));

    assert_eq!(range.extract_contents(&mut tree), Err(DomError::InvalidState));
    assert_eq!(tree.as_text(text), Some("Hello world"));
}

#[test]
fn test_is_valid_never_panics_on_foreign_ids() {
    let (tree, _host, _span, _text) = red_hello_world();
    let range = Range::new(point(NodeId(500), 0), point(NodeId(501), 2));
    assert!(!range.is_valid(&tree));
}

#[test]
fn test_insert_node_splits_text() {
    let (mut tree, _host, span, text) = red_hello_world();
    let mut range = Range::collapsed_at(text, 5);
    let marker = tree.create_element("br");

    range.insert_node(&mut tree, marker).unwrap();

    assert_eq!(tree.children(span).len(), 3);
    assert_eq!(tree.children(span)[1], marker);
    assert_eq!(tree.as_text(text), Some("Hello"));
    assert_eq!(range.start(), point(span, 1));
    assert_eq!(range.end(), point(span, 2));
}

#[test]
fn test_surround_contents_wraps_text() {
    let (mut tree, _host, span, text) = red_hello_world();
    let mut range = Range::new(point(text, 0), point(text, 5));
    let bold = tree.create_element("b");

    range.surround_contents(&mut tree, bold).unwrap();

    assert_eq!(tree.text_content(bold), "Hello");
    assert_eq!(tree.children(span)[0], bold);
    assert_eq!(range, Range::select_node(&tree, bold).unwrap());
}

#[test]
fn test_surround_contents_rejects_partially_contained_element() {
    let (mut tree, host, _span, text) = red_hello_world();
    let bang = tree.children(host)[1];
    let mut range = Range::new(point(text, 6), point(bang, 1));
    let bold = tree.create_element("b");

    assert_eq!(range.surround_contents(&mut tree, bold), Err(DomError::InvalidState));
    assert_eq!(tree.text_content(host), "Hello world!");
}

#[test]
fn test_set_end_before_start_collapses() {
    let (tree, _host, _span, text) = red_hello_world();
    let mut range = Range::collapsed_at(text, 6);
    range.set_end(&tree, text, 2).unwrap();
    assert!(range.collapsed());
    assert_eq!(range.start(), point(text, 2));
    assert_eq!(range.set_start(&tree, text, 42), Err(DomError::IndexSize));
}
