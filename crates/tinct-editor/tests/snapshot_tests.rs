//! Tests for selection snapshots and range selection.

use std::time::{Duration, Instant};

use tinct_dom::{DomTree, NodeId, Range};
use tinct_editor::{
    SnapshotKind, capture_selection_at, get_best_selection_range_at, is_range_in_host, is_range_valid,
    restore_selection_at, text_range,
};
use tinct_html::parse_fragment;

const MAX_AGE: Duration = Duration::from_secs(10);

/// Helper to parse HTML into a host `<div>` attached to the document
fn setup(html: &str) -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let host = tree.create_element("div");
    tree.append_child(NodeId::ROOT, host);
    parse_fragment(&mut tree, host, html);
    (tree, host)
}

/// Helper for a range over characters `start..end` of the host's text
fn range(tree: &DomTree, host: NodeId, start: usize, end: usize) -> Range {
    text_range(tree, host, start, end).expect("offsets inside host text")
}

// =============================================================================
// Capture
// =============================================================================

#[test]
fn test_capture_selection_records_text() {
    let (mut tree, host) = setup("Hello <b>world</b>");
    let selected = range(&tree, host, 3, 8);
    tree.set_selection(selected);
    let now = Instant::now();

    let snapshot = capture_selection_at(&tree, host, now).expect("selection inside host");
    assert_eq!(snapshot.kind, SnapshotKind::Selection);
    assert_eq!(snapshot.text.as_deref(), Some("lo wo"));
    assert_eq!(snapshot.range, selected);
    assert_eq!(snapshot.captured_at, now);
}

#[test]
fn test_capture_caret() {
    let (mut tree, host) = setup("Hello");
    tree.set_selection(range(&tree, host, 2, 2));
    let snapshot = capture_selection_at(&tree, host, Instant::now()).unwrap();
    assert_eq!(snapshot.kind, SnapshotKind::Caret);
    assert_eq!(snapshot.text, None);
}

#[test]
fn test_capture_without_selection() {
    let (tree, host) = setup("Hello");
    assert!(capture_selection_at(&tree, host, Instant::now()).is_none());
}

#[test]
fn test_capture_outside_host() {
    let (mut tree, host) = setup("Hello");
    let elsewhere = tree.create_element("p");
    tree.append_child(NodeId::ROOT, elsewhere);
    let text = tree.create_text("other");
    tree.append_child(elsewhere, text);
    tree.set_selection(Range::select_node_contents(&tree, text));
    assert!(capture_selection_at(&tree, host, Instant::now()).is_none());
}

#[test]
fn test_host_itself_counts_as_inside() {
    let (tree, host) = setup("Hello");
    let whole = Range::select_node_contents(&tree, host);
    assert!(is_range_in_host(&tree, &whole, host));
}

// =============================================================================
// Validity
// =============================================================================

#[test]
fn test_detached_range_is_invalid() {
    let (mut tree, host) = setup("Hello <b>world</b>");
    let selected = range(&tree, host, 6, 11);
    assert!(is_range_valid(&tree, &selected));
    let b = tree.children(host)[1];
    tree.remove_child(host, b);
    assert!(!is_range_valid(&tree, &selected));
}

#[test]
fn test_unknown_nodes_do_not_panic() {
    let (tree, _) = setup("Hello");
    let bogus = Range::collapsed_at(NodeId(9_999), 3);
    assert!(!is_range_valid(&tree, &bogus));
}

// =============================================================================
// Restore
// =============================================================================

#[test]
fn test_restore_fresh_snapshot() {
    let (mut tree, host) = setup("Hello world");
    tree.set_selection(range(&tree, host, 0, 5));
    let t0 = Instant::now();
    let snapshot = capture_selection_at(&tree, host, t0).unwrap();
    tree.remove_all_ranges();

    assert!(restore_selection_at(&mut tree, Some(&snapshot), host, MAX_AGE, t0 + Duration::from_secs(3)));
    assert_eq!(tree.selection(), Some(snapshot.range));
}

#[test]
fn test_restore_stale_snapshot_fails_and_keeps_selection() {
    let (mut tree, host) = setup("Hello world");
    tree.set_selection(range(&tree, host, 0, 5));
    let t0 = Instant::now();
    let snapshot = capture_selection_at(&tree, host, t0).unwrap();

    let current = range(&tree, host, 6, 11);
    tree.set_selection(current);
    assert!(!restore_selection_at(&mut tree, Some(&snapshot), host, MAX_AGE, t0 + Duration::from_secs(11)));
    assert_eq!(tree.selection(), Some(current));
}

#[test]
fn test_restore_exactly_at_max_age_succeeds() {
    let (mut tree, host) = setup("Hello");
    tree.set_selection(range(&tree, host, 0, 5));
    let t0 = Instant::now();
    let snapshot = capture_selection_at(&tree, host, t0).unwrap();
    assert!(restore_selection_at(&mut tree, Some(&snapshot), host, MAX_AGE, t0 + MAX_AGE));
}

#[test]
fn test_restore_none_fails() {
    let (mut tree, host) = setup("Hello");
    assert!(!restore_selection_at(&mut tree, None, host, MAX_AGE, Instant::now()));
    assert_eq!(tree.selection(), None);
}

#[test]
fn test_restore_after_content_removed_fails() {
    let (mut tree, host) = setup("Hello <b>world</b>");
    tree.set_selection(range(&tree, host, 6, 11));
    let t0 = Instant::now();
    let snapshot = capture_selection_at(&tree, host, t0).unwrap();
    tree.remove_all_ranges();
    let b = tree.children(host)[1];
    tree.detach(b);

    assert!(!restore_selection_at(&mut tree, Some(&snapshot), host, MAX_AGE, t0));
    assert_eq!(tree.selection(), None);
}

// =============================================================================
// Best range
// =============================================================================

#[test]
fn test_best_range_prefers_live_selection() {
    let (mut tree, host) = setup("Hello world");
    let t0 = Instant::now();
    tree.set_selection(range(&tree, host, 0, 5));
    let old = capture_selection_at(&tree, host, t0).unwrap();
    let live = range(&tree, host, 6, 11);
    tree.set_selection(live);

    let best = get_best_selection_range_at(&tree, host, Some(&old), None, MAX_AGE, t0);
    assert_eq!(best, Some(live));
}

#[test]
fn test_best_range_falls_back_to_selection_then_caret() {
    let (mut tree, host) = setup("Hello world");
    let t0 = Instant::now();
    tree.set_selection(range(&tree, host, 0, 5));
    let selection = capture_selection_at(&tree, host, t0).unwrap();
    tree.set_selection(range(&tree, host, 8, 8));
    let caret = capture_selection_at(&tree, host, t0).unwrap();
    tree.remove_all_ranges();

    let best = get_best_selection_range_at(&tree, host, Some(&selection), Some(&caret), MAX_AGE, t0);
    assert_eq!(best, Some(selection.range));

    let later = t0 + Duration::from_secs(11);
    let fresh_caret = capture_selection_at(&tree, host, later);
    assert!(fresh_caret.is_none(), "no live selection to capture");
    let best = get_best_selection_range_at(&tree, host, Some(&selection), Some(&caret), MAX_AGE, later);
    assert_eq!(best, None);

    let best = get_best_selection_range_at(&tree, host, None, Some(&caret), MAX_AGE, t0);
    assert_eq!(best, Some(caret.range));
}

// =============================================================================
// Text ranges
// =============================================================================

#[test]
fn test_text_range_lands_inside_span() {
    let (tree, host) = setup(r#"Hello <span style="color: red">world</span>"#);
    let r = range(&tree, host, 6, 11);
    let span_text = tree.first_child(tree.children(host)[1]).unwrap();
    assert_eq!(r.start_container(), span_text);
    assert_eq!(r.end_container(), span_text);
    assert_eq!(r.text(&tree), "world");
}

#[test]
fn test_text_range_out_of_bounds() {
    let (tree, host) = setup("Hello");
    assert!(text_range(&tree, host, 0, 6).is_none());
    assert!(text_range(&tree, host, 4, 2).is_none());
}
