//! Tests for nested-span collapse, adjacent-span merging and format stripping.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use tinct_dom::{DomTree, NodeId};
use tinct_editor::{FormatProperty, merge_adjacent_styled_spans, strip_format_property, unwrap_nested_styled_spans};
use tinct_html::{parse_fragment, serialize_children};

/// Helper to parse HTML into a host `<div>` attached to the document
fn setup(html: &str) -> (DomTree, NodeId) {
    let mut tree = DomTree::new();
    let host = tree.create_element("div");
    tree.append_child(NodeId::ROOT, host);
    parse_fragment(&mut tree, host, html);
    (tree, host)
}

/// Helper to run nested-span collapse and return the result and merge count
fn collapse(html: &str) -> (String, usize) {
    let (mut tree, host) = setup(html);
    let merges = unwrap_nested_styled_spans(&mut tree, host);
    (serialize_children(&tree, host), merges)
}

// =============================================================================
// Nested spans
// =============================================================================

#[test]
fn test_sole_child_span_is_merged() {
    let (html, merges) = collapse(
        r#"<span style="color: red"><span style="font-weight: 700" data-inline-style-id="is-2">x</span></span>"#,
    );
    assert_eq!(merges, 1);
    assert_eq!(
        html,
        r#"<span style="font-weight: 700; color: red" data-inline-style-id="is-2">x</span>"#
    );
}

#[test]
fn test_outer_wins_conflicts() {
    let (html, _) = collapse(r#"<span style="color: red"><span style="color: blue; font-style: italic">x</span></span>"#);
    assert_eq!(html, r#"<span style="font-style: italic; color: red">x</span>"#);
}

#[test]
fn test_outer_id_is_kept() {
    let (html, _) = collapse(
        r#"<span data-inline-style-id="is-1"><span style="color: blue" data-inline-style-id="is-2">x</span></span>"#,
    );
    assert_eq!(html, r#"<span data-inline-style-id="is-1" style="color: blue">x</span>"#);
}

#[test]
fn test_outer_fill_drops_inner_gradient() {
    let (html, _) = collapse(concat!(
        r#"<span style="color: red">"#,
        r#"<span style="background-image: linear-gradient(90deg, red 0%, blue 100%); background-clip: text; color: transparent; font-weight: 700" "#,
        r#"data-gradient="{&quot;stops&quot;:[{&quot;color&quot;:&quot;red&quot;,&quot;position&quot;:0}]}">x</span>"#,
        r#"</span>"#,
    ));
    assert_eq!(html, r#"<span style="font-weight: 700; color: red">x</span>"#);
}

#[test]
fn test_inner_gradient_kept_when_outer_has_no_fill() {
    let (html, _) = collapse(concat!(
        r#"<span style="font-style: italic">"#,
        r#"<span style="background-image: linear-gradient(90deg, red 0%, blue 100%)" data-gradient="{}">x</span>"#,
        r#"</span>"#,
    ));
    assert_eq!(
        html,
        r#"<span style="background-image: linear-gradient(90deg, red 0%, blue 100%); font-style: italic" data-gradient="{}">x</span>"#
    );
}

#[test]
fn test_deep_nesting_reaches_fixed_point() {
    let (html, merges) = collapse(r#"<span style="a: 1"><span style="b: 2"><span style="c: 3">x</span></span></span>"#);
    assert_eq!(merges, 2);
    assert_eq!(html, r#"<span style="c: 3; b: 2; a: 1">x</span>"#);
}

#[test]
fn test_span_with_siblings_is_not_merged() {
    let html = r#"<span style="color: red">a<span style="font-weight: 700">b</span></span>"#;
    assert_eq!(collapse(html), (html.to_string(), 0));
}

#[test]
fn test_empty_text_does_not_block_merge() {
    let (mut tree, host) = setup(r#"<span style="color: red"><span style="font-weight: 700">x</span></span>"#);
    let outer = tree.children(host)[0];
    let empty = tree.create_text("");
    tree.append_child(outer, empty);
    assert_eq!(unwrap_nested_styled_spans(&mut tree, host), 1);
}

// =============================================================================
// Adjacent spans
// =============================================================================

#[test]
fn test_identical_neighbours_merge() {
    let (mut tree, host) = setup(
        r#"<span style="color: red">a</span><span style="color: red">b</span><span style="color: blue">c</span>"#,
    );
    assert_eq!(merge_adjacent_styled_spans(&mut tree, host), 1);
    assert_eq!(
        serialize_children(&tree, host),
        r#"<span style="color: red">ab</span><span style="color: blue">c</span>"#
    );
    let merged = tree.children(host)[0];
    assert_eq!(tree.children(merged).len(), 1, "text nodes are joined");
}

#[test]
fn test_reordered_declarations_do_not_merge() {
    let (mut tree, host) = setup(
        r#"<span style="color: red; font-weight: 700">a</span><span style="font-weight: 700; color: red">b</span>"#,
    );
    assert_eq!(merge_adjacent_styled_spans(&mut tree, host), 0);
}

#[test]
fn test_runs_of_three_merge() {
    let (mut tree, host) = setup(r#"<span style="x: 1">a</span><span style="x: 1">b</span><span style="x: 1">c</span>"#);
    assert_eq!(merge_adjacent_styled_spans(&mut tree, host), 2);
    assert_eq!(serialize_children(&tree, host), r#"<span style="x: 1">abc</span>"#);
}

#[test]
fn test_spans_without_style_do_not_merge() {
    let (mut tree, host) = setup(r#"<span data-inline-style-id="a">a</span><span data-inline-style-id="b">b</span>"#);
    assert_eq!(merge_adjacent_styled_spans(&mut tree, host), 0);
}

// =============================================================================
// Format stripping
// =============================================================================

#[test]
fn test_strip_weight_unwraps_legacy_tags_and_bare_spans() {
    let (mut tree, host) = setup(r#"<span style="font-weight: 700">a</span><b>b</b><strong>c</strong><i>d</i>"#);
    assert_eq!(strip_format_property(&mut tree, host, FormatProperty::FontWeight), 3);
    assert_eq!(serialize_children(&tree, host), "abc<i>d</i>");
}

#[test]
fn test_strip_keeps_other_declarations() {
    let (mut tree, host) = setup(r#"<span style="color: red; text-decoration: underline">a<u>b</u></span>"#);
    let _ = strip_format_property(&mut tree, host, FormatProperty::TextDecoration);
    assert_eq!(serialize_children(&tree, host), r#"<span style="color: red">ab</span>"#);
}

#[test]
fn test_strip_does_not_touch_root() {
    let (mut tree, host) = setup(r#"<span style="font-style: italic"><em>x</em></span>"#);
    let span = tree.children(host)[0];
    let _ = strip_format_property(&mut tree, span, FormatProperty::FontStyle);
    assert_eq!(serialize_children(&tree, host), r#"<span style="font-style: italic">x</span>"#);
}

// =============================================================================
// Properties
// =============================================================================

const STYLES: [&str; 4] = ["color: red", "font-weight: 700", "color: blue; font-style: italic", "x: 1"];

/// Random runs of text and (possibly deeply) nested styled spans.
#[derive(Debug, Clone)]
struct SpanMarkup(String);

impl Arbitrary for SpanMarkup {
    fn arbitrary(g: &mut Gen) -> Self {
        Self(markup(g, 4))
    }
}

fn markup(g: &mut Gen, depth: usize) -> String {
    let count = usize::arbitrary(g) % 3 + 1;
    (0..count)
        .map(|_| {
            if depth == 0 || bool::arbitrary(g) {
                (*g.choose(&["a", "bc", " ", ""]).unwrap()).to_string()
            } else {
                let style = g.choose(&STYLES).unwrap();
                format!(r#"<span style="{style}">{}</span>"#, markup(g, depth - 1))
            }
        })
        .collect()
}

#[quickcheck]
fn prop_unwrap_nested_is_idempotent(input: SpanMarkup) -> bool {
    let (mut tree, host) = setup(&input.0);
    let _ = unwrap_nested_styled_spans(&mut tree, host);
    let once = serialize_children(&tree, host);
    let second_merges = unwrap_nested_styled_spans(&mut tree, host);
    second_merges == 0 && serialize_children(&tree, host) == once
}

#[quickcheck]
fn prop_unwrap_nested_preserves_text(input: SpanMarkup) -> bool {
    let (mut tree, host) = setup(&input.0);
    let before = tree.text_content(host);
    let _ = unwrap_nested_styled_spans(&mut tree, host);
    tree.text_content(host) == before
}
