//! Structural clean-up passes over styled spans.
//!
//! Wrapping a selection inside an existing span, or re-applying a toggle to
//! a run that already carries it, leaves redundant structure behind. These
//! passes fold it away without changing how the text renders, except where
//! a merge rule says otherwise.

use tinct_common::markers::{DATA_GRADIENT, STYLE_ATTR};
use tinct_css::FILL_PROPERTIES;
use tinct_dom::{DomTree, NodeId};
use tracing::trace;

use crate::intent::FormatProperty;
use crate::styled::{has_fill, has_no_attributes, is_span, style_of, write_style};

/// Removes `property` from every span below `root` and unwraps the legacy
/// tags that express it (`<b>`/`<strong>` for weight, `<i>`/`<em>` for style,
/// `<u>` for decoration). Spans left with no attributes are unwrapped.
///
/// `root` itself is not touched. Returns the number of elements changed.
pub fn strip_format_property(tree: &mut DomTree, root: NodeId, property: FormatProperty) -> usize {
    let mut changed = 0;
    // Reverse preorder visits children before their parents.
    for node in tree.descendants(root).into_iter().rev() {
        let is_legacy = tree
            .as_element(node)
            .is_some_and(|e| property.legacy_tags().contains(&e.tag_name.as_str()));
        if is_legacy {
            if tree.replace_with_children(node) {
                changed += 1;
            }
            continue;
        }
        if !is_span(tree, node) {
            continue;
        }
        let mut style = style_of(tree, node);
        if style.remove(property.css_property()).is_none() {
            continue;
        }
        write_style(tree, node, &style);
        if has_no_attributes(tree, node) {
            let _ = tree.replace_with_children(node);
        }
        changed += 1;
    }
    trace!(%property, changed, "stripped format property");
    changed
}

/// Folds every span whose only child is another span into a single span,
/// repeating until no such pair is left.
///
/// On conflicting declarations the outer span wins. The inner span's other
/// attributes survive only where the outer lacks them. If the outer span
/// already has a fill, the inner fill and its `data-gradient` are dropped so
/// a gradient never ends up described by a stale payload.
///
/// Every merge removes one element, so the loop terminates. Returns the
/// number of merges.
pub fn unwrap_nested_styled_spans(tree: &mut DomTree, container: NodeId) -> usize {
    let mut merges = 0;
    while let Some((outer, inner)) = find_nested_pair(tree, container) {
        merge_into_outer(tree, outer, inner);
        merges += 1;
    }
    trace!(merges, "unwrapped nested styled spans");
    merges
}

/// The first span below `container` whose sole non-empty child is a span.
fn find_nested_pair(tree: &DomTree, container: NodeId) -> Option<(NodeId, NodeId)> {
    tree.descendants(container)
        .into_iter()
        .filter(|&n| is_span(tree, n))
        .find_map(|outer| {
            let mut meaningful = tree
                .children(outer)
                .iter()
                .copied()
                .filter(|&c| tree.as_text(c) != Some(""));
            match (meaningful.next(), meaningful.next()) {
                (Some(inner), None) if is_span(tree, inner) => Some((outer, inner)),
                _ => None,
            }
        })
}

fn merge_into_outer(tree: &mut DomTree, outer: NodeId, inner: NodeId) {
    let outer_style = style_of(tree, outer);
    let outer_has_fill = has_fill(&outer_style);

    let mut merged = style_of(tree, inner);
    if outer_has_fill {
        merged.retain(|d| !FILL_PROPERTIES.iter().any(|p| p.name() == d.name));
    }
    merged.overlay(&outer_style);

    let inherited: Vec<(String, String)> = tree
        .as_element(inner)
        .map(|e| {
            e.attrs
                .iter()
                .filter(|&(name, _)| name != STYLE_ATTR)
                .filter(|&(name, _)| !(outer_has_fill && name == DATA_GRADIENT))
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect()
        })
        .unwrap_or_default();
    for (name, value) in inherited {
        if tree.get_attribute(outer, &name).is_none() {
            tree.set_attribute(outer, &name, value);
        }
    }
    write_style(tree, outer, &merged);

    for child in tree.children(outer).to_vec() {
        if tree.as_text(child) == Some("") {
            tree.remove_child(outer, child);
        }
    }
    let _ = tree.replace_with_children(inner);
}

/// Merges sibling spans whose `style` attributes are the exact same string,
/// then joins adjacent text nodes under `container`.
///
/// The comparison is on the raw attribute text: `color: red; font-weight: 700`
/// and `font-weight: 700; color: red` are not merged. Returns the number of
/// merges.
pub fn merge_adjacent_styled_spans(tree: &mut DomTree, container: NodeId) -> usize {
    let mut merges = 0;
    let parents: Vec<NodeId> = std::iter::once(container).chain(tree.descendants(container)).collect();
    for parent in parents {
        let mut index = 0;
        loop {
            let children = tree.children(parent);
            if index + 1 >= children.len() {
                break;
            }
            let (first, second) = (children[index], children[index + 1]);
            if same_style_string(tree, first, second) {
                tree.move_children(second, first);
                tree.remove_child(parent, second);
                merges += 1;
            } else {
                index += 1;
            }
        }
    }
    tree.normalize(container);
    trace!(merges, "merged adjacent styled spans");
    merges
}

fn same_style_string(tree: &DomTree, a: NodeId, b: NodeId) -> bool {
    if !is_span(tree, a) || !is_span(tree, b) {
        return false;
    }
    match (tree.get_attribute(a, STYLE_ATTR), tree.get_attribute(b, STYLE_ATTR)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
