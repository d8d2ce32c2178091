//! Reading and writing the styling attributes of a span.

use tinct_common::markers::{DATA_GRADIENT, STYLE_ATTR, STYLED_SPAN_TAG};
use tinct_css::{CssProperty, FILL_PROPERTIES, StyleMap};
use tinct_dom::{DomTree, NodeId};

use crate::builder::Fill;
use crate::intent::Gradient;

/// Inline elements that carry no meaning once they have no content.
const PRUNABLE_INLINE: [&str; 6] = ["span", "b", "strong", "i", "em", "u"];

/// Returns true for a `<span>`, the engine's unit of inline formatting.
pub fn is_span(tree: &DomTree, node: NodeId) -> bool {
    tree.is_element_named(node, STYLED_SPAN_TAG)
}

/// The parsed `style` attribute (empty if absent).
pub fn style_of(tree: &DomTree, node: NodeId) -> StyleMap {
    tree.get_attribute(node, STYLE_ATTR)
        .map(StyleMap::parse)
        .unwrap_or_default()
}

/// Write `style` back, dropping the attribute when nothing is declared.
pub fn write_style(tree: &mut DomTree, node: NodeId, style: &StyleMap) {
    if style.is_empty() {
        let _ = tree.remove_attribute(node, STYLE_ATTR);
    } else {
        tree.set_attribute(node, STYLE_ATTR, style.to_string());
    }
}

/// Returns true if the element has no attributes at all.
pub fn has_no_attributes(tree: &DomTree, node: NodeId) -> bool {
    tree.as_element(node).is_some_and(|e| e.attrs.is_empty())
}

/// Returns true if any fill property is declared.
pub fn has_fill(style: &StyleMap) -> bool {
    FILL_PROPERTIES.iter().any(|p| style.contains(p))
}

/// The fill a span paints its text with, if it declares one.
///
/// `data-gradient` is preferred because it is lossless. A `transparent`
/// color is the gradient fallback and does not count as a solid fill.
pub fn fill_of(tree: &DomTree, span: NodeId) -> Option<Fill> {
    if let Some(gradient) = tree
        .get_attribute(span, DATA_GRADIENT)
        .and_then(|json| Gradient::from_json(json).ok())
    {
        return Some(Fill::Gradient(gradient));
    }
    let style = style_of(tree, span);
    if let Some(color) = style
        .get(CssProperty::Color)
        .filter(|c| !c.eq_ignore_ascii_case("transparent"))
    {
        return Some(Fill::Color(color.to_string()));
    }
    style
        .get(CssProperty::BackgroundImage)
        .map(|image| Fill::Image(image.to_string()))
}

/// The fill of the nearest span at or above `node` that declares one,
/// without leaving `host`.
pub fn inherited_fill(tree: &DomTree, host: NodeId, node: NodeId) -> Option<Fill> {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .take_while(|&n| n != host)
        .filter(|&n| is_span(tree, n))
        .find_map(|n| fill_of(tree, n))
}

/// Removes empty text nodes and content-less inline formatting elements
/// below `root`, bottom-up so emptied parents go too. `keep` is never
/// removed. Returns the number of removed nodes.
pub fn prune_empty_inline(tree: &mut DomTree, root: NodeId, keep: NodeId) -> usize {
    let mut removed = 0;
    for node in tree.descendants(root).into_iter().rev() {
        if node == keep {
            continue;
        }
        let empty_text = tree.as_text(node).is_some_and(str::is_empty);
        let empty_inline = tree
            .as_element(node)
            .is_some_and(|e| PRUNABLE_INLINE.contains(&e.tag_name.as_str()))
            && tree.children(node).is_empty();
        if empty_text || empty_inline {
            tree.detach(node);
            removed += 1;
        }
    }
    removed
}
