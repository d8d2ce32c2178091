//! The trust boundary between stored HTML and the editing surface.
//!
//! Anything loaded into or saved out of an editor goes through
//! [`sanitize_styled_html`]. The output contains text, `<br>` and `<span>`
//! elements only, and spans carry nothing but an allow-listed `style`,
//! `data-gradient` and `data-inline-style-id`. The pass is idempotent.

use serde::Serialize;
use tinct_common::markers::{DATA_GRADIENT, DATA_INLINE_STYLE_ID, STYLE_ATTR, STYLED_SPAN_TAG, ZERO_WIDTH_SPACE};
use tinct_common::warning::warn_once;
use tinct_css::{CssProperty, StyleMap};
use tinct_dom::{DomTree, NodeId, NodeType};
use tinct_html::{parse_fragment, serialize_children};
use tracing::debug;

use crate::intent::{FormatProperty, Gradient};
use crate::styled::{has_no_attributes, style_of, write_style};

/// Elements removed together with everything inside them.
const DROPPED_ELEMENTS: [&str; 7] = ["script", "style", "template", "noscript", "iframe", "object", "embed"];

/// Substrings that disqualify a style value, matched after decoding escapes,
/// lowercasing and removing whitespace.
const FORBIDDEN_VALUE_PATTERNS: [&str; 2] = ["javascript:", "expression("];

/// What a sanitizer run removed or rewrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SanitizeReport {
    /// Elements dropped with their content (`<script>` and friends).
    pub elements_removed: usize,
    /// Elements replaced by their content.
    pub elements_unwrapped: usize,
    /// `<b>`, `<i>`, ... rewritten as styled spans.
    pub legacy_converted: usize,
    /// Attributes removed from surviving elements.
    pub attributes_removed: usize,
    /// Style declarations removed from surviving spans.
    pub declarations_removed: usize,
    /// Zero-width spaces stripped from text.
    pub zero_width_removed: usize,
    /// Comments removed.
    pub comments_removed: usize,
}

impl SanitizeReport {
    /// Returns true if the input needed no changes beyond re-serialization.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.elements_removed == 0
            && self.elements_unwrapped == 0
            && self.legacy_converted == 0
            && self.attributes_removed == 0
            && self.declarations_removed == 0
            && self.zero_width_removed == 0
            && self.comments_removed == 0
    }
}

/// Sanitize a styled HTML fragment.
///
/// ```
/// use tinct_editor::sanitize_styled_html;
///
/// let clean = sanitize_styled_html("<div>Hello <b>world</b></div>");
/// assert_eq!(clean, r#"Hello <span style="font-weight: 700">world</span>"#);
/// ```
#[must_use]
pub fn sanitize_styled_html(html: &str) -> String {
    sanitize_styled_html_with_report(html).0
}

/// [`sanitize_styled_html`], also reporting what was changed.
#[must_use]
pub fn sanitize_styled_html_with_report(html: &str) -> (String, SanitizeReport) {
    let mut tree = DomTree::new();
    let container = tree.create_element("div");
    tree.append_child(NodeId::ROOT, container);
    parse_fragment(&mut tree, container, html);

    let mut report = SanitizeReport::default();
    sanitize_children(&mut tree, container, &mut report);
    tree.normalize(container);

    if !report.is_clean() {
        debug!(?report, "sanitized styled html");
    }
    (serialize_children(&tree, container), report)
}

fn sanitize_children(tree: &mut DomTree, parent: NodeId, report: &mut SanitizeReport) {
    for child in tree.children(parent).to_vec() {
        sanitize_node(tree, child, report);
    }
}

fn sanitize_node(tree: &mut DomTree, node: NodeId, report: &mut SanitizeReport) {
    let tag_name = match tree.get(node).map(|n| &n.node_type) {
        Some(NodeType::Text(data)) => {
            let removed = data.chars().filter(|&c| c == ZERO_WIDTH_SPACE).count();
            if removed > 0 {
                let stripped: String = data.chars().filter(|&c| c != ZERO_WIDTH_SPACE).collect();
                tree.set_text(node, stripped);
                report.zero_width_removed += removed;
            }
            if tree.as_text(node) == Some("") {
                tree.detach(node);
            }
            return;
        }
        Some(NodeType::Element(element)) => element.tag_name.clone(),
        Some(NodeType::Comment(_)) => {
            tree.detach(node);
            report.comments_removed += 1;
            return;
        }
        _ => {
            tree.detach(node);
            return;
        }
    };

    if DROPPED_ELEMENTS.contains(&tag_name.as_str()) {
        tree.detach(node);
        report.elements_removed += 1;
        return;
    }

    sanitize_children(tree, node, report);

    if tag_name == "br" {
        if let Some(element) = tree.as_element_mut(node) {
            report.attributes_removed += element.attrs.len();
            element.attrs.retain(|_, _| false);
        }
    } else if let Some(property) = FormatProperty::for_legacy_tag(&tag_name) {
        convert_legacy_tag(tree, node, property, report);
    } else if tag_name == STYLED_SPAN_TAG {
        sanitize_span(tree, node, report);
    } else {
        let _ = tree.replace_with_children(node);
        report.elements_unwrapped += 1;
    }
}

/// `<b>x</b>` becomes `<span style="font-weight: 700">x</span>`.
fn convert_legacy_tag(tree: &mut DomTree, node: NodeId, property: FormatProperty, report: &mut SanitizeReport) {
    report.legacy_converted += 1;
    report.attributes_removed += tree.as_element(node).map_or(0, |e| e.attrs.len());
    if tree.children(node).is_empty() {
        tree.detach(node);
        return;
    }
    let Some(parent) = tree.parent(node) else {
        return;
    };
    let span = tree.create_element(STYLED_SPAN_TAG);
    let style: StyleMap = std::iter::once((property.css_property(), property.active_value())).collect();
    write_style(tree, span, &style);
    tree.move_children(node, span);
    tree.insert_before(parent, span, node);
    tree.remove_child(parent, node);
}

fn sanitize_span(tree: &mut DomTree, span: NodeId, report: &mut SanitizeReport) {
    if let Some(element) = tree.as_element_mut(span) {
        let before = element.attrs.len();
        element
            .attrs
            .retain(|name, _| name == STYLE_ATTR || name == DATA_GRADIENT || name == DATA_INLINE_STYLE_ID);
        report.attributes_removed += before - element.attrs.len();
    }

    if tree.get_attribute(span, STYLE_ATTR).is_some() {
        let mut style = style_of(tree, span);
        let before = style.len();
        style.retain(|d| d.name.parse::<CssProperty>().is_ok() && is_safe_value(&d.value));
        report.declarations_removed += before - style.len();
        write_style(tree, span, &style);
    }

    if let Some(payload) = tree.get_attribute(span, DATA_GRADIENT) {
        let keep = style_of(tree, span).contains(CssProperty::BackgroundImage);
        let parsed = Gradient::from_json(payload);
        if let Err(err) = &parsed {
            warn_once("Sanitizer", &format!("dropped data-gradient: {err}"));
        }
        if !keep || parsed.is_err() {
            let _ = tree.remove_attribute(span, DATA_GRADIENT);
            report.attributes_removed += 1;
        }
    }

    if tree.children(span).is_empty() {
        tree.detach(span);
        report.elements_removed += 1;
    } else if has_no_attributes(tree, span) {
        let _ = tree.replace_with_children(span);
        report.elements_unwrapped += 1;
    }
}

/// Returns false for values that could run script in some engine.
///
/// Escapes are decoded first, so `\6a avascript:` is caught like
/// `javascript:`.
fn is_safe_value(value: &str) -> bool {
    let folded: String = decode_css_escapes(value)
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    !FORBIDDEN_VALUE_PATTERNS.iter().any(|p| folded.contains(p))
}

/// Decodes every CSS escape in `value`.
///
/// [§ 4.3.13 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
fn decode_css_escapes(value: &str) -> String {
    let mut decoded = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            decoded.push(c);
            continue;
        }
        // "Consume as many hex digits as possible, but no more than 5."
        // Five after the first, so six in all.
        let mut hex = String::new();
        while hex.len() < 6 {
            match chars.peek() {
                Some(&h) if h.is_ascii_hexdigit() => {
                    hex.push(h);
                    let _ = chars.next();
                }
                _ => break,
            }
        }
        if hex.is_empty() {
            // "EOF": "Return U+FFFD REPLACEMENT CHARACTER."
            // "anything else": "Return the current input code point."
            decoded.push(chars.next().unwrap_or(char::REPLACEMENT_CHARACTER));
            continue;
        }
        // "If the next input code point is whitespace, consume it."
        if chars.peek().is_some_and(|w| w.is_whitespace()) {
            let _ = chars.next();
        }
        // "If this number is zero, or is for a surrogate, or is greater than
        // the maximum allowed code point, return U+FFFD REPLACEMENT CHARACTER."
        let code_point = u32::from_str_radix(&hex, 16)
            .ok()
            .filter(|&n| n != 0)
            .and_then(char::from_u32);
        decoded.push(code_point.unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    decoded
}
