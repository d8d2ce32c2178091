//! Wrapping selections in styled spans and updating spans in place.
//!
//! None of these operations report errors. A range that cannot be wrapped
//! leaves the text unstyled and the call returns `None`/`false`; callers
//! treat that as a valid no-op.

use tinct_common::markers::{DATA_GRADIENT, DATA_INLINE_STYLE_ID, STYLED_SPAN_TAG, ZERO_WIDTH_SPACE};
use tinct_css::StyleMap;
use tinct_dom::{DomError, DomTree, NodeId, NodeType, Range};
use tracing::debug;

use crate::builder::{Fill, build_style_map, build_style_updates, fill_declarations};
use crate::intent::{Change, Gradient, StyleIntent};
use crate::normalize::strip_format_property;
use crate::snapshot::is_range_in_host;
use crate::styled::{inherited_fill, is_span, prune_empty_inline, style_of, write_style};

// =============================================================================
// Stable ids
// =============================================================================

/// Hands out `data-inline-style-id` values (`is-1`, `is-2`, ...).
///
/// Owned by one editor. Seed it from loaded markup so a reloaded document
/// never gets an id it already contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleIdAllocator {
    prefix: String,
    next: u64,
}

impl StyleIdAllocator {
    /// An allocator producing `{prefix}-1`, `{prefix}-2`, ...
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// The id prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// A fresh id.
    pub fn allocate(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }

    /// Make sure `id` is never handed out again.
    pub fn observe(&mut self, id: &str) {
        let number = id
            .strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|n| n.parse::<u64>().ok());
        if let Some(n) = number
            && n >= self.next
        {
            self.next = n.saturating_add(1);
        }
    }

    /// Observe every id already present below `root`.
    pub fn seed_from(&mut self, tree: &DomTree, root: NodeId) {
        for node in tree.descendants(root) {
            if let Some(id) = tree.get_attribute(node, DATA_INLINE_STYLE_ID) {
                self.observe(id);
            }
        }
    }
}

impl Default for StyleIdAllocator {
    fn default() -> Self {
        Self::new("is")
    }
}

// =============================================================================
// Span construction
// =============================================================================

/// What a new span will carry, decided before the tree is touched.
struct SpanStyle {
    style: StyleMap,
    gradient_json: Option<String>,
}

/// Work out the new span's declarations.
///
/// A formatting-only intent inherits the fill of the nearest styled span
/// above `anchor`, so that bolding gradient text keeps the gradient.
fn resolve_span_style(
    tree: &DomTree,
    host: NodeId,
    anchor: NodeId,
    intent: &StyleIntent,
) -> Option<SpanStyle> {
    if let Change::Set(gradient) = &intent.gradient
        && let Err(err) = gradient.validate()
    {
        debug!(%err, "rejecting style intent with invalid gradient");
        return None;
    }

    let inherited = if intent.touches_fill() {
        None
    } else {
        inherited_fill(tree, host, anchor)
    };

    let mut style = inherited.as_ref().map(fill_declarations).unwrap_or_default();
    style.overlay(&build_style_map(intent));

    let gradient = match (&intent.gradient, &inherited) {
        (Change::Set(gradient), _) | (_, Some(Fill::Gradient(gradient))) => Some(gradient),
        _ => None,
    };
    let gradient_json = match gradient.map(Gradient::to_json).transpose() {
        Ok(json) => json,
        Err(err) => {
            debug!(%err, "could not serialize gradient");
            return None;
        }
    };
    Some(SpanStyle { style, gradient_json })
}

/// A detached `<span>` carrying `style` and, for gradients, `data-gradient`.
fn create_span(tree: &mut DomTree, span_style: &SpanStyle) -> NodeId {
    let span = tree.create_element(STYLED_SPAN_TAG);
    write_style(tree, span, &span_style.style);
    if let Some(json) = &span_style.gradient_json {
        tree.set_attribute(span, DATA_GRADIENT, json.as_str());
    }
    span
}

// =============================================================================
// Wrapping
// =============================================================================

/// Wrap the live selection in a new styled span.
///
/// The selection must be non-collapsed and lie inside `host`. The touched
/// formatting properties are stripped from everything the span ends up
/// containing, so an inner `<b>` cannot override a bold toggle. On success
/// the span gets a fresh `data-inline-style-id`, the live selection selects
/// its contents, and the span is returned.
pub fn apply_styles_to_selection(
    tree: &mut DomTree,
    host: NodeId,
    intent: &StyleIntent,
    ids: &mut StyleIdAllocator,
) -> Option<NodeId> {
    let Some(range) = tree.selection() else {
        debug!("no live selection to style");
        return None;
    };
    if range.collapsed() || !is_range_in_host(tree, &range, host) {
        debug!(?range, "selection is collapsed or outside the host");
        return None;
    }

    let span_style = resolve_span_style(tree, host, range.start_container(), intent)?;
    let span = create_span(tree, &span_style);

    if let Err(err) = wrap_by_extraction(tree, range, span, intent) {
        debug!(%err, "extract-and-insert failed, falling back to surround");
        if let Err(err) = wrap_by_surrounding(tree, range, span, intent) {
            debug!(%err, "could not wrap selection");
            return None;
        }
    }

    tree.set_attribute(span, DATA_INLINE_STYLE_ID, ids.allocate());
    let _ = prune_empty_inline(tree, host, span);
    tree.set_selection(Range::select_node_contents(tree, span));
    Some(span)
}

/// Extract the range into `span` and insert the span where the range was.
///
/// A range starting inside a comment is refused before anything moves, since
/// nothing can be inserted there. If the insert still fails, the extracted
/// content is put back.
fn wrap_by_extraction(
    tree: &mut DomTree,
    mut range: Range,
    span: NodeId,
    intent: &StyleIntent,
) -> Result<(), DomError> {
    if matches!(
        tree.get(range.start_container()).map(|n| &n.node_type),
        Some(NodeType::Comment(_))
    ) {
        return Err(DomError::HierarchyRequest);
    }
    let fragment = range.extract_contents(tree)?;
    for property in intent.touched_formats() {
        let _ = strip_format_property(tree, fragment, property);
    }
    tree.move_children(fragment, span);
    if let Err(err) = range.insert_node(tree, span) {
        tree.move_children(span, fragment);
        if let Err(restore) = range.insert_node(tree, fragment) {
            debug!(%restore, "could not put extracted content back");
        }
        return Err(err);
    }
    Ok(())
}

/// `Range::surround_contents`, which refuses ranges that cut through an
/// element.
fn wrap_by_surrounding(
    tree: &mut DomTree,
    mut range: Range,
    span: NodeId,
    intent: &StyleIntent,
) -> Result<(), DomError> {
    range.surround_contents(tree, span)?;
    for property in intent.touched_formats() {
        let _ = strip_format_property(tree, span, property);
    }
    Ok(())
}

/// Insert an empty styled span at a collapsed selection, for text the user
/// is about to type.
///
/// The span holds a single zero-width space so the caret has somewhere to
/// live; the sanitizer removes it on save. On success the caret sits after
/// the zero-width space, inside the span.
pub fn insert_styled_span_at_caret(
    tree: &mut DomTree,
    host: NodeId,
    intent: &StyleIntent,
    ids: &mut StyleIdAllocator,
) -> Option<NodeId> {
    let mut range = tree.selection()?;
    if !range.collapsed() || !is_range_in_host(tree, &range, host) {
        debug!(?range, "caret is not collapsed inside the host");
        return None;
    }

    let span_style = resolve_span_style(tree, host, range.start_container(), intent)?;
    let span = create_span(tree, &span_style);
    let caret_host = tree.create_text(ZERO_WIDTH_SPACE.to_string());
    tree.append_child(span, caret_host);

    if let Err(err) = range.insert_node(tree, span) {
        debug!(%err, "could not insert caret span");
        return None;
    }
    tree.set_attribute(span, DATA_INLINE_STYLE_ID, ids.allocate());
    tree.set_selection(Range::collapsed_at(caret_host, 1));
    Some(span)
}

// =============================================================================
// In-place updates
// =============================================================================

/// Merge `intent` into an existing span's style.
///
/// Only the properties the intent mentions change. `data-gradient` follows
/// the fill: written for a new gradient, dropped when the gradient is unset
/// or replaced by a solid color. Formatting properties the intent touches
/// are stripped from the span's descendants as in the wrap path.
///
/// Returns false if `span` is not a span or the intent carries an invalid
/// gradient.
pub fn update_span_style(tree: &mut DomTree, span: NodeId, intent: &StyleIntent) -> bool {
    if !is_span(tree, span) {
        return false;
    }
    let gradient_json = match &intent.gradient {
        Change::Set(gradient) => match gradient.to_json() {
            Ok(json) => Some(json),
            Err(err) => {
                debug!(%err, "rejecting style update with invalid gradient");
                return false;
            }
        },
        _ => None,
    };

    let mut style = style_of(tree, span);
    build_style_updates(intent).apply_to(&mut style);
    write_style(tree, span, &style);

    if let Some(json) = gradient_json {
        tree.set_attribute(span, DATA_GRADIENT, json);
    } else if intent.gradient.is_unset() || intent.color.as_set().is_some() {
        let _ = tree.remove_attribute(span, DATA_GRADIENT);
    }

    for property in intent.touched_formats() {
        let _ = strip_format_property(tree, span, property);
    }
    true
}
