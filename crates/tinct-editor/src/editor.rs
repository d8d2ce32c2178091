//! One editable region and the state that belongs to it.

use std::path::Path;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tinct_common::warning::clear_warnings;
use tinct_dom::{DomTree, NodeId, Range};
use tinct_html::{parse_fragment, serialize_children};
use tracing::debug;

use crate::engine::{StyleIdAllocator, apply_styles_to_selection, insert_styled_span_at_caret, update_span_style};
use crate::error::ConfigError;
use crate::intent::{Change, FormatProperty, StyleIntent};
use crate::normalize::{merge_adjacent_styled_spans, unwrap_nested_styled_spans};
use crate::sanitize::sanitize_styled_html;
use crate::snapshot::{
    SelectionSnapshot, SnapshotKind, capture_selection_at, get_best_selection_range_at, is_range_in_host,
};
use crate::styled::{is_span, style_of};

/// Editor settings, loadable from JSON. Missing fields take their defaults.
///
/// ```json
/// {"snapshot_max_age_ms": 10000, "id_prefix": "is"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// How long a selection snapshot stays usable, in milliseconds.
    pub snapshot_max_age_ms: u64,
    /// Prefix of generated `data-inline-style-id` values.
    pub id_prefix: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snapshot_max_age_ms: 10_000,
            id_prefix: "is".to_string(),
        }
    }
}

impl EditorConfig {
    /// [`EditorConfig::snapshot_max_age_ms`] as a duration.
    #[must_use]
    pub const fn snapshot_max_age(&self) -> Duration {
        Duration::from_millis(self.snapshot_max_age_ms)
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON, [`ConfigError::Invalid`]
    /// for unusable values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`EditorConfig::from_json_str`].
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Check that the values can be used.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if the id prefix is blank or contains
    /// whitespace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id_prefix.is_empty() || self.id_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::Invalid {
                field: "id_prefix",
                reason: format!("{:?} must be non-empty and contain no whitespace", self.id_prefix),
            });
        }
        Ok(())
    }
}

/// A contenteditable-style region of a [`DomTree`].
///
/// Holds everything that must survive between UI events for one region:
/// the selection snapshots, the id allocator and the config. Several
/// editors can work on the same tree as long as their hosts are disjoint.
#[derive(Debug, Clone)]
pub struct InlineEditor {
    host: NodeId,
    config: EditorConfig,
    ids: StyleIdAllocator,
    last_selection: Option<SelectionSnapshot>,
    last_caret: Option<SelectionSnapshot>,
}

impl InlineEditor {
    /// An editor for the region rooted at `host`.
    #[must_use]
    pub fn new(host: NodeId, config: EditorConfig) -> Self {
        let ids = StyleIdAllocator::new(config.id_prefix.clone());
        Self {
            host,
            config,
            ids,
            last_selection: None,
            last_caret: None,
        }
    }

    /// The host element.
    #[must_use]
    pub const fn host(&self) -> NodeId {
        self.host
    }

    /// The active config.
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The last non-collapsed selection seen inside the host.
    #[must_use]
    pub const fn last_selection(&self) -> Option<&SelectionSnapshot> {
        self.last_selection.as_ref()
    }

    /// The last caret position seen inside the host.
    #[must_use]
    pub const fn last_caret(&self) -> Option<&SelectionSnapshot> {
        self.last_caret.as_ref()
    }

    // =========================================================================
    // Content
    // =========================================================================

    /// Replace the host's content with sanitized `html`.
    ///
    /// Snapshots into the old content are dropped, and ids found in the new
    /// content are reserved.
    pub fn load_html(&mut self, tree: &mut DomTree, html: &str) {
        clear_warnings();
        let clean = sanitize_styled_html(html);
        for child in tree.children(self.host).to_vec() {
            tree.remove_child(self.host, child);
        }
        parse_fragment(tree, self.host, &clean);
        self.ids.seed_from(tree, self.host);
        self.last_selection = None;
        self.last_caret = None;
        if tree.selection().is_some_and(|range| !range.is_valid(tree)) {
            tree.remove_all_ranges();
        }
    }

    /// The host's content as sanitized HTML.
    #[must_use]
    pub fn save_html(&self, tree: &DomTree) -> String {
        sanitize_styled_html(&serialize_children(tree, self.host))
    }

    /// Collapse nested spans and merge identical neighbours.
    /// Returns the number of merges.
    pub fn normalize(&self, tree: &mut DomTree) -> usize {
        unwrap_nested_styled_spans(tree, self.host) + merge_adjacent_styled_spans(tree, self.host)
    }

    // =========================================================================
    // Selection tracking
    // =========================================================================

    /// Record the live selection if it lies inside the host.
    pub fn on_selection_change(&mut self, tree: &DomTree) {
        self.on_selection_change_at(tree, Instant::now());
    }

    /// [`InlineEditor::on_selection_change`] with an explicit clock reading.
    pub fn on_selection_change_at(&mut self, tree: &DomTree, now: Instant) {
        let Some(snapshot) = capture_selection_at(tree, self.host, now) else {
            return;
        };
        match snapshot.kind {
            SnapshotKind::Selection => self.last_selection = Some(snapshot),
            SnapshotKind::Caret => self.last_caret = Some(snapshot),
        }
    }

    /// The range a style would be applied to right now.
    #[must_use]
    pub fn best_range_at(&self, tree: &DomTree, now: Instant) -> Option<Range> {
        get_best_selection_range_at(
            tree,
            self.host,
            self.last_selection.as_ref(),
            self.last_caret.as_ref(),
            self.config.snapshot_max_age(),
            now,
        )
    }

    // =========================================================================
    // Styling
    // =========================================================================

    /// Apply `intent` where the user last pointed.
    ///
    /// A caret gets an empty styled span to type into. A range that exactly
    /// covers an existing span's text updates that span in place, which is
    /// what keeps slider drags from nesting spans. Anything else is wrapped
    /// in a new span. Nested spans are collapsed afterwards.
    ///
    /// Returns the span that now carries the style, or `None` if nothing
    /// could be styled.
    pub fn apply_style(&mut self, tree: &mut DomTree, intent: &StyleIntent) -> Option<NodeId> {
        self.apply_style_at(tree, intent, Instant::now())
    }

    /// [`InlineEditor::apply_style`] with an explicit clock reading.
    pub fn apply_style_at(&mut self, tree: &mut DomTree, intent: &StyleIntent, now: Instant) -> Option<NodeId> {
        let Some(range) = self.best_range_at(tree, now) else {
            debug!("no usable selection for style");
            return None;
        };
        tree.remove_all_ranges();
        tree.set_selection(range);

        let (span, caret) = if range.collapsed() {
            (insert_styled_span_at_caret(tree, self.host, intent, &mut self.ids)?, true)
        } else if let Some(span) = exact_cover_span(tree, self.host, &range) {
            if !update_span_style(tree, span, intent) {
                return None;
            }
            tree.set_selection(Range::select_node_contents(tree, span));
            (span, false)
        } else {
            (apply_styles_to_selection(tree, self.host, intent, &mut self.ids)?, false)
        };

        let anchor = tree.first_child(span);
        let _ = unwrap_nested_styled_spans(tree, self.host);
        let span = if tree.is_connected(span) {
            span
        } else {
            let survivor = anchor.and_then(|a| nearest_span(tree, self.host, a))?;
            if !caret {
                tree.set_selection(Range::select_node_contents(tree, survivor));
            }
            survivor
        };

        self.on_selection_change_at(tree, now);
        Some(span)
    }

    /// Toggle a formatting property over the current selection.
    ///
    /// If the property is off it is switched on. If it is on because the
    /// selected span says so, that declaration is removed; if it is on
    /// because of an ancestor, it is overridden with the "off" value.
    pub fn toggle_format(&mut self, tree: &mut DomTree, property: FormatProperty) -> Option<NodeId> {
        self.toggle_format_at(tree, property, Instant::now())
    }

    /// [`InlineEditor::toggle_format`] with an explicit clock reading.
    pub fn toggle_format_at(&mut self, tree: &mut DomTree, property: FormatProperty, now: Instant) -> Option<NodeId> {
        let range = self.best_range_at(tree, now)?;
        let change = if is_format_active(tree, self.host, range.start_container(), property) {
            let covering = exact_cover_spans(tree, self.host, &range);
            let own = covering.last().is_some_and(|&outermost| {
                covering
                    .iter()
                    .any(|&span| style_of(tree, span).contains(property.css_property()))
                    && !tree
                        .parent(outermost)
                        .is_some_and(|parent| is_format_active(tree, self.host, parent, property))
            });
            if own {
                Change::Unset
            } else {
                Change::Set(property.inactive_value().to_string())
            }
        } else {
            Change::Set(property.active_value().to_string())
        };
        self.apply_style_at(tree, &StyleIntent::format(property, change), now)
    }
}

/// Returns true if text at `node` renders with `property` switched on.
///
/// The nearest span declaring the property decides; a legacy tag on the way
/// up counts as on.
#[must_use]
pub fn is_format_active(tree: &DomTree, host: NodeId, node: NodeId, property: FormatProperty) -> bool {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .take_while(|&n| n != host)
        .find_map(|n| {
            let element = tree.as_element(n)?;
            if property.legacy_tags().contains(&element.tag_name.as_str()) {
                return Some(true);
            }
            if !is_span(tree, n) {
                return None;
            }
            style_of(tree, n)
                .get(property.css_property())
                .map(|value| property.is_active_value(value))
        })
        .unwrap_or(false)
}

/// The outermost span whose whole text is exactly the range's text and
/// which contains both ends of the range.
///
/// Nested spans covering the same text are collapsed with the outer span's
/// declarations winning, so an update must land on the outermost one.
fn exact_cover_span(tree: &DomTree, host: NodeId, range: &Range) -> Option<NodeId> {
    exact_cover_spans(tree, host, range).last().copied()
}

/// Every span whose text is exactly the range's text, innermost first.
fn exact_cover_spans(tree: &DomTree, host: NodeId, range: &Range) -> Vec<NodeId> {
    if !is_range_in_host(tree, range, host) {
        return Vec::new();
    }
    let text = range.text(tree);
    let Some(common) = range.common_ancestor_container(tree) else {
        return Vec::new();
    };
    std::iter::once(common)
        .chain(tree.ancestors(common))
        .take_while(|&n| n != host)
        .filter(|&n| is_span(tree, n) && tree.text_content(n) == text)
        .collect()
}

fn nearest_span(tree: &DomTree, host: NodeId, node: NodeId) -> Option<NodeId> {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .take_while(|&n| n != host)
        .find(|&n| is_span(tree, n))
}
