//! Inline rich-text styling for the tinct engine.
//!
//! Turns formatting requests from UI controls into `<span style="...">`
//! markup inside an editable region, and keeps that markup tidy and safe.
//!
//! # Scope
//!
//! This crate implements:
//! - **Style intents** - tri-state requests that never clobber properties
//!   they do not mention
//! - **Style builder** - intent to declarations, for new spans and in-place
//!   updates
//! - **Wrap/update engine** - wrapping a selection, inserting a caret span,
//!   updating a span where it stands
//! - **Normalization** - collapsing nested spans, merging identical
//!   neighbours
//! - **Sanitizer** - the allow-list pass applied on load and save
//! - **Selection snapshots** - surviving focus loss to popovers and pickers
//! - **[`InlineEditor`]** - per-region state tying the above together
//!
//! # Example
//!
//! ```
//! use tinct_dom::{DomTree, NodeId, Range};
//! use tinct_editor::{EditorConfig, InlineEditor, StyleIntent};
//!
//! let mut tree = DomTree::new();
//! let host = tree.create_element("div");
//! tree.append_child(NodeId::ROOT, host);
//!
//! let mut editor = InlineEditor::new(host, EditorConfig::default());
//! editor.load_html(&mut tree, "Hello world");
//!
//! let text = tree.children(host)[0];
//! let mut range = Range::collapsed_at(text, 6);
//! range.set_end(&tree, text, 11).unwrap();
//! tree.set_selection(range);
//!
//! editor.apply_style(&mut tree, &StyleIntent::color("red"));
//! assert_eq!(
//!     editor.save_html(&tree),
//!     r#"Hello <span style="color: red" data-inline-style-id="is-1">world</span>"#
//! );
//! ```

/// Intent to CSS declarations.
pub mod builder;
/// Per-region editor state.
pub mod editor;
/// Wrapping and updating styled spans.
pub mod engine;
/// Error types.
pub mod error;
/// Formatting requests.
pub mod intent;
/// Nested and adjacent span clean-up.
pub mod normalize;
/// The load/save allow-list pass.
pub mod sanitize;
/// Selection snapshots.
pub mod snapshot;

mod styled;

pub use builder::{Fill, StyleUpdates, build_style_map, build_style_string, build_style_updates};
pub use editor::{EditorConfig, InlineEditor, is_format_active};
pub use engine::{StyleIdAllocator, apply_styles_to_selection, insert_styled_span_at_caret, update_span_style};
pub use error::{ConfigError, GradientError};
pub use intent::{Change, FormatProperty, Gradient, GradientKind, GradientStop, StyleIntent};
pub use normalize::{merge_adjacent_styled_spans, strip_format_property, unwrap_nested_styled_spans};
pub use sanitize::{SanitizeReport, sanitize_styled_html, sanitize_styled_html_with_report};
pub use snapshot::{
    SelectionSnapshot, SnapshotKind, capture_selection, capture_selection_at, get_best_selection_range,
    get_best_selection_range_at, is_range_in_host, is_range_valid, restore_selection, restore_selection_at, text_range,
};
