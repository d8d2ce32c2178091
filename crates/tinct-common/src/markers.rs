//! Attribute names and sentinel characters shared across crates.

/// Zero-width space used to host the caret inside an otherwise empty span.
///
/// Stripped from every text node by the sanitizer.
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

/// The only element the engine uses for inline formatting.
pub const STYLED_SPAN_TAG: &str = "span";

/// JSON-serialized gradient description.
///
/// CSS `background-image` cannot be parsed back losslessly, so the structured
/// form travels alongside it. Present if and only if the fill is a gradient.
pub const DATA_GRADIENT: &str = "data-gradient";

/// Stable identifier used to re-acquire a span across re-renders.
pub const DATA_INLINE_STYLE_ID: &str = "data-inline-style-id";

/// The inline style attribute.
pub const STYLE_ATTR: &str = "style";

/// Returns true if `name` is one of the engine's own data attributes.
#[must_use]
pub fn is_engine_data_attribute(name: &str) -> bool {
    name == DATA_GRADIENT || name == DATA_INLINE_STYLE_ID
}
