//! Inline style declarations for the tinct engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Declaration list parsing** ([§ 5.4.5](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations))
//!   for the contents of a `style` attribute, honoring strings, comments and
//!   nested parentheses so that `url(a;b)` or `"a;b"` stay intact
//! - **Serialization** ([CSSOM § 6.7.2](https://drafts.csswg.org/cssom/#serialize-a-css-declaration-block))
//!   in the `name: value; name: value` form the engine persists
//! - **Property vocabulary** the engine reads and writes
//!
//! # Not Yet Implemented
//!
//! - Value parsing (values are kept as trimmed source text)
//! - Shorthand expansion
//! - CSS escapes in property names

/// Property names touched by the styling engine.
pub mod property;
/// Ordered declaration block backed by a `style` attribute.
pub mod style_map;

pub use property::{CssProperty, FILL_PROPERTIES, GRADIENT_PROPERTIES};
pub use style_map::{Declaration, StyleMap};
