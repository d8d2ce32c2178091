//! Common utilities for the tinct engine.
//!
//! This crate provides shared infrastructure used by all tinct components:
//! - **Warning System** - deduplicated, colored terminal output for
//!   recoverable problems (malformed markup, unparseable gradients)
//! - **Markers** - attribute names and sentinel characters that the
//!   editor, sanitizer and CLI must agree on

pub mod markers;
pub mod warning;
