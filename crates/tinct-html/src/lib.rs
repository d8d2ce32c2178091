//! HTML fragment tokenizer, tree builder and serializer for the tinct engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RAWTEXT, tag, attribute and comment states
//!   - Numeric and common named character references
//!
//! - **Fragment Tree Builder** ([WHATWG § 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments))
//!   - Stack of open elements rooted at a context node
//!   - Void elements, unmatched end tags, implicit close at EOF
//!
//! - **Serializer** ([WHATWG § 13.3](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments))
//!
//! # Not Yet Implemented
//!
//! - Insertion modes, implied end tags and the adoption agency algorithm:
//!   inline editing content is a flat run of phrasing elements, so
//!   misnested markup is closed in stack order instead
//! - The full named character reference table
//! - Foreign content (SVG, MathML)

/// Fragment tree construction.
pub mod parser;
/// Fragment serialization.
pub mod serializer;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{FragmentParser, ParseIssue, format_tree, parse_fragment, print_tree};
pub use serializer::{escape_text, serialize_children, serialize_node};
pub use tokenizer::{Attribute, HTMLTokenizer, Token};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
pub const VOID_ELEMENTS: [&str; 13] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose contents the tokenizer reads as raw text.
///
/// [§ 13.2.6.2](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
/// and the RCDATA equivalents, merged: character references inside them
/// are left undecoded.
pub const RAW_TEXT_ELEMENTS: [&str; 8] = [
    "script", "style", "textarea", "title", "xmp", "iframe", "noembed", "noframes",
];

/// Returns true for void elements.
#[must_use]
pub fn is_void_element(tag_name: &str) -> bool {
    VOID_ELEMENTS.contains(&tag_name)
}

/// Returns true for raw-text elements.
#[must_use]
pub fn is_raw_text_element(tag_name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&tag_name)
}
