//! HTML tokenizer module.
//!
//! Implements the subset of [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! needed for inline fragments.

/// Character reference decoding per § 13.2.5.72.
pub mod character_reference;
/// HTML tokenizer state machine implementation.
pub mod state_machine;
/// Token types produced by the tokenizer.
pub mod token;

pub use self::state_machine::{HTMLTokenizer, TokenizerState};
pub use self::token::{Attribute, Token};
