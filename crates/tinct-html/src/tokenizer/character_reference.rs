//! [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
//!
//! Decoding of numeric references and of the named references that show up
//! in edited inline content. Unknown names are left as literal text, which
//! is also what the full algorithm does for names outside its table.

/// Named references recognised by the tokenizer.
///
/// [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html)
/// (subset). The flag marks the legacy names that are also matched without a
/// trailing semicolon.
const NAMED_REFERENCES: &[(&str, &str, bool)] = &[
    ("amp", "&", true),
    ("lt", "<", true),
    ("gt", ">", true),
    ("quot", "\"", true),
    ("nbsp", "\u{A0}", true),
    ("copy", "\u{A9}", true),
    ("reg", "\u{AE}", true),
    ("apos", "'", false),
    ("hellip", "\u{2026}", false),
    ("mdash", "\u{2014}", false),
    ("ndash", "\u{2013}", false),
    ("lsquo", "\u{2018}", false),
    ("rsquo", "\u{2019}", false),
    ("ldquo", "\u{201C}", false),
    ("rdquo", "\u{201D}", false),
    ("trade", "\u{2122}", false),
    ("ZeroWidthSpace", "\u{200B}", false),
];

/// Decode a character reference whose `&` has just been consumed.
///
/// `rest` is the input after the ampersand. Returns the replacement text and
/// the number of bytes of `rest` it spans, or None if the ampersand is a
/// literal.
///
/// `in_attribute` applies the historical rule from § 13.2.5.73: "If the
/// character reference was consumed as part of an attribute, and the last
/// character matched is not a U+003B SEMICOLON character (;), and the next
/// input character is either a U+003D EQUALS SIGN character (=) or an ASCII
/// alphanumeric, then ... flush code points consumed as a character
/// reference."
#[must_use]
pub fn decode(rest: &str, in_attribute: bool) -> Option<(String, usize)> {
    if let Some(numeric) = rest.strip_prefix('#') {
        return decode_numeric(numeric).map(|(s, len)| (s, len + 1));
    }

    let name_len = rest
        .char_indices()
        .find(|(_, c)| !c.is_ascii_alphanumeric())
        .map_or(rest.len(), |(i, _)| i);
    let name = &rest[..name_len];
    let terminated = rest[name_len..].starts_with(';');

    if terminated
        && let Some((_, value, _)) = NAMED_REFERENCES.iter().find(|(n, _, _)| *n == name)
    {
        return Some(((*value).to_string(), name_len + 1));
    }

    // Legacy names without a semicolon match as a prefix: "&ampx" is "&x".
    for (legacy, value, _) in NAMED_REFERENCES.iter().filter(|(_, _, legacy)| *legacy) {
        if let Some(after) = name.strip_prefix(legacy) {
            if in_attribute && (!after.is_empty() || rest[legacy.len()..].starts_with('=')) {
                return None;
            }
            return Some(((*value).to_string(), legacy.len()));
        }
    }
    None
}

/// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
fn decode_numeric(rest: &str) -> Option<(String, usize)> {
    let (digits_start, radix) = match rest.chars().next() {
        Some('x' | 'X') => (1, 16),
        _ => (0, 10),
    };
    let digits = &rest[digits_start..];
    let digits_len = digits
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map_or(digits.len(), |(i, _)| i);
    // "absence-of-digits-in-numeric-character-reference parse error ...
    // flush code points consumed as a character reference."
    if digits_len == 0 {
        return None;
    }
    let mut consumed = digits_start + digits_len;
    if digits[digits_len..].starts_with(';') {
        consumed += 1;
    }

    // [§ 13.2.5.80 Numeric character reference end state]
    // "If the number is 0x00 ... greater than 0x10FFFF ... a surrogate ...
    // set the character reference code to 0xFFFD."
    let code = u32::from_str_radix(&digits[..digits_len], radix).unwrap_or(u32::MAX);
    let c = match code {
        0 => '\u{FFFD}',
        _ => char::from_u32(code).unwrap_or('\u{FFFD}'),
    };
    Some((c.to_string(), consumed))
}
