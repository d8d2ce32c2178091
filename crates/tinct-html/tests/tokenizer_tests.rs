//! Integration tests for the HTML tokenizer.

use tinct_html::{Attribute, HTMLTokenizer, Token};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = HTMLTokenizer::new(input);
    tokenizer.run();
    tokenizer.into_tokens()
}

/// Helper to collect consecutive character tokens into a string
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Character { data } => Some(*data),
            _ => None,
        })
        .collect()
}

fn attr(name: &str, value: &str) -> Attribute {
    Attribute::new(name.to_string(), value.to_string())
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H' }));
    assert!(matches!(tokens[4], Token::Character { data: 'o' }));
    assert!(matches!(tokens[5], Token::EndOfFile));
}

#[test]
fn test_start_tag_with_attributes() {
    let tokens = tokenize(r#"<span style="color: red" data-x='1' hidden>"#);
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "span");
            assert!(!self_closing);
            assert_eq!(
                attributes,
                &vec![
                    attr("style", "color: red"),
                    attr("data-x", "1"),
                    attr("hidden", "")
                ]
            );
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_tag_and_attribute_names_are_lowercased() {
    let tokens = tokenize(r#"<SPAN Style="X">"#);
    match &tokens[0] {
        Token::StartTag {
            name, attributes, ..
        } => {
            assert_eq!(name, "span");
            assert_eq!(attributes, &vec![attr("style", "X")]);
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let tokens = tokenize(r#"<span a="1" b=2 a="3">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes, &vec![attr("a", "1"), attr("b", "2")]);
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</div>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::EndTag { name } => assert_eq!(name, "div"),
        _ => panic!("Expected EndTag token"),
    }
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name, self_closing, ..
        } => {
            assert_eq!(name, "br");
            assert!(self_closing);
        }
        _ => panic!("Expected self-closing StartTag token"),
    }
}

#[test]
fn test_named_and_numeric_references_in_text() {
    let tokens = tokenize("a &amp; b &#60;&#x3E; &nbsp;&ZeroWidthSpace;");
    assert_eq!(text_of(&tokens), "a & b <> \u{A0}\u{200B}");
}

#[test]
fn test_unknown_reference_is_literal() {
    let tokens = tokenize("&bogus; &#; &");
    assert_eq!(text_of(&tokens), "&bogus; &#; &");
}

#[test]
fn test_legacy_reference_without_semicolon() {
    let tokens = tokenize("&ltx");
    assert_eq!(text_of(&tokens), "<x");
}

#[test]
fn test_attribute_reference_followed_by_equals_is_literal() {
    let tokens = tokenize(r#"<a href="?x=1&copy=2&amp;y">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes, &vec![attr("href", "?x=1&copy=2&y")]);
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_null_reference_becomes_replacement_character() {
    let tokens = tokenize("&#0;&#x110000;");
    assert_eq!(text_of(&tokens), "\u{FFFD}\u{FFFD}");
}

#[test]
fn test_script_content_is_raw_text() {
    let tokens = tokenize("<script>a<b &amp;</script>c");
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "script"));
    let end = tokens
        .iter()
        .position(|t| matches!(t, Token::EndTag { name } if name == "script"))
        .expect("script end tag");
    assert_eq!(text_of(&tokens[1..end]), "a<b &amp;");
    assert_eq!(text_of(&tokens[end..]), "c");
}

#[test]
fn test_raw_text_ignores_other_end_tags() {
    let tokens = tokenize("<style></span>x</style>");
    let end = tokens
        .iter()
        .position(|t| matches!(t, Token::EndTag { .. }))
        .expect("end tag");
    assert_eq!(text_of(&tokens[1..end]), "</span>x");
    assert!(matches!(&tokens[end], Token::EndTag { name } if name == "style"));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hi -- there -->");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::Comment { data } => assert_eq!(data, " hi -- there "),
        _ => panic!("Expected Comment token"),
    }
}

#[test]
fn test_doctype_becomes_bogus_comment() {
    let tokens = tokenize("<!DOCTYPE html>x");
    match &tokens[0] {
        Token::Comment { data } => assert_eq!(data, "DOCTYPE html"),
        _ => panic!("Expected Comment token"),
    }
    assert_eq!(text_of(&tokens), "x");
}

#[test]
fn test_lone_less_than_is_text() {
    let tokens = tokenize("1 < 2");
    assert_eq!(text_of(&tokens), "1 < 2");
}

#[test]
fn test_newlines_are_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(text_of(&tokens), "a\nb\nc");
}

#[test]
fn test_eof_in_tag_drops_tag() {
    let tokens = tokenize("x<span class=\"a");
    assert_eq!(text_of(&tokens), "x");
    assert!(tokens.iter().all(|t| !matches!(t, Token::StartTag { .. })));
    assert!(tokens.last().is_some_and(Token::is_eof));
}
