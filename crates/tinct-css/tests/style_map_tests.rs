//! Tests for inline style parsing and serialization.

use quickcheck::{Arbitrary, Gen};
use quickcheck_macros::quickcheck;
use strum::IntoEnumIterator;
use tinct_css::{CssProperty, StyleMap};

#[test]
fn test_parse_basic_declarations() {
    let map = StyleMap::parse("color: red; font-weight: 700");
    assert_eq!(map.len(), 2);
    assert_eq!(map.get("color"), Some("red"));
    assert_eq!(map.get(CssProperty::FontWeight), Some("700"));
}

#[test]
fn test_serialize_has_no_trailing_semicolon() {
    let map = StyleMap::parse("color:red;;font-weight :  700 ;");
    assert_eq!(map.to_string(), "color: red; font-weight: 700");
}

#[test]
fn test_semicolons_inside_functions_and_strings_do_not_split() {
    let map = StyleMap::parse(r#"background-image: url("a;b.png"); font-family: "x;y", serif"#);
    assert_eq!(map.get("background-image"), Some(r#"url("a;b.png")"#));
    assert_eq!(map.get("font-family"), Some(r#""x;y", serif"#));
}

#[test]
fn test_gradient_value_survives() {
    let css = "background-image: linear-gradient(90deg, #ff0000 0%, rgba(0, 0, 255, 0.5) 100%)";
    let map = StyleMap::parse(css);
    assert_eq!(map.to_string(), css);
}

#[test]
fn test_malformed_declarations_are_dropped() {
    let map = StyleMap::parse("color red; : blue; font-style: ; x$y: 1; font-weight: bold");
    assert_eq!(map.to_string(), "font-weight: bold");
}

#[test]
fn test_unterminated_string_or_block_is_dropped() {
    let map = StyleMap::parse("color: red; font-family: 'a");
    assert_eq!(map.to_string(), "color: red");

    let map = StyleMap::parse("color: red; background-image: url(a.png");
    assert_eq!(map.to_string(), "color: red");

    // The open quote runs to the end, so nothing after it survives either.
    let map = StyleMap::parse("font-family: \"a; color: blue");
    assert!(map.is_empty());
}

#[test]
fn test_appended_declaration_survives_reparse() {
    let mut map = StyleMap::parse("font-family: 'a");
    map.set(CssProperty::Color, "blue");
    let reparsed = StyleMap::parse(&map.to_string());
    assert_eq!(reparsed.get("color"), Some("blue"));
    assert_eq!(reparsed.len(), 1);
}

#[test]
fn test_comments_are_removed() {
    let map = StyleMap::parse("color: /* brand */ red; /* font-weight: 700; */ font-style: italic");
    assert_eq!(map.get("color"), Some("red"));
    assert_eq!(map.get("font-weight"), None);
    assert_eq!(map.get("font-style"), Some("italic"));
}

#[test]
fn test_important_is_preserved() {
    let map = StyleMap::parse("color: red ! IMPORTANT");
    let declaration = map.iter().next().unwrap();
    assert!(declaration.important);
    assert_eq!(declaration.value, "red");
    assert_eq!(map.to_string(), "color: red !important");
}

#[test]
fn test_later_duplicate_wins_and_moves_last() {
    let map = StyleMap::parse("color: red; font-weight: 700; COLOR: blue");
    assert_eq!(map.to_string(), "font-weight: 700; color: blue");
}

#[test]
fn test_set_updates_in_place_and_appends() {
    let mut map = StyleMap::parse("color: red; font-style: italic");
    map.set(CssProperty::Color, "blue");
    map.set(CssProperty::FontWeight, "700");
    assert_eq!(map.to_string(), "color: blue; font-style: italic; font-weight: 700");

    map.set("font-style", "  ");
    assert!(!map.contains("font-style"));
}

#[test]
fn test_overlay_prefers_other() {
    let mut inner = StyleMap::parse("color: blue; font-style: italic");
    let outer = StyleMap::parse("color: red; font-weight: 700");
    inner.overlay(&outer);
    assert_eq!(inner.to_string(), "color: red; font-style: italic; font-weight: 700");
}

#[test]
fn test_property_names() {
    assert_eq!(CssProperty::WebkitBackgroundClip.name(), "-webkit-background-clip");
    assert_eq!("text-decoration".parse::<CssProperty>().ok(), Some(CssProperty::TextDecoration));
    assert!("position".parse::<CssProperty>().is_err());
}

#[test]
fn test_every_property_name_parses_back() {
    for property in CssProperty::iter() {
        assert_eq!(property.name().parse::<CssProperty>().ok(), Some(property));
        assert_eq!(property.to_string(), property.name());
    }
}

/// A declaration with a known property and a simple token value.
#[derive(Debug, Clone)]
struct SimpleDeclaration(String, String);

impl Arbitrary for SimpleDeclaration {
    fn arbitrary(g: &mut Gen) -> Self {
        let names = ["color", "font-weight", "font-style", "display", "font-family"];
        let values = ["red", "700", "italic", "inline-block", "serif", "#fff", "rgb(1, 2, 3)"];
        let name = *g.choose(&names).unwrap_or(&"color");
        let value = *g.choose(&values).unwrap_or(&"red");
        Self(name.to_string(), value.to_string())
    }
}

#[quickcheck]
fn prop_serialization_is_a_fixed_point(declarations: Vec<SimpleDeclaration>) -> bool {
    let text = declarations
        .iter()
        .map(|SimpleDeclaration(n, v)| format!("{n}:{v}"))
        .collect::<Vec<_>>()
        .join(";");
    let once = StyleMap::parse(&text).to_string();
    let twice = StyleMap::parse(&once).to_string();
    once == twice
}
