//! Tests for style intents and the intent-to-CSS builder.

use tinct_css::{CssProperty, GRADIENT_PROPERTIES, StyleMap};
use tinct_editor::{
    Change, FormatProperty, Gradient, GradientError, GradientKind, StyleIntent, build_style_map, build_style_string,
    build_style_updates,
};

/// Helper for a two-stop red-to-blue gradient
fn red_to_blue() -> Gradient {
    Gradient::linear(90.0, &["red", "blue"])
}

// =============================================================================
// Intent JSON
// =============================================================================

#[test]
fn test_missing_field_is_keep_null_is_unset_value_is_set() {
    let intent: StyleIntent = serde_json::from_str(r#"{"fontWeight": null, "color": "red"}"#).unwrap();
    assert_eq!(intent.font_weight, Change::Unset);
    assert_eq!(intent.color, Change::Set("red".to_string()));
    assert_eq!(intent.font_style, Change::Keep);
    assert_eq!(intent.gradient, Change::Keep);
}

#[test]
fn test_keep_fields_are_not_serialized() {
    let intent = StyleIntent {
        font_weight: Change::Unset,
        ..StyleIntent::color("red")
    };
    let json = serde_json::to_string(&intent).unwrap();
    assert_eq!(json, r#"{"color":"red","fontWeight":null}"#);
    let back: StyleIntent = serde_json::from_str(&json).unwrap();
    assert_eq!(back, intent);
}

#[test]
fn test_gradient_json_shape() {
    let json = red_to_blue().to_json().unwrap();
    assert_eq!(
        json,
        r#"{"type":"linear","angle":90.0,"stops":[{"color":"red","position":0.0},{"color":"blue","position":100.0}]}"#
    );
    assert_eq!(Gradient::from_json(&json).unwrap(), red_to_blue());
}

#[test]
fn test_gradient_defaults_when_fields_missing() {
    let gradient = Gradient::from_json(r##"{"stops":[{"color":"#fff","position":0}]}"##).unwrap();
    assert_eq!(gradient.kind, GradientKind::Linear);
    assert!((gradient.angle - 90.0).abs() < f64::EPSILON);
}

#[test]
fn test_gradient_rejects_bad_payloads() {
    assert!(matches!(Gradient::from_json("not json"), Err(GradientError::Json(_))));
    assert!(matches!(Gradient::from_json(r#"{"stops":[]}"#), Err(GradientError::NoStops)));
    assert!(matches!(
        Gradient::from_json(r#"{"stops":[{"color":"red; x: y","position":0}]}"#),
        Err(GradientError::InvalidColor(_))
    ));
}

#[test]
fn test_gradient_css() {
    assert_eq!(red_to_blue().to_css(), "linear-gradient(90deg, red 0%, blue 100%)");
    let radial = Gradient {
        kind: GradientKind::Radial,
        ..Gradient::linear(0.0, &["rgb(0, 0, 0)", "#fff"])
    };
    assert_eq!(radial.to_css(), "radial-gradient(circle, rgb(0, 0, 0) 0%, #fff 100%)");
}

// =============================================================================
// New spans
// =============================================================================

#[test]
fn test_color_only() {
    assert_eq!(build_style_string(&StyleIntent::color("red")), "color: red");
}

#[test]
fn test_gradient_emits_clip_quartet_and_fallback_color() {
    let map = build_style_map(&StyleIntent::gradient(red_to_blue()));
    assert_eq!(
        map.to_string(),
        "background-image: linear-gradient(90deg, red 0%, blue 100%); \
         -webkit-background-clip: text; background-clip: text; \
         -webkit-text-fill-color: transparent; color: transparent"
    );
}

#[test]
fn test_gradient_wins_over_color() {
    let intent = StyleIntent {
        color: Change::Set("red".to_string()),
        ..StyleIntent::gradient(red_to_blue())
    };
    let map = build_style_map(&intent);
    assert_eq!(map.get(CssProperty::Color), Some("transparent"));
    assert!(map.contains(CssProperty::BackgroundImage));
}

#[test]
fn test_keep_and_unset_emit_nothing_for_new_span() {
    let intent = StyleIntent {
        color: Change::Unset,
        font_style: Change::Unset,
        ..StyleIntent::format(FormatProperty::FontWeight, Change::Set("700".to_string()))
    };
    assert_eq!(build_style_string(&intent), "font-weight: 700");
    assert_eq!(build_style_string(&StyleIntent::default()), "");
}

// =============================================================================
// In-place updates
// =============================================================================

#[test]
fn test_color_update_clears_gradient() {
    let mut map = build_style_map(&StyleIntent::gradient(red_to_blue()));
    map.set(CssProperty::FontWeight, "700");

    let updates = build_style_updates(&StyleIntent::color("green"));
    for property in GRADIENT_PROPERTIES {
        assert!(updates.unset.contains(&property));
    }
    updates.apply_to(&mut map);
    assert_eq!(map.to_string(), "color: green; font-weight: 700");
}

#[test]
fn test_unset_gradient_removes_fallback_color() {
    let mut map = build_style_map(&StyleIntent::gradient(red_to_blue()));
    let intent = StyleIntent {
        gradient: Change::Unset,
        ..StyleIntent::default()
    };
    build_style_updates(&intent).apply_to(&mut map);
    assert!(map.is_empty());
}

#[test]
fn test_format_unset_leaves_color_alone() {
    let mut map = StyleMap::parse("color: red; font-weight: 700");
    let updates = build_style_updates(&StyleIntent::format(FormatProperty::FontWeight, Change::Unset));
    assert!(updates.set.is_empty());
    assert_eq!(updates.unset, vec![CssProperty::FontWeight]);
    updates.apply_to(&mut map);
    assert_eq!(map.to_string(), "color: red");
}

#[test]
fn test_empty_intent_has_no_updates() {
    assert!(build_style_updates(&StyleIntent::default()).is_empty());
}

// =============================================================================
// Formatting properties
// =============================================================================

#[test]
fn test_active_values() {
    assert!(FormatProperty::FontWeight.is_active_value("bold"));
    assert!(FormatProperty::FontWeight.is_active_value("600"));
    assert!(!FormatProperty::FontWeight.is_active_value("400"));
    assert!(FormatProperty::FontStyle.is_active_value("oblique 10deg"));
    assert!(FormatProperty::TextDecoration.is_active_value("underline dotted"));
    assert!(!FormatProperty::TextDecoration.is_active_value("line-through"));
}

#[test]
fn test_legacy_tag_lookup() {
    assert_eq!(FormatProperty::for_legacy_tag("strong"), Some(FormatProperty::FontWeight));
    assert_eq!(FormatProperty::for_legacy_tag("em"), Some(FormatProperty::FontStyle));
    assert_eq!(FormatProperty::for_legacy_tag("u"), Some(FormatProperty::TextDecoration));
    assert_eq!(FormatProperty::for_legacy_tag("span"), None);
}
