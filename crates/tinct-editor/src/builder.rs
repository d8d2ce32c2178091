//! Translation of a [`StyleIntent`] into CSS declarations.

use tinct_css::{CssProperty, GRADIENT_PROPERTIES, StyleMap};

use crate::intent::{Change, FormatProperty, Gradient, StyleIntent};

/// The text fill of a styled span.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    /// A structured gradient, rendered and mirrored into `data-gradient`.
    Gradient(Gradient),
    /// A solid `color`.
    Color(String),
    /// A `background-image` with no structured description.
    Image(String),
}

/// Declarations that paint the text with `image`.
///
/// The image is clipped to the glyphs and the glyph color is made
/// transparent, with `color: transparent` as the fallback for engines that
/// ignore `-webkit-text-fill-color`.
#[must_use]
pub fn gradient_declarations(image: &str) -> StyleMap {
    [
        (CssProperty::BackgroundImage, image),
        (CssProperty::WebkitBackgroundClip, "text"),
        (CssProperty::BackgroundClip, "text"),
        (CssProperty::WebkitTextFillColor, "transparent"),
        (CssProperty::Color, "transparent"),
    ]
    .into_iter()
    .collect()
}

/// Declarations for a fill.
#[must_use]
pub fn fill_declarations(fill: &Fill) -> StyleMap {
    match fill {
        Fill::Gradient(gradient) => gradient_declarations(&gradient.to_css()),
        Fill::Image(image) => gradient_declarations(image),
        Fill::Color(color) => std::iter::once((CssProperty::Color, color.as_str())).collect(),
    }
}

/// The fill an intent sets, if any. A gradient wins over a solid color
/// requested in the same intent.
#[must_use]
pub fn intent_fill(intent: &StyleIntent) -> Option<Fill> {
    if let Change::Set(gradient) = &intent.gradient {
        return Some(Fill::Gradient(gradient.clone()));
    }
    intent.color.as_set().map(|c| Fill::Color(c.clone()))
}

/// The declarations for a newly created span.
///
/// Color and gradient are mutually exclusive. Fields that are `Keep` or
/// `Unset` produce nothing: there is nothing to remove on a new span.
#[must_use]
pub fn build_style_map(intent: &StyleIntent) -> StyleMap {
    let mut map = intent_fill(intent).map(|f| fill_declarations(&f)).unwrap_or_default();
    for property in FormatProperty::ALL {
        if let Change::Set(value) = intent.format_change(property) {
            map.set(property.css_property(), value.as_str());
        }
    }
    map
}

/// The `style` attribute text for a newly created span, e.g.
/// `color: red; font-weight: 700`.
#[must_use]
pub fn build_style_string(intent: &StyleIntent) -> String {
    build_style_map(intent).to_string()
}

/// In-place edits to an existing span's style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleUpdates {
    /// Declarations to add or overwrite.
    pub set: StyleMap,
    /// Properties to remove.
    pub unset: Vec<CssProperty>,
}

impl StyleUpdates {
    /// Returns true if applying these updates changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }

    /// Apply to `map`: removals first, then assignments, so an assignment
    /// always survives a removal of the same property.
    pub fn apply_to(&self, map: &mut StyleMap) {
        for property in &self.unset {
            let _ = map.remove(property);
        }
        for declaration in self.set.iter() {
            map.set(&declaration.name, declaration.value.as_str());
        }
    }

    fn unset(&mut self, property: CssProperty) {
        if !self.unset.contains(&property) {
            self.unset.push(property);
        }
    }
}

/// The edits that carry `intent` onto an existing span.
///
/// `Unset` fields are removed, `Set` fields are written, `Keep` fields are
/// left alone. Setting a solid color removes every gradient property;
/// unsetting the gradient also removes its `color: transparent` fallback.
#[must_use]
pub fn build_style_updates(intent: &StyleIntent) -> StyleUpdates {
    let mut updates = StyleUpdates::default();

    match (&intent.gradient, &intent.color) {
        (Change::Set(gradient), _) => {
            updates.set = gradient_declarations(&gradient.to_css());
        }
        (gradient, color) => {
            if gradient.is_unset() {
                GRADIENT_PROPERTIES.into_iter().for_each(|p| updates.unset(p));
                updates.unset(CssProperty::Color);
            }
            match color {
                Change::Set(color) => {
                    GRADIENT_PROPERTIES.into_iter().for_each(|p| updates.unset(p));
                    updates.set.set(CssProperty::Color, color.as_str());
                }
                Change::Unset => updates.unset(CssProperty::Color),
                Change::Keep => {}
            }
        }
    }

    for property in FormatProperty::ALL {
        match intent.format_change(property) {
            Change::Set(value) => updates.set.set(property.css_property(), value.as_str()),
            Change::Unset => updates.unset(property.css_property()),
            Change::Keep => {}
        }
    }
    updates
}
