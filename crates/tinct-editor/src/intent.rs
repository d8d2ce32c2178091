//! Formatting requests coming from UI controls.

use core::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use tinct_css::CssProperty;

use crate::error::GradientError;

/// A tri-state field of a [`StyleIntent`].
///
/// With `#[serde(default)]` on the containing struct, a missing JSON field is
/// `Keep`, `null` is `Unset` and any value is `Set`. `Keep` fields must be
/// skipped when serializing (see [`Change::is_keep`]) or they come back as
/// `Unset`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Change<T> {
    /// Leave whatever is there alone.
    #[default]
    Keep,
    /// Remove the property.
    Unset,
    /// Set the property to this value.
    Set(T),
}

impl<T> Change<T> {
    /// Returns true for [`Change::Keep`].
    pub const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    /// Returns true for [`Change::Unset`].
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// The value to set, if any.
    pub const fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }

    /// Returns true unless this is [`Change::Keep`].
    pub const fn touches(&self) -> bool {
        !self.is_keep()
    }
}

impl<T> From<Option<T>> for Change<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Unset, Self::Set)
    }
}

impl<T: Serialize> Serialize for Change<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Set(value) => serializer.serialize_some(value),
            Self::Keep | Self::Unset => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Change<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

/// The transient request a formatting control sends to the engine.
///
/// Each field is tri-state so that one toggle never clobbers unrelated state:
/// toggling bold leaves an existing gradient alone because `gradient` is
/// `Keep`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleIntent {
    /// Solid text color.
    #[serde(skip_serializing_if = "Change::is_keep")]
    pub color: Change<String>,
    /// Gradient text fill.
    #[serde(skip_serializing_if = "Change::is_keep")]
    pub gradient: Change<Gradient>,
    /// `font-weight` value, e.g. `700`.
    #[serde(skip_serializing_if = "Change::is_keep")]
    pub font_weight: Change<String>,
    /// `font-style` value, e.g. `italic`.
    #[serde(skip_serializing_if = "Change::is_keep")]
    pub font_style: Change<String>,
    /// `text-decoration` value, e.g. `underline`.
    #[serde(skip_serializing_if = "Change::is_keep")]
    pub text_decoration: Change<String>,
}

impl StyleIntent {
    /// An intent that only sets a solid color.
    #[must_use]
    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Change::Set(color.into()),
            ..Self::default()
        }
    }

    /// An intent that only sets a gradient fill.
    #[must_use]
    pub fn gradient(gradient: Gradient) -> Self {
        Self {
            gradient: Change::Set(gradient),
            ..Self::default()
        }
    }

    /// An intent that only changes one formatting property.
    #[must_use]
    pub fn format(property: FormatProperty, change: Change<String>) -> Self {
        let mut intent = Self::default();
        *intent.format_mut(property) = change;
        intent
    }

    /// The change requested for a formatting property.
    #[must_use]
    pub const fn format_change(&self, property: FormatProperty) -> &Change<String> {
        match property {
            FormatProperty::FontWeight => &self.font_weight,
            FormatProperty::FontStyle => &self.font_style,
            FormatProperty::TextDecoration => &self.text_decoration,
        }
    }

    /// Mutable access to a formatting property's change.
    pub const fn format_mut(&mut self, property: FormatProperty) -> &mut Change<String> {
        match property {
            FormatProperty::FontWeight => &mut self.font_weight,
            FormatProperty::FontStyle => &mut self.font_style,
            FormatProperty::TextDecoration => &mut self.text_decoration,
        }
    }

    /// Returns true if the intent says anything about the fill.
    #[must_use]
    pub const fn touches_fill(&self) -> bool {
        self.color.touches() || self.gradient.touches()
    }

    /// The formatting properties this intent sets or unsets.
    #[must_use]
    pub fn touched_formats(&self) -> Vec<FormatProperty> {
        FormatProperty::ALL
            .into_iter()
            .filter(|&p| self.format_change(p).touches())
            .collect()
    }

    /// Returns true if every field is `Keep`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.touches_fill() && self.touched_formats().is_empty()
    }
}

/// The shape of a gradient fill.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GradientKind {
    /// [CSS Images 3 § 3.1](https://www.w3.org/TR/css-images-3/#linear-gradients)
    #[default]
    Linear,
    /// [CSS Images 3 § 3.2](https://www.w3.org/TR/css-images-3/#radial-gradients)
    Radial,
}

/// One color stop of a [`Gradient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Any CSS color.
    pub color: String,
    /// Position along the gradient line, in percent.
    pub position: f64,
}

const fn default_angle() -> f64 {
    90.0
}

/// A structured gradient description, persisted as the `data-gradient` JSON
/// because a rendered `background-image` cannot be parsed back losslessly.
///
/// ```json
/// {"type":"linear","angle":90,"stops":[{"color":"#f00","position":0},{"color":"#00f","position":100}]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    /// Linear or radial.
    #[serde(rename = "type", default)]
    pub kind: GradientKind,
    /// Direction of a linear gradient in degrees. Ignored for radial ones.
    #[serde(default = "default_angle")]
    pub angle: f64,
    /// Color stops in paint order.
    pub stops: Vec<GradientStop>,
}

impl Gradient {
    /// A linear gradient through `colors`, evenly spaced.
    #[must_use]
    pub fn linear(angle: f64, colors: &[&str]) -> Self {
        let last = colors.len().saturating_sub(1).max(1);
        #[allow(clippy::cast_precision_loss)]
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, color)| GradientStop {
                color: (*color).to_string(),
                position: (i as f64) * 100.0 / (last as f64),
            })
            .collect();
        Self {
            kind: GradientKind::Linear,
            angle,
            stops,
        }
    }

    /// Parse and validate a `data-gradient` payload.
    ///
    /// # Errors
    ///
    /// Returns [`GradientError`] if the JSON is malformed, there are no
    /// stops, or a number is not finite.
    pub fn from_json(json: &str) -> Result<Self, GradientError> {
        let gradient: Self = serde_json::from_str(json)?;
        gradient.validate()?;
        Ok(gradient)
    }

    /// Serialize to the `data-gradient` payload.
    ///
    /// # Errors
    ///
    /// Returns [`GradientError`] if the gradient is not valid.
    pub fn to_json(&self) -> Result<String, GradientError> {
        self.validate()?;
        Ok(serde_json::to_string(self)?)
    }

    /// Check the invariants [`Gradient::to_css`] relies on.
    ///
    /// # Errors
    ///
    /// See [`Gradient::from_json`].
    pub fn validate(&self) -> Result<(), GradientError> {
        if self.stops.is_empty() {
            return Err(GradientError::NoStops);
        }
        if !self.angle.is_finite() || self.stops.iter().any(|s| !s.position.is_finite()) {
            return Err(GradientError::NonFinite);
        }
        if let Some(stop) = self.stops.iter().find(|s| !is_plain_color(&s.color)) {
            return Err(GradientError::InvalidColor(stop.color.clone()));
        }
        Ok(())
    }

    /// The CSS `background-image` value.
    ///
    /// `linear-gradient(90deg, #f00 0%, #00f 100%)` or
    /// `radial-gradient(circle, #f00 0%, #00f 100%)`.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            GradientKind::Linear => write!(f, "linear-gradient({}deg", self.angle)?,
            GradientKind::Radial => f.write_str("radial-gradient(circle")?,
        }
        for stop in &self.stops {
            write!(f, ", {} {}%", stop.color.trim(), stop.position)?;
        }
        f.write_str(")")
    }
}

/// A color stop must stay inside its `linear-gradient(...)` argument: no
/// declaration or markup delimiters, no quotes, balanced parentheses.
fn is_plain_color(color: &str) -> bool {
    let mut depth = 0usize;
    for c in color.chars() {
        match c {
            ';' | '{' | '}' | '<' | '>' | '"' | '\'' | '\\' => return false,
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0 && !color.trim().is_empty()
}

/// A formatting property with toggle semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum FormatProperty {
    /// Bold.
    FontWeight,
    /// Italic.
    FontStyle,
    /// Underline.
    TextDecoration,
}

impl FormatProperty {
    /// Every formatting property.
    pub const ALL: [Self; 3] = [Self::FontWeight, Self::FontStyle, Self::TextDecoration];

    /// The CSS property this controls.
    #[must_use]
    pub const fn css_property(self) -> CssProperty {
        match self {
            Self::FontWeight => CssProperty::FontWeight,
            Self::FontStyle => CssProperty::FontStyle,
            Self::TextDecoration => CssProperty::TextDecoration,
        }
    }

    /// Presentational tags that express this property.
    #[must_use]
    pub const fn legacy_tags(self) -> &'static [&'static str] {
        match self {
            Self::FontWeight => &["b", "strong"],
            Self::FontStyle => &["i", "em"],
            Self::TextDecoration => &["u"],
        }
    }

    /// The value a legacy tag stands for, and what a toggle sets.
    #[must_use]
    pub const fn active_value(self) -> &'static str {
        match self {
            Self::FontWeight => "700",
            Self::FontStyle => "italic",
            Self::TextDecoration => "underline",
        }
    }

    /// The value that switches the property off when it is inherited.
    #[must_use]
    pub const fn inactive_value(self) -> &'static str {
        match self {
            Self::FontWeight | Self::FontStyle => "normal",
            Self::TextDecoration => "none",
        }
    }

    /// Returns true if `value` renders as "on".
    #[must_use]
    pub fn is_active_value(self, value: &str) -> bool {
        let value = value.trim().to_ascii_lowercase();
        match self {
            Self::FontWeight => match value.as_str() {
                "bold" | "bolder" => true,
                other => other.parse::<u16>().is_ok_and(|w| w >= 600),
            },
            Self::FontStyle => value == "italic" || value.starts_with("oblique"),
            Self::TextDecoration => value.split_whitespace().any(|v| v == "underline"),
        }
    }

    /// The property a presentational tag expresses.
    #[must_use]
    pub fn for_legacy_tag(tag_name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.legacy_tags().contains(&tag_name))
    }
}
