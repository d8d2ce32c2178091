use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// A CSS property the engine reads or writes.
///
/// The string forms are the CSS property names, e.g.
/// `CssProperty::WebkitBackgroundClip.as_ref() == "-webkit-background-clip"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, IntoStaticStr, EnumString, EnumIter)]
pub enum CssProperty {
    /// [CSS Color 4 § 3](https://www.w3.org/TR/css-color-4/#the-color-property)
    #[strum(serialize = "color")]
    Color,
    /// [CSS Backgrounds 3 § 3.3](https://www.w3.org/TR/css-backgrounds-3/#background-image)
    #[strum(serialize = "background-image")]
    BackgroundImage,
    /// [CSS Backgrounds 4 § 3.1](https://drafts.csswg.org/css-backgrounds-4/#background-clip)
    #[strum(serialize = "background-clip")]
    BackgroundClip,
    /// Prefixed form, still required for `text` clipping in WebKit/Blink.
    #[strum(serialize = "-webkit-background-clip")]
    WebkitBackgroundClip,
    /// [Compat § 5.2](https://compat.spec.whatwg.org/#the-webkit-text-fill-color)
    #[strum(serialize = "-webkit-text-fill-color")]
    WebkitTextFillColor,
    /// [CSS Fonts 4 § 2.2](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
    #[strum(serialize = "font-weight")]
    FontWeight,
    /// [CSS Fonts 4 § 2.4](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
    #[strum(serialize = "font-style")]
    FontStyle,
    /// [CSS Text Decoration 3 § 2.4](https://www.w3.org/TR/css-text-decor-3/#text-decoration-property)
    #[strum(serialize = "text-decoration")]
    TextDecoration,
    /// [CSS Fonts 4 § 2.1](https://www.w3.org/TR/css-fonts-4/#font-family-prop)
    #[strum(serialize = "font-family")]
    FontFamily,
    /// [CSS Display 3 § 2](https://www.w3.org/TR/css-display-3/#the-display-properties)
    #[strum(serialize = "display")]
    Display,
}

impl CssProperty {
    /// The property name as written in CSS.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Properties that together render a gradient text fill.
pub const GRADIENT_PROPERTIES: [CssProperty; 4] = [
    CssProperty::BackgroundImage,
    CssProperty::WebkitBackgroundClip,
    CssProperty::BackgroundClip,
    CssProperty::WebkitTextFillColor,
];

/// Every property that contributes to the text fill (solid or gradient).
pub const FILL_PROPERTIES: [CssProperty; 5] = [
    CssProperty::Color,
    CssProperty::BackgroundImage,
    CssProperty::WebkitBackgroundClip,
    CssProperty::BackgroundClip,
    CssProperty::WebkitTextFillColor,
];
