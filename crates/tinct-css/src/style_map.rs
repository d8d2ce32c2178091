use core::fmt;

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A CSS declaration (e.g., `color: red`). The value is kept as source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Property name, ASCII-lowercased.
    pub name: String,
    /// Trimmed value text, without any `!important` annotation.
    pub value: String,
    /// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
    pub important: bool,
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)?;
        if self.important {
            f.write_str(" !important")?;
        }
        Ok(())
    }
}

/// [CSSOM § 6.7 CSS declaration blocks](https://drafts.csswg.org/cssom/#css-declaration-blocks)
///
/// "A CSS declaration block is an ordered collection of CSS properties with
/// their associated values."
///
/// This is the engine's view of an element's inline `style` attribute.
/// Order is preserved: `set` on an existing property updates it in place,
/// a new property is appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    declarations: Vec<Declaration>,
}

impl StyleMap {
    /// Create an empty declaration block.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            declarations: Vec::new(),
        }
    }

    /// [CSSOM § 6.7.2 parse a CSS declaration block](https://drafts.csswg.org/cssom/#parse-a-css-declaration-block)
    ///
    /// Parses the text of a `style` attribute. Malformed declarations
    /// (no colon, empty name or value, invalid name characters) are dropped,
    /// as the CSS error-recovery rules require. So is a declaration that
    /// ends inside a string or an open `(`/`[` block: kept, it would absorb
    /// whatever is appended after it once serialized.
    ///
    /// "If declarations contains a declaration with the same property name,
    /// remove it" before appending, so a later duplicate wins and takes the
    /// later position.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut map = Self::new();
        for (raw, balanced) in split_top_level(text) {
            if !balanced {
                continue;
            }
            if let Some(declaration) = parse_declaration(&raw) {
                map.declarations.retain(|d| d.name != declaration.name);
                map.declarations.push(declaration);
            }
        }
        map
    }

    /// [CSSOM getPropertyValue()](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-getpropertyvalue)
    #[must_use]
    pub fn get(&self, name: impl AsRef<str>) -> Option<&str> {
        let name = name.as_ref();
        self.declarations
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
            .map(|d| d.value.as_str())
    }

    /// Returns true if the property is declared.
    #[must_use]
    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.get(name).is_some()
    }

    /// [CSSOM setProperty()](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-setproperty)
    ///
    /// Updates an existing declaration in place (clearing `!important`) or
    /// appends a new one. An empty value removes the property, matching
    /// "If value is the empty string, invoke removeProperty()".
    pub fn set(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref().to_ascii_lowercase();
        let value: String = value.into();
        let value = value.trim().to_string();
        if value.is_empty() {
            let _ = self.remove(&name);
            return;
        }
        if let Some(existing) = self.declarations.iter_mut().find(|d| d.name == name) {
            existing.value = value;
            existing.important = false;
        } else {
            self.declarations.push(Declaration {
                name,
                value,
                important: false,
            });
        }
    }

    /// [CSSOM removeProperty()](https://drafts.csswg.org/cssom/#dom-cssstyledeclaration-removeproperty)
    ///
    /// Returns the removed value.
    pub fn remove(&mut self, name: impl AsRef<str>) -> Option<String> {
        let name = name.as_ref();
        let index = self
            .declarations
            .iter()
            .position(|d| d.name.eq_ignore_ascii_case(name))?;
        Some(self.declarations.remove(index).value)
    }

    /// Keep only the declarations for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&Declaration) -> bool) {
        self.declarations.retain(keep);
    }

    /// Overlay `other` on top of `self`: every declaration of `other` is set,
    /// replacing ours where both declare the same property.
    pub fn overlay(&mut self, other: &Self) {
        for declaration in &other.declarations {
            if let Some(existing) = self.declarations.iter_mut().find(|d| d.name == declaration.name) {
                existing.clone_from(declaration);
            } else {
                self.declarations.push(declaration.clone());
            }
        }
    }

    /// Iterate over the declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Returns true if nothing is declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// [CSSOM § 6.7.2 serialize a CSS declaration block](https://drafts.csswg.org/cssom/#serialize-a-css-declaration-block)
///
/// Declarations are joined with `"; "` and no trailing semicolon, the form
/// persisted in `style` attributes.
impl fmt::Display for StyleMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, declaration) in self.declarations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{declaration}")?;
        }
        Ok(())
    }
}

impl<N: AsRef<str>, V: Into<String>> FromIterator<(N, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, value) in iter {
            map.set(name, value);
        }
        map
    }
}

/// Splits a declaration list at top-level semicolons.
///
/// Semicolons inside strings, parenthesised blocks and comments do not
/// split. [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment):
/// comments are dropped here so they never reach a value.
///
/// Each part comes with a flag that is false if the part ends inside a
/// string or an unclosed block.
fn split_top_level(text: &str) -> Vec<(String, bool)> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '/' if chars.peek() == Some(&'*') => {
                let _ = chars.next();
                let mut previous = '\0';
                for inner in chars.by_ref() {
                    if previous == '*' && inner == '/' {
                        break;
                    }
                    previous = inner;
                }
            }
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '(' | '[' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            '\\' => {
                current.push(c);
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ';' if depth == 0 => parts.push((std::mem::take(&mut current), true)),
            _ => current.push(c),
        }
    }
    parts.push((current, depth == 0 && quote.is_none()));
    parts
}

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
fn parse_declaration(raw: &str) -> Option<Declaration> {
    // "If the next input token is anything other than a <colon-token>, this
    // is a parse error. Return nothing."
    let (name, value) = raw.split_once(':')?;
    let name = name.trim().to_ascii_lowercase();
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return None;
    }

    let (value, important) = strip_important(value.trim());
    // A trailing backslash would escape whatever follows on re-serialization.
    if value.is_empty() || value.ends_with('\\') {
        return None;
    }
    Some(Declaration {
        name,
        value: value.to_string(),
        important,
    })
}

/// "A declaration is important if it has a !important annotation, i.e. if
/// the last two (non-whitespace, non-comment) tokens in its value are a
/// <delim-token> with the value "!" followed by an <ident-token> with a
/// value that is an ASCII case-insensitive match for "important"."
fn strip_important(value: &str) -> (&str, bool) {
    const IMPORTANT: &str = "important";
    let lower = value.to_ascii_lowercase();
    if let Some(before) = lower.strip_suffix(IMPORTANT) {
        let before_trimmed = before.trim_end();
        if let Some(rest) = before_trimmed.strip_suffix('!') {
            return (value[..rest.len()].trim_end(), true);
        }
    }
    (value, false)
}
