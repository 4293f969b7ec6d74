//! Highlight categories and the color scheme for query text.

use super::tokenizer::TokenKind;

/// Presentation category a token kind maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightCategory {
    /// Operator glyphs (`<S>`, `<P>`, ...)
    Keyword,
    /// Arrows, comparisons and logical symbols
    Operator,
    /// Quoted literals
    String,
    /// Numeric literals
    Number,
    /// Relation and attribute names
    Identifier,
    /// Default text (no special highlighting)
    Default,
}

impl TokenKind {
    /// Returns the highlight category for this token kind.
    pub const fn category(self) -> HighlightCategory {
        match self {
            TokenKind::Keyword => HighlightCategory::Keyword,
            TokenKind::Operator => HighlightCategory::Operator,
            TokenKind::String => HighlightCategory::String,
            TokenKind::Number => HighlightCategory::Number,
            TokenKind::Identifier => HighlightCategory::Identifier,
            TokenKind::None => HighlightCategory::Default,
        }
    }
}

/// RGBA color represented as [r, g, b, a] with values 0.0-1.0.
pub type Color = [f32; 4];

/// Builds a color from 8-bit channels.
pub fn rgb(r: u8, g: u8, b: u8) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Converts a color back to 8-bit RGB channels.
pub fn to_rgb8(color: Color) -> (u8, u8, u8) {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    (channel(color[0]), channel(color[1]), channel(color[2]))
}

/// Visual style for a highlight category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub color: Color,
    pub bold: bool,
}

impl Style {
    pub const fn plain(color: Color) -> Self {
        Self { color, bold: false }
    }

    pub const fn bold(color: Color) -> Self {
        Self { color, bold: true }
    }
}

/// A highlighting theme.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Theme name.
    pub name: String,
    /// Background color.
    pub background: Color,
    /// Default text color.
    pub foreground: Color,
    styles: std::collections::HashMap<HighlightCategory, Style>,
}

impl Theme {
    /// Creates a theme with no category styles.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            background: rgb(0xff, 0xff, 0xff),
            foreground: rgb(0x21, 0x25, 0x29),
            styles: std::collections::HashMap::new(),
        }
    }

    /// Sets the style for a category.
    pub fn set_style(&mut self, category: HighlightCategory, style: Style) {
        self.styles.insert(category, style);
    }

    /// Gets the style for a category, falling back to plain foreground.
    pub fn style(&self, category: HighlightCategory) -> Style {
        self.styles
            .get(&category)
            .copied()
            .unwrap_or(Style::plain(self.foreground))
    }

    /// Shortcut for the style of a token kind.
    pub fn token_style(&self, kind: TokenKind) -> Style {
        self.style(kind.category())
    }

    /// The query editor's scheme on a light background.
    pub fn relational() -> Self {
        let mut theme = Self::new("Relational");

        theme.set_style(HighlightCategory::Keyword, Style::bold(rgb(0xc9, 0x2c, 0x2c))); // #C92C2C
        theme.set_style(HighlightCategory::Operator, Style::plain(rgb(0x3b, 0x5b, 0xdb))); // #3B5BDB
        theme.set_style(HighlightCategory::String, Style::plain(rgb(0x2b, 0x8a, 0x3e))); // #2B8A3E
        theme.set_style(HighlightCategory::Number, Style::plain(rgb(0xf0, 0x8c, 0x00))); // #F08C00
        theme.set_style(HighlightCategory::Identifier, Style::plain(rgb(0x0b, 0x72, 0x85))); // #0B7285

        theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::relational()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_mapping() {
        assert_eq!(TokenKind::Keyword.category(), HighlightCategory::Keyword);
        assert_eq!(TokenKind::Identifier.category(), HighlightCategory::Identifier);
        assert_eq!(TokenKind::None.category(), HighlightCategory::Default);
    }

    #[test]
    fn test_relational_theme() {
        let theme = Theme::relational();
        assert_eq!(theme.name, "Relational");

        let keyword = theme.token_style(TokenKind::Keyword);
        assert!(keyword.bold);
        assert_eq!(to_rgb8(keyword.color), (0xc9, 0x2c, 0x2c));

        assert_eq!(to_rgb8(theme.token_style(TokenKind::Operator).color), (0x3b, 0x5b, 0xdb));
        assert_eq!(to_rgb8(theme.token_style(TokenKind::String).color), (0x2b, 0x8a, 0x3e));
        assert_eq!(to_rgb8(theme.token_style(TokenKind::Number).color), (0xf0, 0x8c, 0x00));
        assert_eq!(to_rgb8(theme.token_style(TokenKind::Identifier).color), (0x0b, 0x72, 0x85));
        assert!(!theme.token_style(TokenKind::Identifier).bold);
    }

    #[test]
    fn test_fallback_style() {
        let theme = Theme::relational();
        let style = theme.token_style(TokenKind::None);
        assert_eq!(style, Style::plain(theme.foreground));
    }
}
