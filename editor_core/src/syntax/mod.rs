//! Syntax highlighting for the query language.
//!
//! A stateless line tokenizer feeds a per-line highlight cache; the theme maps
//! token categories to colors.

mod highlighter;
mod theme;
mod tokenizer;

pub use highlighter::{Highlighter, LineHighlights};
pub use theme::{rgb, to_rgb8, Color, HighlightCategory, Style, Theme};
pub use tokenizer::{next_token, tokenize_line, tokens, LineTokens, Token, TokenKind};
