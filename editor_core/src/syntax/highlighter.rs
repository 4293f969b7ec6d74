//! Per-line highlight cache driven by the query tokenizer.
//!
//! Lines are lexed independently, so an edit only re-lexes the lines it
//! touched; the rest of the cache is shifted into place.

use super::theme::{Color, HighlightCategory, Theme};
use super::tokenizer::tokens;
use crate::buffer::Document;

/// Highlighted spans of a single line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineHighlights {
    /// Each entry is (start_col, end_col, category). Unhighlighted text has no
    /// entry.
    spans: Vec<(usize, usize, HighlightCategory)>,
}

impl LineHighlights {
    /// Lexes a line into highlight spans.
    pub fn from_line(text: &str) -> Self {
        let spans = tokens(text)
            .map(|token| (token.start, token.end(), token.kind.category()))
            .filter(|&(_, _, category)| category != HighlightCategory::Default)
            .collect();
        Self { spans }
    }

    /// Returns the category at a column, or None if unhighlighted.
    pub fn category_at(&self, col: usize) -> Option<HighlightCategory> {
        self.spans
            .iter()
            .find(|&&(start, end, _)| col >= start && col < end)
            .map(|&(_, _, category)| category)
    }

    /// Returns all spans for this line.
    pub fn spans(&self) -> &[(usize, usize, HighlightCategory)] {
        &self.spans
    }
}

/// Highlighter holding the theme and the line cache of one document.
#[derive(Debug, Clone)]
pub struct Highlighter {
    theme: Theme,
    line_cache: Vec<LineHighlights>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

impl Highlighter {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            line_cache: Vec::new(),
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Re-lexes every line of the document.
    pub fn rebuild(&mut self, doc: &Document) {
        self.line_cache = (0..doc.len_lines())
            .map(|line| LineHighlights::from_line(&doc.line(line).unwrap_or_default()))
            .collect();
        log::debug!("Highlighted {} lines", self.line_cache.len());
    }

    /// Updates the cache after an edit.
    ///
    /// `first_line..=old_last_line` are the lines the edit covered before it
    /// was applied; `first_line..=new_last_line` are the lines it covers in
    /// `doc`, which must already hold the edited text. Returns the number of
    /// lines that were re-lexed.
    pub fn edit(
        &mut self,
        doc: &Document,
        first_line: usize,
        old_last_line: usize,
        new_last_line: usize,
    ) -> usize {
        let expected = (self.line_cache.len() + new_last_line).checked_sub(old_last_line);
        if old_last_line >= self.line_cache.len()
            || first_line > old_last_line
            || first_line > new_last_line
            || expected != Some(doc.len_lines())
        {
            self.rebuild(doc);
            return doc.len_lines();
        }

        let relexed: Vec<LineHighlights> = (first_line..=new_last_line)
            .map(|line| LineHighlights::from_line(&doc.line(line).unwrap_or_default()))
            .collect();
        let count = relexed.len();
        self.line_cache.splice(first_line..=old_last_line, relexed);
        count
    }

    /// Returns the highlights of a line, if cached.
    pub fn line(&self, line: usize) -> Option<&LineHighlights> {
        self.line_cache.get(line)
    }

    /// Returns the number of cached lines.
    pub fn line_count(&self) -> usize {
        self.line_cache.len()
    }

    /// Returns the category at a position.
    pub fn category_at(&self, line: usize, col: usize) -> HighlightCategory {
        self.line(line)
            .and_then(|highlights| highlights.category_at(col))
            .unwrap_or(HighlightCategory::Default)
    }

    /// Returns the color at a position.
    pub fn color_at(&self, line: usize, col: usize) -> Color {
        self.theme.style(self.category_at(line, col)).color
    }
}
