//! Query document storage backed by ropey.

use ropey::Rope;

/// A single replace edit addressed in character offsets.
///
/// `from..to` is removed and `insert` is placed at `from`. A pure insertion
/// has `from == to`; a pure deletion has an empty `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl Change {
    /// Creates a replace edit.
    pub fn new(from: usize, to: usize, insert: impl Into<String>) -> Self {
        Self {
            from,
            to,
            insert: insert.into(),
        }
    }

    /// Inserts text at a position.
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(at, at, text)
    }

    /// Deletes a range.
    pub fn delete(from: usize, to: usize) -> Self {
        Self::new(from, to, String::new())
    }

    /// Returns true if applying this change would leave the document untouched.
    pub fn is_empty(&self) -> bool {
        self.from >= self.to && self.insert.is_empty()
    }

    /// Number of characters inserted.
    pub fn inserted_len(&self) -> usize {
        self.insert.chars().count()
    }

    /// Maps a position in the old document to the new one.
    /// Positions strictly inside the replaced range land at the end of the
    /// insertion; the start of a replaced range stays put.
    pub fn map_pos(&self, pos: usize) -> usize {
        if pos < self.from || (pos == self.from && self.from < self.to) {
            pos
        } else if pos >= self.to && pos > self.from {
            pos - (self.to - self.from) + self.inserted_len()
        } else if pos == self.from && self.from == self.to {
            // Insertion at the cursor pushes it along.
            pos + self.inserted_len()
        } else {
            self.from + self.inserted_len()
        }
    }
}

/// The editor document: an ordered sequence of lines held in a rope.
#[derive(Debug, Clone)]
pub struct Document {
    rope: Rope,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Creates a document holding `text`.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Returns the total number of characters.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Returns the number of lines. An empty document has one line, and a
    /// trailing newline opens an (empty) final line.
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Applies a replace edit. Offsets are clamped to the document.
    pub fn replace(&mut self, change: &Change) {
        let len = self.len_chars();
        let from = change.from.min(len);
        let to = change.to.min(len).max(from);
        if from < to {
            self.rope.remove(from..to);
        }
        if !change.insert.is_empty() {
            self.rope.insert(from, &change.insert);
        }
    }

    /// Returns the line containing the given character offset.
    pub fn line_of(&self, char_idx: usize) -> usize {
        self.rope.char_to_line(char_idx.min(self.len_chars()))
    }

    /// Returns the character offset of the start of a line.
    pub fn line_start(&self, line: usize) -> usize {
        if line >= self.len_lines() {
            self.len_chars()
        } else {
            self.rope.line_to_char(line)
        }
    }

    /// Returns the character offset of the end of a line (before the newline).
    pub fn line_end(&self, line: usize) -> usize {
        if line >= self.len_lines() {
            self.len_chars()
        } else {
            self.rope.line_to_char(line) + self.line_len_chars(line)
        }
    }

    /// Returns the length of a line in characters, excluding its line break.
    pub fn line_len_chars(&self, line: usize) -> usize {
        self.line(line).map_or(0, |text| text.chars().count())
    }

    /// Returns the text of a line without its line break.
    pub fn line(&self, line: usize) -> Option<String> {
        if line >= self.len_lines() {
            return None;
        }
        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            text.pop();
        }
        if text.ends_with('\r') {
            text.pop();
        }
        Some(text)
    }

    /// Returns true if the line is missing or holds only whitespace.
    pub fn is_blank_line(&self, line: usize) -> bool {
        self.line(line).map_or(true, |text| text.trim().is_empty())
    }

    /// Returns the text in a character range.
    pub fn slice(&self, from: usize, to: usize) -> String {
        let len = self.len_chars();
        let from = from.min(len);
        let to = to.min(len).max(from);
        self.rope.slice(from..to).to_string()
    }

    /// Returns the entire document as a string.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Compares the document with `text` without allocating.
    pub fn text_eq(&self, text: &str) -> bool {
        self.rope == text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert!(doc.is_empty());
        assert_eq!(doc.len_lines(), 1);
        assert_eq!(doc.line(0), Some(String::new()));
    }

    #[test]
    fn test_replace() {
        let mut doc = Document::from_text("R <X> S");
        doc.replace(&Change::new(2, 5, "<U>"));
        assert_eq!(doc.text(), "R <U> S");

        doc.replace(&Change::insert(7, ";"));
        assert_eq!(doc.text(), "R <U> S;");

        doc.replace(&Change::delete(0, 2));
        assert_eq!(doc.text(), "<U> S;");
    }

    #[test]
    fn test_replace_clamps_out_of_range() {
        let mut doc = Document::from_text("abc");
        doc.replace(&Change::new(2, 99, "Z"));
        assert_eq!(doc.text(), "abZ");
    }

    #[test]
    fn test_lines() {
        let doc = Document::from_text("A\nB\n\nC");
        assert_eq!(doc.len_lines(), 4);
        assert_eq!(doc.line(1), Some("B".to_string()));
        assert!(doc.is_blank_line(2));
        assert!(!doc.is_blank_line(3));
        assert!(doc.is_blank_line(4));
        assert_eq!(doc.line_start(3), 5);
        assert_eq!(doc.line_end(1), 3);
        assert_eq!(doc.line_of(4), 2);
    }

    #[test]
    fn test_crlf_line_text() {
        let doc = Document::from_text("a\r\nb");
        assert_eq!(doc.line(0), Some("a".to_string()));
        assert_eq!(doc.line_end(0), 1);
    }

    #[test]
    fn test_only_newlines_break_lines() {
        let doc = Document::from_text("A\u{b}\u{c}\u{85}\u{2029}B\rC");
        assert_eq!(doc.len_lines(), 2);
        assert_eq!(doc.line_end(0), 6);
        assert_eq!(doc.line(1), Some("C".to_string()));
    }

    #[test]
    fn test_text_eq() {
        let doc = Document::from_text("<S>[a = 1] R");
        assert!(doc.text_eq("<S>[a = 1] R"));
        assert!(!doc.text_eq("<S>[a = 1] R;"));
    }

    #[test]
    fn test_change_map_pos() {
        let change = Change::new(2, 4, "xyz");
        assert_eq!(change.map_pos(1), 1);
        assert_eq!(change.map_pos(2), 2);
        assert_eq!(change.map_pos(3), 5);
        assert_eq!(change.map_pos(4), 5);
        assert_eq!(change.map_pos(6), 7);

        let insert = Change::insert(3, "ab");
        assert_eq!(insert.map_pos(3), 5);
        assert_eq!(insert.map_pos(2), 2);
    }
}
