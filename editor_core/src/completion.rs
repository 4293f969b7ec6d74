//! Keyword completion for dot-commands and operator glyphs.

use crate::buffer::Document;
use crate::vocabulary::{VocabularyEntry, VOCABULARY};

/// Completion item kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionKind {
    Keyword,
}

/// A completion candidate offered to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionCandidate {
    /// Label displayed and inserted.
    pub label: &'static str,
    pub kind: CompletionKind,
}

impl From<&VocabularyEntry> for CompletionCandidate {
    fn from(entry: &VocabularyEntry) -> Self {
        Self {
            label: entry.label,
            kind: CompletionKind::Keyword,
        }
    }
}

/// Candidates for one completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResult {
    /// Start of the prefix token being completed (character offset).
    pub from: usize,
    /// The cursor position the request was made at.
    pub to: usize,
    /// Text of the prefix token.
    pub prefix: String,
    /// The full vocabulary in declaration order.
    pub options: Vec<CompletionCandidate>,
}

impl CompletionResult {
    /// Returns true if the host may keep this result while the user types
    /// `token`, which holds for any run of non-whitespace.
    pub fn is_valid_for(&self, token: &str) -> bool {
        !token.chars().any(char::is_whitespace)
    }

    /// Candidates whose label starts with the prefix, for hosts without a
    /// matcher of their own.
    pub fn matching(&self) -> impl Iterator<Item = &CompletionCandidate> + '_ {
        self.options
            .iter()
            .filter(move |candidate| candidate.label.starts_with(self.prefix.as_str()))
    }
}

/// Returns the start offset and text of the run of non-whitespace characters
/// that ends at `pos`.
pub fn prefix_before(doc: &Document, pos: usize) -> (usize, String) {
    let pos = pos.min(doc.len_chars());
    let line_start = doc.line_start(doc.line_of(pos));
    let before = doc.slice(line_start, pos);

    let mut prefix: Vec<char> = before
        .chars()
        .rev()
        .take_while(|c| !c.is_whitespace())
        .collect();
    prefix.reverse();
    (pos - prefix.len(), prefix.into_iter().collect())
}

/// Computes completions at `pos`.
///
/// An empty prefix only yields candidates when completion was invoked
/// explicitly, so typing whitespace never opens the popup. Filtering by the
/// prefix is left to the host.
pub fn complete(doc: &Document, pos: usize, explicit: bool) -> Option<CompletionResult> {
    let (from, prefix) = prefix_before(doc, pos);
    if prefix.is_empty() && !explicit {
        return None;
    }

    Some(CompletionResult {
        from,
        to: from + prefix.chars().count(),
        prefix,
        options: VOCABULARY.iter().map(CompletionCandidate::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_after_partial_command() {
        let doc = Document::from_text(".ev");
        let result = complete(&doc, 3, false).unwrap();
        assert_eq!(result.from, 0);
        assert_eq!(result.to, 3);
        assert_eq!(result.prefix, ".ev");
        assert_eq!(result.options.len(), VOCABULARY.len());
        assert_eq!(result.options[0].label, ".help");
        assert_eq!(result.options[11].label, "<S>");
        assert!(result
            .options
            .iter()
            .all(|c| c.kind == CompletionKind::Keyword));
    }

    #[test]
    fn test_no_completion_after_whitespace() {
        let doc = Document::from_text("R <X> ");
        assert_eq!(complete(&doc, 6, false), None);

        let doc = Document::new();
        assert_eq!(complete(&doc, 0, false), None);
    }

    #[test]
    fn test_explicit_completion_with_empty_prefix() {
        let doc = Document::from_text("R ");
        let result = complete(&doc, 2, true).unwrap();
        assert_eq!(result.from, 2);
        assert!(result.prefix.is_empty());
        assert_eq!(result.options.len(), VOCABULARY.len());
    }

    #[test]
    fn test_prefix_stops_at_line_start() {
        let doc = Document::from_text("R\n<S");
        let (from, prefix) = prefix_before(&doc, 4);
        assert_eq!(from, 2);
        assert_eq!(prefix, "<S");
    }

    #[test]
    fn test_prefix_mid_line() {
        let doc = Document::from_text("R <U> S");
        let (from, prefix) = prefix_before(&doc, 4);
        assert_eq!((from, prefix.as_str()), (2, "<U"));
    }

    #[test]
    fn test_matching_and_validity() {
        let doc = Document::from_text(".t");
        let result = complete(&doc, 2, false).unwrap();
        let labels: Vec<_> = result.matching().map(|c| c.label).collect();
        assert_eq!(labels, vec![".tables", ".tree"]);

        assert!(result.is_valid_for(".ta"));
        assert!(!result.is_valid_for(".ta b"));
    }
}
