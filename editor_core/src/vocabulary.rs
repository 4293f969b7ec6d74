//! The fixed keyword vocabulary of the query language.
//!
//! These entries mirror the command and operator syntax the interpreter
//! accepts, so the completion provider and the highlighter share one table.

/// Which part of the language a vocabulary entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VocabularyKind {
    /// Interpreter control directive starting with `.`.
    DotCommand,
    /// Relational algebra operator glyph such as `<S>`.
    OperatorGlyph,
}

/// One entry of the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VocabularyEntry {
    pub label: &'static str,
    pub kind: VocabularyKind,
}

const fn dot(label: &'static str) -> VocabularyEntry {
    VocabularyEntry {
        label,
        kind: VocabularyKind::DotCommand,
    }
}

const fn glyph(label: &'static str) -> VocabularyEntry {
    VocabularyEntry {
        label,
        kind: VocabularyKind::OperatorGlyph,
    }
}

/// Dot-commands first, then operator glyphs, in declaration order.
pub const VOCABULARY: &[VocabularyEntry] = &[
    dot(".help"),
    dot(".syntax"),
    dot(".tables"),
    dot(".views"),
    dot(".quit"),
    dot(".tree"),
    dot(".eval"),
    dot(".add"),
    dot(".drop"),
    dot(".load"),
    dot(".save"),
    glyph("<S>"),
    glyph("<P>"),
    glyph("<R>"),
    glyph("<E>"),
    glyph("<X>"),
    glyph("<U>"),
    glyph("<D>"),
    glyph("<I>"),
];

/// Iterates over the dot-commands.
pub fn dot_commands() -> impl Iterator<Item = &'static str> {
    entries_of(VocabularyKind::DotCommand)
}

/// Iterates over the operator glyphs.
pub fn operator_glyphs() -> impl Iterator<Item = &'static str> {
    entries_of(VocabularyKind::OperatorGlyph)
}

fn entries_of(kind: VocabularyKind) -> impl Iterator<Item = &'static str> {
    VOCABULARY
        .iter()
        .filter(move |entry| entry.kind == kind)
        .map(|entry| entry.label)
}

/// Looks up an entry by its exact label.
pub fn lookup(label: &str) -> Option<&'static VocabularyEntry> {
    VOCABULARY.iter().find(|entry| entry.label == label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_order() {
        let labels: Vec<_> = VOCABULARY.iter().map(|e| e.label).collect();
        assert_eq!(labels.len(), 19);
        assert_eq!(labels[0], ".help");
        assert_eq!(labels[10], ".save");
        assert_eq!(labels[11], "<S>");
        assert_eq!(labels[18], "<I>");
    }

    #[test]
    fn test_partitions() {
        assert_eq!(dot_commands().count(), 11);
        assert_eq!(operator_glyphs().count(), 8);
        assert!(dot_commands().all(|c| c.starts_with('.')));
        assert!(operator_glyphs().all(|g| g.starts_with('<') && g.ends_with('>')));
    }

    #[test]
    fn test_lookup() {
        assert_eq!(
            lookup(".eval").map(|e| e.kind),
            Some(VocabularyKind::DotCommand)
        );
        assert_eq!(
            lookup("<X>").map(|e| e.kind),
            Some(VocabularyKind::OperatorGlyph)
        );
        assert!(lookup(".reset").is_none());
    }
}
