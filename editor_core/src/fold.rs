//! Block folding for query documents.
//!
//! A block is a run of consecutive non-blank lines; blank lines always
//! separate blocks. Only blocks of two or more lines can be folded.

use crate::buffer::Document;

/// Half-open character range hidden by a fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldRange {
    pub from: usize,
    pub to: usize,
}

/// Returns the last line of the block starting at `start_line`, or None if
/// no fold is offered there.
fn block_end_line(doc: &Document, start_line: usize) -> Option<usize> {
    if start_line >= doc.len_lines() || doc.is_blank_line(start_line) {
        return None;
    }

    let mut end_line = start_line;
    while end_line + 1 < doc.len_lines() && !doc.is_blank_line(end_line + 1) {
        end_line += 1;
    }

    // At least two lines to fold.
    (end_line > start_line).then_some(end_line)
}

/// Computes the foldable block anchored at `start_line` (0-indexed).
///
/// The range runs from the end of the start line to the end of the last
/// non-blank line of the block, so the start line stays visible.
pub fn block_fold(doc: &Document, start_line: usize) -> Option<FoldRange> {
    let end_line = block_end_line(doc, start_line)?;
    Some(FoldRange {
        from: doc.line_end(start_line),
        to: doc.line_end(end_line),
    })
}

/// A collapsed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldRegion {
    /// Start line of the fold (inclusive, stays visible).
    pub start_line: usize,
    /// End line of the fold (inclusive).
    pub end_line: usize,
}

impl FoldRegion {
    /// Returns the number of lines in this region.
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }

    /// Returns the number of lines hidden by the fold.
    pub fn hidden_lines(&self) -> usize {
        self.end_line - self.start_line
    }

    /// Returns the character range this region hides in `doc`.
    pub fn range(&self, doc: &Document) -> FoldRange {
        FoldRange {
            from: doc.line_end(self.start_line),
            to: doc.line_end(self.end_line),
        }
    }
}

/// Tracks which blocks are folded.
///
/// Ranges are never cached: a fold is computed when the user asks for it, and
/// the collapsed state is dropped whenever the document changes.
#[derive(Debug, Clone, Default)]
pub struct FoldManager {
    /// Folded regions, sorted by start line and non-overlapping.
    folded: Vec<FoldRegion>,
}

impl FoldManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops all folds.
    pub fn clear(&mut self) {
        self.folded.clear();
    }

    /// Returns the folded regions.
    pub fn regions(&self) -> &[FoldRegion] {
        &self.folded
    }

    /// Returns true if a fold can be toggled at `line`.
    pub fn is_foldable(&self, doc: &Document, line: usize) -> bool {
        self.is_line_folded(line) || block_end_line(doc, line).is_some()
    }

    /// Toggles the fold anchored at `line`.
    /// Returns true if a fold was added or removed.
    pub fn toggle_fold_at_line(&mut self, doc: &Document, line: usize) -> bool {
        if let Some(idx) = self.folded.iter().position(|r| r.start_line == line) {
            self.folded.remove(idx);
            return true;
        }
        if self.is_line_hidden(line) {
            return false;
        }
        match block_end_line(doc, line) {
            Some(end_line) => {
                self.insert(FoldRegion {
                    start_line: line,
                    end_line,
                });
                true
            }
            None => false,
        }
    }

    /// Folds every block of two or more lines.
    pub fn fold_all(&mut self, doc: &Document) {
        self.folded.clear();
        let mut line = 0;
        while line < doc.len_lines() {
            match block_end_line(doc, line) {
                Some(end_line) => {
                    self.folded.push(FoldRegion {
                        start_line: line,
                        end_line,
                    });
                    line = end_line + 1;
                }
                None => line += 1,
            }
        }
    }

    /// Unfolds all regions.
    pub fn unfold_all(&mut self) {
        self.folded.clear();
    }

    fn insert(&mut self, region: FoldRegion) {
        // A new fold swallows folds nested inside it.
        self.folded
            .retain(|r| r.start_line < region.start_line || r.start_line > region.end_line);
        let idx = self
            .folded
            .iter()
            .position(|r| r.start_line > region.start_line)
            .unwrap_or(self.folded.len());
        self.folded.insert(idx, region);
    }

    /// Returns true if the given line is hidden inside a fold.
    pub fn is_line_hidden(&self, line: usize) -> bool {
        self.folded
            .iter()
            .any(|r| line > r.start_line && line <= r.end_line)
    }

    /// Returns true if a fold starts at the given line.
    pub fn is_line_folded(&self, line: usize) -> bool {
        self.folded.iter().any(|r| r.start_line == line)
    }

    /// Returns the hidden character ranges.
    pub fn folded_ranges(&self, doc: &Document) -> Vec<FoldRange> {
        self.folded.iter().map(|r| r.range(doc)).collect()
    }

    /// Converts a buffer line to a visual line.
    pub fn buffer_line_to_visual(&self, buffer_line: usize) -> usize {
        let mut visual = buffer_line;
        for region in &self.folded {
            if buffer_line > region.end_line {
                visual -= region.hidden_lines();
            } else if buffer_line > region.start_line {
                // Hidden lines map to their fold's start line.
                return self.buffer_line_to_visual(region.start_line);
            }
        }
        visual
    }

    /// Converts a visual line to a buffer line.
    pub fn visual_line_to_buffer(&self, visual_line: usize) -> usize {
        let mut buffer_line = visual_line;
        for region in &self.folded {
            if region.start_line < buffer_line {
                buffer_line += region.hidden_lines();
            } else {
                break;
            }
        }
        buffer_line
    }

    /// Returns the number of visible lines.
    pub fn visible_line_count(&self, total_lines: usize) -> usize {
        let hidden: usize = self.folded.iter().map(FoldRegion::hidden_lines).sum();
        total_lines.saturating_sub(hidden).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_fold_stops_at_blank_line() {
        let doc = Document::from_text("A\nB\n\nC");
        // The first two lines fold together; the blank line ends the block.
        assert_eq!(block_fold(&doc, 0), Some(FoldRange { from: 1, to: 3 }));
    }

    #[test]
    fn test_blank_start_line_has_no_fold() {
        let doc = Document::from_text("A\nB\n\nC");
        assert_eq!(block_fold(&doc, 2), None);

        let doc = Document::from_text("A\n   \t\nB");
        assert_eq!(block_fold(&doc, 1), None);
    }

    #[test]
    fn test_single_line_block_has_no_fold() {
        let doc = Document::from_text("A\nB\n\nC");
        assert_eq!(block_fold(&doc, 3), None);
        assert_eq!(block_fold(&doc, 4), None);
        assert_eq!(block_fold(&doc, 99), None);
    }

    #[test]
    fn test_block_extends_to_end_of_document() {
        let doc = Document::from_text("x\n\nR\n<S>[a=1] R\n-> T");
        let range = block_fold(&doc, 2).unwrap();
        assert_eq!(range.to, doc.len_chars());
        assert_eq!(doc.slice(range.from, range.to), "\n<S>[a=1] R\n-> T");
    }

    #[test]
    fn test_whitespace_only_line_delimits() {
        let doc = Document::from_text("A\nB\n  \nC\nD");
        assert_eq!(block_fold(&doc, 0), Some(FoldRange { from: 1, to: 3 }));
        assert_eq!(block_fold(&doc, 3), Some(FoldRange { from: 8, to: 10 }));
    }

    #[test]
    fn test_form_feed_is_not_a_line_break() {
        let doc = Document::from_text("A\u{c}B");
        assert_eq!(doc.len_lines(), 1);
        assert_eq!(block_fold(&doc, 0), None);

        let doc = Document::from_text("A\u{2028}B\nC");
        assert_eq!(doc.len_lines(), 2);
        assert_eq!(doc.line(0).as_deref(), Some("A\u{2028}B"));
        assert_eq!(block_fold(&doc, 0), Some(FoldRange { from: 3, to: 5 }));
    }

    #[test]
    fn test_fold_from_middle_of_block() {
        let doc = Document::from_text("A\nB\nC");
        assert_eq!(block_fold(&doc, 1), Some(FoldRange { from: 3, to: 5 }));
        assert_eq!(block_fold(&doc, 2), None);
    }

    #[test]
    fn test_toggle_fold() {
        let doc = Document::from_text("A\nB\nC\n\nD");
        let mut manager = FoldManager::new();

        assert!(manager.toggle_fold_at_line(&doc, 0));
        assert!(manager.is_line_folded(0));
        assert!(manager.is_line_hidden(1));
        assert!(manager.is_line_hidden(2));
        assert!(!manager.is_line_hidden(3));
        assert_eq!(manager.folded_ranges(&doc), vec![FoldRange { from: 1, to: 5 }]);

        // Hidden lines cannot start a fold of their own.
        assert!(!manager.toggle_fold_at_line(&doc, 1));

        assert!(manager.toggle_fold_at_line(&doc, 0));
        assert!(manager.regions().is_empty());

        assert!(!manager.toggle_fold_at_line(&doc, 4));
    }

    #[test]
    fn test_outer_fold_swallows_nested_fold() {
        let doc = Document::from_text("A\nB\nC");
        let mut manager = FoldManager::new();
        assert!(manager.toggle_fold_at_line(&doc, 1));
        assert!(manager.toggle_fold_at_line(&doc, 0));
        assert_eq!(
            manager.regions(),
            &[FoldRegion {
                start_line: 0,
                end_line: 2
            }]
        );
    }

    #[test]
    fn test_fold_all_and_visual_lines() {
        let doc = Document::from_text("A\nB\nC\n\nD\n\nE\nF");
        let mut manager = FoldManager::new();
        manager.fold_all(&doc);

        assert_eq!(
            manager.regions(),
            &[
                FoldRegion {
                    start_line: 0,
                    end_line: 2
                },
                FoldRegion {
                    start_line: 6,
                    end_line: 7
                },
            ]
        );
        assert_eq!(manager.visible_line_count(doc.len_lines()), 5);

        assert_eq!(manager.buffer_line_to_visual(0), 0);
        assert_eq!(manager.buffer_line_to_visual(2), 0);
        assert_eq!(manager.buffer_line_to_visual(3), 1);
        assert_eq!(manager.buffer_line_to_visual(6), 4);
        assert_eq!(manager.buffer_line_to_visual(7), 4);

        assert_eq!(manager.visual_line_to_buffer(0), 0);
        assert_eq!(manager.visual_line_to_buffer(1), 3);
        assert_eq!(manager.visual_line_to_buffer(3), 5);
        assert_eq!(manager.visual_line_to_buffer(4), 6);

        manager.unfold_all();
        assert_eq!(manager.visible_line_count(doc.len_lines()), 8);
    }

    #[test]
    fn test_region_counts() {
        let region = FoldRegion {
            start_line: 5,
            end_line: 10,
        };
        assert_eq!(region.line_count(), 6);
        assert_eq!(region.hidden_lines(), 5);
    }
}
