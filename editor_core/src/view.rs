//! The mounted editor instance.
//!
//! [`EditorView`] ties the synchronized document to its highlighter, fold
//! state and gutter compartment. It is created with [`EditorView::open`] and
//! released with [`EditorView::close`]; [`EditorMount`] holds at most one
//! live view and closes it on remount, unmount or drop.

use crate::buffer::{Change, Document};
use crate::compartment::{Compartment, GutterStyle};
use crate::completion::{self, CompletionResult};
use crate::fold::{self, FoldManager, FoldRange};
use crate::normalize::normalize_punctuation;
use crate::settings::EditorSettings;
use crate::sync::{AppliedChange, ChangeListener, DocumentSync};
use crate::syntax::Highlighter;

/// An open editor instance.
#[derive(Debug)]
pub struct EditorView {
    sync: DocumentSync,
    highlighter: Highlighter,
    folds: FoldManager,
    line_numbers: Compartment<GutterStyle>,
    settings: EditorSettings,
}

impl EditorView {
    /// Opens a view holding `value`. The listener, if given, receives the
    /// full text after every applied change.
    pub fn open(
        settings: EditorSettings,
        value: &str,
        listener: Option<Box<dyn ChangeListener>>,
    ) -> Self {
        let mut sync = DocumentSync::new(value);
        if let Some(listener) = listener {
            sync.set_listener(listener);
        }

        let mut highlighter = Highlighter::default();
        highlighter.rebuild(sync.document());

        let hidden = (!settings.show_line_numbers).then_some(GutterStyle::HideLineNumbers);
        let view = Self {
            sync,
            highlighter,
            folds: FoldManager::new(),
            line_numbers: Compartment::of("line-numbers", hidden),
            settings,
        };
        log::info!(
            "Opened editor view ({} lines)",
            view.sync.document().len_lines()
        );
        view
    }

    /// Closes the view and returns the final text.
    pub fn close(mut self) -> String {
        self.sync.take_listener();
        let text = self.sync.text();
        log::info!("Closed editor view at revision {}", self.sync.revision());
        text
    }

    pub fn document(&self) -> &Document {
        self.sync.document()
    }

    pub fn text(&self) -> String {
        self.sync.text()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn sync(&self) -> &DocumentSync {
        &self.sync
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn folds(&self) -> &FoldManager {
        &self.folds
    }

    /// Applies a local edit.
    pub fn dispatch(&mut self, change: Change) -> Option<AppliedChange> {
        let applied = self.sync.dispatch(change)?;
        self.after_change(&applied);
        Some(applied)
    }

    /// Pushes the host's value; a no-op if it matches the buffer.
    pub fn push_value(&mut self, value: &str) -> Option<AppliedChange> {
        let applied = self.sync.push_value(value)?;
        self.after_change(&applied);
        Some(applied)
    }

    /// Types text at the cursor.
    pub fn insert_text(&mut self, text: &str) -> Option<AppliedChange> {
        let applied = self.sync.insert_text(text)?;
        self.after_change(&applied);
        Some(applied)
    }

    /// Deletes the selection or the character before the cursor.
    pub fn delete_backward(&mut self) -> Option<AppliedChange> {
        let applied = self.sync.delete_backward()?;
        self.after_change(&applied);
        Some(applied)
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.sync.set_cursor(pos);
    }

    pub fn set_selection(&mut self, anchor: usize, head: usize) {
        self.sync.set_selection(anchor, head);
    }

    fn after_change(&mut self, applied: &AppliedChange) {
        let relexed = self.highlighter.edit(
            self.sync.document(),
            applied.first_line,
            applied.old_last_line,
            applied.new_last_line,
        );
        log::trace!("Re-lexed {} lines", relexed);
        self.folds.clear();
    }

    /// Completion at the cursor.
    pub fn complete(&self, explicit: bool) -> Option<CompletionResult> {
        completion::complete(self.sync.document(), self.sync.cursor(), explicit)
    }

    /// The block fold offered at `line`, if any.
    pub fn block_fold(&self, line: usize) -> Option<FoldRange> {
        fold::block_fold(self.sync.document(), line)
    }

    /// Collapses or expands the block at `line`.
    pub fn toggle_fold(&mut self, line: usize) -> bool {
        self.folds.toggle_fold_at_line(self.sync.document(), line)
    }

    /// Collapses every foldable block.
    pub fn fold_all(&mut self) {
        self.folds.fold_all(self.sync.document());
    }

    pub fn line_numbers_visible(&self) -> bool {
        self.line_numbers.get() != Some(&GutterStyle::HideLineNumbers)
    }

    /// Shows or hides the line-number gutter. Returns the new visibility.
    pub fn toggle_line_numbers(&mut self) -> bool {
        let next = if self.line_numbers_visible() {
            Some(GutterStyle::HideLineNumbers)
        } else {
            None
        };
        self.line_numbers.reconfigure(next);
        self.line_numbers_visible()
    }

    /// The text to hand to the executor, with full-width punctuation
    /// normalized. The document itself is left as typed.
    pub fn outgoing_text(&self) -> String {
        normalize_punctuation(&self.sync.text())
    }
}

/// Slot holding zero or one open view.
#[derive(Debug, Default)]
pub struct EditorMount {
    view: Option<EditorView>,
}

impl EditorMount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new view, closing the live one first.
    pub fn mount(
        &mut self,
        settings: EditorSettings,
        value: &str,
        listener: Option<Box<dyn ChangeListener>>,
    ) -> &mut EditorView {
        self.unmount();
        self.view.insert(EditorView::open(settings, value, listener))
    }

    /// Closes the live view, returning its final text.
    pub fn unmount(&mut self) -> Option<String> {
        self.view.take().map(EditorView::close)
    }

    pub fn is_mounted(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<&EditorView> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut EditorView> {
        self.view.as_mut()
    }
}

impl Drop for EditorMount {
    fn drop(&mut self) {
        self.unmount();
    }
}
