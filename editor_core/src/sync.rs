//! Two-way synchronization between the edit buffer and a host-owned value.
//!
//! The host owns the authoritative text and pushes it in with
//! [`DocumentSync::push_value`]; local edits go through
//! [`DocumentSync::dispatch`] and are reported back through a
//! [`ChangeListener`]. Pushes are compared against the live buffer, so echoing
//! a reported text back is a no-op and the two sides cannot chase each other.

use crate::buffer::{Change, Document};

/// Where a change came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Typed or pasted inside the editor.
    Local,
    /// A new value pushed by the host.
    External,
}

/// Receives the full document text after every applied change.
pub trait ChangeListener {
    fn on_change(&mut self, text: &str, origin: ChangeOrigin);
}

impl<F: FnMut(&str)> ChangeListener for F {
    fn on_change(&mut self, text: &str, _origin: ChangeOrigin) {
        self(text)
    }
}

/// The single selection. `anchor == head` is a plain cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn cursor(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Returns the selected range as (start, end).
    pub fn range(&self) -> (usize, usize) {
        (self.anchor.min(self.head), self.anchor.max(self.head))
    }

    fn map(self, change: &Change) -> Self {
        Self {
            anchor: change.map_pos(self.anchor),
            head: change.map_pos(self.head),
        }
    }
}

/// What an applied change touched, for the components that track lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedChange {
    pub origin: ChangeOrigin,
    /// First line touched by the change.
    pub first_line: usize,
    /// Last line the change covered before it was applied.
    pub old_last_line: usize,
    /// Last line the change covers now.
    pub new_last_line: usize,
    /// Document revision after the change.
    pub revision: u64,
}

/// Owns the edit buffer and keeps it converged with the host's value.
pub struct DocumentSync {
    doc: Document,
    selection: Selection,
    /// Number of changes applied since creation.
    revision: u64,
    listener: Option<Box<dyn ChangeListener>>,
}

impl std::fmt::Debug for DocumentSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentSync")
            .field("doc", &self.doc)
            .field("selection", &self.selection)
            .field("revision", &self.revision)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}

impl DocumentSync {
    /// Creates a synchronizer holding `value`. The initial value is not
    /// reported to the listener.
    pub fn new(value: &str) -> Self {
        Self {
            doc: Document::from_text(value),
            selection: Selection::default(),
            revision: 0,
            listener: None,
        }
    }

    /// Installs the listener notified after every applied change.
    pub fn set_listener(&mut self, listener: Box<dyn ChangeListener>) {
        self.listener = Some(listener);
    }

    /// Removes the listener.
    pub fn take_listener(&mut self) -> Option<Box<dyn ChangeListener>> {
        self.listener.take()
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Returns the current serialized text.
    pub fn text(&self) -> String {
        self.doc.text()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Returns the cursor position (the selection head).
    pub fn cursor(&self) -> usize {
        self.selection.head
    }

    /// Moves the selection. Positions are clamped to the document.
    pub fn set_selection(&mut self, anchor: usize, head: usize) {
        let len = self.doc.len_chars();
        self.selection = Selection {
            anchor: anchor.min(len),
            head: head.min(len),
        };
    }

    /// Places a plain cursor.
    pub fn set_cursor(&mut self, pos: usize) {
        self.set_selection(pos, pos);
    }

    /// Applies a local edit and reports the new text once.
    /// Returns None if the change would not alter the document.
    pub fn dispatch(&mut self, change: Change) -> Option<AppliedChange> {
        self.apply(change, ChangeOrigin::Local)
    }

    /// Pushes the host's authoritative value.
    ///
    /// If it differs from the live buffer, the whole document is replaced in
    /// a single change; an equal value is a no-op.
    pub fn push_value(&mut self, value: &str) -> Option<AppliedChange> {
        if self.doc.text_eq(value) {
            log::trace!("Pushed value matches the buffer, skipping");
            return None;
        }
        let change = Change::new(0, self.doc.len_chars(), value);
        self.apply(change, ChangeOrigin::External)
    }

    /// Types text at the cursor, replacing the selection.
    pub fn insert_text(&mut self, text: &str) -> Option<AppliedChange> {
        let (start, end) = self.selection.range();
        let applied = self.dispatch(Change::new(start, end, text))?;
        self.set_cursor(start + text.chars().count());
        Some(applied)
    }

    /// Deletes the selection, or the character before the cursor.
    pub fn delete_backward(&mut self) -> Option<AppliedChange> {
        let (start, end) = self.selection.range();
        if start != end {
            return self.dispatch(Change::delete(start, end));
        }
        if start == 0 {
            return None;
        }
        self.dispatch(Change::delete(start - 1, start))
    }

    fn apply(&mut self, change: Change, origin: ChangeOrigin) -> Option<AppliedChange> {
        let len = self.doc.len_chars();
        let from = change.from.min(len);
        let change = Change::new(from, change.to.min(len).max(from), change.insert);
        if change.is_empty() {
            return None;
        }

        let first_line = self.doc.line_of(change.from);
        let old_last_line = self.doc.line_of(change.to);
        self.doc.replace(&change);
        let new_last_line = self.doc.line_of(change.from + change.inserted_len());

        self.selection = self.selection.map(&change);
        self.revision += 1;
        log::debug!(
            "Applied {:?} change {}..{} (+{} chars), revision {}",
            origin,
            change.from,
            change.to,
            change.inserted_len(),
            self.revision
        );

        if let Some(listener) = self.listener.as_mut() {
            let text = self.doc.text();
            listener.on_change(&text, origin);
        }

        Some(AppliedChange {
            origin,
            first_line,
            old_last_line,
            new_last_line,
            revision: self.revision,
        })
    }
}
