//! RA Editor Core - Editor logic for the relational algebra query language.
//!
//! This crate contains the document, highlighting, folding, completion and
//! synchronization state of the query editor, without any dependency on a
//! windowing system or the interpreter process.

pub mod buffer;
pub mod compartment;
pub mod completion;
pub mod eval_mode;
pub mod fold;
pub mod normalize;
pub mod settings;
pub mod sync;
pub mod syntax;
pub mod view;
pub mod vocabulary;

pub use buffer::{Change, Document};
pub use compartment::{Compartment, GutterStyle};
pub use completion::{complete, CompletionCandidate, CompletionKind, CompletionResult};
pub use eval_mode::{CommandSink, EvalMode, EvalModeSelector};
pub use fold::{block_fold, FoldManager, FoldRange, FoldRegion};
pub use normalize::normalize_punctuation;
pub use settings::EditorSettings;
pub use sync::{AppliedChange, ChangeListener, ChangeOrigin, DocumentSync, Selection};
pub use syntax::{HighlightCategory, Highlighter, Theme, Token, TokenKind};
pub use view::{EditorMount, EditorView};
pub use vocabulary::{VocabularyEntry, VocabularyKind, VOCABULARY};
