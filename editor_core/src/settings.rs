//! Editor options loaded from configuration.

use serde::{Deserialize, Serialize};

/// Per-view editor options, read from the `[editor]` table of the config
/// file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Show the line-number gutter when the view opens.
    pub show_line_numbers: bool,
    /// Show fold markers next to foldable blocks.
    pub fold_gutter: bool,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            show_line_numbers: true,
            fold_gutter: true,
        }
    }
}
