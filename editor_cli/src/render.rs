//! Prints an editor view to a terminal.

use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use ra_editor_core::syntax::to_rgb8;
use ra_editor_core::EditorView;
use std::io::{self, Write};

const FOLDED_MARKER: &str = "▸";
const FOLDABLE_MARKER: &str = "▾";
const FOLD_PLACEHOLDER: &str = " ⋯";

/// Writes the visible lines of `view` with gutter and fold markers.
/// Colors are only emitted when `color` is set.
pub fn render<W: Write>(out: &mut W, view: &EditorView, color: bool) -> io::Result<()> {
    let doc = view.document();
    let folds = view.folds();
    let width = doc.len_lines().to_string().len();

    for line in 0..doc.len_lines() {
        if folds.is_line_hidden(line) {
            continue;
        }

        if view.line_numbers_visible() {
            write!(out, "{:>width$} ", line + 1, width = width)?;
        }
        if view.settings().fold_gutter {
            let marker = if folds.is_line_folded(line) {
                FOLDED_MARKER
            } else if folds.is_foldable(doc, line) {
                FOLDABLE_MARKER
            } else {
                " "
            };
            write!(out, "{} ", marker)?;
        }

        let text: Vec<char> = doc.line(line).unwrap_or_default().chars().collect();
        let spans = view
            .highlighter()
            .line(line)
            .map(|h| h.spans())
            .unwrap_or_default();

        let mut col = 0;
        for &(start, end, category) in spans {
            let start = start.min(text.len());
            let end = end.min(text.len());
            write_plain(out, &text[col.min(start)..start])?;

            let segment: String = text[start..end].iter().collect();
            if color {
                let style = view.highlighter().theme().style(category);
                let (r, g, b) = to_rgb8(style.color);
                queue!(out, SetForegroundColor(Color::Rgb { r, g, b }))?;
                if style.bold {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                queue!(out, Print(segment), SetAttribute(Attribute::Reset), ResetColor)?;
            } else {
                out.write_all(segment.as_bytes())?;
            }
            col = end;
        }
        write_plain(out, &text[col.min(text.len())..])?;

        if folds.is_line_folded(line) {
            if color {
                queue!(
                    out,
                    SetForegroundColor(Color::DarkGrey),
                    Print(FOLD_PLACEHOLDER),
                    ResetColor
                )?;
            } else {
                out.write_all(FOLD_PLACEHOLDER.as_bytes())?;
            }
        }
        writeln!(out)?;
    }
    out.flush()
}

fn write_plain<W: Write>(out: &mut W, chars: &[char]) -> io::Result<()> {
    let text: String = chars.iter().collect();
    out.write_all(text.as_bytes())
}
