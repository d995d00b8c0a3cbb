//! Insert-mode text mutation.
//!
//! Edits extend the undo group opened on Insert entry. If none is open (an edit reached
//! the dispatcher directly) one is opened here and stays open until Insert is left.

use super::mode::strip_auto_indent;
use super::{DispatchResult, indent_of};
use crate::EditKind;
use core_config::EditorOptions;
use core_state::{AutoIndent, EditorError, EditorState, Mode};
use core_text::Position;

pub(crate) fn handle_edit(
    kind: EditKind,
    state: &mut EditorState,
    options: &EditorOptions,
) -> Result<DispatchResult, EditorError> {
    if state.mode != Mode::Insert {
        return Ok(DispatchResult::clean());
    }
    state.begin_group();
    let before = state.position();
    let changed = match kind {
        EditKind::InsertChar(ch) => insert_text(state, &ch.to_string())?,
        EditKind::Newline => {
            let indent: String = if options.auto_indent {
                indent_of(state, before.line).chars().take(before.col).collect()
            } else {
                String::new()
            };
            // Enter on a line holding only its auto-indent leaves that line empty.
            let stripped = strip_auto_indent(state)?;
            let inserted = insert_text(state, &format!("\n{indent}"))?;
            if !indent.is_empty() {
                state.auto_indent = Some(AutoIndent {
                    line: state.position().line,
                    text: indent,
                });
            }
            stripped || inserted
        }
        EditKind::Tab => {
            if options.expand_tab {
                let width = options.tab_width.max(1);
                let pad = width - before.col % width;
                insert_text(state, &" ".repeat(pad))?
            } else {
                insert_text(state, "\t")?
            }
        }
        EditKind::Backspace => backspace(state)?,
        EditKind::DeleteForward => delete_forward(state)?,
    };
    let after = state.position();
    tracing::trace!(target: "actions.dispatch", op=?kind, line=before.line, col=before.col, to_line=after.line, to_col=after.col, changed, "edit");
    Ok(if changed {
        DispatchResult::dirty()
    } else {
        DispatchResult::clean()
    })
}

fn insert_text(state: &mut EditorState, text: &str) -> Result<bool, EditorError> {
    let at = state.position();
    state.edit(|buf, cursor| {
        let end = buf.insert(at, text)?;
        cursor.set(end);
        Ok(true)
    })
}

/// Delete the character before the cursor, joining with the previous line at column 0.
fn backspace(state: &mut EditorState) -> Result<bool, EditorError> {
    let at = state.position();
    if at == Position::origin() {
        return Ok(false);
    }
    let from = if at.col > 0 {
        Position::new(at.line, at.col - 1)
    } else {
        let prev = at.line - 1;
        Position::new(prev, state.buffer().line_len(prev)?)
    };
    state.edit(|buf, cursor| {
        buf.delete_range(from, at)?;
        cursor.set(from);
        Ok(true)
    })
}

/// Delete the character under the cursor, joining the next line at the line end.
fn delete_forward(state: &mut EditorState) -> Result<bool, EditorError> {
    let at = state.position();
    let buf = state.buffer();
    let len = buf.line_len(at.line)?;
    let to = if at.col < len {
        Position::new(at.line, at.col + 1)
    } else if at.line + 1 < buf.line_count() {
        Position::new(at.line + 1, 0)
    } else {
        return Ok(false);
    };
    state.edit(|buf, cursor| {
        buf.delete_range(at, to)?;
        cursor.set(at);
        Ok(true)
    })
}
