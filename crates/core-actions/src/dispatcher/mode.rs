//! Mode transitions: Insert entry/exit and command line entry.
//!
//! Entering Insert opens the undo group that every keystroke of the session extends;
//! leaving Insert commits it as one entry.

use super::{DispatchResult, indent_of};
use crate::InsertKind;
use core_config::EditorOptions;
use core_state::{AutoIndent, EditorError, EditorState, Mode};
use core_text::{Position, motion};

pub(crate) fn enter_insert(
    kind: InsertKind,
    state: &mut EditorState,
    options: &EditorOptions,
) -> Result<DispatchResult, EditorError> {
    state.begin_group();
    let pos = state.position();
    let len = state.buffer().line_len(pos.line).unwrap_or(0);
    let indent = if options.auto_indent {
        indent_of(state, pos.line)
    } else {
        String::new()
    };
    let opened = match kind {
        InsertKind::Before => Ok(()),
        InsertKind::After => {
            state.cursor.set(Position::new(pos.line, (pos.col + 1).min(len)));
            Ok(())
        }
        InsertKind::LineStart => {
            let col = motion::first_non_blank_col(state.buffer(), pos.line);
            state.cursor.set(Position::new(pos.line, col));
            Ok(())
        }
        InsertKind::LineEnd => {
            state.cursor.set(Position::new(pos.line, len));
            Ok(())
        }
        InsertKind::OpenBelow => state.edit(|buf, cursor| {
            let end = buf.insert(Position::new(pos.line, len), &format!("\n{indent}"))?;
            cursor.set(end);
            Ok(())
        }),
        InsertKind::OpenAbove => state.edit(|buf, cursor| {
            let col = indent.chars().count();
            buf.insert(Position::new(pos.line, 0), &format!("{indent}\n"))?;
            cursor.set(Position::new(pos.line, col));
            Ok(())
        }),
    };
    if let Err(e) = opened {
        state.rollback_group();
        return Err(e);
    }
    state.auto_indent = None;
    if matches!(kind, InsertKind::OpenBelow | InsertKind::OpenAbove) && !indent.is_empty() {
        state.auto_indent = Some(AutoIndent {
            line: state.position().line,
            text: indent,
        });
    }
    state.mode = Mode::Insert;
    tracing::trace!(target: "actions.dispatch", ?kind, line = state.position().line, col = state.position().col, "enter_insert");
    Ok(DispatchResult::dirty())
}

/// Clear the cursor line when it still holds nothing but the auto-indent. Returns true
/// if the indent was removed.
pub(crate) fn strip_auto_indent(state: &mut EditorState) -> Result<bool, EditorError> {
    let Some(indent) = state.auto_indent.take() else {
        return Ok(false);
    };
    let pos = state.position();
    if pos.line != indent.line || state.buffer().line_text(pos.line)? != indent.text {
        return Ok(false);
    }
    let end = Position::new(pos.line, indent.text.chars().count());
    state.edit(|buf, cursor| {
        buf.delete_range(Position::new(pos.line, 0), end)?;
        cursor.set(Position::new(pos.line, 0));
        Ok(true)
    })
}

/// Esc from Insert: drop an untouched auto-indent, commit the session's group and step
/// back onto the last inserted character.
pub(crate) fn leave_insert(state: &mut EditorState) -> Result<DispatchResult, EditorError> {
    let stripped = strip_auto_indent(state)?;
    let recorded = state.commit_group();
    state.mode = Mode::Normal;
    let pos = state.position();
    if pos.col > 0 {
        state.cursor.set(Position::new(pos.line, pos.col - 1));
    }
    state.normalize_cursor();
    tracing::trace!(target: "actions.dispatch", recorded, stripped, "leave_insert");
    Ok(DispatchResult::dirty())
}

pub(crate) fn enter_command_line(state: &mut EditorState) -> DispatchResult {
    state.command_line.begin();
    state.mode = Mode::CommandLine;
    DispatchResult::dirty()
}
