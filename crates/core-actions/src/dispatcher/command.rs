//! Command line editing & execution (`:w`, `:q`, `:wq`, ranges).
//!
//! The line typed after `:` lives in `EditorState::command_line` while CommandLine mode
//! is active. Execution always returns to Normal mode, whatever the outcome; failures
//! leave the buffer and cursor untouched.

use super::DispatchResult;
use super::command_parser::{CommandParser, LineAddr, LineRange, ParsedCommand};
use super::motion::line_target;
use crate::Action;
use crate::io_ops::TextStore;
use core_state::{EditorError, EditorState, Mode};
use core_text::{Position, TextError};
use std::path::PathBuf;
use tracing::{error, info};

pub(crate) fn handle_command_action(
    action: Action,
    state: &mut EditorState,
    store: &dyn TextStore,
) -> Result<DispatchResult, EditorError> {
    match action {
        Action::CommandChar(ch) => {
            state.command_line.push_char(ch);
            Ok(DispatchResult::dirty())
        }
        Action::CommandBackspace => {
            // Backspace over the empty line leaves command mode.
            if !state.command_line.backspace() {
                cancel(state);
            }
            Ok(DispatchResult::dirty())
        }
        Action::CommandCancel => {
            cancel(state);
            Ok(DispatchResult::dirty())
        }
        Action::CommandExecute => {
            let raw = state.command_line.take().unwrap_or_default();
            state.mode = Mode::Normal;
            state.normalize_cursor();
            execute_command(&raw, state, store)
        }
        _ => Ok(DispatchResult::clean()),
    }
}

fn cancel(state: &mut EditorState) {
    state.command_line.clear();
    state.mode = Mode::Normal;
    state.normalize_cursor();
}

fn execute_command(
    raw: &str,
    state: &mut EditorState,
    store: &dyn TextStore,
) -> Result<DispatchResult, EditorError> {
    let parsed = CommandParser::parse(raw);
    tracing::debug!(target: "runtime.command", raw, ?parsed, "execute");
    match parsed {
        ParsedCommand::Empty => Ok(DispatchResult::dirty()),
        ParsedCommand::Goto(range) => {
            let (_, last) = resolve_range(range, state)?;
            let target = line_target(state.buffer(), last);
            let from = state.position();
            state.cursor.set(target);
            state.record_jump(from);
            Ok(DispatchResult::dirty())
        }
        ParsedCommand::Write { range, path } => {
            write(range, path, state, store)?;
            Ok(DispatchResult::dirty())
        }
        ParsedCommand::Quit { force } => {
            if !force && state.is_modified() {
                return Err(EditorError::UnsavedChanges);
            }
            info!(target: "runtime.command", force, "quit");
            Ok(DispatchResult::quit())
        }
        ParsedCommand::WriteQuit { range, path, force } => {
            write(range, path, state, store)?;
            // A partial write or a write to another file leaves the buffer modified.
            if !force && state.is_modified() {
                return Err(EditorError::UnsavedChanges);
            }
            info!(target: "runtime.command", force, "write_quit");
            Ok(DispatchResult::quit())
        }
        ParsedCommand::Unknown(name) => Err(EditorError::UnknownCommand(name)),
    }
}

/// Resolve a range to inclusive zero-based line indices.
fn resolve_range(range: LineRange, state: &EditorState) -> Result<(usize, usize), EditorError> {
    let count = state.buffer().line_count();
    let resolve = |addr: LineAddr| -> Result<usize, EditorError> {
        match addr {
            LineAddr::Number(n) => {
                // `:0` addresses the first line.
                let idx = n.saturating_sub(1);
                if idx >= count {
                    return Err(TextError::OutOfBounds { line: idx, col: 0 }.into());
                }
                Ok(idx)
            }
            LineAddr::Current => Ok(state.position().line),
            LineAddr::Last => Ok(count - 1),
        }
    };
    match range {
        LineRange::Whole => Ok((0, count - 1)),
        LineRange::Single(addr) => {
            let line = resolve(addr)?;
            Ok((line, line))
        }
        LineRange::Pair(a, b) => {
            let (first, last) = (resolve(a)?, resolve(b)?);
            if first > last {
                return Err(TextError::InvalidRange {
                    start: Position::new(first, 0),
                    end: Position::new(last, 0),
                }
                .into());
            }
            Ok((first, last))
        }
    }
}

fn write(
    range: Option<LineRange>,
    path: Option<PathBuf>,
    state: &mut EditorState,
    store: &dyn TextStore,
) -> Result<(), EditorError> {
    let total = state.buffer().line_count();
    let (first, last) = match range {
        Some(r) => resolve_range(r, state)?,
        None => (0, total - 1),
    };
    let Some(target) = path.or_else(|| state.file_name.clone()) else {
        error!(target: "runtime.command", "write_no_filename");
        return Err(EditorError::NoFileName);
    };
    let lines = state.buffer().lines();
    let written = &lines[first..=last];
    if let Err(source) = store.persist_text(written, state.format, &target) {
        error!(target: "io", path = %target.display(), error = %source, "write_failed");
        return Err(EditorError::Io {
            path: target,
            source,
        });
    }
    if state.file_name.is_none() {
        state.file_name = Some(target.clone());
    }
    let whole = first == 0 && last + 1 == total;
    if whole && state.file_name.as_ref() == Some(&target) {
        state.mark_saved();
    }
    info!(target: "runtime.command", path = %target.display(), lines = written.len(), whole, "write_ok");
    state.set_status(format!("\"{}\" {}L written", target.display(), written.len()));
    Ok(())
}
