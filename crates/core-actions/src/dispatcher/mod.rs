//! Dispatcher applying `Action` to mutable editor state.
//!
//! Sub-modules:
//! * `motion`   - cursor movement semantics (pure; never mutates the buffer)
//! * `operator` - operator + motion ranges, linewise operators, `x`/`X`/`p`/`P`
//! * `mode`     - mode transitions (Insert entry/exit, command line entry)
//! * `jump`     - marks and the jump list
//! * `edit`     - Insert-mode text mutation
//! * `undo`     - undo / redo dispatch
//! * `command`  - command line editing & ex command execution
//!
//! Every mutating Normal-mode command commits exactly one undo entry; Insert-mode edits
//! extend the group opened on Insert entry. Buffer errors roll the state back to where
//! it was before the action.

use crate::io_ops::TextStore;
use crate::{Action, Command};
use core_config::EditorOptions;
use core_state::{EditorError, EditorState};

mod command;
mod command_parser;
mod edit;
mod jump;
mod mode;
mod motion;
mod operator;
mod undo;

pub use command_parser::{CommandParser, LineAddr, LineRange, ParsedCommand};
pub use motion::apply_motion;

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    pub dirty: bool,
    pub quit: bool,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            quit: false,
        }
    }
    pub fn clean() -> Self {
        Self {
            dirty: false,
            quit: false,
        }
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
        }
    }
}

/// Collaborators an action may need besides the editor state.
pub struct DispatchContext<'a> {
    pub options: &'a EditorOptions,
    pub store: &'a dyn TextStore,
}

/// Apply an action to editor state.
pub fn dispatch(
    action: Action,
    state: &mut EditorState,
    ctx: &DispatchContext<'_>,
) -> Result<DispatchResult, EditorError> {
    match action {
        Action::Command(cmd) => dispatch_command(cmd, None, state, ctx),
        Action::RegisterCommand { register, command } => {
            dispatch_command(command, Some(register), state, ctx)
        }
        Action::Edit(kind) => edit::handle_edit(kind, state, ctx.options),
        Action::InsertMotion(kind) => motion::handle_insert_motion(kind, state),
        Action::LeaveInsert => mode::leave_insert(state),
        Action::CommandChar(_)
        | Action::CommandBackspace
        | Action::CommandCancel
        | Action::CommandExecute => command::handle_command_action(action, state, ctx.store),
    }
}

/// `register` is the `"x` prefix, if one was typed.
fn dispatch_command(
    cmd: Command,
    register: Option<char>,
    state: &mut EditorState,
    ctx: &DispatchContext<'_>,
) -> Result<DispatchResult, EditorError> {
    match cmd {
        Command::Move { motion, count } => motion::handle_motion(motion, count, state),
        Command::Operate { op, motion, count } => {
            operator::apply_operator(op, motion, count, register, state, ctx.options)
        }
        Command::OperateLines { op, count } => {
            operator::apply_linewise(op, count, register, state, ctx.options)
        }
        Command::EnterInsert(kind) => mode::enter_insert(kind, state, ctx.options),
        Command::DeleteChar { count } => operator::delete_chars(count, false, register, state),
        Command::DeleteCharBefore { count } => {
            operator::delete_chars(count, true, register, state)
        }
        Command::Paste { before, count } => operator::paste(before, count, register, state),
        Command::Undo { count } => undo::handle_undo(count, state),
        Command::Redo { count } => undo::handle_redo(count, state),
        Command::EnterCommandLine => Ok(mode::enter_command_line(state)),
        Command::SetMark(name) => Ok(jump::set_mark(name, state)),
        Command::JumpOlder { count } => Ok(jump::jump_older(count, state)),
        Command::JumpNewer { count } => Ok(jump::jump_newer(count, state)),
    }
}

/// Leading whitespace of `line` (empty when the line does not exist).
pub(crate) fn indent_of(state: &EditorState, line: usize) -> String {
    state
        .buffer()
        .line_text(line)
        .map(|t| t.chars().take_while(|c| *c == ' ' || *c == '\t').collect())
        .unwrap_or_default()
}
