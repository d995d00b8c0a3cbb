//! Marks (`m{a-z}`) and jump list walking (`Ctrl-O` / `Ctrl-I`).
//!
//! Jumping to a mark is a motion (`MotionKind::Mark`); only setting marks and walking
//! the jump list live here.

use super::DispatchResult;
use core_state::EditorState;
use core_text::Position;

pub(crate) fn set_mark(name: char, state: &mut EditorState) -> DispatchResult {
    let pos = state.position();
    state.marks.set(name, pos);
    tracing::trace!(target: "actions.dispatch", name = %name, line = pos.line, col = pos.col, "set_mark");
    DispatchResult::clean()
}

pub(crate) fn jump_older(count: u32, state: &mut EditorState) -> DispatchResult {
    let current = state.position();
    match state.jumps.back(current, count as usize) {
        Some(target) => land(target, state),
        None => DispatchResult::clean(),
    }
}

pub(crate) fn jump_newer(count: u32, state: &mut EditorState) -> DispatchResult {
    match state.jumps.forward(count as usize) {
        Some(target) => land(target, state),
        None => DispatchResult::clean(),
    }
}

fn land(target: Position, state: &mut EditorState) -> DispatchResult {
    let before = state.position();
    state.cursor.set(target);
    state.normalize_cursor();
    let after = state.position();
    tracing::trace!(target: "actions.dispatch", from_line = before.line, to_line = after.line, depth = state.jumps.len(), "jump_list");
    if before == after {
        DispatchResult::clean()
    } else {
        DispatchResult::dirty()
    }
}
