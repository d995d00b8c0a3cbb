//! Undo / redo dispatch.
//!
//! A count repeats the step; running out of history after the first step ends the
//! repetition quietly, running out on the first step is reported.

use super::DispatchResult;
use core_state::{EditorError, EditorState};

fn repeat(
    count: u32,
    state: &mut EditorState,
    step: fn(&mut EditorState) -> Result<(), EditorError>,
) -> Result<u32, EditorError> {
    let mut done = 0;
    for _ in 0..count.max(1) {
        match step(state) {
            Ok(()) => done += 1,
            Err(e) if done == 0 => return Err(e),
            Err(_) => break,
        }
    }
    Ok(done)
}

pub(crate) fn handle_undo(count: u32, state: &mut EditorState) -> Result<DispatchResult, EditorError> {
    let done = repeat(count, state, EditorState::undo)?;
    tracing::trace!(target: "actions.dispatch", op = "undo", requested = count, done, remaining = state.undo_depth(), "undo");
    Ok(DispatchResult::dirty())
}

pub(crate) fn handle_redo(count: u32, state: &mut EditorState) -> Result<DispatchResult, EditorError> {
    let done = repeat(count, state, EditorState::redo)?;
    tracing::trace!(target: "actions.dispatch", op = "redo", requested = count, done, remaining = state.redo_depth(), "redo");
    Ok(DispatchResult::dirty())
}
