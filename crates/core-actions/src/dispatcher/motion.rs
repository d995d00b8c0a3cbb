//! Cursor movement semantics.
//!
//! `apply_motion` never mutates: it resolves a motion against the editor state and
//! returns the new cursor, so operators reuse it to find the far end of their range.
//! Bare motions never touch the buffer and never record undo; jump motions (`G`, `gg`,
//! marks) record their origin in the jump list.

use super::DispatchResult;
use crate::MotionKind;
use core_state::{EditorError, EditorState};
use core_text::{Buffer, ColumnLimit, Cursor, Position, motion};

/// Resolve `motion` repeated `count` times from `cursor`. Repetition stops early once
/// the motion can no longer move (`h`/`l` never wrap to another line). Fails only for a
/// mark that is not set.
pub fn apply_motion(
    state: &EditorState,
    cursor: &Cursor,
    kind: MotionKind,
    count: u32,
    limit: ColumnLimit,
) -> Result<Cursor, EditorError> {
    let buf = state.buffer();
    let mut c = *cursor;
    let mut p = c.position();
    let count = count.max(1);
    match kind {
        MotionKind::Left => {
            for _ in 0..count {
                if !motion::left(&mut p) {
                    break;
                }
            }
            c.set(p);
        }
        MotionKind::Right => {
            for _ in 0..count {
                if !motion::right(buf, &mut p, limit) {
                    break;
                }
            }
            c.set(p);
        }
        MotionKind::Up => {
            for _ in 0..count {
                if !motion::up(buf, &mut c, limit) {
                    break;
                }
            }
        }
        MotionKind::Down => {
            for _ in 0..count {
                if !motion::down(buf, &mut c, limit) {
                    break;
                }
            }
        }
        MotionKind::LineStart => {
            motion::line_start(&mut p);
            c.set(p);
        }
        MotionKind::FirstNonBlank => {
            motion::first_non_blank(buf, &mut p);
            c.set(p);
        }
        MotionKind::LineEnd => {
            // `{count}$` ends on the line `count - 1` below.
            let last = buf.line_count() - 1;
            p.line = (p.line + count as usize - 1).min(last);
            motion::line_end(buf, &mut p, limit);
            c.set(p);
            c.stick_to_line_end();
        }
        MotionKind::WordForward | MotionKind::WordBackward | MotionKind::WordEnd => {
            let step = match kind {
                MotionKind::WordForward => motion::word_forward,
                MotionKind::WordBackward => motion::word_backward,
                _ => motion::word_end,
            };
            for _ in 0..count {
                if !step(buf, &mut p) {
                    break;
                }
            }
            c.set(p);
        }
        MotionKind::BufferStart => {
            motion::goto_line(buf, &mut p, 0);
            c.set(p);
        }
        MotionKind::BufferEnd => {
            motion::goto_line(buf, &mut p, buf.line_count() - 1);
            c.set(p);
        }
        MotionKind::GotoLine(n) => {
            motion::goto_line(buf, &mut p, (n as usize).saturating_sub(1));
            c.set(p);
        }
        MotionKind::PageDown | MotionKind::PageUp => {
            let lines = page_lines(state).saturating_mul(count as usize);
            let line = if kind == MotionKind::PageDown {
                p.line.saturating_add(lines)
            } else {
                p.line.saturating_sub(lines)
            };
            motion::goto_line(buf, &mut p, line);
            c.set(p);
        }
        MotionKind::Mark { name, linewise } => {
            let mark = state.marks.get(name).ok_or(EditorError::MarkNotSet)?;
            motion::goto_line(buf, &mut p, mark.line);
            if !linewise {
                // The mark may sit past the end of a line that has since shrunk.
                p.col = mark.col.min(buf.line_len(p.line).unwrap_or(0));
            }
            c.set(p);
        }
    }
    Ok(c)
}

/// Lines one page motion moves: the view height less two lines of overlap.
fn page_lines(state: &EditorState) -> usize {
    state.view_rows.saturating_sub(2).max(1)
}

pub(crate) fn handle_motion(
    kind: MotionKind,
    count: u32,
    state: &mut EditorState,
) -> Result<DispatchResult, EditorError> {
    let limit = state.mode.column_limit();
    let before = state.position();
    let mut next = apply_motion(state, &state.cursor, kind, count, limit)?;
    next.clamp(state.buffer(), limit);
    state.cursor = next;
    let after = next.position();
    tracing::trace!(target: "actions.dispatch", motion=?kind, count, from_line=before.line, from_col=before.col, to_line=after.line, to_col=after.col, "motion");
    if kind.is_jump() {
        state.record_jump(before);
    }
    Ok(if before == after {
        DispatchResult::clean()
    } else {
        DispatchResult::dirty()
    })
}

/// Arrow / Home / End / page navigation inside Insert mode, where the cursor may sit one
/// past the last character.
pub(crate) fn handle_insert_motion(
    kind: MotionKind,
    state: &mut EditorState,
) -> Result<DispatchResult, EditorError> {
    let before = state.position();
    let mut next = apply_motion(state, &state.cursor, kind, 1, ColumnLimit::PastEnd)?;
    next.clamp(state.buffer(), ColumnLimit::PastEnd);
    state.cursor = next;
    Ok(if next.position() == before {
        DispatchResult::clean()
    } else {
        DispatchResult::dirty()
    })
}

/// Position of `line` (clamped) at its first non-blank character.
pub(crate) fn line_target(buf: &Buffer, line: usize) -> Position {
    let mut p = Position::origin();
    motion::goto_line(buf, &mut p, line);
    p
}
