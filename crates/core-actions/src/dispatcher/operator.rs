//! Operators (`d`, `c`, `y`) over motions and whole lines, plus `x`/`X` and put.
//!
//! Ranges are resolved against the motion's target computed with the `PastEnd` column
//! limit. Charwise ranges are half-open `[from, to)`; inclusive motions (`e`, `$`) extend
//! `to` past the target character. Linewise motions cover every line between the cursor
//! and the target.

use super::motion::{apply_motion, line_target};
use super::{DispatchResult, indent_of};
use crate::{MotionKind, OperatorKind};
use core_config::EditorOptions;
use core_state::{AutoIndent, EditorError, EditorState, Mode, Register};
use core_text::{Buffer, ColumnLimit, Position, motion};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    Chars(Position, Position),
    /// Inclusive line range.
    Lines(usize, usize),
}

fn line_len(buf: &Buffer, line: usize) -> usize {
    buf.line_len(line).unwrap_or(0)
}

fn operator_span(
    state: &EditorState,
    op: OperatorKind,
    kind: MotionKind,
    count: u32,
) -> Result<Option<Span>, EditorError> {
    let buf = state.buffer();
    let cursor = &state.cursor;
    let start = cursor.position();
    if kind.is_linewise() {
        let target = apply_motion(state, cursor, kind, count, ColumnLimit::PastEnd)?.position();
        if matches!(kind, MotionKind::Up | MotionKind::Down) && target.line == start.line {
            return Ok(None);
        }
        return Ok(Some(Span::Lines(
            start.line.min(target.line),
            start.line.max(target.line),
        )));
    }

    // `cw` on a word behaves like `ce`: trailing blanks are kept.
    let kind = if op == OperatorKind::Change
        && kind == MotionKind::WordForward
        && buf.char_at(start).is_some_and(|c| !c.is_whitespace())
    {
        MotionKind::WordEnd
    } else {
        kind
    };

    let target = apply_motion(state, cursor, kind, count, ColumnLimit::PastEnd)?.position();
    let (from, mut to) = if target < start {
        (target, start)
    } else {
        (start, target)
    };

    if kind.is_inclusive() {
        to.col = (to.col + 1).min(line_len(buf, to.line));
    } else if kind == MotionKind::WordForward && to.line > from.line {
        // The last word moved over ends the range when it closes a line.
        if to.col <= motion::first_non_blank_col(buf, to.line) {
            let prev = to.line - 1;
            to = Position::new(prev, line_len(buf, prev));
        }
    } else if to.col == 0 && to.line > from.line {
        // Exclusive motion ending in column 0: linewise when it starts at or before the
        // first non-blank, otherwise it stops at the previous line end.
        if from.col <= motion::first_non_blank_col(buf, from.line) {
            return Ok(Some(Span::Lines(from.line, to.line - 1)));
        }
        let prev = to.line - 1;
        to = Position::new(prev, line_len(buf, prev));
    }

    Ok((from < to).then_some(Span::Chars(from, to)))
}

/// `register` is the `"x` prefix, if any.
pub(crate) fn apply_operator(
    op: OperatorKind,
    kind: MotionKind,
    count: u32,
    register: Option<char>,
    state: &mut EditorState,
    options: &EditorOptions,
) -> Result<DispatchResult, EditorError> {
    let Some(span) = operator_span(state, op, kind, count)? else {
        if op == OperatorKind::Change && !kind.is_linewise() {
            // `C` on an empty line or `c0` in column 0: nothing to remove, Insert still starts.
            trace!(target: "actions.dispatch", motion=?kind, count, "change_empty_range");
            state.begin_group();
            state.mode = Mode::Insert;
            return Ok(DispatchResult::dirty());
        }
        trace!(target: "actions.dispatch", ?op, motion=?kind, count, "operator_noop");
        return Ok(DispatchResult::clean());
    };
    trace!(target: "actions.dispatch", ?op, motion=?kind, count, ?span, "operator");
    match span {
        Span::Chars(from, to) => operate_chars(op, from, to, register, state),
        Span::Lines(first, last) => operate_lines(op, first, last, register, state, options),
    }
}

/// Doubled operator: `count` lines starting at the cursor line.
pub(crate) fn apply_linewise(
    op: OperatorKind,
    count: u32,
    register: Option<char>,
    state: &mut EditorState,
    options: &EditorOptions,
) -> Result<DispatchResult, EditorError> {
    let first = state.position().line;
    let last_line = state.buffer().line_count() - 1;
    let last = (first + count.max(1) as usize - 1).min(last_line);
    trace!(target: "actions.dispatch", ?op, first, last, "operator_lines");
    operate_lines(op, first, last, register, state, options)
}

fn operate_chars(
    op: OperatorKind,
    from: Position,
    to: Position,
    register: Option<char>,
    state: &mut EditorState,
) -> Result<DispatchResult, EditorError> {
    match op {
        OperatorKind::Yank => {
            let text = state.buffer().slice(from, to)?;
            state.registers.store_yank(register, Register::chars(text));
            state.cursor.set(from);
        }
        OperatorKind::Delete => {
            let removed = state.apply_edit(|buf, cursor| {
                let removed = buf.delete_range(from, to)?;
                cursor.set(from);
                Ok(removed)
            })?;
            state.registers.store_delete(register, Register::chars(removed));
        }
        OperatorKind::Change => {
            state.begin_group();
            let removed = match state.edit(|buf, cursor| {
                let removed = buf.delete_range(from, to)?;
                cursor.set(from);
                Ok(removed)
            }) {
                Ok(removed) => removed,
                Err(e) => {
                    state.rollback_group();
                    return Err(e);
                }
            };
            state.registers.store_delete(register, Register::chars(removed));
            state.mode = Mode::Insert;
        }
    }
    state.normalize_cursor();
    Ok(DispatchResult::dirty())
}

fn operate_lines(
    op: OperatorKind,
    first: usize,
    last: usize,
    register: Option<char>,
    state: &mut EditorState,
    options: &EditorOptions,
) -> Result<DispatchResult, EditorError> {
    let lines = state.buffer().lines();
    let Some(taken) = lines.get(first..=last) else {
        return Err(core_text::TextError::OutOfBounds { line: last, col: 0 }.into());
    };
    let payload = Register::lines(taken);
    let count = last - first + 1;
    match op {
        OperatorKind::Yank => {
            let col = state.position().col;
            state.cursor.set(Position::new(first, col));
        }
        OperatorKind::Delete => {
            state.apply_edit(|buf, cursor| {
                buf.replace_lines(first, count, &[])?;
                cursor.set(line_target(buf, first));
                Ok(())
            })?;
        }
        OperatorKind::Change => {
            let indent = if options.auto_indent {
                indent_of(state, first)
            } else {
                String::new()
            };
            state.begin_group();
            let res = state.edit(|buf, cursor| {
                let col = indent.chars().count();
                buf.replace_lines(first, count, std::slice::from_ref(&indent))?;
                cursor.set(Position::new(first, col));
                Ok(())
            });
            if let Err(e) = res {
                state.rollback_group();
                return Err(e);
            }
            state.auto_indent = (!indent.is_empty()).then(|| AutoIndent {
                line: first,
                text: indent,
            });
            state.mode = Mode::Insert;
        }
    }
    if op == OperatorKind::Yank {
        state.registers.store_yank(register, payload);
    } else {
        state.registers.store_delete(register, payload);
    }
    state.normalize_cursor();
    Ok(DispatchResult::dirty())
}

/// `x` (`before == false`) and `X`. Never crosses a line boundary.
pub(crate) fn delete_chars(
    count: u32,
    before: bool,
    register: Option<char>,
    state: &mut EditorState,
) -> Result<DispatchResult, EditorError> {
    let pos = state.position();
    let len = line_len(state.buffer(), pos.line);
    let count = count.max(1) as usize;
    let (from, to) = if before {
        if pos.col == 0 {
            return Ok(DispatchResult::clean());
        }
        (Position::new(pos.line, pos.col.saturating_sub(count)), pos)
    } else {
        if len == 0 || pos.col >= len {
            return Ok(DispatchResult::clean());
        }
        (pos, Position::new(pos.line, (pos.col + count).min(len)))
    };
    let removed = state.apply_edit(|buf, cursor| {
        let removed = buf.delete_range(from, to)?;
        cursor.set(from);
        Ok(removed)
    })?;
    trace!(target: "actions.dispatch", before, count, removed = removed.chars().count(), "delete_chars");
    state.registers.store_delete(register, Register::chars(removed));
    state.normalize_cursor();
    Ok(DispatchResult::dirty())
}

/// `p` / `P` from `register` (the unnamed register by default), repeated `count` times.
/// An empty unnamed register is a no-op; an empty named one is an error.
pub(crate) fn paste(
    before: bool,
    count: u32,
    register: Option<char>,
    state: &mut EditorState,
) -> Result<DispatchResult, EditorError> {
    let contents = state.registers.get(register).filter(|r| !r.is_empty()).cloned();
    let Some(payload) = contents else {
        return match register {
            Some(name) if name != '"' => Err(EditorError::EmptyRegister(name)),
            _ => Ok(DispatchResult::clean()),
        };
    };
    let count = count.max(1) as usize;
    let pos = state.position();

    if payload.linewise {
        let block = payload.payload_lines();
        let mut lines = Vec::with_capacity(block.len() * count);
        for _ in 0..count {
            lines.extend(block.iter().cloned());
        }
        let at = if before { pos.line } else { pos.line + 1 };
        state.apply_edit(|buf, cursor| {
            buf.replace_lines(at, 0, &lines)?;
            cursor.set(line_target(buf, at));
            Ok(())
        })?;
    } else {
        let text = payload.text.repeat(count);
        let len = line_len(state.buffer(), pos.line);
        let col = if before || len == 0 {
            pos.col
        } else {
            (pos.col + 1).min(len)
        };
        let at = Position::new(pos.line, col);
        let multiline = text.contains('\n');
        state.apply_edit(|buf, cursor| {
            let end = buf.insert(at, &text)?;
            if multiline {
                cursor.set(at);
            } else {
                cursor.set(Position::new(end.line, end.col.saturating_sub(1)));
            }
            Ok(())
        })?;
    }
    trace!(target: "actions.dispatch", before, count, linewise = payload.linewise, "paste");
    state.normalize_cursor();
    Ok(DispatchResult::dirty())
}
