//! Cursor motion helpers.
//!
//! These operate purely on a `Buffer` + `Position` (or `Cursor` for vertical motion) and
//! are free of editor state. Horizontal motions never wrap to a neighbouring line; word
//! motions do, treating an empty line as a word of its own.

use crate::{Buffer, ColumnLimit, Cursor, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Blank,
    Word,
    Punct,
}

fn classify(c: Option<char>) -> CharClass {
    match c {
        None => CharClass::Blank,
        Some(c) if c.is_whitespace() => CharClass::Blank,
        Some(c) if c == '_' || c.is_alphanumeric() => CharClass::Word,
        Some(_) => CharClass::Punct,
    }
}

fn line_len(buf: &Buffer, line: usize) -> usize {
    buf.line_len(line).unwrap_or(0)
}

fn class_at(buf: &Buffer, pos: Position) -> CharClass {
    classify(buf.char_at(pos))
}

fn is_empty_line_start(buf: &Buffer, pos: Position) -> bool {
    pos.col == 0 && line_len(buf, pos.line) == 0
}

/// Next position in document order, visiting each end-of-line once.
fn step_forward(buf: &Buffer, pos: Position) -> Option<Position> {
    if pos.col < line_len(buf, pos.line) {
        Some(Position::new(pos.line, pos.col + 1))
    } else if pos.line + 1 < buf.line_count() {
        Some(Position::new(pos.line + 1, 0))
    } else {
        None
    }
}

fn step_backward(buf: &Buffer, pos: Position) -> Option<Position> {
    if pos.col > 0 {
        Some(Position::new(pos.line, pos.col - 1))
    } else if pos.line > 0 {
        Some(Position::new(pos.line - 1, line_len(buf, pos.line - 1)))
    } else {
        None
    }
}

/// Move left one character. Returns false at column 0.
pub fn left(pos: &mut Position) -> bool {
    if pos.col == 0 {
        return false;
    }
    pos.col -= 1;
    true
}

/// Move right one character within `limit`. Returns false when already at the edge.
pub fn right(buf: &Buffer, pos: &mut Position, limit: ColumnLimit) -> bool {
    let max = limit.max_col(line_len(buf, pos.line));
    if pos.col >= max {
        return false;
    }
    pos.col += 1;
    true
}

/// Move to column 0.
pub fn line_start(pos: &mut Position) {
    pos.col = 0;
}

/// Column of the first non-blank character of `line` (0 for blank lines).
pub fn first_non_blank_col(buf: &Buffer, line: usize) -> usize {
    let Ok(text) = buf.line_text(line) else {
        return 0;
    };
    text.chars()
        .position(|c| !c.is_whitespace())
        .unwrap_or(0)
}

/// Move to the first non-blank character of the line.
pub fn first_non_blank(buf: &Buffer, pos: &mut Position) {
    pos.col = first_non_blank_col(buf, pos.line);
}

/// Move to the last column allowed by `limit`.
pub fn line_end(buf: &Buffer, pos: &mut Position, limit: ColumnLimit) {
    pos.col = limit.max_col(line_len(buf, pos.line));
}

fn vertical_target(buf: &Buffer, cursor: &Cursor, line: usize, limit: ColumnLimit) -> Position {
    let max = limit.max_col(line_len(buf, line));
    Position::new(line, cursor.desired_col().min(max))
}

/// Move up one line aiming for the remembered column. Returns false on the first line.
pub fn up(buf: &Buffer, cursor: &mut Cursor, limit: ColumnLimit) -> bool {
    let line = cursor.position().line;
    if line == 0 {
        return false;
    }
    let target = vertical_target(buf, cursor, line - 1, limit);
    cursor.set_vertical(target);
    true
}

/// Move down one line aiming for the remembered column. Returns false on the last line.
pub fn down(buf: &Buffer, cursor: &mut Cursor, limit: ColumnLimit) -> bool {
    let line = cursor.position().line;
    if line + 1 >= buf.line_count() {
        return false;
    }
    let target = vertical_target(buf, cursor, line + 1, limit);
    cursor.set_vertical(target);
    true
}

/// Jump to `line` (clamped to the buffer) at its first non-blank character.
pub fn goto_line(buf: &Buffer, pos: &mut Position, line: usize) {
    let line = line.min(buf.line_count() - 1);
    *pos = Position::new(line, first_non_blank_col(buf, line));
}

/// Start of the next word (`w`). At the end of the buffer the position moves to the
/// end of the last line. Returns false if nothing moved.
pub fn word_forward(buf: &Buffer, pos: &mut Position) -> bool {
    let origin = *pos;
    let mut p = origin;
    let class = class_at(buf, p);
    if class != CharClass::Blank {
        while class_at(buf, p) == class {
            match step_forward(buf, p) {
                Some(next) => p = next,
                None => {
                    *pos = p;
                    return p != origin;
                }
            }
        }
    }
    loop {
        if p != origin && is_empty_line_start(buf, p) {
            break;
        }
        if class_at(buf, p) != CharClass::Blank {
            break;
        }
        match step_forward(buf, p) {
            Some(next) => p = next,
            None => break,
        }
    }
    *pos = p;
    p != origin
}

/// Start of the current or previous word (`b`).
pub fn word_backward(buf: &Buffer, pos: &mut Position) -> bool {
    let origin = *pos;
    let Some(mut p) = step_backward(buf, origin) else {
        return false;
    };
    while class_at(buf, p) == CharClass::Blank && !is_empty_line_start(buf, p) {
        match step_backward(buf, p) {
            Some(prev) => p = prev,
            None => break,
        }
    }
    let class = class_at(buf, p);
    if class != CharClass::Blank {
        while p.col > 0 {
            let prev = Position::new(p.line, p.col - 1);
            if class_at(buf, prev) != class {
                break;
            }
            p = prev;
        }
    }
    *pos = p;
    p != origin
}

/// Last character of the current or next word (`e`).
pub fn word_end(buf: &Buffer, pos: &mut Position) -> bool {
    let origin = *pos;
    let Some(mut p) = step_forward(buf, origin) else {
        return false;
    };
    while class_at(buf, p) == CharClass::Blank {
        match step_forward(buf, p) {
            Some(next) => p = next,
            None => {
                return false;
            }
        }
    }
    let class = class_at(buf, p);
    loop {
        let next = Position::new(p.line, p.col + 1);
        if class_at(buf, next) != class {
            break;
        }
        p = next;
    }
    *pos = p;
    p != origin
}
