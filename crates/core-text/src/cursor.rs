//! Cursor model: the active position plus the column vertical motion aims for.

use crate::{Buffer, Position};

/// How far past the last character a column may go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnLimit {
    /// Normal mode: the cursor rests on a character (column 0 on empty lines).
    OnChar,
    /// Insert mode and operator targets: one past the last character is allowed.
    PastEnd,
}

impl ColumnLimit {
    pub fn max_col(self, line_len: usize) -> usize {
        match self {
            ColumnLimit::OnChar => line_len.saturating_sub(1),
            ColumnLimit::PastEnd => line_len,
        }
    }
}

/// The single cursor of an editing session.
///
/// `desired_col` is the column remembered across vertical motion: moving down through a
/// short line and back up restores the original column. `usize::MAX` means "end of line"
/// and is set by `$`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pos: Position,
    desired_col: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new(Position::origin())
    }
}

impl Cursor {
    pub fn new(pos: Position) -> Self {
        Self {
            pos,
            desired_col: pos.col,
        }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn desired_col(&self) -> usize {
        self.desired_col
    }

    /// Move to `pos` and remember its column for later vertical motion.
    pub fn set(&mut self, pos: Position) {
        self.pos = pos;
        self.desired_col = pos.col;
    }

    /// Move to `pos` keeping the remembered column (vertical motion).
    pub fn set_vertical(&mut self, pos: Position) {
        self.pos = pos;
    }

    /// Stick to end of line for subsequent vertical motion.
    pub fn stick_to_line_end(&mut self) {
        self.desired_col = usize::MAX;
    }

    /// Pull the cursor back inside the buffer under `limit`. The remembered column is
    /// only reset when the line itself had to be clamped.
    pub fn clamp(&mut self, buf: &Buffer, limit: ColumnLimit) {
        let before = self.pos.line;
        self.pos.clamp_to(buf.line_count(), |l| {
            limit.max_col(buf.line_len(l).unwrap_or(0))
        });
        if self.pos.line != before {
            self.desired_col = self.pos.col;
        }
    }

    /// True if the position satisfies the buffer invariant under `limit`.
    pub fn is_valid(&self, buf: &Buffer, limit: ColumnLimit) -> bool {
        self.pos.line < buf.line_count()
            && buf
                .line_len(self.pos.line)
                .map(|len| self.pos.col <= limit.max_col(len))
                .unwrap_or(false)
    }
}
