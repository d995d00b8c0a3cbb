//! Rope-based text buffer abstraction.
//!
//! A `Buffer` is an ordered list of lines. Line breaks are structural: the rope stores
//! `'\n'` between lines but never after the last one, so a buffer always has at least
//! one (possibly empty) line. Columns are counted in `char`s.

use ropey::Rope;
use thiserror::Error;

pub mod cursor;
pub mod motion;

pub use cursor::{ColumnLimit, Cursor};

/// A position inside a buffer expressed as (line index, char column within that line).
///
/// Field order gives the derived `Ord` document order (line first, then column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
    pub fn origin() -> Self {
        Self { line: 0, col: 0 }
    }

    /// Clamp into `[0, line_count)` x `[0, max_col(line)]`.
    pub fn clamp_to<F>(&mut self, line_count: usize, mut max_col: F)
    where
        F: FnMut(usize) -> usize,
    {
        if line_count == 0 {
            *self = Self::origin();
            return;
        }
        if self.line >= line_count {
            self.line = line_count - 1;
        }
        let max = max_col(self.line);
        if self.col > max {
            self.col = max;
        }
    }
}

/// Invariant violations reported by buffer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("position {line}:{col} is out of bounds")]
    OutOfBounds { line: usize, col: usize },
    #[error("invalid range: {start:?} is after {end:?}")]
    InvalidRange { start: Position, end: Position },
}

/// A text buffer backed by a `ropey::Rope`.
#[derive(Clone, Debug)]
pub struct Buffer {
    rope: Rope,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Buffer {
    fn eq(&self, other: &Self) -> bool {
        self.rope == other.rope
    }
}

impl Eq for Buffer {}

impl Buffer {
    /// A buffer holding one empty line.
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build a buffer from LF-separated text. A trailing `'\n'` yields a trailing empty line,
    /// exactly like `str::split('\n')`.
    pub fn from_text(content: &str) -> Self {
        Self {
            rope: Rope::from_str(content),
        }
    }

    /// Build a buffer from already split lines. An empty iterator produces one empty line.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut text = String::new();
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            text.push_str(line.as_ref());
        }
        Self::from_text(&text)
    }

    /// Total number of lines (always >= 1).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Char length of line `idx`, excluding the structural line break.
    pub fn line_len(&self, idx: usize) -> Result<usize, TextError> {
        self.check_line(idx)?;
        Ok(self.raw_line_len(idx))
    }

    /// Owned copy of line `idx` without its line break.
    pub fn line_text(&self, idx: usize) -> Result<String, TextError> {
        self.check_line(idx)?;
        let mut s = self.rope.line(idx).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        Ok(s)
    }

    /// Character at `pos`, or `None` at (or past) end of line.
    pub fn char_at(&self, pos: Position) -> Option<char> {
        if pos.line >= self.line_count() || pos.col >= self.raw_line_len(pos.line) {
            return None;
        }
        Some(self.rope.line(pos.line).char(pos.col))
    }

    /// All lines as owned strings.
    pub fn lines(&self) -> Vec<String> {
        self.rope
            .lines()
            .map(|l| {
                let mut s = l.to_string();
                if s.ends_with('\n') {
                    s.pop();
                }
                s
            })
            .collect()
    }

    /// Full content with `'\n'` between lines.
    pub fn to_text(&self) -> String {
        self.rope.to_string()
    }

    /// Position just past the last character of the buffer.
    pub fn end_position(&self) -> Position {
        let last = self.line_count() - 1;
        Position::new(last, self.raw_line_len(last))
    }

    /// Validate a position against the buffer invariant (`col` may equal the line length).
    pub fn check_position(&self, pos: Position) -> Result<(), TextError> {
        if pos.line >= self.line_count() || pos.col > self.raw_line_len(pos.line) {
            return Err(TextError::OutOfBounds {
                line: pos.line,
                col: pos.col,
            });
        }
        Ok(())
    }

    /// Insert `text` at `pos`. Embedded `'\n'` split the line. Returns the position just
    /// after the inserted text.
    pub fn insert(&mut self, pos: Position, text: &str) -> Result<Position, TextError> {
        self.check_position(pos)?;
        let idx = self.char_index(pos);
        self.rope.insert(idx, text);
        Ok(match text.rfind('\n') {
            None => Position::new(pos.line, pos.col + text.chars().count()),
            Some(last_nl) => {
                let breaks = text.matches('\n').count();
                Position::new(pos.line + breaks, text[last_nl + 1..].chars().count())
            }
        })
    }

    /// Remove `[start, end)` and return the removed text (line breaks included as `'\n'`).
    pub fn delete_range(&mut self, start: Position, end: Position) -> Result<String, TextError> {
        self.check_position(start)?;
        self.check_position(end)?;
        if start > end {
            return Err(TextError::InvalidRange { start, end });
        }
        let a = self.char_index(start);
        let b = self.char_index(end);
        let removed = self.rope.slice(a..b).to_string();
        self.rope.remove(a..b);
        Ok(removed)
    }

    /// Copy of `[start, end)` without mutating.
    pub fn slice(&self, start: Position, end: Position) -> Result<String, TextError> {
        self.check_position(start)?;
        self.check_position(end)?;
        if start > end {
            return Err(TextError::InvalidRange { start, end });
        }
        Ok(self
            .rope
            .slice(self.char_index(start)..self.char_index(end))
            .to_string())
    }

    /// Replace the `count` whole lines starting at `first` with `lines`.
    ///
    /// `count == 0` inserts before `first` (`first == line_count` appends); an empty
    /// `lines` removes the range. Removing every line leaves a single empty line.
    pub fn replace_lines(
        &mut self,
        first: usize,
        count: usize,
        lines: &[String],
    ) -> Result<(), TextError> {
        let total = self.line_count();
        if first > total || first + count > total {
            return Err(TextError::OutOfBounds {
                line: first + count,
                col: 0,
            });
        }
        if count == 0 && lines.is_empty() {
            return Ok(());
        }
        let joined = lines.join("\n");
        if count == 0 {
            if first < total {
                self.insert(Position::new(first, 0), &format!("{joined}\n"))?;
            } else {
                let end = self.end_position();
                self.insert(end, &format!("\n{joined}"))?;
            }
            return Ok(());
        }
        let last = first + count - 1;
        let end = Position::new(last, self.raw_line_len(last));
        if !lines.is_empty() {
            self.delete_range(Position::new(first, 0), end)?;
            self.insert(Position::new(first, 0), &joined)?;
        } else if first + count < total {
            self.delete_range(Position::new(first, 0), Position::new(first + count, 0))?;
        } else if first > 0 {
            let prev_end = Position::new(first - 1, self.raw_line_len(first - 1));
            self.delete_range(prev_end, end)?;
        } else {
            self.delete_range(Position::origin(), end)?;
        }
        Ok(())
    }

    fn check_line(&self, idx: usize) -> Result<(), TextError> {
        if idx >= self.line_count() {
            return Err(TextError::OutOfBounds { line: idx, col: 0 });
        }
        Ok(())
    }

    fn raw_line_len(&self, idx: usize) -> usize {
        let line = self.rope.line(idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    fn char_index(&self, pos: Position) -> usize {
        self.rope.line_to_char(pos.line) + pos.col
    }
}
