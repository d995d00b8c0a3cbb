//! Editor state: the buffer, cursor, mode, registers, marks and undo history of one
//! editing session.
//!
//! Undo grouping:
//! - Every buffer mutation runs inside a group. A group captures the buffer (a cheap rope
//!   clone) and cursor when it opens; on commit the old and new lines are diffed into a
//!   single line-range `UndoEntry`. A group without a net change records nothing.
//! - Normal mode commands (`x`, `p`, `dd`, operator + motion) use `apply_edit`, which
//!   opens and commits a group around one command.
//! - An Insert session (including the deletion of a `c` operator that started it) keeps
//!   one group open from entry until `Esc`, so the whole session undoes as one unit.
//!
//! Rollback: `edit` restores the buffer and cursor when the closure fails, so a failing
//! command never leaves a partial change behind.

use core_text::{Buffer, ColumnLimit, Cursor, Position, TextError};
use std::path::PathBuf;

pub mod error;
pub mod line_ending;
pub mod marks;
pub mod registers;
pub mod undo;

pub use error::EditorError;
pub use line_ending::{LineEnding, NormalizedText, TextFormat, normalize_line_endings};
pub use marks::{JUMP_LIST_MAX, JumpList, Marks};
pub use registers::{Register, Registers};
use undo::UndoEngine;
pub use undo::{LineShift, UNDO_HISTORY_MAX, UndoEntry};

/// Text rows assumed until the host reports its view size.
pub const DEFAULT_VIEW_ROWS: usize = 22;

/// Current editor mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Navigation and commands.
    #[default]
    Normal,
    /// Text entry.
    Insert,
    /// Typing an ex command after `:`.
    CommandLine,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::CommandLine => "COMMAND",
        }
    }

    /// Column limit the cursor obeys while in this mode.
    pub fn column_limit(self) -> ColumnLimit {
        match self {
            Mode::Insert => ColumnLimit::PastEnd,
            Mode::Normal | Mode::CommandLine => ColumnLimit::OnChar,
        }
    }
}

/// Indent inserted on a fresh line by `o`, `O`, `cc` or Enter. Leaving Insert removes
/// it again when nothing was typed after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoIndent {
    pub line: usize,
    pub text: String,
}

/// Text typed after `:`. Present only while the command line is open.
#[derive(Debug, Default, Clone)]
pub struct CommandLineState {
    buf: Option<String>,
}

impl CommandLineState {
    pub fn is_active(&self) -> bool {
        self.buf.is_some()
    }
    /// Current text (without the `:` prompt).
    pub fn text(&self) -> Option<&str> {
        self.buf.as_deref()
    }
    /// Begin a new, empty command.
    pub fn begin(&mut self) {
        self.buf = Some(String::new());
    }
    pub fn push_char(&mut self, ch: char) {
        if let Some(buf) = self.buf.as_mut() {
            buf.push(ch);
        }
    }
    /// Remove the last character. Returns false when there was nothing left to remove.
    pub fn backspace(&mut self) -> bool {
        self.buf.as_mut().and_then(String::pop).is_some()
    }
    /// Close the command line, returning what was typed.
    pub fn take(&mut self) -> Option<String> {
        self.buf.take()
    }
    pub fn clear(&mut self) {
        self.buf = None;
    }
}

/// Top-level state of one editing session.
#[derive(Debug)]
pub struct EditorState {
    buffer: Buffer,
    pub cursor: Cursor,
    pub mode: Mode,
    pub command_line: CommandLineState,
    pub registers: Registers,
    pub marks: Marks,
    pub jumps: JumpList,
    /// Buffer rows the host shows; page motions scroll by two less.
    pub view_rows: usize,
    pub file_name: Option<PathBuf>,
    /// On-disk line ending and trailing newline to reproduce on write.
    pub format: TextFormat,
    /// Status line message (errors and command feedback).
    pub status: Option<String>,
    pub auto_indent: Option<AutoIndent>,
    undo: UndoEngine,
}

impl EditorState {
    pub fn new(buffer: Buffer) -> Self {
        Self::with_undo_levels(buffer, UNDO_HISTORY_MAX)
    }

    pub fn with_undo_levels(buffer: Buffer, levels: usize) -> Self {
        Self {
            buffer,
            cursor: Cursor::default(),
            mode: Mode::Normal,
            command_line: CommandLineState::default(),
            registers: Registers::default(),
            marks: Marks::default(),
            jumps: JumpList::default(),
            view_rows: DEFAULT_VIEW_ROWS,
            file_name: None,
            format: TextFormat::default(),
            status: None,
            auto_indent: None,
            undo: UndoEngine::with_capacity(levels),
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Clamp the cursor to the buffer under the current mode's column limit.
    pub fn normalize_cursor(&mut self) {
        let limit = self.mode.column_limit();
        self.cursor.clamp(&self.buffer, limit);
    }

    pub fn set_status<S: Into<String>>(&mut self, msg: S) {
        self.status = Some(msg.into());
    }

    /// Open an undo group at the current buffer and cursor. No-op if one is open.
    pub fn begin_group(&mut self) -> bool {
        self.undo.begin_group(&self.buffer, self.cursor.position())
    }

    /// Commit the open group. Returns true if an entry was recorded.
    pub fn commit_group(&mut self) -> bool {
        match self.undo.commit_group(&self.buffer, self.cursor.position()) {
            Some(shift) => {
                self.shift_positions(shift);
                true
            }
            None => false,
        }
    }

    /// Move marks and jump list entries along with a line change.
    fn shift_positions(&mut self, shift: LineShift) {
        self.marks.shift(shift);
        self.jumps.shift(shift);
    }

    /// Remember `from` as the origin of a jump (`G`, `gg`, `:N`, mark jumps).
    pub fn record_jump(&mut self, from: Position) {
        self.jumps.push(from);
        self.marks.set('`', from);
    }

    pub fn is_group_open(&self) -> bool {
        self.undo.is_group_open()
    }

    /// Discard the open group and restore the state it captured.
    pub fn rollback_group(&mut self) {
        if let Some((buffer, pos)) = self.undo.abandon_group() {
            self.buffer = buffer;
            self.cursor.set(pos);
        }
    }

    /// Mutate the buffer inside whatever group is open. On error the buffer and cursor
    /// are restored to their state before the call.
    pub fn edit<T, F>(&mut self, f: F) -> Result<T, EditorError>
    where
        F: FnOnce(&mut Buffer, &mut Cursor) -> Result<T, TextError>,
    {
        let saved_buffer = self.buffer.clone();
        let saved_cursor = self.cursor;
        match f(&mut self.buffer, &mut self.cursor) {
            Ok(v) => Ok(v),
            Err(e) => {
                self.buffer = saved_buffer;
                self.cursor = saved_cursor;
                Err(e.into())
            }
        }
    }

    /// Apply one self-contained edit as its own undo entry. When a group is already open
    /// the edit joins it instead.
    pub fn apply_edit<T, F>(&mut self, f: F) -> Result<T, EditorError>
    where
        F: FnOnce(&mut Buffer, &mut Cursor) -> Result<T, TextError>,
    {
        let owns_group = self.begin_group();
        match self.edit(f) {
            Ok(v) => {
                if owns_group {
                    self.commit_group();
                }
                Ok(v)
            }
            Err(e) => {
                if owns_group {
                    self.undo.abandon_group();
                }
                Err(e)
            }
        }
    }

    pub fn undo(&mut self) -> Result<(), EditorError> {
        self.commit_group();
        let mut pos = self.cursor.position();
        let shift = self.undo.undo(&mut self.buffer, &mut pos)?;
        self.shift_positions(shift);
        self.cursor.set(pos);
        self.normalize_cursor();
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), EditorError> {
        self.commit_group();
        let mut pos = self.cursor.position();
        let shift = self.undo.redo(&mut self.buffer, &mut pos)?;
        self.shift_positions(shift);
        self.cursor.set(pos);
        self.normalize_cursor();
        Ok(())
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.undo_depth()
    }
    pub fn redo_depth(&self) -> usize {
        self.undo.redo_depth()
    }

    /// True when the buffer differs from its last written state.
    pub fn is_modified(&self) -> bool {
        // An open Insert session counts once it has changed text.
        self.undo.is_modified()
            || self
                .undo
                .group_snapshot()
                .is_some_and(|b| *b != self.buffer)
    }

    /// Record the current history position as written.
    pub fn mark_saved(&mut self) {
        self.undo.mark_saved();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn state(text: &str) -> EditorState {
        EditorState::new(Buffer::from_text(text))
    }

    #[test]
    fn apply_edit_records_one_entry() {
        let mut st = state("hello");
        st.apply_edit(|buf, cursor| {
            buf.delete_range(Position::new(0, 0), Position::new(0, 1))?;
            cursor.set(Position::origin());
            Ok(())
        })
        .unwrap();
        assert_eq!(st.buffer().lines(), vec!["ello"]);
        assert_eq!(st.undo_depth(), 1);
        assert!(st.is_modified());
        st.undo().unwrap();
        assert_eq!(st.buffer().lines(), vec!["hello"]);
        assert!(!st.is_modified());
    }

    #[test]
    fn failed_edit_rolls_back_partial_changes() {
        let mut st = state("abc");
        st.cursor.set(Position::new(0, 1));
        let err = st
            .apply_edit(|buf, cursor| {
                buf.insert(Position::new(0, 0), "X")?;
                cursor.set(Position::new(0, 2));
                buf.delete_range(Position::new(0, 0), Position::new(4, 0))
            })
            .unwrap_err();
        assert!(matches!(err, EditorError::Text(TextError::OutOfBounds { .. })));
        assert_eq!(st.buffer().lines(), vec!["abc"]);
        assert_eq!(st.position(), Position::new(0, 1));
        assert_eq!(st.undo_depth(), 0);
        assert!(!st.is_group_open());
    }

    #[test]
    fn open_group_collects_several_edits() {
        let mut st = state("");
        st.begin_group();
        st.mode = Mode::Insert;
        for (i, ch) in "abc".chars().enumerate() {
            st.apply_edit(|buf, cursor| {
                let end = buf.insert(Position::new(0, i), &ch.to_string())?;
                cursor.set(end);
                Ok(())
            })
            .unwrap();
        }
        assert!(st.is_modified(), "open session with text counts as modified");
        assert_eq!(st.undo_depth(), 0);
        st.mode = Mode::Normal;
        assert!(st.commit_group());
        assert_eq!(st.undo_depth(), 1);
        st.undo().unwrap();
        assert_eq!(st.buffer().lines(), vec![""]);
        assert_eq!(st.position(), Position::origin());
    }

    #[test]
    fn marks_follow_committed_edits_and_undo() {
        let mut st = state("one\ntwo\nthree");
        st.marks.set('a', Position::new(2, 1));
        st.apply_edit(|buf, cursor| {
            buf.replace_lines(0, 1, &[])?;
            cursor.set(Position::origin());
            Ok(())
        })
        .unwrap();
        assert_eq!(st.marks.get('a'), Some(Position::new(1, 1)));
        st.undo().unwrap();
        assert_eq!(st.marks.get('a'), Some(Position::new(2, 1)));
    }

    #[test]
    fn rollback_group_restores_snapshot() {
        let mut st = state("one\ntwo");
        st.begin_group();
        st.edit(|buf, _| buf.delete_range(Position::new(0, 0), Position::new(1, 0)))
            .unwrap();
        st.rollback_group();
        assert_eq!(st.buffer().lines(), vec!["one", "two"]);
        assert!(!st.is_group_open());
    }

    #[test]
    fn undo_normalizes_cursor_for_normal_mode() {
        let mut st = state("ab");
        st.cursor.set(Position::new(0, 1));
        st.apply_edit(|buf, cursor| {
            let end = buf.insert(Position::new(0, 2), "cd")?;
            cursor.set(end);
            Ok(())
        })
        .unwrap();
        st.undo().unwrap();
        assert_eq!(st.position(), Position::new(0, 1));
        st.redo().unwrap();
        assert_eq!(st.position(), Position::new(0, 3), "clamped onto last char");
        assert!(matches!(st.redo(), Err(EditorError::NothingToRedo)));
    }

    #[test]
    fn command_line_state_lifecycle() {
        let mut cl = CommandLineState::default();
        assert!(!cl.is_active());
        cl.begin();
        cl.push_char('w');
        cl.push_char('q');
        assert_eq!(cl.text(), Some("wq"));
        assert!(cl.backspace());
        assert!(cl.backspace());
        assert!(!cl.backspace());
        assert!(cl.is_active());
        assert_eq!(cl.take(), Some(String::new()));
        assert!(!cl.is_active());
    }
}
