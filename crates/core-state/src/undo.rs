use core_text::{Buffer, Position};
use tracing::trace;

use crate::EditorError;

/// Default number of entries retained in undo history.
pub const UNDO_HISTORY_MAX: usize = 1000;

/// A reversible change: lines `first_line..first_line + before.len()` were replaced by
/// `after`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoEntry {
    pub first_line: usize,
    pub before: Vec<String>,
    pub after: Vec<String>,
    pub cursor_before: Position,
    pub cursor_after: Position,
    seq: u64,
}

impl UndoEntry {
    /// Build an entry by diffing whole-buffer line vectors. Returns `None` when the
    /// contents are identical.
    pub fn diff(
        old: &[String],
        new: &[String],
        cursor_before: Position,
        cursor_after: Position,
    ) -> Option<Self> {
        if old == new {
            return None;
        }
        let prefix = old.iter().zip(new).take_while(|(a, b)| a == b).count();
        let max_suffix = old.len().min(new.len()) - prefix;
        let suffix = old
            .iter()
            .rev()
            .zip(new.iter().rev())
            .take(max_suffix)
            .take_while(|(a, b)| a == b)
            .count();
        Some(Self {
            first_line: prefix,
            before: old[prefix..old.len() - suffix].to_vec(),
            after: new[prefix..new.len() - suffix].to_vec(),
            cursor_before,
            cursor_after,
            seq: 0,
        })
    }
}

impl UndoEntry {
    fn forward_shift(&self) -> LineShift {
        LineShift {
            first_line: self.first_line,
            removed: self.before.len(),
            inserted: self.after.len(),
        }
    }

    fn backward_shift(&self) -> LineShift {
        LineShift {
            first_line: self.first_line,
            removed: self.after.len(),
            inserted: self.before.len(),
        }
    }
}

/// Line footprint of an applied change: `removed` lines at `first_line` became
/// `inserted` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineShift {
    pub first_line: usize,
    pub removed: usize,
    pub inserted: usize,
}

impl LineShift {
    /// Where `pos` lands after the change; `None` when its line was deleted. Lines that
    /// were rewritten in place keep their positions.
    pub fn apply(self, pos: Position) -> Option<Position> {
        let kept = self.removed.min(self.inserted);
        if pos.line < self.first_line + kept {
            Some(pos)
        } else if pos.line < self.first_line + self.removed {
            None
        } else {
            Some(Position::new(pos.line - self.removed + self.inserted, pos.col))
        }
    }
}

/// Pre-edit state captured when a group opens.
#[derive(Debug, Clone)]
struct OpenGroup {
    buffer: Buffer,
    cursor: Position,
}

#[derive(Debug)]
pub struct UndoEngine {
    undo_stack: Vec<UndoEntry>,
    redo_stack: Vec<UndoEntry>,
    open: Option<OpenGroup>,
    capacity: usize,
    next_seq: u64,
    /// State id when the buffer was last written.
    saved_seq: Option<u64>,
    /// State id an empty undo stack stands for: the loaded text (`None`) until capacity
    /// trimming drops entries, then the last dropped entry.
    base_seq: Option<u64>,
    /// Groups that committed without a net change.
    groups_skipped: u64,
}

impl Default for UndoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoEngine {
    pub fn new() -> Self {
        Self::with_capacity(UNDO_HISTORY_MAX)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            open: None,
            capacity: capacity.max(1),
            next_seq: 1,
            saved_seq: None,
            base_seq: None,
            groups_skipped: 0,
        }
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
    pub fn groups_skipped(&self) -> u64 {
        self.groups_skipped
    }
    pub fn is_group_open(&self) -> bool {
        self.open.is_some()
    }
    /// Buffer captured by the open group.
    pub fn group_snapshot(&self) -> Option<&Buffer> {
        self.open.as_ref().map(|g| &g.buffer)
    }

    /// Push a new entry, dropping the oldest past capacity and clearing redo.
    pub fn record(&mut self, mut entry: UndoEntry) {
        entry.seq = self.next_seq;
        self.next_seq += 1;
        trace!(target: "state.undo", seq = entry.seq, first_line = entry.first_line, before = entry.before.len(), after = entry.after.len(), "record");
        self.undo_stack.push(entry);
        if self.undo_stack.len() > self.capacity {
            let dropped = self.undo_stack.remove(0);
            self.base_seq = Some(dropped.seq);
            trace!(target: "state.undo", capacity = self.capacity, base_seq = dropped.seq, "undo_stack_trimmed");
        }
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
    }

    /// Open a group unless one is already open. Returns true if a new group was opened.
    pub fn begin_group(&mut self, buffer: &Buffer, cursor: Position) -> bool {
        if self.open.is_some() {
            return false;
        }
        self.open = Some(OpenGroup {
            buffer: buffer.clone(),
            cursor,
        });
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), "group_open");
        true
    }

    /// Close the open group, recording the net change (if any). Returns the recorded
    /// change's line footprint.
    pub fn commit_group(&mut self, buffer: &Buffer, cursor: Position) -> Option<LineShift> {
        let group = self.open.take()?;
        if group.buffer == *buffer {
            self.groups_skipped += 1;
            trace!(target: "state.undo", skipped = self.groups_skipped, "group_no_change");
            return None;
        }
        match UndoEntry::diff(&group.buffer.lines(), &buffer.lines(), group.cursor, cursor) {
            Some(entry) => {
                let shift = entry.forward_shift();
                self.record(entry);
                Some(shift)
            }
            None => {
                self.groups_skipped += 1;
                None
            }
        }
    }

    /// Drop the open group without recording, handing back its pre-edit state.
    pub fn abandon_group(&mut self) -> Option<(Buffer, Position)> {
        let group = self.open.take()?;
        trace!(target: "state.undo", "group_abandoned");
        Some((group.buffer, group.cursor))
    }

    pub fn undo(&mut self, buffer: &mut Buffer, cursor: &mut Position) -> Result<LineShift, EditorError> {
        let Some(mut entry) = self.undo_stack.pop() else {
            return Err(EditorError::NothingToUndo);
        };
        if let Err(e) = buffer.replace_lines(entry.first_line, entry.after.len(), &entry.before) {
            self.undo_stack.push(entry);
            return Err(e.into());
        }
        entry.cursor_after = *cursor;
        *cursor = entry.cursor_before;
        trace!(target: "state.undo", seq = entry.seq, undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len() + 1, "undo_pop");
        let shift = entry.backward_shift();
        self.redo_stack.push(entry);
        Ok(shift)
    }

    pub fn redo(&mut self, buffer: &mut Buffer, cursor: &mut Position) -> Result<LineShift, EditorError> {
        let Some(entry) = self.redo_stack.pop() else {
            return Err(EditorError::NothingToRedo);
        };
        if let Err(e) = buffer.replace_lines(entry.first_line, entry.before.len(), &entry.after) {
            self.redo_stack.push(entry);
            return Err(e.into());
        }
        *cursor = entry.cursor_after;
        trace!(target: "state.undo", seq = entry.seq, undo_depth = self.undo_stack.len() + 1, redo_depth = self.redo_stack.len(), "redo_pop");
        let shift = entry.forward_shift();
        self.undo_stack.push(entry);
        Ok(shift)
    }

    /// Id of the current history position. Ids are never reused, so a written state
    /// that was trimmed away or discarded from redo can never compare equal again.
    fn current_seq(&self) -> Option<u64> {
        self.undo_stack.last().map(|e| e.seq).or(self.base_seq)
    }

    /// Remember the current history position as the written state.
    pub fn mark_saved(&mut self) {
        self.saved_seq = self.current_seq();
    }

    /// True when the history position differs from the last written state.
    pub fn is_modified(&self) -> bool {
        self.current_seq() != self.saved_seq
    }
}
