//! Named marks (`m{a-z}`) and the jump list walked by `Ctrl-O` / `Ctrl-I`.
//!
//! Both follow line insertions and deletions: committed edits, undo and redo report a
//! `LineShift`, positions below the change move with it, and positions on deleted lines
//! are dropped.

use crate::undo::LineShift;
use core_text::Position;

/// Entries kept in the jump list.
pub const JUMP_LIST_MAX: usize = 100;

#[derive(Debug, Clone, Default)]
pub struct Marks {
    letters: [Option<Position>; 26],
    /// Where the latest jump started (`` ` `` and `'`).
    previous: Option<Position>,
}

impl Marks {
    /// Names accepted after `m`, `` ` `` and `'`.
    pub fn is_valid_name(name: char) -> bool {
        name.is_ascii_lowercase() || matches!(name, '`' | '\'')
    }

    fn slot(&mut self, name: char) -> Option<&mut Option<Position>> {
        match name {
            '`' | '\'' => Some(&mut self.previous),
            'a'..='z' => self.letters.get_mut((name as u8 - b'a') as usize),
            _ => None,
        }
    }

    /// Returns false for names that are not marks.
    pub fn set(&mut self, name: char, pos: Position) -> bool {
        match self.slot(name) {
            Some(slot) => {
                *slot = Some(pos);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: char) -> Option<Position> {
        match name {
            '`' | '\'' => self.previous,
            'a'..='z' => self.letters.get((name as u8 - b'a') as usize).copied().flatten(),
            _ => None,
        }
    }

    pub fn shift(&mut self, shift: LineShift) {
        for slot in self.letters.iter_mut().chain(std::iter::once(&mut self.previous)) {
            *slot = slot.and_then(|p| shift.apply(p));
        }
    }
}

/// Positions left by jumps, oldest first. `index == entries.len()` means the list is not
/// being walked.
#[derive(Debug, Clone, Default)]
pub struct JumpList {
    entries: Vec<Position>,
    index: usize,
}

impl JumpList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a jump origin. One entry per line; the newest wins.
    pub fn push(&mut self, pos: Position) {
        self.entries.retain(|p| p.line != pos.line);
        self.entries.push(pos);
        if self.entries.len() > JUMP_LIST_MAX {
            self.entries.remove(0);
        }
        self.index = self.entries.len();
    }

    /// `Ctrl-O`: step `count` entries back. The first step back from the end records
    /// `current` so `Ctrl-I` can return to it.
    pub fn back(&mut self, current: Position, count: usize) -> Option<Position> {
        if self.index >= self.entries.len() {
            self.push(current);
            self.index = self.entries.len() - 1;
        }
        let target = self.index.checked_sub(count.max(1))?;
        self.index = target;
        self.entries.get(target).copied()
    }

    /// `Ctrl-I`: step `count` entries forward.
    pub fn forward(&mut self, count: usize) -> Option<Position> {
        let target = self.index.checked_add(count.max(1))?;
        let pos = self.entries.get(target).copied()?;
        self.index = target;
        Some(pos)
    }

    pub fn shift(&mut self, shift: LineShift) {
        let before = self.entries.len();
        self.entries = self.entries.iter().filter_map(|p| shift.apply(*p)).collect();
        let dropped = before - self.entries.len();
        self.index = self.index.saturating_sub(dropped).min(self.entries.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn p(line: usize, col: usize) -> Position {
        Position::new(line, col)
    }

    #[test]
    fn marks_set_and_get() {
        let mut m = Marks::default();
        assert!(m.set('a', p(3, 1)));
        assert!(!m.set('A', p(0, 0)));
        assert!(m.set('\'', p(1, 0)));
        assert_eq!(m.get('a'), Some(p(3, 1)));
        assert_eq!(m.get('`'), Some(p(1, 0)));
        assert_eq!(m.get('b'), None);
    }

    #[test]
    fn marks_follow_line_changes() {
        let mut m = Marks::default();
        m.set('a', p(0, 2));
        m.set('b', p(2, 1));
        m.set('c', p(5, 0));
        // Lines 1..=2 deleted.
        m.shift(LineShift {
            first_line: 1,
            removed: 2,
            inserted: 0,
        });
        assert_eq!(m.get('a'), Some(p(0, 2)));
        assert_eq!(m.get('b'), None);
        assert_eq!(m.get('c'), Some(p(3, 0)));
        // One line opened above line 0.
        m.shift(LineShift {
            first_line: 0,
            removed: 0,
            inserted: 1,
        });
        assert_eq!(m.get('a'), Some(p(1, 2)));
    }

    #[test]
    fn jump_list_walks_back_and_forward() {
        let mut j = JumpList::default();
        j.push(p(0, 0));
        j.push(p(10, 0));
        assert_eq!(j.back(p(20, 3), 1), Some(p(10, 0)));
        assert_eq!(j.back(p(10, 0), 1), Some(p(0, 0)));
        assert_eq!(j.back(p(0, 0), 1), None);
        assert_eq!(j.forward(2), Some(p(20, 3)));
        assert_eq!(j.forward(1), None);
        assert_eq!(j.len(), 3);
    }

    #[test]
    fn jump_list_keeps_one_entry_per_line() {
        let mut j = JumpList::default();
        j.push(p(4, 0));
        j.push(p(7, 0));
        j.push(p(4, 2));
        assert_eq!(j.len(), 2);
        assert_eq!(j.back(p(9, 0), 1), Some(p(4, 2)));
    }
}
