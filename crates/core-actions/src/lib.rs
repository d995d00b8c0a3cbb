//! Key translation, command dispatch and the editing session.
//!
//! Flow: `Session::handle_key` hands each key to the `KeyTranslator`, which yields an
//! `Action` once a key sequence is complete. `dispatcher::dispatch` applies it to the
//! `EditorState`. Hosts redraw from `Session::snapshot`.

pub mod dispatcher;
pub mod io_ops;
pub mod key_translator;
pub mod session;

pub use dispatcher::{DispatchContext, DispatchResult, dispatch};
pub use io_ops::{FsStore, LoadedText, TextStore};
pub use key_translator::KeyTranslator;
pub use session::{Session, Snapshot};

/// Cursor motions shared by Normal mode, operators and Insert-mode navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    Up,
    Down,
    /// `0`
    LineStart,
    /// `^`
    FirstNonBlank,
    /// `$`
    LineEnd,
    /// `w`
    WordForward,
    /// `b`
    WordBackward,
    /// `e`
    WordEnd,
    /// `gg`
    BufferStart,
    /// `G`
    BufferEnd,
    /// `{count}G` / `{count}gg`, 1-based.
    GotoLine(u32),
    /// `Ctrl-F` / `<PageDown>`
    PageDown,
    /// `Ctrl-B` / `<PageUp>`
    PageUp,
    /// `` `x `` (exact position) or `'x` (`linewise`, first non-blank of the line).
    Mark { name: char, linewise: bool },
}

impl MotionKind {
    /// Operators over these motions act on whole lines.
    pub fn is_linewise(self) -> bool {
        matches!(
            self,
            MotionKind::Up
                | MotionKind::Down
                | MotionKind::BufferStart
                | MotionKind::BufferEnd
                | MotionKind::GotoLine(_)
                | MotionKind::PageDown
                | MotionKind::PageUp
                | MotionKind::Mark { linewise: true, .. }
        )
    }

    /// Charwise motions whose target character is part of the operated range.
    pub fn is_inclusive(self) -> bool {
        matches!(self, MotionKind::LineEnd | MotionKind::WordEnd)
    }

    /// Motions that leave an entry in the jump list when used on their own.
    pub fn is_jump(self) -> bool {
        matches!(
            self,
            MotionKind::BufferStart
                | MotionKind::BufferEnd
                | MotionKind::GotoLine(_)
                | MotionKind::Mark { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Delete,
    Change,
    Yank,
}

impl OperatorKind {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'd' => Some(OperatorKind::Delete),
            'c' => Some(OperatorKind::Change),
            'y' => Some(OperatorKind::Yank),
            _ => None,
        }
    }
}

/// How a Normal-mode key enters Insert mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertKind {
    /// `i`
    Before,
    /// `a`
    After,
    /// `I`
    LineStart,
    /// `A`
    LineEnd,
    /// `o`
    OpenBelow,
    /// `O`
    OpenAbove,
}

/// A fully resolved Normal-mode command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move {
        motion: MotionKind,
        count: u32,
    },
    Operate {
        op: OperatorKind,
        motion: MotionKind,
        count: u32,
    },
    /// Doubled operator (`dd`, `cc`, `yy`) over `count` lines.
    OperateLines {
        op: OperatorKind,
        count: u32,
    },
    EnterInsert(InsertKind),
    /// `x`
    DeleteChar {
        count: u32,
    },
    /// `X`
    DeleteCharBefore {
        count: u32,
    },
    /// `p` / `P`
    Paste {
        before: bool,
        count: u32,
    },
    Undo {
        count: u32,
    },
    Redo {
        count: u32,
    },
    EnterCommandLine,
    /// `m{a-z}`
    SetMark(char),
    /// `Ctrl-O`
    JumpOlder {
        count: u32,
    },
    /// `Ctrl-I` / `<Tab>`
    JumpNewer {
        count: u32,
    },
}

impl Command {
    /// Commands a `"x` prefix applies to.
    pub fn uses_register(&self) -> bool {
        matches!(
            self,
            Command::Operate { .. }
                | Command::OperateLines { .. }
                | Command::DeleteChar { .. }
                | Command::DeleteCharBefore { .. }
                | Command::Paste { .. }
        )
    }
}

/// Insert-mode text edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    InsertChar(char),
    Newline,
    Backspace,
    DeleteForward,
    Tab,
}

/// Output of the key translator for every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Command(Command),
    /// A command prefixed with `"x`.
    RegisterCommand {
        register: char,
        command: Command,
    },
    Edit(EditKind),
    InsertMotion(MotionKind),
    LeaveInsert,
    CommandChar(char),
    CommandBackspace,
    CommandCancel,
    CommandExecute,
}
