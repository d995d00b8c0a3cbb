//! KeyTranslator: stateful key->Action translation.
//!
//! Normal mode keys are compositional: `[count] [operator [count]] motion`.
//!
//! State machine:
//! * Idle: optional `pending_count` accumulating prefix digits. A leading `0` is the
//!   `LineStart` motion, not a count.
//! * OperatorPending(op): operator captured; digits form `post_op_count` (again a
//!   leading `0` is `LineStart`). A motion emits `Operate { op, motion, count }` with
//!   `count = pending_count * post_op_count`; the same operator key again emits the
//!   linewise `OperateLines`. Any other key cancels silently.
//! * `g` waits for a second key: `gg` is a motion, anything else cancels.
//! * `` ` `` and `'` wait for a mark name and form a motion; `m` waits for the name to
//!   set. An invalid name cancels.
//! * `"` waits for a register name. The register rides along with the next command that
//!   reads or writes one (`Action::RegisterCommand`).
//! * Ctrl chords, `<Tab>` (`Ctrl-I`) and the page keys only act from idle; with an
//!   operator pending they cancel.
//! * `<Esc>` cancels everything. Counts are clamped to 999_999.
//!
//! Insert and CommandLine modes map keys one-to-one and carry no pending state.

use crate::{Action, Command, EditKind, InsertKind, MotionKind, OperatorKind};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::{Marks, Mode, Registers};

const MAX_COUNT: u32 = 999_999;

#[derive(Debug, Default)]
pub struct KeyTranslator {
    /// Count prefix prior to an operator or motion (e.g. `12d` or `12w`).
    pending_count: Option<u32>,
    /// Pending operator kind (d,y,c) awaiting motion.
    pending_operator: Option<OperatorKind>,
    /// Count following an operator but before the motion (e.g. `d3w`).
    post_op_count: Option<u32>,
    /// Saw `g`, waiting for the second key of `gg`.
    pending_g: bool,
    /// Saw `m`, `` ` `` or `'`, waiting for the mark name.
    pending_mark: Option<MarkKey>,
    /// Saw `"`, waiting for the register name.
    awaiting_register: bool,
    /// Register named by `"x` for the command being typed.
    pending_register: Option<char>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkKey {
    Set,
    Jump { linewise: bool },
}

impl KeyTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset transient state (counts/operators).
    pub fn reset(&mut self) {
        self.pending_count = None;
        self.pending_operator = None;
        self.post_op_count = None;
        self.pending_g = false;
        self.pending_mark = None;
        self.awaiting_register = false;
        self.pending_register = None;
    }

    /// True while a multi-key Normal command is being assembled.
    pub fn is_pending(&self) -> bool {
        self.pending_count.is_some()
            || self.pending_operator.is_some()
            || self.pending_g
            || self.pending_mark.is_some()
            || self.awaiting_register
            || self.pending_register.is_some()
    }

    /// Nothing but a count typed so far.
    fn is_idle(&self) -> bool {
        self.pending_operator.is_none()
            && !self.pending_g
            && self.pending_mark.is_none()
            && !self.awaiting_register
    }

    /// Core translation entrypoint.
    pub fn translate(&mut self, mode: Mode, key: &KeyEvent) -> Option<Action> {
        tracing::trace!(target: "actions.translate", mode=?mode, key=%key, pending=self.is_pending(), "translate_key_attempt");
        let action = match mode {
            Mode::Normal => {
                let register = self.pending_register;
                self.translate_normal(key).map(|command| match register {
                    Some(register) if command.uses_register() => {
                        Action::RegisterCommand { register, command }
                    }
                    _ => Action::Command(command),
                })
            }
            Mode::Insert => translate_insert(key),
            Mode::CommandLine => translate_command_line(key),
        };
        if let Some(a) = &action {
            tracing::trace!(target: "actions.translate", action=?a, "resolved");
        }
        action
    }

    /// Multiply the prefix and post-operator counts, consuming both.
    fn take_count(&mut self) -> Option<u32> {
        let prefix = self.pending_count.take();
        let post = self.post_op_count.take();
        match (prefix, post) {
            (None, None) => None,
            (a, b) => Some(
                a.unwrap_or(1)
                    .saturating_mul(b.unwrap_or(1))
                    .clamp(1, MAX_COUNT),
            ),
        }
    }

    fn push_digit(slot: &mut Option<u32>, c: char) {
        let digit = c.to_digit(10).unwrap_or(0);
        let value = slot
            .unwrap_or(0)
            .saturating_mul(10)
            .saturating_add(digit)
            .min(MAX_COUNT);
        *slot = Some(value);
    }

    fn translate_normal(&mut self, key: &KeyEvent) -> Option<Command> {
        if key.code == KeyCode::Esc {
            self.reset();
            return None;
        }
        if key.mods.contains(KeyModifiers::CTRL)
            || matches!(key.code, KeyCode::Tab | KeyCode::PageUp | KeyCode::PageDown)
        {
            let cmd = if self.is_idle() {
                control_command(key.code, self.take_count().unwrap_or(1))
            } else {
                None
            };
            self.reset();
            return cmd;
        }

        if let Some(pending) = self.pending_mark.take() {
            let name = match key.code {
                KeyCode::Char(c) if Marks::is_valid_name(c) => c,
                _ => {
                    self.reset();
                    return None;
                }
            };
            return match pending {
                MarkKey::Set => {
                    self.reset();
                    Some(Command::SetMark(name))
                }
                MarkKey::Jump { linewise } => {
                    self.resolve_motion(MotionKind::Mark { name, linewise })
                }
            };
        }

        if self.awaiting_register {
            self.awaiting_register = false;
            match key.code {
                KeyCode::Char(c) if Registers::is_valid_name(c) => {
                    self.pending_register = Some(c);
                }
                _ => self.reset(),
            }
            return None;
        }

        if self.pending_g {
            self.pending_g = false;
            if key.code == KeyCode::Char('g') {
                let motion = match self.pending_count.or(self.post_op_count) {
                    Some(_) => MotionKind::GotoLine(self.take_count().unwrap_or(1)),
                    None => MotionKind::BufferStart,
                };
                return self.resolve_motion(motion);
            }
            self.reset();
            return None;
        }

        if let KeyCode::Char(c) = key.code
            && c.is_ascii_digit()
        {
            let slot = if self.pending_operator.is_some() {
                &mut self.post_op_count
            } else {
                &mut self.pending_count
            };
            if c != '0' || slot.is_some() {
                Self::push_digit(slot, c);
                return None;
            }
            return self.resolve_motion(MotionKind::LineStart);
        }

        if let Some(motion) = self.motion_for(key) {
            return self.resolve_motion(motion);
        }
        match key.code {
            KeyCode::Char('g') => {
                self.pending_g = true;
                return None;
            }
            KeyCode::Char(q @ ('`' | '\'')) => {
                self.pending_mark = Some(MarkKey::Jump {
                    linewise: q == '\'',
                });
                return None;
            }
            _ => {}
        }

        let KeyCode::Char(c) = key.code else {
            self.reset();
            return None;
        };

        if let Some(op) = self.pending_operator {
            if OperatorKind::from_char(c) == Some(op) {
                let count = self.take_count().unwrap_or(1);
                self.reset();
                return Some(Command::OperateLines { op, count });
            }
            // Not a motion: cancel silently.
            self.reset();
            return None;
        }

        if let Some(op) = OperatorKind::from_char(c) {
            self.pending_operator = Some(op);
            self.post_op_count = None;
            return None;
        }

        match c {
            'm' => {
                self.pending_mark = Some(MarkKey::Set);
                return None;
            }
            '"' => {
                self.awaiting_register = true;
                return None;
            }
            _ => {}
        }

        let count = self.take_count().unwrap_or(1);
        self.reset();
        match c {
            'D' => Some(Command::Operate {
                op: OperatorKind::Delete,
                motion: MotionKind::LineEnd,
                count,
            }),
            'C' => Some(Command::Operate {
                op: OperatorKind::Change,
                motion: MotionKind::LineEnd,
                count,
            }),
            'Y' => Some(Command::OperateLines {
                op: OperatorKind::Yank,
                count,
            }),
            'x' => Some(Command::DeleteChar { count }),
            'X' => Some(Command::DeleteCharBefore { count }),
            'p' => Some(Command::Paste {
                before: false,
                count,
            }),
            'P' => Some(Command::Paste {
                before: true,
                count,
            }),
            'u' => Some(Command::Undo { count }),
            // Counts before insert entries are dropped.
            'i' => Some(Command::EnterInsert(InsertKind::Before)),
            'a' => Some(Command::EnterInsert(InsertKind::After)),
            'I' => Some(Command::EnterInsert(InsertKind::LineStart)),
            'A' => Some(Command::EnterInsert(InsertKind::LineEnd)),
            'o' => Some(Command::EnterInsert(InsertKind::OpenBelow)),
            'O' => Some(Command::EnterInsert(InsertKind::OpenAbove)),
            ':' => Some(Command::EnterCommandLine),
            _ => None,
        }
    }

    /// Motion keys other than digits and `g`. `G` resolves against any pending count.
    fn motion_for(&self, key: &KeyEvent) -> Option<MotionKind> {
        let motion = match key.code {
            KeyCode::Left | KeyCode::Char('h') => MotionKind::Left,
            KeyCode::Right | KeyCode::Char('l') => MotionKind::Right,
            KeyCode::Down | KeyCode::Char('j') => MotionKind::Down,
            KeyCode::Up | KeyCode::Char('k') => MotionKind::Up,
            KeyCode::Home => MotionKind::LineStart,
            KeyCode::End | KeyCode::Char('$') => MotionKind::LineEnd,
            KeyCode::Char('^') => MotionKind::FirstNonBlank,
            KeyCode::Char('w') => MotionKind::WordForward,
            KeyCode::Char('b') => MotionKind::WordBackward,
            KeyCode::Char('e') => MotionKind::WordEnd,
            KeyCode::Char('G') => match self.pending_count.or(self.post_op_count) {
                Some(_) => MotionKind::GotoLine(0),
                None => MotionKind::BufferEnd,
            },
            _ => return None,
        };
        Some(motion)
    }

    fn resolve_motion(&mut self, motion: MotionKind) -> Option<Command> {
        let (motion, count) = match motion {
            // Placeholder from `motion_for`: the count is the line number.
            MotionKind::GotoLine(0) => (MotionKind::GotoLine(self.take_count().unwrap_or(1)), 1),
            other => (other, self.take_count().unwrap_or(1)),
        };
        let op = self.pending_operator.take();
        self.reset();
        Some(match op {
            Some(op) => Command::Operate { op, motion, count },
            None => Command::Move { motion, count },
        })
    }
}

/// Commands bound to Ctrl chords and the keys terminals send in their place.
fn control_command(code: KeyCode, count: u32) -> Option<Command> {
    let cmd = match code {
        KeyCode::Char('r') => Command::Redo { count },
        KeyCode::Char('f') | KeyCode::PageDown => Command::Move {
            motion: MotionKind::PageDown,
            count,
        },
        KeyCode::Char('b') | KeyCode::PageUp => Command::Move {
            motion: MotionKind::PageUp,
            count,
        },
        KeyCode::Char('o') => Command::JumpOlder { count },
        // Terminals deliver Ctrl-I as Tab.
        KeyCode::Char('i') | KeyCode::Tab => Command::JumpNewer { count },
        _ => return None,
    };
    Some(cmd)
}

fn translate_insert(key: &KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Esc => Action::LeaveInsert,
        KeyCode::Enter => Action::Edit(EditKind::Newline),
        KeyCode::Backspace => Action::Edit(EditKind::Backspace),
        KeyCode::Delete => Action::Edit(EditKind::DeleteForward),
        KeyCode::Tab => Action::Edit(EditKind::Tab),
        KeyCode::Left => Action::InsertMotion(MotionKind::Left),
        KeyCode::Right => Action::InsertMotion(MotionKind::Right),
        KeyCode::Up => Action::InsertMotion(MotionKind::Up),
        KeyCode::Down => Action::InsertMotion(MotionKind::Down),
        KeyCode::Home => Action::InsertMotion(MotionKind::LineStart),
        KeyCode::End => Action::InsertMotion(MotionKind::LineEnd),
        KeyCode::PageUp => Action::InsertMotion(MotionKind::PageUp),
        KeyCode::PageDown => Action::InsertMotion(MotionKind::PageDown),
        KeyCode::Char(_) => match key.printable() {
            Some(c) if !c.is_control() => Action::Edit(EditKind::InsertChar(c)),
            _ => return None,
        },
    };
    Some(action)
}

fn translate_command_line(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::CommandCancel),
        KeyCode::Enter => Some(Action::CommandExecute),
        KeyCode::Backspace => Some(Action::CommandBackspace),
        KeyCode::Tab => Some(Action::CommandChar(' ')),
        KeyCode::Char(_) => key
            .printable()
            .filter(|c| !c.is_control())
            .map(Action::CommandChar),
        _ => None,
    }
}
