//! Registers written by delete, change and yank and read by put.
//!
//! Naming follows Vim:
//! - `"` (or no name): the unnamed register, always the latest delete or yank.
//! - `0`: latest yank made without a register name.
//! - `1`..`9`: multi-line and linewise deletes, newest in `1`, shifted down on each one.
//! - `-`: deletes within a single line.
//! - `a`..`z`: named; `A`..`Z` append to the lowercase register.
//! - `_`: black hole, writes are dropped and reads are empty.

/// Text held by one register. Linewise payloads hold whole lines joined with `\n`
/// (no trailing newline).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Register {
    pub text: String,
    pub linewise: bool,
}

impl Register {
    pub fn chars<S: Into<String>>(text: S) -> Self {
        Self {
            text: text.into(),
            linewise: false,
        }
    }

    pub fn lines(lines: &[String]) -> Self {
        Self {
            text: lines.join("\n"),
            linewise: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && !self.linewise
    }

    /// Payload split into lines.
    pub fn payload_lines(&self) -> Vec<String> {
        self.text.split('\n').map(str::to_string).collect()
    }

    /// Append `other`. Either side being linewise makes the result linewise.
    fn append(&mut self, other: Register) {
        if self.is_empty() {
            *self = other;
        } else if self.linewise || other.linewise {
            self.text = format!("{}\n{}", self.text, other.text);
            self.linewise = true;
        } else {
            self.text.push_str(&other.text);
        }
    }
}

const NUMBERED: usize = 9;

#[derive(Debug, Clone, Default)]
pub struct Registers {
    unnamed: Register,
    yank: Register,
    numbered: [Register; NUMBERED],
    small_delete: Register,
    named: [Register; 26],
}

impl Registers {
    /// Names accepted after `"`.
    pub fn is_valid_name(name: char) -> bool {
        name.is_ascii_alphanumeric() || matches!(name, '"' | '-' | '_')
    }

    pub fn unnamed(&self) -> &Register {
        &self.unnamed
    }

    /// Contents of register `name`; `None` reads the unnamed register. Unknown names
    /// and `_` read as `None`.
    pub fn get(&self, name: Option<char>) -> Option<&Register> {
        match name {
            None | Some('"') => Some(&self.unnamed),
            Some('0') => Some(&self.yank),
            Some('-') => Some(&self.small_delete),
            Some(c @ '1'..='9') => self.numbered.get(digit_slot(c)),
            Some(c) if c.is_ascii_alphabetic() => self.named.get(letter_slot(c)),
            Some(_) => None,
        }
    }

    /// Store yanked text in `target` (or `0`) and the unnamed register.
    pub fn store_yank(&mut self, target: Option<char>, reg: Register) {
        match target {
            Some('_') => return,
            None | Some('"') | Some('0') => self.yank = reg.clone(),
            Some(c) => self.write_named(c, reg.clone()),
        }
        self.unnamed = reg;
        self.sync_unnamed(target);
    }

    /// Store deleted text in `target`, or in `1`/`-` when no register was named, and
    /// in the unnamed register.
    pub fn store_delete(&mut self, target: Option<char>, reg: Register) {
        match target {
            Some('_') => return,
            None | Some('"') => {
                if reg.linewise || reg.text.contains('\n') {
                    self.numbered.rotate_right(1);
                    self.numbered[0] = reg.clone();
                } else {
                    self.small_delete = reg.clone();
                }
            }
            Some('0') => self.yank = reg.clone(),
            Some(c) => self.write_named(c, reg.clone()),
        }
        self.unnamed = reg;
        self.sync_unnamed(target);
    }

    fn write_named(&mut self, name: char, reg: Register) {
        match name {
            '1'..='9' => {
                if let Some(slot) = self.numbered.get_mut(digit_slot(name)) {
                    *slot = reg;
                }
            }
            '-' => self.small_delete = reg,
            c if c.is_ascii_alphabetic() => {
                if let Some(slot) = self.named.get_mut(letter_slot(c)) {
                    if c.is_ascii_uppercase() {
                        slot.append(reg);
                    } else {
                        *slot = reg;
                    }
                }
            }
            _ => {}
        }
    }

    /// After an append the unnamed register holds the whole named register.
    fn sync_unnamed(&mut self, target: Option<char>) {
        if let Some(c) = target.filter(char::is_ascii_uppercase)
            && let Some(full) = self.named.get(letter_slot(c))
        {
            self.unnamed = full.clone();
        }
    }
}

fn digit_slot(c: char) -> usize {
    (c as u8 - b'1') as usize
}

fn letter_slot(c: char) -> usize {
    (c.to_ascii_lowercase() as u8 - b'a') as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn register_lines_round_trip() {
        let l = lines(&["a", ""]);
        let r = Register::lines(&l);
        assert!(r.linewise);
        assert_eq!(r.payload_lines(), l);
        assert!(Register::default().is_empty());
    }

    #[test]
    fn unnamed_yank_fills_register_zero() {
        let mut regs = Registers::default();
        regs.store_yank(None, Register::chars("abc"));
        regs.store_delete(None, Register::chars("x"));
        assert_eq!(regs.get(Some('0')), Some(&Register::chars("abc")));
        assert_eq!(regs.get(Some('-')), Some(&Register::chars("x")));
        assert_eq!(regs.unnamed(), &Register::chars("x"));
    }

    #[test]
    fn line_deletes_shift_numbered_registers() {
        let mut regs = Registers::default();
        regs.store_delete(None, Register::lines(&lines(&["one"])));
        regs.store_delete(None, Register::lines(&lines(&["two"])));
        regs.store_delete(None, Register::chars("a\nb"));
        assert_eq!(regs.get(Some('1')), Some(&Register::chars("a\nb")));
        assert_eq!(regs.get(Some('2')), Some(&Register::lines(&lines(&["two"]))));
        assert_eq!(regs.get(Some('3')), Some(&Register::lines(&lines(&["one"]))));
        assert!(regs.get(Some('-')).is_some_and(Register::is_empty));
    }

    #[test]
    fn named_register_skips_numbered_and_uppercase_appends() {
        let mut regs = Registers::default();
        regs.store_delete(Some('a'), Register::lines(&lines(&["one"])));
        assert!(regs.get(Some('1')).is_some_and(Register::is_empty));
        regs.store_yank(Some('A'), Register::chars("two"));
        let expected = Register::lines(&lines(&["one", "two"]));
        assert_eq!(regs.get(Some('a')), Some(&expected));
        assert_eq!(regs.unnamed(), &expected);
        assert!(regs.get(Some('0')).is_some_and(Register::is_empty));
    }

    #[test]
    fn black_hole_keeps_everything() {
        let mut regs = Registers::default();
        regs.store_yank(None, Register::chars("keep"));
        regs.store_delete(Some('_'), Register::chars("gone"));
        assert_eq!(regs.unnamed(), &Register::chars("keep"));
        assert_eq!(regs.get(Some('_')), None);
        assert!(Registers::is_valid_name('_'));
        assert!(!Registers::is_valid_name('%'));
    }
}
