//! Structured command line parsing.
//!
//! Converts the text typed after `:` into a `ParsedCommand`. Grammar:
//! `[range] name[!] [args]` where a range is `N`, `.`, `$`, `%` or `a,b`.
//! Parsing is pure; address resolution against the buffer happens at execution.

use std::path::PathBuf;

/// One line address. Numbers are 1-based as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAddr {
    Number(usize),
    /// `.`
    Current,
    /// `$`
    Last,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRange {
    Single(LineAddr),
    Pair(LineAddr, LineAddr),
    /// `%`
    Whole,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Nothing typed.
    Empty,
    /// A bare range jumps to its last line.
    Goto(LineRange),
    Write {
        range: Option<LineRange>,
        path: Option<PathBuf>,
    },
    Quit {
        force: bool,
    },
    /// `wq`, `x`, `xit`, `exit`. Without `!` the quit half is refused when the write
    /// left the buffer modified.
    WriteQuit {
        range: Option<LineRange>,
        path: Option<PathBuf>,
        force: bool,
    },
    Unknown(String),
}

pub struct CommandParser;

impl CommandParser {
    pub fn parse(raw: &str) -> ParsedCommand {
        let s = raw.trim();
        // Accept the prompt character if the caller kept it.
        let s = s.strip_prefix(':').unwrap_or(s).trim_start();
        let Some((range, rest)) = parse_range(s) else {
            return ParsedCommand::Unknown(s.to_string());
        };
        let rest = rest.trim_start();
        let name_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let (name, tail) = rest.split_at(name_len);
        let (force, args) = match tail.strip_prefix('!') {
            Some(t) => (true, t.trim()),
            None => (false, tail.trim()),
        };
        if !tail.is_empty() && !force && !tail.starts_with(char::is_whitespace) {
            return ParsedCommand::Unknown(rest.to_string());
        }
        let path = (!args.is_empty()).then(|| PathBuf::from(args));
        match name {
            "" if force || path.is_some() => ParsedCommand::Unknown(rest.to_string()),
            "" => match range {
                Some(r) => ParsedCommand::Goto(r),
                None => ParsedCommand::Empty,
            },
            "w" | "write" => ParsedCommand::Write { range, path },
            "q" | "quit" if path.is_none() && range.is_none() => ParsedCommand::Quit { force },
            "wq" | "x" | "xit" | "exit" => ParsedCommand::WriteQuit { range, path, force },
            _ => ParsedCommand::Unknown(rest.to_string()),
        }
    }
}

fn parse_addr(s: &str) -> (Option<LineAddr>, &str) {
    if let Some(rest) = s.strip_prefix('.') {
        return (Some(LineAddr::Current), rest);
    }
    if let Some(rest) = s.strip_prefix('$') {
        return (Some(LineAddr::Last), rest);
    }
    let digits = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if digits == 0 {
        return (None, s);
    }
    // Overflowing numbers are kept as out-of-range addresses.
    let n = s[..digits].parse().unwrap_or(usize::MAX);
    (Some(LineAddr::Number(n)), &s[digits..])
}

/// `None` when a `,` is not followed by a second address.
fn parse_range(s: &str) -> Option<(Option<LineRange>, &str)> {
    if let Some(rest) = s.strip_prefix('%') {
        return Some((Some(LineRange::Whole), rest));
    }
    let (first, rest) = parse_addr(s);
    let Some(first) = first else {
        return Some((None, s));
    };
    if let Some(rest) = rest.strip_prefix(',') {
        let (second, rest) = parse_addr(rest.trim_start());
        return second.map(|second| (Some(LineRange::Pair(first, second)), rest));
    }
    Some((Some(LineRange::Single(first)), rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_quit() {
        assert_eq!(CommandParser::parse("q"), ParsedCommand::Quit { force: false });
        assert_eq!(CommandParser::parse("quit!"), ParsedCommand::Quit { force: true });
        assert_eq!(CommandParser::parse(":q"), ParsedCommand::Quit { force: false });
    }

    #[test]
    fn parse_write_with_path() {
        assert_eq!(
            CommandParser::parse("w  out.txt"),
            ParsedCommand::Write {
                range: None,
                path: Some(PathBuf::from("out.txt"))
            }
        );
    }

    #[test]
    fn parse_ranged_write() {
        assert_eq!(
            CommandParser::parse("2,$w part.txt"),
            ParsedCommand::Write {
                range: Some(LineRange::Pair(LineAddr::Number(2), LineAddr::Last)),
                path: Some(PathBuf::from("part.txt"))
            }
        );
        assert_eq!(
            CommandParser::parse("%write"),
            ParsedCommand::Write {
                range: Some(LineRange::Whole),
                path: None
            }
        );
    }

    #[test]
    fn parse_write_quit_aliases() {
        for raw in ["wq", "x", "xit", "exit"] {
            assert_eq!(
                CommandParser::parse(raw),
                ParsedCommand::WriteQuit {
                    range: None,
                    path: None,
                    force: false
                },
                "{raw}"
            );
        }
        assert_eq!(
            CommandParser::parse("1wq!"),
            ParsedCommand::WriteQuit {
                range: Some(LineRange::Single(LineAddr::Number(1))),
                path: None,
                force: true
            }
        );
    }

    #[test]
    fn bare_range_is_goto() {
        assert_eq!(
            CommandParser::parse("12"),
            ParsedCommand::Goto(LineRange::Single(LineAddr::Number(12)))
        );
        assert_eq!(
            CommandParser::parse(".,$"),
            ParsedCommand::Goto(LineRange::Pair(LineAddr::Current, LineAddr::Last))
        );
        assert_eq!(CommandParser::parse("  "), ParsedCommand::Empty);
    }

    #[test]
    fn parse_unknown() {
        assert_eq!(
            CommandParser::parse("doesnotexist"),
            ParsedCommand::Unknown("doesnotexist".into())
        );
        assert_eq!(
            CommandParser::parse("q extra"),
            ParsedCommand::Unknown("q extra".into())
        );
        assert_eq!(CommandParser::parse("w1"), ParsedCommand::Unknown("w1".into()));
        assert_eq!(CommandParser::parse("3,"), ParsedCommand::Unknown("3,".into()));
    }
}
