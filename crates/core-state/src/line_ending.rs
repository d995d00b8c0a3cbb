//! Line ending detection and normalization.
//!
//! Buffers only ever hold LF-separated lines. The on-disk style is detected on load and
//! re-applied on write so a round trip does not rewrite every line of a CRLF file.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Cr,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// How buffer lines are serialized back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFormat {
    pub line_ending: LineEnding,
    pub trailing_newline: bool,
}

impl Default for TextFormat {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Lf,
            trailing_newline: true,
        }
    }
}

impl TextFormat {
    /// Join `lines` with this format's separator.
    pub fn serialize(&self, lines: &[String]) -> String {
        let sep = self.line_ending.as_str();
        let mut out = lines.join(sep);
        if self.trailing_newline {
            out.push_str(sep);
        }
        out
    }
}

/// Result of splitting raw file content into buffer lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub lines: Vec<String>,
    pub format: TextFormat,
    /// More than one line ending style was present.
    pub mixed: bool,
}

/// Split `input` on any of CRLF, LF or CR. The majority style wins (ties resolved
/// CRLF > LF > CR); a final line break is recorded instead of producing an empty line.
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                crlf += 1;
                lines.push(std::mem::take(&mut current));
            }
            '\r' => {
                cr += 1;
                lines.push(std::mem::take(&mut current));
            }
            '\n' => {
                lf += 1;
                lines.push(std::mem::take(&mut current));
            }
            other => current.push(other),
        }
    }
    let trailing_newline = !input.is_empty() && current.is_empty() && !lines.is_empty();
    if !trailing_newline || lines.is_empty() {
        lines.push(current);
    }

    let mut line_ending = LineEnding::Lf;
    let mut max = 0;
    for (style, count) in [
        (LineEnding::Crlf, crlf),
        (LineEnding::Lf, lf),
        (LineEnding::Cr, cr),
    ] {
        if count > max {
            max = count;
            line_ending = style;
        }
    }
    let mixed = [crlf, lf, cr].iter().filter(|c| **c > 0).count() > 1;
    NormalizedText {
        lines,
        format: TextFormat {
            line_ending,
            trailing_newline,
        },
        mixed,
    }
}
