//! Full-frame painter for a `Session` snapshot.
//!
//! Layout, top to bottom: buffer rows, one status bar, one message row. The message row
//! shows the open command line, otherwise the last status message. Every frame is queued
//! and flushed once.

use core_actions::Snapshot;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};
use std::io::{self, Write};

/// Rows below the text area: status bar and message row.
pub(crate) const CHROME_ROWS: u16 = 2;

/// Vertical window into the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Viewport {
    pub first_line: usize,
    pub height: usize,
}

impl Viewport {
    pub(crate) fn for_terminal(rows: u16) -> Self {
        Self {
            first_line: 0,
            height: rows.saturating_sub(CHROME_ROWS).max(1) as usize,
        }
    }

    pub(crate) fn resize(&mut self, rows: u16) {
        self.height = rows.saturating_sub(CHROME_ROWS).max(1) as usize;
    }

    /// Scroll the least amount that brings `line` into view.
    pub(crate) fn follow(&mut self, line: usize) {
        if line < self.first_line {
            self.first_line = line;
        } else if line >= self.first_line + self.height {
            self.first_line = line + 1 - self.height;
        }
    }
}

/// `NORMAL  notes.txt [+]      3:7`, padded or cut to `width` columns.
pub(crate) fn status_bar(snap: &Snapshot, width: usize) -> String {
    let name = snap
        .file_name
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "[No Name]".to_string());
    let modified = if snap.modified { " [+]" } else { "" };
    let left = format!(" {}  {}{}", snap.mode.label(), name, modified);
    let right = format!("{}:{} ", snap.cursor.line + 1, snap.cursor.col + 1);
    let left_len = left.chars().count();
    let right_len = right.chars().count();
    if left_len + right_len + 1 > width {
        return left.chars().take(width).collect();
    }
    let gap = width - left_len - right_len;
    format!("{left}{}{right}", " ".repeat(gap))
}

/// Screen column of char index `col`, with tabs expanded.
pub(crate) fn display_col(line: &str, col: usize, tab_width: usize) -> usize {
    line.chars().take(col).fold(0, |acc, c| {
        if c == '\t' {
            acc + tab_width - acc % tab_width
        } else {
            acc + 1
        }
    })
}

fn expand_tabs(line: &str, tab_width: usize, width: usize) -> String {
    let mut out = String::with_capacity(line.len());
    let mut screen = 0;
    for c in line.chars() {
        if screen >= width {
            break;
        }
        if c == '\t' {
            let n = tab_width - screen % tab_width;
            out.extend(std::iter::repeat_n(' ', n));
            screen += n;
        } else {
            out.push(c);
            screen += 1;
        }
    }
    out.chars().take(width).collect()
}

/// Paint the whole frame and leave the terminal cursor where the editor cursor is.
pub(crate) fn paint<W: Write>(
    out: &mut W,
    snap: &Snapshot,
    view: &Viewport,
    size: (u16, u16),
    tab_width: usize,
) -> io::Result<()> {
    let (width, rows) = size;
    let width_cols = width as usize;
    queue!(out, Hide)?;
    for row in 0..view.height {
        let line_idx = view.first_line + row;
        queue!(out, MoveTo(0, row as u16), Clear(ClearType::CurrentLine))?;
        match snap.lines.get(line_idx) {
            Some(line) => queue!(out, Print(expand_tabs(line, tab_width, width_cols)))?,
            None => queue!(out, Print("~"))?,
        }
    }

    let status_row = rows.saturating_sub(CHROME_ROWS);
    queue!(
        out,
        MoveTo(0, status_row),
        Clear(ClearType::CurrentLine),
        SetAttribute(Attribute::Reverse),
        Print(status_bar(snap, width_cols)),
        SetAttribute(Attribute::Reset)
    )?;

    let message_row = rows.saturating_sub(1);
    let message = match (&snap.command_line, &snap.status) {
        (Some(cmd), _) => format!(":{cmd}"),
        (None, Some(status)) => status.clone(),
        (None, None) => String::new(),
    };
    queue!(
        out,
        MoveTo(0, message_row),
        Clear(ClearType::CurrentLine),
        Print(message.chars().take(width_cols).collect::<String>())
    )?;

    let (cursor_col, cursor_row) = match &snap.command_line {
        Some(cmd) => (cmd.chars().count() + 1, message_row as usize),
        None => {
            let line = snap.lines.get(snap.cursor.line).map_or("", String::as_str);
            (
                display_col(line, snap.cursor.col, tab_width),
                snap.cursor.line.saturating_sub(view.first_line),
            )
        }
    };
    queue!(
        out,
        MoveTo(
            cursor_col.min(width_cols.saturating_sub(1)) as u16,
            cursor_row as u16
        ),
        Show
    )?;
    out.flush()
}
