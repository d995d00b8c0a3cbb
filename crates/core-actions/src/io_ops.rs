//! Load / persist boundary between the editing core and storage.
//!
//! The core never touches the file system directly: it goes through `TextStore`, which
//! hands back normalized lines plus the format needed to write them out the same way.
//! `FsStore` is the file-system implementation; tests substitute in-memory stores.

use core_state::{TextFormat, normalize_line_endings};
use std::io;
use std::path::Path;

/// Lines read from storage with their on-disk format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedText {
    pub lines: Vec<String>,
    pub format: TextFormat,
    /// More than one line ending style was found.
    pub mixed: bool,
}

pub trait TextStore {
    fn load_text(&self, path: &Path) -> io::Result<LoadedText>;
    fn persist_text(&self, lines: &[String], format: TextFormat, path: &Path) -> io::Result<()>;
}

/// `TextStore` over `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStore;

impl TextStore for FsStore {
    fn load_text(&self, path: &Path) -> io::Result<LoadedText> {
        let content = std::fs::read_to_string(path).inspect_err(|e| {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::error!(target: "io", path = %path.display(), error = %e, "file_open_error");
            }
        })?;
        let norm = normalize_line_endings(&content);
        if norm.mixed {
            tracing::warn!(target: "io", path = %path.display(), chosen = ?norm.format.line_ending, "mixed_line_endings_detected");
        }
        tracing::info!(target: "io", path = %path.display(), lines = norm.lines.len(), "file_loaded");
        Ok(LoadedText {
            lines: norm.lines,
            format: norm.format,
            mixed: norm.mixed,
        })
    }

    fn persist_text(&self, lines: &[String], format: TextFormat, path: &Path) -> io::Result<()> {
        let content = format.serialize(lines);
        std::fs::write(path, content.as_bytes())?;
        tracing::info!(target: "io", path = %path.display(), lines = lines.len(), bytes = content.len(), "file_written");
        Ok(())
    }
}
