//! Editing session: the host's single entry point into the core.
//!
//! A `Session` owns the editor state, the key translator, the text store and the
//! effective options. Hosts feed it one key at a time and redraw from `snapshot`.

use crate::dispatcher::{DispatchContext, DispatchResult, dispatch};
use crate::io_ops::TextStore;
use crate::key_translator::KeyTranslator;
use crate::Action;
use core_config::EditorOptions;
use core_events::KeyEvent;
use core_state::{EditorError, EditorState, Mode};
use core_text::{Buffer, Position};
use std::io;
use std::path::{Path, PathBuf};

/// Everything a renderer needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub mode: Mode,
    pub cursor: Position,
    pub lines: Vec<String>,
    /// Text after `:` while the command line is open.
    pub command_line: Option<String>,
    pub status: Option<String>,
    pub modified: bool,
    pub file_name: Option<PathBuf>,
}

pub struct Session {
    state: EditorState,
    translator: KeyTranslator,
    store: Box<dyn TextStore>,
    options: EditorOptions,
}

impl Session {
    pub fn new(buffer: Buffer, options: EditorOptions, store: Box<dyn TextStore>) -> Self {
        Self {
            state: EditorState::with_undo_levels(buffer, options.undo_levels),
            translator: KeyTranslator::new(),
            store,
            options,
        }
    }

    /// Load `path` through `store`. A missing file opens an empty buffer that keeps the
    /// name, so the first `:w` creates it.
    pub fn open(
        path: &Path,
        options: EditorOptions,
        store: Box<dyn TextStore>,
    ) -> Result<Self, EditorError> {
        let mut session = match store.load_text(path) {
            Ok(loaded) => {
                let mut session = Self::new(Buffer::from_lines(loaded.lines), options, store);
                session.state.format = loaded.format;
                session
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!(target: "io", path = %path.display(), "new_file");
                let mut session = Self::new(Buffer::new(), options, store);
                session.state.set_status(format!("\"{}\" [New]", path.display()));
                session
            }
            Err(source) => {
                return Err(EditorError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        session.state.file_name = Some(path.to_path_buf());
        Ok(session)
    }

    /// Feed one key. Returns what the dispatched action changed; keys that only extend a
    /// pending sequence return a clean result. Errors are also left in the status line.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<DispatchResult, EditorError> {
        let Some(action) = self.translator.translate(self.state.mode, &key) else {
            return Ok(DispatchResult::clean());
        };
        if matches!(action, Action::Command(_) | Action::RegisterCommand { .. }) {
            self.state.status = None;
        }
        let ctx = DispatchContext {
            options: &self.options,
            store: self.store.as_ref(),
        };
        let result = dispatch(action, &mut self.state, &ctx);
        self.state.normalize_cursor();
        match result {
            Ok(res) => Ok(res),
            Err(e) => {
                tracing::warn!(target: "actions.dispatch", ?action, error = %e, "action_failed");
                self.state.set_status(e.to_string());
                Err(e)
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            mode: self.state.mode,
            cursor: self.state.position(),
            lines: self.state.buffer().lines(),
            command_line: self.state.command_line.text().map(str::to_string),
            status: self.state.status.clone(),
            modified: self.state.is_modified(),
            file_name: self.state.file_name.clone(),
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Tell the core how many buffer rows the host shows; page motions scroll by it.
    pub fn set_view_rows(&mut self, rows: usize) {
        self.state.view_rows = rows.max(1);
    }

    /// True while a multi-key Normal command is half typed.
    pub fn is_pending(&self) -> bool {
        self.translator.is_pending()
    }
}
