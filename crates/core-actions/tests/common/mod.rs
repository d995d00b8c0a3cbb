#![allow(dead_code)] // Shared across many integration tests; each test binary uses a subset of helpers.

use core_actions::{DispatchResult, LoadedText, Session, TextStore};
use core_config::EditorOptions;
use core_events::parse_keys;
use core_state::{EditorError, TextFormat};
use core_text::{Buffer, Position};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// In-memory store; clones share the same file map so tests can inspect writes.
#[derive(Clone, Default)]
pub struct MemoryStore {
    files: Rc<RefCell<HashMap<PathBuf, (Vec<String>, TextFormat)>>>,
}

impl MemoryStore {
    pub fn with_file(path: &str, lines: &[&str]) -> Self {
        let store = Self::default();
        store.files.borrow_mut().insert(
            PathBuf::from(path),
            (lines.iter().map(|l| l.to_string()).collect(), TextFormat::default()),
        );
        store
    }

    pub fn lines(&self, path: &str) -> Option<Vec<String>> {
        self.files
            .borrow()
            .get(Path::new(path))
            .map(|(lines, _)| lines.clone())
    }
}

impl TextStore for MemoryStore {
    fn load_text(&self, path: &Path) -> io::Result<LoadedText> {
        match self.files.borrow().get(path) {
            Some((lines, format)) => Ok(LoadedText {
                lines: lines.clone(),
                format: *format,
                mixed: false,
            }),
            None => Err(io::ErrorKind::NotFound.into()),
        }
    }

    fn persist_text(&self, lines: &[String], format: TextFormat, path: &Path) -> io::Result<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), (lines.to_vec(), format));
        Ok(())
    }
}

/// Store whose writes always fail.
pub struct FailingStore;

impl TextStore for FailingStore {
    fn load_text(&self, _path: &Path) -> io::Result<LoadedText> {
        Err(io::ErrorKind::NotFound.into())
    }

    fn persist_text(&self, _lines: &[String], _format: TextFormat, _path: &Path) -> io::Result<()> {
        Err(io::Error::other("disk full"))
    }
}

pub fn session(text: &str) -> Session {
    Session::new(
        Buffer::from_text(text),
        EditorOptions::default(),
        Box::new(MemoryStore::default()),
    )
}

pub fn session_with(text: &str, store: impl TextStore + 'static) -> Session {
    Session::new(Buffer::from_text(text), EditorOptions::default(), Box::new(store))
}

/// Feed keys in Vim notation, returning the outcome of each key that resolved an action
/// or failed.
pub fn feed(session: &mut Session, keys: &str) -> Vec<Result<DispatchResult, EditorError>> {
    parse_keys(keys)
        .expect("valid key notation")
        .into_iter()
        .map(|k| session.handle_key(k))
        .collect()
}

/// Feed keys, panicking on the first error.
pub fn feed_ok(session: &mut Session, keys: &str) {
    for (i, res) in feed(session, keys).into_iter().enumerate() {
        if let Err(e) = res {
            panic!("key #{i} of {keys:?} failed: {e}");
        }
    }
}

pub fn lines(session: &Session) -> Vec<String> {
    session.state().buffer().lines()
}

pub fn cursor(session: &Session) -> Position {
    session.state().position()
}

pub fn pos(line: usize, col: usize) -> Position {
    Position::new(line, col)
}

pub fn v(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}
