mod common;
use common::*;

use core_actions::Session;
use core_config::EditorOptions;
use core_state::{EditorError, Mode};
use core_text::{Buffer, TextError};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

fn open(store: &MemoryStore, path: &str) -> Session {
    Session::open(Path::new(path), EditorOptions::default(), Box::new(store.clone()))
        .expect("open")
}

#[test]
fn write_marks_clean_and_reports_status() {
    let store = MemoryStore::with_file("a.txt", &["one", "two"]);
    let mut s = open(&store, "a.txt");
    feed_ok(&mut s, "x");
    assert!(s.snapshot().modified);
    feed_ok(&mut s, ":w<CR>");
    let snap = s.snapshot();
    assert!(!snap.modified);
    assert_eq!(snap.mode, Mode::Normal);
    assert_eq!(snap.status.as_deref(), Some("\"a.txt\" 2L written"));
    assert_eq!(store.lines("a.txt"), Some(v(&["ne", "two"])));
}

#[test]
fn undo_back_to_saved_state_is_clean() {
    let store = MemoryStore::with_file("a.txt", &["abc"]);
    let mut s = open(&store, "a.txt");
    feed_ok(&mut s, "x");
    assert!(s.snapshot().modified);
    feed_ok(&mut s, "u");
    assert!(!s.snapshot().modified);
}

#[test]
fn short_undo_history_cannot_undo_back_to_clean() {
    let options = EditorOptions {
        undo_levels: 1,
        ..EditorOptions::default()
    };
    let mut s = Session::new(Buffer::from_text("abc"), options, Box::new(MemoryStore::default()));
    feed_ok(&mut s, "xxu");
    assert_eq!(lines(&s), v(&["bc"]));
    assert!(s.snapshot().modified);
    let res = feed(&mut s, ":q<CR>").pop().expect("result");
    assert!(matches!(res, Err(EditorError::UnsavedChanges)));
}

#[test]
fn quit_refuses_unsaved_changes_unless_forced() {
    let mut s = session("abc");
    feed_ok(&mut s, "x");
    let res = feed(&mut s, ":q<CR>").pop().expect("result");
    assert!(matches!(res, Err(EditorError::UnsavedChanges)));
    assert_eq!(
        s.snapshot().status.as_deref(),
        Some("No write since last change (add ! to override)")
    );
    let res = feed(&mut s, ":q!<CR>").pop().expect("result");
    assert!(matches!(res, Ok(r) if r.quit));
}

#[test]
fn quit_on_clean_buffer() {
    let mut s = session("abc");
    let res = feed(&mut s, ":quit<CR>").pop().expect("result");
    assert!(matches!(res, Ok(r) if r.quit));
}

#[test]
fn write_without_name_fails() {
    let mut s = session("abc");
    let res = feed(&mut s, ":w<CR>").pop().expect("result");
    assert!(matches!(res, Err(EditorError::NoFileName)));
    assert_eq!(s.snapshot().mode, Mode::Normal);
}

#[test]
fn write_to_new_name_adopts_it() {
    let store = MemoryStore::default();
    let mut s = session_with("abc", store.clone());
    feed_ok(&mut s, "x:w out.txt<CR>");
    let snap = s.snapshot();
    assert_eq!(snap.file_name, Some(PathBuf::from("out.txt")));
    assert!(!snap.modified);
    assert_eq!(store.lines("out.txt"), Some(v(&["bc"])));
}

#[test]
fn partial_write_keeps_buffer_modified() {
    let store = MemoryStore::with_file("a.txt", &["1", "2", "3"]);
    let mut s = open(&store, "a.txt");
    feed_ok(&mut s, "x:1,2w<CR>");
    assert_eq!(store.lines("a.txt"), Some(v(&["", "2"])));
    assert!(s.snapshot().modified);
}

#[test]
fn partial_write_quit_refuses_to_drop_the_rest() {
    let store = MemoryStore::with_file("a.txt", &["one", "two", "three"]);
    let mut s = open(&store, "a.txt");
    feed_ok(&mut s, "x");
    let res = feed(&mut s, ":1wq<CR>").pop().expect("result");
    assert!(matches!(res, Err(EditorError::UnsavedChanges)));
    assert_eq!(store.lines("a.txt"), Some(v(&["ne"])));
    assert!(s.snapshot().modified);
    assert_eq!(s.snapshot().mode, Mode::Normal);

    let res = feed(&mut s, ":1wq!<CR>").pop().expect("result");
    assert!(matches!(res, Ok(r) if r.quit));
}

#[test]
fn write_quit_writes_then_quits() {
    let store = MemoryStore::with_file("a.txt", &["abc"]);
    let mut s = open(&store, "a.txt");
    feed_ok(&mut s, "x");
    let res = feed(&mut s, ":x<CR>").pop().expect("result");
    assert!(matches!(res, Ok(r) if r.quit));
    assert_eq!(store.lines("a.txt"), Some(v(&["bc"])));
}

#[test]
fn unknown_command_leaves_buffer_untouched() {
    let mut s = session("abc\ndef");
    feed_ok(&mut s, "jl");
    let res = feed(&mut s, ":frobnicate<CR>").pop().expect("result");
    assert!(matches!(res, Err(EditorError::UnknownCommand(ref n)) if n == "frobnicate"));
    assert_eq!(lines(&s), v(&["abc", "def"]));
    assert_eq!(cursor(&s), pos(1, 1));
    assert_eq!(
        s.snapshot().status.as_deref(),
        Some("Not an editor command: frobnicate")
    );
}

#[test]
fn out_of_range_address() {
    let mut s = session("a\nb");
    let res = feed(&mut s, ":5<CR>").pop().expect("result");
    assert!(matches!(
        res,
        Err(EditorError::Text(TextError::OutOfBounds { .. }))
    ));
    feed_ok(&mut s, ":$<CR>");
    assert_eq!(cursor(&s), pos(1, 0));
}

#[test]
fn escape_discards_command_line() {
    let mut s = session("abc");
    feed_ok(&mut s, ":q<Esc>");
    let snap = s.snapshot();
    assert_eq!(snap.mode, Mode::Normal);
    assert_eq!(snap.command_line, None);
}

#[test]
fn backspace_edits_then_exits_command_line() {
    let mut s = session("abc");
    feed_ok(&mut s, ":wx<BS>");
    assert_eq!(s.snapshot().command_line.as_deref(), Some("w"));
    feed_ok(&mut s, "<BS>");
    assert_eq!(s.snapshot().command_line.as_deref(), Some(""));
    feed_ok(&mut s, "<BS>");
    assert_eq!(s.snapshot().mode, Mode::Normal);
}
