mod common;
use common::*;

use core_state::{EditorError, Mode};
use pretty_assertions::assert_eq;

#[test]
fn scenario_a_right_motion_clamps_without_wrap() {
    let mut s = session("abc");
    feed_ok(&mut s, "ll");
    assert_eq!(cursor(&s), pos(0, 2));
    feed_ok(&mut s, "l");
    assert_eq!(cursor(&s), pos(0, 2));
    feed_ok(&mut s, "5l");
    assert_eq!(cursor(&s), pos(0, 2));
}

#[test]
fn scenario_b_dd_then_undo() {
    let mut s = session("abc\ndef");
    feed_ok(&mut s, "dd");
    assert_eq!(lines(&s), v(&["def"]));
    feed_ok(&mut s, "u");
    assert_eq!(lines(&s), v(&["abc", "def"]));
    assert_eq!(cursor(&s), pos(0, 0));
}

#[test]
fn scenario_c_failing_write_keeps_session() {
    let mut s = session_with("abc", FailingStore);
    feed_ok(&mut s, "x");
    let results = feed(&mut s, ":wq x.txt<CR>");
    let last = results.last().expect("results");
    assert!(matches!(last, Err(EditorError::Io { .. })), "{last:?}");
    assert!(results.iter().all(|r| !matches!(r, Ok(res) if res.quit)));
    let snap = s.snapshot();
    assert_eq!(snap.mode, Mode::Normal);
    assert!(snap.modified);
    assert!(snap.status.is_some_and(|m| m.contains("disk full")));
}

#[test]
fn scenario_d_counted_dd_is_one_undo_step() {
    let mut s = session("1\n2\n3\n4\n5");
    feed_ok(&mut s, "3dd");
    assert_eq!(lines(&s), v(&["4", "5"]));
    assert_eq!(s.state().undo_depth(), 1);
    feed_ok(&mut s, "u");
    assert_eq!(lines(&s), v(&["1", "2", "3", "4", "5"]));
    assert_eq!(s.state().undo_depth(), 0);
}

#[test]
fn scenario_e_insert_session_is_one_undo_step() {
    let mut s = session("");
    feed_ok(&mut s, "ixyz<Esc>");
    assert_eq!(lines(&s), v(&["xyz"]));
    assert_eq!(cursor(&s), pos(0, 2));
    feed_ok(&mut s, "u");
    assert_eq!(lines(&s), v(&[""]));
    assert_eq!(cursor(&s), pos(0, 0));
}

#[test]
fn change_and_typed_text_undo_together() {
    let mut s = session("one two");
    feed_ok(&mut s, "cwuno<Esc>");
    assert_eq!(lines(&s), v(&["uno two"]));
    assert_eq!(s.state().undo_depth(), 1);
    feed_ok(&mut s, "u");
    assert_eq!(lines(&s), v(&["one two"]));
}

#[test]
fn undo_then_redo_restores_cursor() {
    let mut s = session("alpha beta");
    feed_ok(&mut s, "wdw");
    let after = cursor(&s);
    feed_ok(&mut s, "u");
    assert_eq!(cursor(&s), pos(0, 6));
    feed_ok(&mut s, "<C-r>");
    assert_eq!(lines(&s), v(&["alpha "]));
    assert_eq!(cursor(&s), after);
}

#[test]
fn new_edit_clears_redo() {
    let mut s = session("abc");
    feed_ok(&mut s, "xu");
    assert_eq!(s.state().redo_depth(), 1);
    feed_ok(&mut s, "x");
    assert_eq!(s.state().redo_depth(), 0);
    let err = feed(&mut s, "<C-r>").pop().expect("result");
    assert!(matches!(err, Err(EditorError::NothingToRedo)));
}

#[test]
fn esc_cancels_pending_operator() {
    let mut s = session("abc def");
    feed_ok(&mut s, "d<Esc>w");
    assert_eq!(lines(&s), v(&["abc def"]));
    assert_eq!(cursor(&s), pos(0, 4));
}

#[test]
fn open_line_and_type() {
    let mut s = session("  fn main() {\n  }");
    feed_ok(&mut s, "o  body<Esc>");
    assert_eq!(lines(&s), v(&["  fn main() {", "    body", "  }"]));
    feed_ok(&mut s, "u");
    assert_eq!(lines(&s), v(&["  fn main() {", "  }"]));
}

#[test]
fn insert_mode_navigation_and_deletes() {
    let mut s = session("ab\ncd");
    feed_ok(&mut s, "A<Del>X<Esc>");
    assert_eq!(lines(&s), v(&["abXcd"]));
    feed_ok(&mut s, "0i<Right><BS>Y<Esc>");
    assert_eq!(lines(&s), v(&["YbXcd"]));
}

#[test]
fn counted_undo_walks_back_multiple_entries() {
    let mut s = session("abcd");
    feed_ok(&mut s, "xxx");
    feed_ok(&mut s, "2u");
    assert_eq!(lines(&s), v(&["bcd"]));
    feed_ok(&mut s, "9u");
    assert_eq!(lines(&s), v(&["abcd"]));
    feed_ok(&mut s, "5<C-r>");
    assert_eq!(lines(&s), v(&["d"]));
}

#[test]
fn open_line_and_escape_leaves_it_blank() {
    let mut s = session("    foo");
    feed_ok(&mut s, "o<Esc>");
    assert_eq!(lines(&s), v(&["    foo", ""]));
    assert_eq!(cursor(&s), pos(1, 0));
    feed_ok(&mut s, "ccx<Esc>kcc<Esc>");
    assert_eq!(lines(&s), v(&["", "x"]));
    feed_ok(&mut s, "u");
    assert_eq!(lines(&s), v(&["    foo", "x"]));
}
