//! Registers, marks, the jump list and page motions driven through the session.

mod common;
use common::*;

use core_state::{EditorError, Register};
use pretty_assertions::assert_eq;

#[test]
fn named_register_yank_and_put() {
    let mut s = session("one two");
    feed_ok(&mut s, "\"ayw");
    feed_ok(&mut s, "x");
    assert_eq!(lines(&s), v(&["ne two"]));
    feed_ok(&mut s, "$\"ap");
    assert_eq!(lines(&s), v(&["ne twoone "]));
    // The unnamed register still holds the `x` delete.
    assert_eq!(s.state().registers.unnamed(), &Register::chars("o"));
}

#[test]
fn line_delete_fills_numbered_and_yank_fills_zero() {
    let mut s = session("a\nb\nc");
    feed_ok(&mut s, "yyjddx");
    let regs = &s.state().registers;
    assert_eq!(regs.get(Some('0')), Some(&Register::lines(&v(&["a"]))));
    assert_eq!(regs.get(Some('1')), Some(&Register::lines(&v(&["b"]))));
    assert_eq!(regs.get(Some('-')), Some(&Register::chars("c")));
    feed_ok(&mut s, "\"1p");
    assert_eq!(lines(&s), v(&["a", "", "b"]));
}

#[test]
fn uppercase_register_appends() {
    let mut s = session("ab");
    feed_ok(&mut s, "\"ayl");
    feed_ok(&mut s, "l\"Ayl");
    assert_eq!(s.state().registers.get(Some('a')), Some(&Register::chars("ab")));
}

#[test]
fn black_hole_delete_keeps_unnamed() {
    let mut s = session("keep gone");
    feed_ok(&mut s, "ye");
    feed_ok(&mut s, "w\"_dw");
    assert_eq!(lines(&s), v(&["keep "]));
    assert_eq!(s.state().registers.unnamed(), &Register::chars("keep"));
}

#[test]
fn empty_named_register_put_fails() {
    let mut s = session("abc");
    let results = feed(&mut s, "\"qp");
    let last = results.last().expect("results");
    assert!(matches!(last, Err(EditorError::EmptyRegister('q'))), "{last:?}");
    assert_eq!(lines(&s), v(&["abc"]));
}

#[test]
fn set_mark_and_jump_back() {
    let mut s = session("alpha\nbeta\ngamma");
    feed_ok(&mut s, "jllma");
    feed_ok(&mut s, "G$");
    feed_ok(&mut s, "`a");
    assert_eq!(cursor(&s), pos(1, 2));
    feed_ok(&mut s, "G'a");
    assert_eq!(cursor(&s), pos(1, 0));
}

#[test]
fn delete_to_mark() {
    let mut s = session("one\ntwo\nthree\nfour");
    feed_ok(&mut s, "jmaj");
    feed_ok(&mut s, "d'a");
    assert_eq!(lines(&s), v(&["one", "four"]));
    feed_ok(&mut s, "u");
    feed_ok(&mut s, "gg0lmbj$d`b");
    assert_eq!(lines(&s), v(&["oo", "three", "four"]));
}

#[test]
fn unset_mark_is_an_error() {
    let mut s = session("abc");
    let results = feed(&mut s, "'x");
    let last = results.last().expect("results");
    assert!(matches!(last, Err(EditorError::MarkNotSet)), "{last:?}");
}

#[test]
fn mark_on_deleted_line_is_gone() {
    let mut s = session("a\nb\nc");
    feed_ok(&mut s, "jmakdd");
    assert_eq!(s.state().marks.get('a'), Some(pos(0, 0)));
    feed_ok(&mut s, "dd");
    assert_eq!(s.state().marks.get('a'), None);
}

#[test]
fn ctrl_o_returns_from_a_jump() {
    let mut s = session("a\nb\nc\nd");
    feed_ok(&mut s, "jG");
    assert_eq!(cursor(&s), pos(3, 0));
    feed_ok(&mut s, "<C-o>");
    assert_eq!(cursor(&s), pos(1, 0));
    feed_ok(&mut s, "<Tab>");
    assert_eq!(cursor(&s), pos(3, 0));
    feed_ok(&mut s, "``");
    assert_eq!(cursor(&s), pos(1, 0));
}

#[test]
fn page_keys_follow_the_view_height() {
    let text: Vec<String> = (0..30).map(|i| format!("  line {i}")).collect();
    let mut s = session(&text.join("\n"));
    s.set_view_rows(12);
    feed_ok(&mut s, "<C-f>");
    assert_eq!(cursor(&s), pos(10, 2));
    feed_ok(&mut s, "2<PageDown>");
    assert_eq!(cursor(&s), pos(29, 2));
    feed_ok(&mut s, "<C-b>");
    assert_eq!(cursor(&s), pos(19, 2));
}

#[test]
fn page_key_cancels_a_pending_operator() {
    let mut s = session("a\nb\nc");
    feed_ok(&mut s, "d<C-f>");
    assert!(!s.is_pending());
    assert_eq!(lines(&s), v(&["a", "b", "c"]));
    assert_eq!(cursor(&s), pos(0, 0));
}
