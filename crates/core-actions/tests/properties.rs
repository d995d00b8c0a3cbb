//! Property-based tests for motion, cursor and undo invariants.

mod common;
use common::*;

use core_state::Mode;
use core_text::ColumnLimit;
use proptest::prelude::*;

fn buffer_text() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-c _.]{0,8}", 1..6).prop_map(|lines| lines.join("\n"))
}

fn motion_key() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "h", "j", "k", "l", "0", "^", "$", "w", "b", "e", "gg", "G", "<Left>", "<Down>",
    ])
}

fn any_key() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "h", "j", "k", "l", "0", "$", "w", "b", "e", "G", "gg", "2", "3", "x", "X", "dd",
        "dw", "de", "d$", "db", "dj", "cw", "yy", "p", "P", "u", "<C-r>", "i", "a", "A", "o",
        "O", "q", "<CR>", "<BS>", "<Del>", "<Tab>", "<Esc>", "<Right>", "<Up>",
    ])
}

fn assert_cursor_valid(s: &core_actions::Session) -> Result<(), TestCaseError> {
    let state = s.state();
    let limit = match state.mode {
        Mode::Insert => ColumnLimit::PastEnd,
        _ => ColumnLimit::OnChar,
    };
    prop_assert!(
        state.cursor.is_valid(state.buffer(), limit),
        "cursor {:?} invalid in {:?} for {:?}",
        state.position(),
        state.mode,
        state.buffer().lines()
    );
    Ok(())
}

proptest! {
    // Bare motions never change the buffer or the undo history.
    #[test]
    fn motions_never_mutate(text in buffer_text(), keys in prop::collection::vec(motion_key(), 1..20)) {
        let mut s = session(&text);
        let before = lines(&s);
        for k in keys {
            feed_ok(&mut s, k);
            assert_cursor_valid(&s)?;
        }
        prop_assert_eq!(lines(&s), before);
        prop_assert_eq!(s.state().undo_depth(), 0);
    }

    // The cursor stays in bounds after every key, whatever the key mix.
    #[test]
    fn cursor_always_valid(text in buffer_text(), keys in prop::collection::vec(any_key(), 1..40)) {
        let mut s = session(&text);
        for k in keys {
            let _ = feed(&mut s, k);
            assert_cursor_valid(&s)?;
            prop_assert!(s.state().buffer().line_count() >= 1);
        }
    }

    // Undoing every entry restores the original text; redoing every entry restores the
    // edited text.
    #[test]
    fn undo_all_then_redo_all(text in buffer_text(), keys in prop::collection::vec(any_key(), 1..30)) {
        let mut s = session(&text);
        let original = lines(&s);
        for k in keys {
            let _ = feed(&mut s, k);
        }
        let _ = feed(&mut s, "<Esc><Esc>");
        let edited = lines(&s);
        let depth = s.state().undo_depth();
        for _ in 0..depth {
            feed_ok(&mut s, "u");
        }
        prop_assert_eq!(lines(&s), original);
        for _ in 0..depth {
            feed_ok(&mut s, "<C-r>");
        }
        prop_assert_eq!(lines(&s), edited);
    }

    // A single undo after one mutating command restores text and cursor exactly.
    #[test]
    fn undo_restores_content_and_cursor(
        text in buffer_text(),
        moves in prop::collection::vec(motion_key(), 0..6),
        edit in prop::sample::select(vec!["x", "X", "dd", "dw", "de", "d$", "db", "dj", "dk", "D", "p"]),
    ) {
        let mut s = session(&text);
        feed_ok(&mut s, "yy");
        for k in moves {
            feed_ok(&mut s, k);
        }
        let before_text = lines(&s);
        let before_cursor = cursor(&s);
        feed_ok(&mut s, edit);
        if s.state().undo_depth() == 1 {
            feed_ok(&mut s, "u");
            prop_assert_eq!(lines(&s), before_text);
            prop_assert_eq!(cursor(&s), before_cursor);
        } else {
            prop_assert_eq!(lines(&s), before_text);
        }
    }
}
