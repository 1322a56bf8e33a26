mod common;
use common::*;

use core_state::Mode;
use pretty_assertions::assert_eq;

// `cw`/`cW` on a non-blank behave like `ce`/`cE`: the change stops at the end
// of the word under the caret, also when the caret is already on its last
// character.

#[test]
fn cw_on_last_char_of_word() {
    assert_eq!(run("fo{caret}o\n", "cw"), ("fo{caret}\n".to_string(), Mode::Insert));
}

#[test]
fn c2w_counts_the_current_word() {
    let (text, mode) = run("on{caret}e two three\n", "c2w");
    assert_eq!(text, "on{caret} three\n");
    assert_eq!(mode, Mode::Insert);
}

#[test]
fn cw_on_single_char_word_after_punctuation() {
    assert_eq!(run("ab.{caret}cd\n", "cw").0, "ab.{caret}\n");
}

#[test]
fn cw_on_last_char_without_trailing_newline() {
    assert_eq!(run("fo{caret}o", "cw").0, "fo{caret}");
}

#[test]
fn cw_on_punctuation_changes_only_punctuation() {
    assert_eq!(run("{caret}$value\n", "cw").0, "{caret}value\n");
}

#[test]
fn big_cw_spans_punctuation() {
    assert_eq!(run("foo{caret}(bar baz\n", "cW").0, "foo{caret} baz\n");
}

#[test]
fn cc_empties_the_line_and_keeps_its_newline() {
    let (text, mode) = run("foo\n{caret}bar\n", "cc");
    assert_eq!(text, "foo\n{caret}\n");
    assert_eq!(mode, Mode::Insert);
}

#[test]
fn cc_then_typing_replaces_the_line() {
    assert_eq!(run("{caret}foo\nbar\n", "ccbaz").0, "baz{caret}\nbar\n");
}

#[test]
fn c_underscore_is_cc() {
    assert_eq!(run("foo\n{caret}bar\n", "c_"), run("foo\n{caret}bar\n", "cc"));
}

#[test]
fn change_till_char() {
    let (text, mode) = run("{caret}if (condition) {\n}\n", "ct(for ");
    assert_eq!(text, "for {caret}(condition) {\n}\n");
    assert_eq!(mode, Mode::Insert);
}

#[test]
fn change_inner_word_at_line_end() {
    assert_eq!(run("foo bar bo{caret}o\n", "ciwbaz").0, "foo bar baz{caret}\n");
}

#[test]
fn changed_text_lands_in_unnamed_register() {
    let mut s = Session::new("{caret}alpha beta\n");
    s.keys("cw");
    assert_eq!(s.unnamed().as_deref(), Some("alpha"));
    s.keys("<Esc>");
    assert_eq!(s.mode(), Mode::Normal);
}
