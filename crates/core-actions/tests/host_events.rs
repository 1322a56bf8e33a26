mod common;
use common::*;

use core_config::SelectModeOption;
use core_model::{EventSource, HostSurface};
use core_state::{Mode, SelectionKind};
use pretty_assertions::assert_eq;

const VISUAL: Mode = Mode::Visual(SelectionKind::Character);
const SELECT: Mode = Mode::Select(SelectionKind::Character);

fn primary(s: &Session) -> core_state::CaretId {
    s.model.primary_caret().expect("a caret")
}

#[test]
fn mouse_selection_enters_visual_with_caret_on_last_char() {
    let mut s = Session::new("{caret}abcdef\n");
    let id = primary(&s);
    s.model.user_select(id, 1, 4, EventSource::Mouse);
    s.pump();
    assert_eq!(s.mode(), VISUAL);
    assert_eq!(s.caret(), 3);
    assert_eq!(s.model.selection(id), Some((1, 4)));
    s.keys("d");
    assert_eq!(s.marked(), "a{caret}ef\n");
    assert_eq!(s.mode(), Mode::Normal);
}

#[test]
fn backwards_mouse_selection_keeps_caret_at_start() {
    let mut s = Session::new("{caret}abcdef\n");
    let id = primary(&s);
    s.model.user_select(id, 4, 1, EventSource::Mouse);
    s.pump();
    assert_eq!(s.mode(), VISUAL);
    assert_eq!(s.caret(), 1);
    assert_eq!(s.model.selection(id), Some((1, 4)));
}

#[test]
fn selectmode_mouse_enters_select() {
    let mut s = Session::with_options("{caret}abcdef\n", options(&[], &[SelectModeOption::Mouse]));
    let id = primary(&s);
    s.model.user_select(id, 1, 4, EventSource::Mouse);
    s.pump();
    assert_eq!(s.mode(), SELECT);
    assert_eq!(s.caret(), 4);
    s.keys("x");
    assert_eq!(s.marked(), "ax{caret}ef\n");
    assert_eq!(s.mode(), Mode::Insert);
}

#[test]
fn ideaselection_applies_to_host_selections_only() {
    let opts = options(&[], &[SelectModeOption::IdeaSelection]);
    let mut s = Session::with_options("{caret}abcdef\n", opts);
    let id = primary(&s);
    s.model.user_select(id, 0, 2, EventSource::Other);
    s.pump();
    assert_eq!(s.mode(), SELECT);

    let mut s = Session::with_options("{caret}abcdef\n", options(&[], &[SelectModeOption::IdeaSelection]));
    let id = primary(&s);
    s.model.user_select(id, 0, 2, EventSource::Mouse);
    s.pump();
    assert_eq!(s.mode(), VISUAL);
}

#[test]
fn drag_is_adopted_once_on_release() {
    let mut s = Session::new("{caret}abcdef\n");
    let id = primary(&s);
    s.model.user_drag_start(id);
    s.pump();
    assert!(s.engine.guard().is_locked());

    s.model.user_drag_to(id, 0, 2);
    s.model.user_drag_to(id, 0, 3);
    assert_eq!(s.model.suppressed_events(), 2);
    assert_eq!(s.mode(), Mode::Normal);

    s.model.user_release(id);
    s.pump();
    assert_eq!(s.mode(), VISUAL);
    assert_eq!(s.model.selection(id), Some((0, 3)));
    assert_eq!(s.caret(), 2);
    assert!(!s.engine.guard().is_locked());
}

#[test]
fn release_without_drag_is_ignored() {
    let mut s = Session::new("{caret}abcdef\n");
    let id = primary(&s);
    s.model.user_release(id);
    s.pump();
    assert_eq!(s.mode(), Mode::Normal);
    assert!(!s.engine.guard().is_locked());
}

#[test]
fn click_leaves_visual() {
    let mut s = Session::new("{caret}abcdef\n");
    s.keys("vll");
    assert_eq!(s.mode(), VISUAL);
    let id = primary(&s);
    s.model.user_click(id, 4, 1);
    s.pump();
    assert_eq!(s.mode(), Mode::Normal);
    assert_eq!(s.model.selection(id), None);
    assert_eq!(s.caret(), 4);
}

#[test]
fn click_past_line_end_steps_back() {
    let mut s = Session::new("{caret}abc\nde\n");
    let id = primary(&s);
    s.model.user_click(id, 3, 1);
    s.pump();
    assert_eq!(s.caret(), 2);

    // empty lines have nowhere to step back to
    let mut s = Session::new("{caret}abc\n\nde\n");
    let id = primary(&s);
    s.model.user_click(id, 4, 1);
    s.pump();
    assert_eq!(s.caret(), 4);
}

#[test]
fn click_at_line_end_in_insert_stays() {
    let mut s = Session::new("{caret}abc\n");
    s.keys("i");
    let id = primary(&s);
    s.model.user_click(id, 3, 1);
    s.pump();
    assert_eq!(s.mode(), Mode::Insert);
    assert_eq!(s.caret(), 3);
}

#[test]
fn keyboard_navigation_outside_engine_clears_visual() {
    let mut s = Session::new("{caret}abcdef\n");
    s.keys("vl");
    let id = primary(&s);
    s.model.user_move_caret(id, 5);
    s.pump();
    assert_eq!(s.mode(), Mode::Normal);
    assert_eq!(s.engine.caret(id).map(|c| c.offset), Some(5));
}

#[test]
fn engine_moves_are_not_reported_back() {
    let mut s = Session::new("{caret}abc def\n");
    s.keys("wvlh");
    s.pump();
    assert!(s.model.take_events().is_empty());
    assert!(s.model.suppressed_events() > 0);
    assert_eq!(s.mode(), VISUAL);
}

#[test]
fn caret_table_follows_host_carets() {
    let mut s = Session::new("{caret}abc def\n");
    let extra = s.model.add_caret(4);
    s.pump();
    assert_eq!(s.engine.caret(extra).map(|c| c.offset), Some(4));
    assert!(s.model.remove_caret(extra));
    s.pump();
    assert_eq!(s.engine.caret(extra), None);
}
