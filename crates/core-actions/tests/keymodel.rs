mod common;
use common::*;

use core_config::{KeyModel, SelectModeOption};
use core_model::HostSurface;
use core_state::{Mode, SelectionKind};
use pretty_assertions::assert_eq;

fn selection(s: &Session) -> Option<(usize, usize)> {
    s.model.selection(s.model.primary_caret()?)
}

#[test]
fn default_keymodel_does_not_start_selection() {
    let mut s = Session::new("{caret}abcdef\n");
    s.keys("<S-Right>");
    assert_eq!(s.mode(), Mode::Normal);
    assert_eq!(s.caret(), 1);
    assert_eq!(selection(&s), None);
}

#[test]
fn startsel_with_key_selectmode_enters_select() {
    let opts = options(&[KeyModel::StartSel, KeyModel::StopSel], &[SelectModeOption::Key]);
    let mut s = Session::with_options("{caret}abcdef\n", opts);
    s.keys("<S-Right><S-Right>");
    assert_eq!(s.mode(), Mode::Select(SelectionKind::Character));
    assert_eq!(selection(&s), Some((0, 2)));
    assert_eq!(s.caret(), 2);
}

#[test]
fn stopsel_leaves_select_before_moving() {
    let opts = options(&[KeyModel::StartSel, KeyModel::StopSel], &[SelectModeOption::Key]);
    let mut s = Session::with_options("{caret}abcdef\n", opts);
    s.keys("<S-Right><S-Right><Right>");
    assert_eq!(s.mode(), Mode::Normal);
    assert_eq!(selection(&s), None);
    assert_eq!(s.caret(), 3);
}

#[test]
fn typing_over_keyboard_selection() {
    let opts = options(&[KeyModel::StartSel, KeyModel::StopSel], &[SelectModeOption::Key]);
    let mut s = Session::with_options("{caret}abcdef\n", opts);
    s.keys("<S-Right><S-Right>x");
    assert_eq!(s.mode(), Mode::Insert);
    assert_eq!(s.marked(), "x{caret}cdef\n");
}

#[test]
fn startsel_without_key_selectmode_enters_visual() {
    let opts = options(&[KeyModel::StartSel], &[]);
    let mut s = Session::with_options("{caret}abcdef\n", opts);
    s.keys("<S-Right>");
    assert_eq!(s.mode(), Mode::Visual(SelectionKind::Character));
    assert_eq!(selection(&s), Some((0, 2)));
    // no stop flag: unshifted keys extend
    s.keys("<Right>");
    assert_eq!(s.mode(), Mode::Visual(SelectionKind::Character));
    assert_eq!(selection(&s), Some((0, 3)));
}

#[test]
fn stopvisual_only_affects_visual() {
    let opts = options(&[KeyModel::StartSel, KeyModel::StopVisual], &[]);
    let mut s = Session::with_options("{caret}abcdef\n", opts);
    s.keys("<S-Right><End>");
    assert_eq!(s.mode(), Mode::Normal);
    assert_eq!(s.caret(), 5);
}

#[test]
fn shifted_key_in_insert_selects() {
    let opts = options(&[KeyModel::StartSel, KeyModel::StopSel], &[SelectModeOption::Key]);
    let mut s = Session::with_options("{caret}abcdef\n", opts);
    s.keys("i<S-End>");
    assert_eq!(s.mode(), Mode::Select(SelectionKind::Character));
    assert_eq!(selection(&s), Some((0, 6)));
}
