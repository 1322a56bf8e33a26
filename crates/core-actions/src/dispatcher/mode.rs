//! Mode-changing actions.
//!
//! Insert entry points, Visual/Select toggles, command-line entry and the
//! escape keys. The special keys (arrows, `<Home>`, `<End>` and their shifted
//! forms) also live here because whether they start, extend or stop a
//! selection is decided by the `keymodel` and `selectmode` options.

use super::{ExecContext, motion};
use crate::action::ActionHandler;
use crate::builtin::ids;
use crate::command::Command;
use core_config::{KeyModel, SelectModeOption};
use core_keymap::ActionId;
use core_state::{Mode, SelectionKind};
use core_text::{TextSource, motion as text_motion};
use tracing::{debug, trace};

fn enter_insert(ctx: &mut ExecContext<'_>, mode: Mode) {
    if ctx.enter_mode(mode) {
        ctx.mark_insert_start();
    }
}

/// Move every caret to `f(text, offset)`.
fn move_all(ctx: &mut ExecContext<'_>, f: impl Fn(&dyn TextSource, usize) -> usize) {
    for caret in ctx.ordered_carets() {
        let Some(offset) = ctx.caret_offset(caret) else {
            continue;
        };
        let dest = f(ctx.host.text(), offset);
        if dest != offset {
            ctx.move_caret(caret, dest);
        }
    }
}

/// One step right unless the caret sits on a line break or the document end.
fn after_char(text: &dyn TextSource, offset: usize) -> usize {
    match text.char_at(offset) {
        Some('\n') | None => offset,
        Some(_) => offset + 1,
    }
}

pub(crate) fn insert(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    enter_insert(ctx, Mode::Insert);
}

pub(crate) fn append(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    move_all(ctx, after_char);
    enter_insert(ctx, Mode::Insert);
}

pub(crate) fn insert_line_start(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    move_all(ctx, |t, o| text_motion::first_non_blank(t, o));
    enter_insert(ctx, Mode::Insert);
}

pub(crate) fn append_line_end(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    move_all(ctx, |t, o| t.line_end(t.line_of_offset(o)));
    enter_insert(ctx, Mode::Insert);
}

fn open_line(ctx: &mut ExecContext<'_>, below: bool) {
    for caret in ctx.ordered_carets() {
        let Some(offset) = ctx.caret_offset(caret) else {
            continue;
        };
        let text = ctx.host.text();
        let line = text.line_of_offset(offset);
        let at = if below {
            text.line_end(line)
        } else {
            text.line_start(line)
        };
        ctx.host.insert_text(at, "\n");
        ctx.move_caret(caret, if below { at + 1 } else { at });
    }
    enter_insert(ctx, Mode::Insert);
}

pub(crate) fn open_below(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    open_line(ctx, true);
}

pub(crate) fn open_above(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    open_line(ctx, false);
}

pub(crate) fn replace(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    enter_insert(ctx, Mode::Replace);
}

fn selection_kind_of(id: ActionId) -> SelectionKind {
    match id {
        ids::VISUAL_LINE | ids::SELECT_LINE => SelectionKind::Line,
        ids::VISUAL_BLOCK | ids::SELECT_BLOCK => SelectionKind::Block,
        _ => SelectionKind::Character,
    }
}

/// Anchor a selection at every caret and enter `target`.
pub(crate) fn start_selection(ctx: &mut ExecContext<'_>, target: Mode) {
    for caret in ctx.ordered_carets() {
        if let Some(state) = ctx.carets.get_mut(caret) {
            state.selection_start = Some(state.offset);
        }
    }
    if !ctx.enter_mode(target) {
        ctx.carets.clear_selections();
        return;
    }
    for caret in ctx.ordered_carets() {
        ctx.update_selection(caret);
    }
}

/// `v`, `V`, `<C-v>`: enter, switch or leave Visual.
pub(crate) fn toggle_visual(ctx: &mut ExecContext<'_>, cmd: &Command) {
    let kind = selection_kind_of(cmd.action);
    match ctx.mode() {
        Mode::Visual(current) if current == kind => ctx.exit_to_normal(),
        Mode::Visual(_) => {
            ctx.set_mode(Mode::Visual(kind));
            for caret in ctx.ordered_carets() {
                ctx.update_selection(caret);
            }
        }
        _ => start_selection(ctx, Mode::Visual(kind)),
    }
}

/// `gh`, `gH`, `g<C-h>`: Select the character (or line/block) under the caret.
pub(crate) fn start_select(ctx: &mut ExecContext<'_>, cmd: &Command) {
    let kind = selection_kind_of(cmd.action);
    start_selection(ctx, Mode::Select(kind));
    if kind == SelectionKind::Character && ctx.mode().is_select() {
        for caret in ctx.ordered_carets() {
            let Some(offset) = ctx.caret_offset(caret) else {
                continue;
            };
            let head = after_char(ctx.host.text(), offset);
            ctx.move_caret(caret, head);
            ctx.update_selection(caret);
        }
    }
}

/// `<C-g>`: swap Visual and Select keeping the selected text. Select
/// selections exclude the caret, Visual ones include it.
pub(crate) fn toggle_visual_select(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    let (to, forward) = match ctx.mode() {
        Mode::Visual(k) => (Mode::Select(k), true),
        Mode::Select(k) => (Mode::Visual(k), false),
        _ => return,
    };
    for caret in ctx.ordered_carets() {
        let Some(state) = ctx.carets.get(caret).copied() else {
            continue;
        };
        let anchor = state.selection_start.unwrap_or(state.offset);
        let head = match (forward, state.offset >= anchor) {
            (true, true) => after_char(ctx.host.text(), state.offset),
            (false, true) if state.offset > anchor => state.offset - 1,
            _ => state.offset,
        };
        if head != state.offset {
            ctx.move_caret(caret, head);
        }
    }
    ctx.set_mode(to);
    for caret in ctx.ordered_carets() {
        ctx.update_selection(caret);
    }
}

pub(crate) fn command_line(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    if ctx.mode().is_visual() {
        ctx.exit_to_normal();
    }
    ctx.cmdline.clear();
    ctx.set_mode(Mode::CommandLine);
}

/// `<Esc>` with nothing pending: leaves Visual/Select, beeps in Normal.
pub(crate) fn escape(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    match ctx.mode() {
        Mode::Normal => ctx.host.bell(),
        _ => ctx.exit_to_normal(),
    }
}

/// Back to Normal from Insert/Replace, one character left.
pub(crate) fn leave_insert(ctx: &mut ExecContext<'_>) {
    move_all(ctx, |t, o| text_motion::left(t, o, 1));
    for caret in ctx.ordered_carets() {
        if let Some(state) = ctx.carets.get_mut(caret) {
            state.insert_start = None;
        }
    }
    ctx.exit_to_normal();
}

/// `<Esc>` in Insert/Replace.
pub(crate) fn insert_escape(ctx: &mut ExecContext<'_>, _cmd: &Command) {
    leave_insert(ctx);
}

/// Explicit cancel while input was pending: whatever the mode, end in Normal.
pub(crate) fn cancel(ctx: &mut ExecContext<'_>) {
    let mode = ctx.mode();
    debug!(target: "actions.dispatch", %mode, "cancel_to_normal");
    match mode {
        Mode::Normal => {}
        Mode::Insert | Mode::Replace => leave_insert(ctx),
        Mode::CommandLine => {
            ctx.cmdline.clear();
            ctx.exit_to_normal();
        }
        _ => ctx.exit_to_normal(),
    }
}

/// Underlying motion of a special key and whether the key is shifted.
fn special_target(id: ActionId) -> Option<(ActionId, bool)> {
    Some(match id {
        ids::KEY_LEFT => (ids::LEFT, false),
        ids::KEY_RIGHT => (ids::RIGHT, false),
        ids::KEY_UP => (ids::UP, false),
        ids::KEY_DOWN => (ids::DOWN, false),
        ids::KEY_HOME => (ids::LINE_START, false),
        ids::KEY_END => (ids::LINE_END, false),
        ids::KEY_SHIFT_LEFT => (ids::LEFT, true),
        ids::KEY_SHIFT_RIGHT => (ids::RIGHT, true),
        ids::KEY_SHIFT_UP => (ids::UP, true),
        ids::KEY_SHIFT_DOWN => (ids::DOWN, true),
        ids::KEY_SHIFT_HOME => (ids::LINE_START, true),
        ids::KEY_SHIFT_END => (ids::LINE_END, true),
        _ => return None,
    })
}

/// Arrow/Home/End keys outside the plain motion bindings.
///
/// * Shifted, no selection: `startsel` starts one (Select when `selectmode`
///   has `key`, Visual otherwise), then the caret moves.
/// * Unshifted, in Visual: `stopsel`/`stopvisual` leave Visual first.
/// * Unshifted, in Select: `stopsel`/`stopselect` leave Select first.
/// * Otherwise the selection, if any, is extended.
pub(crate) fn special_key(ctx: &mut ExecContext<'_>, cmd: &Command) {
    let Some((motion_id, shifted)) = special_target(cmd.action) else {
        return;
    };
    let Some(spec) = ctx.actions.get(motion_id).copied() else {
        return;
    };
    let ActionHandler::Motion(f) = spec.handler else {
        return;
    };
    let mode = ctx.mode();
    let selecting = mode.is_visual() || mode.is_select();
    if shifted {
        if !selecting && ctx.options.has_keymodel(KeyModel::StartSel) {
            let target = if ctx.options.has_selectmode(SelectModeOption::Key) {
                Mode::Select(SelectionKind::Character)
            } else {
                Mode::Visual(SelectionKind::Character)
            };
            debug!(target: "actions.dispatch", %target, "keymodel_startsel");
            start_selection(ctx, target);
        }
    } else if selecting {
        let stop = ctx.options.has_keymodel(KeyModel::StopSel)
            || if mode.is_visual() {
                ctx.options.has_keymodel(KeyModel::StopVisual)
            } else {
                ctx.options.has_keymodel(KeyModel::StopSelect)
            };
        if stop {
            trace!(target: "actions.dispatch", %mode, "keymodel_stop");
            ctx.exit_to_normal();
        }
    }
    let motion_cmd = spec.command().with_count(cmd.raw_count);
    motion::apply_motion(ctx, &motion_cmd, f);
}
